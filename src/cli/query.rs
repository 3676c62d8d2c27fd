//! Read-only query commands (list, show, available, balance, status, order, validate)

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::Output;
use crate::domain::{CreditBalance, Progress, SkillGraph, SkillId, SkillMatrix, SkillNode, SkillStatus};
use crate::storage::{Project, SeedFile};

/// One row in skill listings
#[derive(Serialize)]
struct SkillRow<'a> {
    id: &'a SkillId,
    label: &'a str,
    status: SkillStatus,
    cost: u64,
    #[serde(skip_serializing_if = "<[SkillId]>::is_empty")]
    dependencies: &'a [SkillId],
}

impl<'a> From<&'a SkillNode> for SkillRow<'a> {
    fn from(node: &'a SkillNode) -> Self {
        Self {
            id: &node.id,
            label: &node.label,
            status: node.status,
            cost: node.cost,
            dependencies: &node.dependencies,
        }
    }
}

fn rows<'a>(nodes: impl IntoIterator<Item = &'a SkillNode>) -> Vec<SkillRow<'a>> {
    nodes.into_iter().map(SkillRow::from).collect()
}

fn print_table(rows: &[SkillRow]) {
    println!("{:<12} {:<10} {:>6}  LABEL", "ID", "STATUS", "COST");
    println!("{}", "-".repeat(60));
    for row in rows {
        println!(
            "{:<12} {:<10} {:>6}  {}",
            row.id, row.status, row.cost, row.label
        );
    }
}

pub(super) fn parse_id(id: &str) -> Result<SkillId> {
    id.parse::<SkillId>()
        .with_context(|| format!("Invalid skill ID: '{}'", id))
}

fn open_matrix(output: &Output, command: &str) -> Result<(Project, SkillMatrix)> {
    let project = Project::open_current()?;
    output.note(command, format_args!("Opened project at: {}", project.root().display()));
    let matrix = project.load_matrix()?;
    output.note(command, format_args!("Loaded {} skills", matrix.graph().len()));
    Ok((project, matrix))
}

/// List all skills, optionally filtered by status
pub fn list(output: &Output, status: Option<SkillStatus>) -> Result<()> {
    let (_, matrix) = open_matrix(output, "list")?;
    let listed = rows(
        matrix
            .graph()
            .iter()
            .filter(|node| status.map_or(true, |s| node.status == s)),
    );

    output.emit(&listed, |listed| {
        if listed.is_empty() {
            println!("No skills found.");
        } else {
            println!("Skills ({}):", listed.len());
            print_table(listed);
        }
    })
}

/// Detail view of one skill
#[derive(Serialize)]
struct SkillDetail<'a> {
    skill: &'a SkillNode,
    dependents: &'a [SkillId],
    blocked_by: Vec<&'a SkillId>,
    affordable: bool,

    #[serde(skip)]
    balance: CreditBalance,
}

impl SkillDetail<'_> {
    fn print(&self) {
        let node = self.skill;
        println!("{} ({})", node.label, node.id);
        println!("Status: {}", node.status);
        if !node.status.is_mastered() {
            println!("Cost: {}", node.cost);
        }
        if !node.description.is_empty() {
            println!();
            println!("{}", node.description);
        }
        println!();
        println!("Requires: {}", join_or_none(&node.dependencies));
        println!("Unlocks toward: {}", join_or_none(self.dependents));

        match node.status {
            SkillStatus::Locked => {
                let blockers: Vec<&str> = self.blocked_by.iter().map(|id| id.as_str()).collect();
                println!("Prerequisites not met: {}", blockers.join(", "));
            }
            SkillStatus::Available if !self.affordable => println!(
                "Need {} more credits (balance {})",
                self.balance.shortfall(node.cost),
                self.balance
            ),
            SkillStatus::Available => println!("Ready to unlock."),
            SkillStatus::Mastered => println!("Mastered."),
        }
    }
}

/// Show one skill with its neighbourhood
pub fn show(output: &Output, id: &str) -> Result<()> {
    let (_, matrix) = open_matrix(output, "show")?;
    let id = parse_id(id)?;
    let graph = matrix.graph();

    let node = graph.get(&id)?;
    let detail = SkillDetail {
        skill: node,
        dependents: graph.children_of(&id)?,
        blocked_by: graph.blockers_of(&id)?.into_iter().map(|n| &n.id).collect(),
        affordable: matrix.balance().can_afford(node.cost),
        balance: matrix.balance(),
    };

    output.emit(&detail, |detail| detail.print())
}

fn join_or_none(ids: &[SkillId]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.iter().map(SkillId::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// Show skills that can be unlocked now
pub fn available(output: &Output, affordable_only: bool) -> Result<()> {
    let (_, matrix) = open_matrix(output, "available")?;
    let balance = matrix.balance();
    let listed = if affordable_only {
        rows(matrix.graph().affordable(balance))
    } else {
        rows(matrix.graph().available())
    };

    output.note("available", format_args!("Found {} skills", listed.len()));

    output.emit(&listed, |listed| {
        if listed.is_empty() {
            println!("No skills available to unlock.");
        } else {
            println!("Available skills ({}), balance {}:", listed.len(), balance);
            print_table(listed);
        }
    })
}

/// Show the credit balance
pub fn balance(output: &Output) -> Result<()> {
    let (_, matrix) = open_matrix(output, "balance")?;

    output.emit(&serde_json::json!({ "credits": matrix.balance() }), |_| {
        println!("Credits: {}", matrix.balance())
    })
}

#[derive(Serialize)]
struct StatusReport {
    credits: CreditBalance,
    progress: Progress,
    affordable: usize,
}

/// Show progression overview
pub fn status(output: &Output) -> Result<()> {
    let (project, matrix) = open_matrix(output, "status")?;
    let report = StatusReport {
        credits: matrix.balance(),
        progress: matrix.graph().progress(),
        affordable: matrix.graph().affordable(matrix.balance()).count(),
    };

    output.emit(&report, |report| {
        let progress = &report.progress;
        println!("Project: {}", project.root().display());
        println!();
        println!("Credits: {}", report.credits);
        println!(
            "Skills: {} total ({} mastered, {} available, {} locked)",
            progress.total, progress.mastered, progress.available, progress.locked
        );
        println!("Affordable now: {}", report.affordable);
        println!("Credits to master everything: {}", progress.remaining_cost);
    })
}

/// List skills with prerequisites first
pub fn order(output: &Output) -> Result<()> {
    let (_, matrix) = open_matrix(output, "order")?;
    let nodes: Vec<&SkillNode> = matrix.graph().topological_order().collect();
    let ids: Vec<&SkillId> = nodes.iter().map(|n| &n.id).collect();

    output.emit(&ids, |_| {
        for (i, node) in nodes.iter().enumerate() {
            println!("{:>3}. {:<12} {}", i + 1, node.id, node.status);
        }
    })
}

/// Build a seed file and report the result
pub fn validate(output: &Output, file: &Path) -> Result<()> {
    let seed = SeedFile::load(file)?;
    output.note("validate", format_args!("Parsed {} skills", seed.skills.len()));

    let graph = SkillGraph::build(seed.skills)
        .with_context(|| format!("Seed does not form a valid skill matrix: {}", file.display()))?;
    let progress = graph.progress();

    output.emit(
        &serde_json::json!({
            "valid": true,
            "credits": seed.credits,
            "progress": progress,
        }),
        |_| {
            println!(
                "Valid: {} skills ({} mastered, {} available, {} locked)",
                progress.total, progress.mastered, progress.available, progress.locked
            )
        },
    )
}
