//! Skill graph store
//!
//! Holds every skill node together with its prerequisite edges. The edge set
//! is fixed at construction time; only node status changes afterwards.
//! Uses petgraph for adjacency and topological ordering.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::credits::CreditBalance;
use super::id::SkillId;
use super::skill::{SkillNode, SkillSeed, SkillStatus};

/// Structural problems found while building a graph
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Duplicate skill ID: {0}")]
    DuplicateId(SkillId),

    #[error("Skill {node} depends on unknown skill {missing}")]
    DanglingDependency { node: SkillId, missing: SkillId },

    #[error("Dependency cycle detected: {}", join_ids(.0))]
    CycleDetected(Vec<SkillId>),

    #[error("Skill {0} has a non-finite layout position")]
    InvalidPosition(SkillId),
}

/// Lookup of an ID that is not part of the graph
#[derive(Debug, Error, PartialEq, Clone)]
#[error("Skill not found: {0}")]
pub struct NodeNotFound(pub SkillId);

fn join_ids(ids: &[SkillId]) -> String {
    ids.iter()
        .map(SkillId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Status counts and remaining cost across the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub mastered: usize,
    pub available: usize,
    pub locked: usize,

    /// Sum of costs of every skill not yet mastered
    pub remaining_cost: u64,
}

/// The skill progression graph
///
/// Nodes live in an arena indexed by petgraph's `NodeIndex`; the arena order
/// is the seed order. Edges point from a dependency to its dependent, so
/// "dependency must be mastered before dependent".
#[derive(Debug, Clone)]
pub struct SkillGraph {
    graph: DiGraph<SkillId, ()>,
    nodes: Vec<SkillNode>,
    node_map: HashMap<SkillId, NodeIndex>,

    /// Dependents of each node, in seed order
    children: Vec<Vec<SkillId>>,

    /// Dependencies before dependents
    order: Vec<NodeIndex>,
}

impl SkillGraph {
    /// Builds a graph from seed descriptors
    ///
    /// Rejects duplicate IDs, non-finite positions, dangling dependency
    /// references and cycles.
    /// Runs availability propagation once, so roots and skills whose
    /// dependencies were all seeded as mastered start out available.
    pub fn build(seeds: impl IntoIterator<Item = SkillSeed>) -> Result<Self, GraphError> {
        let nodes: Vec<SkillNode> = seeds.into_iter().map(SkillNode::from).collect();

        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut node_map = HashMap::with_capacity(nodes.len());

        // First pass: add all nodes
        for node in &nodes {
            if node_map.contains_key(&node.id) {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
            // Positions must survive a JSON round trip
            if !(node.position.x.is_finite() && node.position.y.is_finite()) {
                return Err(GraphError::InvalidPosition(node.id.clone()));
            }
            let idx = graph.add_node(node.id.clone());
            node_map.insert(node.id.clone(), idx);
        }

        // Second pass: add all edges
        for (i, node) in nodes.iter().enumerate() {
            for dep in &node.dependencies {
                let dep_idx =
                    node_map
                        .get(dep)
                        .ok_or_else(|| GraphError::DanglingDependency {
                            node: node.id.clone(),
                            missing: dep.clone(),
                        })?;
                graph.add_edge(*dep_idx, NodeIndex::new(i), ());
            }
        }

        if let Some(cycle) = find_cycle(&graph) {
            return Err(GraphError::CycleDetected(
                cycle.into_iter().map(|idx| graph[idx].clone()).collect(),
            ));
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| GraphError::CycleDetected(vec![graph[cycle.node_id()].clone()]))?;

        let children: Vec<Vec<SkillId>> = graph
            .node_indices()
            .map(|idx| {
                let mut dependents: Vec<NodeIndex> =
                    graph.neighbors_directed(idx, Direction::Outgoing).collect();
                dependents.sort();
                dependents.dedup();
                dependents.into_iter().map(|d| graph[d].clone()).collect()
            })
            .collect();

        let mut skill_graph = Self {
            graph,
            nodes,
            node_map,
            children,
            order,
        };

        let opened = skill_graph.propagate();
        debug!(
            skills = skill_graph.len(),
            newly_available = opened.len(),
            "built skill graph"
        );

        Ok(skill_graph)
    }

    /// Returns the node with the given ID
    pub fn get(&self, id: &SkillId) -> Result<&SkillNode, NodeNotFound> {
        self.index_of(id).map(|idx| &self.nodes[idx.index()])
    }

    /// Returns the IDs this skill depends on
    pub fn parents_of(&self, id: &SkillId) -> Result<&[SkillId], NodeNotFound> {
        self.get(id).map(|node| node.dependencies.as_slice())
    }

    /// Returns the IDs of skills that depend on this one
    pub fn children_of(&self, id: &SkillId) -> Result<&[SkillId], NodeNotFound> {
        self.index_of(id)
            .map(|idx| self.children[idx.index()].as_slice())
    }

    /// Returns the dependencies of a skill that are not yet mastered
    pub fn blockers_of(&self, id: &SkillId) -> Result<Vec<&SkillNode>, NodeNotFound> {
        let idx = self.index_of(id)?;
        let mut blockers: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter(|p| !self.nodes[p.index()].status.is_mastered())
            .collect();
        blockers.sort();
        blockers.dedup();
        Ok(blockers
            .into_iter()
            .map(|p| &self.nodes[p.index()])
            .collect())
    }

    /// Returns true if the graph contains the skill
    pub fn contains(&self, id: &SkillId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns the number of skills in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all skills in seed order
    pub fn iter(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    /// Iterates over skills with the given status
    pub fn with_status(&self, status: SkillStatus) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter().filter(move |node| node.status == status)
    }

    /// Skills that can be unlocked now
    pub fn available(&self) -> impl Iterator<Item = &SkillNode> {
        self.with_status(SkillStatus::Available)
    }

    /// Skills whose prerequisites are not yet met
    pub fn locked(&self) -> impl Iterator<Item = &SkillNode> {
        self.with_status(SkillStatus::Locked)
    }

    /// Skills already mastered
    pub fn mastered(&self) -> impl Iterator<Item = &SkillNode> {
        self.with_status(SkillStatus::Mastered)
    }

    /// Available skills whose cost fits within the balance
    pub fn affordable(&self, balance: CreditBalance) -> impl Iterator<Item = &SkillNode> {
        self.available()
            .filter(move |node| balance.can_afford(node.cost))
    }

    /// Iterates over skills with every dependency before its dependents
    pub fn topological_order(&self) -> impl Iterator<Item = &SkillNode> {
        self.order.iter().map(|idx| &self.nodes[idx.index()])
    }

    /// Summarizes progression across the graph
    pub fn progress(&self) -> Progress {
        self.nodes
            .iter()
            .fold(Progress::default(), |mut progress, node| {
                progress.total += 1;
                match node.status {
                    SkillStatus::Mastered => progress.mastered += 1,
                    SkillStatus::Available => progress.available += 1,
                    SkillStatus::Locked => progress.locked += 1,
                }
                if !node.status.is_mastered() {
                    progress.remaining_cost += node.cost;
                }
                progress
            })
    }

    /// Exports the current state as seeds (statuses included)
    pub fn to_seeds(&self) -> Vec<SkillSeed> {
        self.nodes.iter().map(SkillNode::to_seed).collect()
    }

    /// Re-derives availability across the whole graph
    ///
    /// Every locked skill whose dependencies are all mastered becomes
    /// available. Available and mastered skills are never touched, so the
    /// pass is idempotent. Returns the newly available IDs in seed order.
    pub fn propagate(&mut self) -> Vec<SkillId> {
        // A skill turning available never satisfies anyone else's
        // prerequisites, so one scan over the current statuses is enough.
        let ready: Vec<usize> = self
            .graph
            .node_indices()
            .filter(|idx| {
                self.nodes[idx.index()].status.is_locked()
                    && self
                        .graph
                        .neighbors_directed(*idx, Direction::Incoming)
                        .all(|p| self.nodes[p.index()].status.is_mastered())
            })
            .map(|idx| idx.index())
            .collect();

        ready
            .into_iter()
            .map(|i| {
                let node = &mut self.nodes[i];
                node.status = SkillStatus::Available;
                node.id.clone()
            })
            .collect()
    }

    /// Marks a skill as mastered. Only the unlock engine calls this.
    pub(super) fn set_mastered(&mut self, id: &SkillId) -> Result<(), NodeNotFound> {
        let idx = self.index_of(id)?;
        self.nodes[idx.index()].status = SkillStatus::Mastered;
        Ok(())
    }

    fn index_of(&self, id: &SkillId) -> Result<NodeIndex, NodeNotFound> {
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| NodeNotFound(id.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search with visited/in-progress marks
///
/// Returns the nodes on the first cycle found, following edge direction.
/// The path is kept on an explicit stack, so long prerequisite chains do not
/// grow the call stack.
fn find_cycle(graph: &DiGraph<SkillId, ()>) -> Option<Vec<NodeIndex>> {
    let mut marks = vec![Mark::Unvisited; graph.node_count()];
    // Each frame is a node on the current path and its unvisited successors
    let mut path: Vec<(NodeIndex, std::vec::IntoIter<NodeIndex>)> = Vec::new();

    for start in graph.node_indices() {
        if marks[start.index()] != Mark::Unvisited {
            continue;
        }
        marks[start.index()] = Mark::InProgress;
        path.push((start, successors(graph, start)));

        while let Some(frame) = path.last_mut() {
            let node = frame.0;
            match frame.1.next() {
                Some(succ) => match marks[succ.index()] {
                    Mark::InProgress => {
                        // Everything from `succ` to the top of the path forms the cycle
                        if let Some(pos) = path.iter().position(|(n, _)| *n == succ) {
                            return Some(path[pos..].iter().map(|(n, _)| *n).collect());
                        }
                    }
                    Mark::Unvisited => {
                        marks[succ.index()] = Mark::InProgress;
                        path.push((succ, successors(graph, succ)));
                    }
                    Mark::Done => {}
                },
                None => {
                    marks[node.index()] = Mark::Done;
                    path.pop();
                }
            }
        }
    }

    None
}

fn successors(graph: &DiGraph<SkillId, ()>, node: NodeIndex) -> std::vec::IntoIter<NodeIndex> {
    let mut next: Vec<NodeIndex> = graph.neighbors_directed(node, Direction::Outgoing).collect();
    next.sort();
    next.into_iter()
}
