//! Unlock command
//!
//! The engine does not prompt: invoking `skills unlock` is the user's
//! confirmation. Validation, debit and propagation run under the project's
//! exclusive state lock.

use anyhow::Result;

use super::output::Output;
use super::query::parse_id;
use crate::domain::{SkillId, UnlockError};
use crate::storage::{Project, ProjectError};

/// Unlock an available skill
pub fn unlock(output: &Output, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    output.note("unlock", format_args!("Opened project at: {}", project.root().display()));

    let id = parse_id(id)?;

    let store = project.store();
    if !store.exists() {
        return Err(ProjectError::MissingState(project.root().to_path_buf()).into());
    }

    let result = store.transact(|matrix| -> Result<_, UnlockError> {
        let label = matrix.get(&id)?.label.clone();
        matrix.unlock(&id).map(|outcome| (label, outcome))
    });

    let (label, outcome) = match result {
        Ok(done) => done,
        Err(err) => {
            let shortfall = match err.downcast_ref::<UnlockError>() {
                Some(UnlockError::InsufficientCredits { cost, balance, .. }) => {
                    Some(balance.shortfall(*cost))
                }
                _ => None,
            };
            return Err(match shortfall {
                Some(missing) => err.context(format!("Need {} more credits", missing)),
                None => err,
            });
        }
    };

    output.note(
        "unlock",
        format_args!("Debited {} credits for {}", outcome.cost, outcome.id),
    );

    let report = serde_json::json!({
        "success": true,
        "unlocked": outcome.id,
        "cost": outcome.cost,
        "credits": outcome.balance,
        "newly_available": outcome.newly_available,
    });

    output.emit(&report, |_| {
        println!(
            "Unlocked {} ({}) for {} credits. Credits remaining: {}",
            label, outcome.id, outcome.cost, outcome.balance
        );
        if !outcome.newly_available.is_empty() {
            let ids: Vec<&str> = outcome
                .newly_available
                .iter()
                .map(SkillId::as_str)
                .collect();
            println!("Now available: {}", ids.join(", "));
        }
    })
}
