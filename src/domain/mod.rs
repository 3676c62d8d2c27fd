//! Domain models for the skill matrix
//!
//! Contains the progression engine without any I/O concerns.

mod id;
mod skill;
mod credits;
mod graph;
mod engine;
pub mod defaults;

#[cfg(test)]
mod testing;

pub use id::{IdError, SkillId};
pub use skill::{Position, SkillNode, SkillSeed, SkillStatus};
pub use credits::{CreditBalance, CreditError};
pub use graph::{GraphError, NodeNotFound, Progress, SkillGraph};
pub use engine::{unlock, SkillMatrix, UnlockError, UnlockOutcome};
