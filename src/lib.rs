//! Skill Matrix - a credit-gated skill progression engine
//!
//! Skills form a directed acyclic graph of prerequisites. A skill becomes
//! available once every prerequisite is mastered, and is mastered by spending
//! its cost from a credit balance. After each unlock, availability is
//! re-derived across the whole graph.
//!
//! ```
//! use skill_matrix::{SkillId, SkillMatrix, SkillSeed, SkillStatus};
//!
//! let root = SkillId::new("root").unwrap();
//! let next = SkillId::new("next").unwrap();
//! let mut matrix = SkillMatrix::from_seeds(
//!     [
//!         SkillSeed::new(root.clone(), 5),
//!         SkillSeed::new(next.clone(), 10).depends_on(root.clone()),
//!     ],
//!     20,
//! )
//! .unwrap();
//!
//! let outcome = matrix.unlock(&root).unwrap();
//! assert_eq!(outcome.newly_available, vec![next.clone()]);
//! assert_eq!(matrix.balance().amount(), 15);
//! assert_eq!(matrix.get(&next).unwrap().status, SkillStatus::Available);
//! ```

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    CreditBalance, GraphError, NodeNotFound, SkillGraph, SkillId, SkillMatrix, SkillNode,
    SkillSeed, SkillStatus, UnlockError, UnlockOutcome,
};
