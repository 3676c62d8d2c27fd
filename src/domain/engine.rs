//! Unlock engine
//!
//! The only mutator of a [`SkillGraph`]. An unlock either applies all of its
//! effects (debit, mastery, propagation) or none of them: every check runs
//! before the first mutation.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::credits::CreditBalance;
use super::graph::{GraphError, NodeNotFound, SkillGraph};
use super::id::SkillId;
use super::skill::{SkillNode, SkillSeed, SkillStatus};

/// Recoverable rejections of an unlock request
///
/// None of these leave any trace in the graph or the balance.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum UnlockError {
    #[error(transparent)]
    NotFound(#[from] NodeNotFound),

    #[error("Cannot unlock {id}: skill is {status}, only available skills can be unlocked")]
    InvalidTransition { id: SkillId, status: SkillStatus },

    #[error("Insufficient credits to unlock {id}: costs {cost}, balance is {balance}")]
    InsufficientCredits {
        id: SkillId,
        cost: u64,
        balance: CreditBalance,
    },
}

impl UnlockError {
    /// Returns true for the "need more credits" rejection
    pub fn is_insufficient_credits(&self) -> bool {
        matches!(self, UnlockError::InsufficientCredits { .. })
    }
}

/// Result of a successful unlock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlockOutcome {
    pub id: SkillId,
    pub cost: u64,

    /// Balance after the debit
    pub balance: CreditBalance,

    /// Skills that became available as a consequence, in seed order
    pub newly_available: Vec<SkillId>,
}

/// Unlocks a skill, debiting its cost and re-deriving availability
pub fn unlock(
    graph: &mut SkillGraph,
    id: &SkillId,
    balance: CreditBalance,
) -> Result<UnlockOutcome, UnlockError> {
    let node = graph.get(id)?;

    if !node.status.is_available() {
        debug!(skill = %id, status = %node.status, "unlock rejected: not available");
        return Err(UnlockError::InvalidTransition {
            id: id.clone(),
            status: node.status,
        });
    }

    let cost = node.cost;
    let remaining = balance.checked_debit(cost).map_err(|_| {
        debug!(skill = %id, cost, balance = %balance, "unlock rejected: insufficient credits");
        UnlockError::InsufficientCredits {
            id: id.clone(),
            cost,
            balance,
        }
    })?;

    graph.set_mastered(id)?;
    let newly_available = graph.propagate();

    info!(
        skill = %id,
        cost,
        balance = %remaining,
        opened = newly_available.len(),
        "skill unlocked"
    );

    Ok(UnlockOutcome {
        id: id.clone(),
        cost,
        balance: remaining,
        newly_available,
    })
}

/// A progression session: one graph and the balance spent against it
///
/// Taking `&mut self` for [`SkillMatrix::unlock`] makes the whole
/// validate-then-mutate sequence a single critical section.
#[derive(Debug, Clone)]
pub struct SkillMatrix {
    graph: SkillGraph,
    balance: CreditBalance,
}

impl SkillMatrix {
    pub fn new(graph: SkillGraph, balance: CreditBalance) -> Self {
        Self { graph, balance }
    }

    /// Builds the graph from seeds and pairs it with a starting balance
    pub fn from_seeds(
        seeds: impl IntoIterator<Item = SkillSeed>,
        credits: u64,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(SkillGraph::build(seeds)?, CreditBalance::new(credits)))
    }

    pub fn graph(&self) -> &SkillGraph {
        &self.graph
    }

    pub fn balance(&self) -> CreditBalance {
        self.balance
    }

    pub fn get(&self, id: &SkillId) -> Result<&SkillNode, NodeNotFound> {
        self.graph.get(id)
    }

    /// Unlocks a skill against the session balance
    pub fn unlock(&mut self, id: &SkillId) -> Result<UnlockOutcome, UnlockError> {
        let outcome = unlock(&mut self.graph, id, self.balance)?;
        self.balance = outcome.balance;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::{arb_seeds, id, seed};
    use proptest::prelude::*;

    fn status(matrix: &SkillMatrix, name: &str) -> SkillStatus {
        matrix.get(&id(name)).unwrap().status
    }

    fn statuses(graph: &SkillGraph) -> Vec<SkillStatus> {
        graph.iter().map(|n| n.status).collect()
    }

    fn diamond(credits: u64) -> SkillMatrix {
        SkillMatrix::from_seeds(
            [
                seed("a", 0, &[]).with_status(SkillStatus::Mastered),
                seed("b", 10, &["a"]),
                seed("c", 15, &["a"]),
                seed("d", 20, &["b", "c"]),
            ],
            credits,
        )
        .unwrap()
    }

    #[test]
    fn multi_branch_propagation() {
        let mut matrix = diamond(100);

        assert_eq!(status(&matrix, "b"), SkillStatus::Available);
        assert_eq!(status(&matrix, "c"), SkillStatus::Available);
        assert_eq!(status(&matrix, "d"), SkillStatus::Locked);

        let outcome = matrix.unlock(&id("b")).unwrap();
        assert!(outcome.newly_available.is_empty());
        assert_eq!(status(&matrix, "b"), SkillStatus::Mastered);
        assert_eq!(status(&matrix, "d"), SkillStatus::Locked);

        let outcome = matrix.unlock(&id("c")).unwrap();
        assert_eq!(outcome.newly_available, vec![id("d")]);
        assert_eq!(status(&matrix, "d"), SkillStatus::Available);
    }

    #[test]
    fn unlock_debits_cost() {
        let mut matrix = diamond(100);

        let outcome = matrix.unlock(&id("c")).unwrap();
        assert_eq!(outcome.cost, 15);
        assert_eq!(outcome.balance, CreditBalance::new(85));
        assert_eq!(matrix.balance(), CreditBalance::new(85));
    }

    #[test]
    fn insufficient_credits_leaves_balance() {
        let mut matrix = SkillMatrix::from_seeds([seed("crypto", 25, &[])], 10).unwrap();

        let err = matrix.unlock(&id("crypto")).unwrap_err();
        assert_eq!(
            err,
            UnlockError::InsufficientCredits {
                id: id("crypto"),
                cost: 25,
                balance: CreditBalance::new(10),
            }
        );
        assert!(err.is_insufficient_credits());
        assert_eq!(matrix.balance(), CreditBalance::new(10));
        assert_eq!(status(&matrix, "crypto"), SkillStatus::Available);
    }

    #[test]
    fn unlock_exact_balance() {
        let mut matrix = SkillMatrix::from_seeds([seed("x", 25, &[])], 25).unwrap();
        matrix.unlock(&id("x")).unwrap();
        assert_eq!(matrix.balance(), CreditBalance::new(0));
    }

    #[test]
    fn unlock_locked_skill_rejected() {
        let mut matrix = diamond(100);
        let before = statuses(matrix.graph());

        let err = matrix.unlock(&id("d")).unwrap_err();
        assert_eq!(
            err,
            UnlockError::InvalidTransition {
                id: id("d"),
                status: SkillStatus::Locked,
            }
        );
        assert_eq!(statuses(matrix.graph()), before);
        assert_eq!(matrix.balance(), CreditBalance::new(100));
    }

    #[test]
    fn unlock_mastered_skill_rejected() {
        let mut matrix = diamond(100);
        matrix.unlock(&id("b")).unwrap();
        let before = statuses(matrix.graph());

        let err = matrix.unlock(&id("b")).unwrap_err();
        assert!(matches!(
            err,
            UnlockError::InvalidTransition {
                status: SkillStatus::Mastered,
                ..
            }
        ));
        assert_eq!(statuses(matrix.graph()), before);
        assert_eq!(matrix.balance(), CreditBalance::new(90));
    }

    #[test]
    fn unlock_unknown_skill() {
        let mut matrix = diamond(100);
        let err = matrix.unlock(&id("nope")).unwrap_err();
        assert_eq!(err, UnlockError::NotFound(NodeNotFound(id("nope"))));
        assert_eq!(err.to_string(), "Skill not found: nope");
    }

    #[test]
    fn one_unlock_opens_unrelated_branches() {
        // Both "left" and "right" hang off "hub" from different places
        let mut matrix = SkillMatrix::from_seeds(
            [
                seed("start", 0, &[]).with_status(SkillStatus::Mastered),
                seed("hub", 5, &["start"]),
                seed("left", 5, &["hub", "start"]),
                seed("right", 5, &["hub"]),
                seed("far", 5, &["left"]),
            ],
            50,
        )
        .unwrap();

        let outcome = matrix.unlock(&id("hub")).unwrap();
        assert_eq!(outcome.newly_available, vec![id("left"), id("right")]);
        assert_eq!(status(&matrix, "far"), SkillStatus::Locked);
    }

    #[test]
    fn free_function_operates_on_borrowed_graph() {
        let mut graph = SkillGraph::build([seed("solo", 3, &[])]).unwrap();
        let outcome = unlock(&mut graph, &id("solo"), CreditBalance::new(3)).unwrap();
        assert_eq!(outcome.balance, CreditBalance::new(0));
        assert_eq!(graph.get(&id("solo")).unwrap().status, SkillStatus::Mastered);
    }

    proptest! {
        #[test]
        fn unlock_sequences_are_monotonic_and_conserve_credits(
            seeds in arb_seeds(),
            credits in 0u64..200,
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40),
        ) {
            let mut matrix = SkillMatrix::from_seeds(seeds, credits).unwrap();
            let ids: Vec<SkillId> = matrix.graph().iter().map(|n| n.id.clone()).collect();

            for pick in picks {
                let target = &ids[pick.index(ids.len())];
                let before = statuses(matrix.graph());
                let balance = matrix.balance();

                match matrix.unlock(target) {
                    Ok(outcome) => {
                        prop_assert_eq!(
                            outcome.balance.amount() + outcome.cost,
                            balance.amount()
                        );
                        prop_assert_eq!(status(&matrix, target.as_str()), SkillStatus::Mastered);
                    }
                    Err(_) => {
                        prop_assert_eq!(matrix.balance(), balance);
                        prop_assert_eq!(&statuses(matrix.graph()), &before);
                    }
                }

                for (old, new) in before.iter().zip(statuses(matrix.graph())) {
                    prop_assert!(*old <= new, "status regressed from {} to {}", old, new);
                }
            }
        }
    }
}
