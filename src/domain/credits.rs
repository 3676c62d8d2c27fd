//! Credit balance bookkeeping
//!
//! Credits are an externally owned resource. The engine only checks
//! affordability and computes the debited balance; it never earns or
//! grants credits.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CreditError {
    #[error("Insufficient credits: need {required}, have {available}")]
    Insufficient { required: u64, available: u64 },
}

/// A non-negative spendable credit balance
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CreditBalance(u64);

impl CreditBalance {
    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the raw amount
    pub fn amount(&self) -> u64 {
        self.0
    }

    /// Returns true if `cost` can be paid from this balance
    pub fn can_afford(&self, cost: u64) -> bool {
        self.0 >= cost
    }

    /// Returns the balance after paying `cost`, or an error if it would go negative
    pub fn checked_debit(&self, cost: u64) -> Result<Self, CreditError> {
        self.0
            .checked_sub(cost)
            .map(Self)
            .ok_or(CreditError::Insufficient {
                required: cost,
                available: self.0,
            })
    }

    /// Returns how many credits are missing to pay `cost` (zero if affordable)
    pub fn shortfall(&self, cost: u64) -> u64 {
        cost.saturating_sub(self.0)
    }
}

impl From<u64> for CreditBalance {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl fmt::Display for CreditBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_within_balance() {
        let balance = CreditBalance::new(120);
        let after = balance.checked_debit(25).unwrap();
        assert_eq!(after.amount(), 95);
        // Original is untouched
        assert_eq!(balance.amount(), 120);
    }

    #[test]
    fn debit_exact_balance_reaches_zero() {
        let balance = CreditBalance::new(25);
        assert_eq!(balance.checked_debit(25).unwrap(), CreditBalance::new(0));
    }

    #[test]
    fn debit_over_balance_rejected() {
        let balance = CreditBalance::new(10);
        assert_eq!(
            balance.checked_debit(25),
            Err(CreditError::Insufficient {
                required: 25,
                available: 10
            })
        );
        assert!(!balance.can_afford(25));
        assert_eq!(balance.shortfall(25), 15);
    }

    #[test]
    fn zero_cost_always_affordable() {
        let balance = CreditBalance::default();
        assert!(balance.can_afford(0));
        assert_eq!(balance.shortfall(0), 0);
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&CreditBalance::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
