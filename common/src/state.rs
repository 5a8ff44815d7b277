//! Ledger state types.

use serde::{Deserialize, Serialize};

use crate::Party;

/// The set of state types this ledger can hold, as a closed enum.
///
/// `Dummy` is a placeholder state carrying no fields; it exists so that
/// the wrong-state-type contract rule can be exercised without inventing
/// a second real state type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerState {
    /// An IOU obligation record.
    Obligation(ObligationState),
    /// Placeholder state with no contract of its own.
    Dummy,
}

impl LedgerState {
    /// Return the obligation record if this state is one.
    pub fn as_obligation(&self) -> Option<&ObligationState> {
        match self {
            LedgerState::Obligation(state) => Some(state),
            LedgerState::Dummy => None,
        }
    }
}

/// An IOU obligation: `issuer` owes `owner` the given amount.
///
/// Immutable once created. Created only by a verified Issue transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationState {
    /// The party that owes.
    pub issuer: Party,
    /// The party that is owed.
    pub owner: Party,
    /// Obligation amount. The contract requires this to be positive;
    /// no upper bound is enforced.
    pub amount: i64,
}

impl ObligationState {
    /// Create a new obligation record.
    pub fn new(issuer: Party, owner: Party, amount: i64) -> Self {
        Self {
            issuer,
            owner,
            amount,
        }
    }

    /// Parties that must co-sign any transaction consuming or creating
    /// this state.
    pub fn participants(&self) -> Vec<&Party> {
        vec![&self.issuer, &self.owner]
    }
}
