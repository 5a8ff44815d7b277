//! Party identity as seen by the ledger core.
//!
//! The core never constructs keys. An external identity layer mints
//! parties from verifying keys; the core only compares and forwards them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PartyId;

/// A ledger participant, identified by its public key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// Public-key-derived identifier.
    pub id: PartyId,
    /// Human-readable display name.
    pub name: String,
}

impl Party {
    /// Create a party from an identifier and display name.
    pub fn new(id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// Equality is by key identifier only; display names are advisory.
impl PartialEq for Party {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Party {}

impl std::hash::Hash for Party {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
