//! Chit Common Types
//!
//! This crate contains shared types used across the Chit issuance ledger,
//! including identifiers, parties, ledger states, the transaction model,
//! and the error taxonomy.

pub mod error;
pub mod identifiers;
pub mod party;
pub mod state;
pub mod transaction;

pub use error::*;
pub use identifiers::*;
pub use party::*;
pub use state::*;
pub use transaction::*;
