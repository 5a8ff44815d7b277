//! Chit Contract
//!
//! The rules governing how obligation records may be created, and the
//! builder that assembles issuance proposals satisfying them.
//!
//! Verification is pure and deterministic: every party that receives a
//! transaction runs the same checks independently and gets the same
//! answer.

pub mod builder;
pub mod verifier;

pub use builder::{build_issue, TransactionBuilder};
pub use verifier::verify;
