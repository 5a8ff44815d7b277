//! Error types for the Chit issuance ledger.

use thiserror::Error;

use crate::{InitiatorStage, PartyId, ResponderStage};

/// A contract rule violated by a transaction proposal.
///
/// All variants are non-retryable: they indicate a malformed proposal and
/// abort the run with no partial side effects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// Wrong input/output/command counts.
    #[error("shape violation: {0}")]
    ShapeViolation(&'static str),

    /// The attached command is not a recognized variant.
    #[error("unrecognized command")]
    UnrecognizedCommand,

    /// The output is not an obligation record.
    #[error("output must be an obligation record")]
    WrongStateType,

    /// The obligation amount is not strictly positive.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    /// The issuer is absent from the command's required-signer list.
    #[error("issuer {0} must be a required signer")]
    MissingRequiredSigner(PartyId),
}

/// Main error type for Chit operations.
#[derive(Error, Debug)]
pub enum ChitError {
    /// A contract rule was violated.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    /// The counterparty refused to countersign.
    #[error("counterparty rejected: {reason}")]
    CounterpartyRejected { reason: String },

    /// The notary reported an input already consumed elsewhere.
    #[error("notary conflict: {reason}")]
    NotaryConflict { reason: String },

    /// Session disconnect or timeout. Treated identically to an explicit
    /// rejection by both protocol sides.
    #[error("session failure: {0}")]
    SessionFailure(String),

    /// A message arrived out of protocol order.
    #[error("unexpected message: expected {expected}, got {got}")]
    UnexpectedMessage { expected: String, got: String },

    /// A signature was missing or failed cryptographic verification.
    #[error("signature error: {0}")]
    Signature(String),

    /// Required signers that have not signed.
    #[error("missing signatures from {0:?}")]
    MissingSignatures(Vec<PartyId>),

    /// Transaction serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An issuance run attempted an invalid stage transition.
    #[error("invalid initiator transition from {from:?} to {to:?}")]
    InvalidInitiatorTransition {
        from: InitiatorStage,
        to: InitiatorStage,
    },

    /// A responder run attempted an invalid stage transition.
    #[error("invalid responder transition from {from:?} to {to:?}")]
    InvalidResponderTransition {
        from: ResponderStage,
        to: ResponderStage,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChitError {
    /// Check if this error could succeed on a fresh attempt.
    ///
    /// The core never retries on its own; this is advisory for callers
    /// constructing a new issuance attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChitError::SessionFailure(_))
    }
}

/// Result type alias for Chit operations.
pub type Result<T> = std::result::Result<T, ChitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_errors_are_not_retryable() {
        let err = ChitError::from(VerificationError::InvalidAmount(0));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_session_failure_is_retryable() {
        assert!(ChitError::SessionFailure("timeout".to_string()).is_retryable());
    }

    #[test]
    fn test_rule_messages_are_distinct() {
        let messages: Vec<String> = [
            VerificationError::ShapeViolation("transaction must have exactly one command"),
            VerificationError::UnrecognizedCommand,
            VerificationError::WrongStateType,
            VerificationError::InvalidAmount(0),
            VerificationError::MissingRequiredSigner(PartyId::new("aa".repeat(32))),
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();

        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
