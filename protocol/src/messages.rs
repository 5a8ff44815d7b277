//! Protocol message types.
//!
//! One issuance run exchanges exactly this sequence:
//! `Proposal` → (`CounterSignature` | `Reject`) → `Finalized` → `Ack`.
//! There is no branching negotiation and no retry across the session; a
//! rejection or malformed message is terminal for the attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chit_common::{NotarizedTransaction, SignedTransaction, TransactionSignature};

/// Protocol version carried in every envelope.
pub const PROTOCOL_VERSION: &str = "1.0";

/// A message sent over an issuance session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionMessage {
    /// Initiator → responder: a partially-signed transaction awaiting the
    /// responder's countersignature.
    Proposal {
        version: String,
        timestamp: DateTime<Utc>,
        transaction: SignedTransaction,
    },
    /// Responder → initiator: the countersignature over the proposal.
    CounterSignature {
        version: String,
        timestamp: DateTime<Utc>,
        signature: TransactionSignature,
    },
    /// Responder → initiator: refusal to countersign. Terminal.
    Reject {
        version: String,
        timestamp: DateTime<Utc>,
        reason: String,
    },
    /// Initiator → responder: the notarized transaction for the
    /// responder's records.
    Finalized {
        version: String,
        timestamp: DateTime<Utc>,
        transaction: NotarizedTransaction,
    },
    /// Responder → initiator: the finalized transaction was recorded.
    Ack {
        version: String,
        timestamp: DateTime<Utc>,
    },
}

impl SessionMessage {
    /// Wrap a partially-signed transaction as a proposal.
    pub fn proposal(transaction: SignedTransaction) -> Self {
        SessionMessage::Proposal {
            version: PROTOCOL_VERSION.to_string(),
            timestamp: Utc::now(),
            transaction,
        }
    }

    /// Wrap a countersignature.
    pub fn counter_signature(signature: TransactionSignature) -> Self {
        SessionMessage::CounterSignature {
            version: PROTOCOL_VERSION.to_string(),
            timestamp: Utc::now(),
            signature,
        }
    }

    /// Wrap a rejection with its reason.
    pub fn reject(reason: impl Into<String>) -> Self {
        SessionMessage::Reject {
            version: PROTOCOL_VERSION.to_string(),
            timestamp: Utc::now(),
            reason: reason.into(),
        }
    }

    /// Wrap a finalized transaction for distribution.
    pub fn finalized(transaction: NotarizedTransaction) -> Self {
        SessionMessage::Finalized {
            version: PROTOCOL_VERSION.to_string(),
            timestamp: Utc::now(),
            transaction,
        }
    }

    /// Acknowledge receipt of the finalized transaction.
    pub fn ack() -> Self {
        SessionMessage::Ack {
            version: PROTOCOL_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Short name for diagnostics and unexpected-message errors.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionMessage::Proposal { .. } => "PROPOSAL",
            SessionMessage::CounterSignature { .. } => "COUNTER_SIGNATURE",
            SessionMessage::Reject { .. } => "REJECT",
            SessionMessage::Finalized { .. } => "FINALIZED",
            SessionMessage::Ack { .. } => "ACK",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(SessionMessage::ack().kind(), "ACK");
        assert_eq!(SessionMessage::reject("no").kind(), "REJECT");
    }

    #[test]
    fn test_envelope_carries_version() {
        match SessionMessage::ack() {
            SessionMessage::Ack { version, .. } => assert_eq!(version, PROTOCOL_VERSION),
            _ => unreachable!(),
        }
    }
}
