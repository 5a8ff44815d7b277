//! Transaction model and issuance lifecycle stages.

use serde::{Deserialize, Serialize};

use crate::{ChitError, LedgerState, Party, PartyId, TransactionId};

/// A command declared in a transaction.
///
/// Closed tagged enum; the contract verifier dispatches on the tag, and a
/// new command type is a new variant plus a new match arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Create a new obligation record out of nothing.
    Issue,
}

/// A command paired with the identities that must sign the transaction
/// for it to be valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandWithSigners {
    /// The declared action.
    pub command: Command,
    /// Ordered list of required signer identifiers.
    pub required_signers: Vec<PartyId>,
}

impl CommandWithSigners {
    /// Create a command with its required-signer list.
    pub fn new(command: Command, required_signers: Vec<PartyId>) -> Self {
        Self {
            command,
            required_signers,
        }
    }
}

/// Reference to an output state of a prior transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateRef {
    /// Transaction that produced the state.
    pub txid: TransactionId,
    /// Output index within that transaction.
    pub index: u32,
}

impl StateRef {
    /// Create a new state reference.
    pub fn new(txid: TransactionId, index: u32) -> Self {
        Self { txid, index }
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// An unsigned transaction proposal.
///
/// Immutable once built; signing and notarization wrap it rather than
/// mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProposal {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// States consumed by this transaction. Empty for issuance.
    pub inputs: Vec<StateRef>,
    /// States produced by this transaction.
    pub outputs: Vec<LedgerState>,
    /// Commands declared by this transaction.
    pub commands: Vec<CommandWithSigners>,
    /// The notary that must certify input consumption.
    pub notary: Party,
}

impl TransactionProposal {
    /// Canonical bytes over which signatures are produced.
    pub fn signable_bytes(&self) -> Result<Vec<u8>, ChitError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A signature over a transaction, attributed to a signer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    /// Identity of the signer.
    pub signer: PartyId,
    /// Raw signature bytes.
    pub bytes: Vec<u8>,
    /// Algorithm used (always "Ed25519" for now).
    pub algorithm: String,
}

/// A transaction proposal carrying one or more signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The immutable proposal being signed.
    pub proposal: TransactionProposal,
    /// Collected signatures, in the order they were produced.
    pub signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    /// Wrap a proposal with its first signature.
    pub fn new(proposal: TransactionProposal, signature: TransactionSignature) -> Self {
        Self {
            proposal,
            signatures: vec![signature],
        }
    }

    /// Return a copy carrying one additional signature.
    pub fn with_signature(&self, signature: TransactionSignature) -> Self {
        let mut signatures = self.signatures.clone();
        signatures.push(signature);
        Self {
            proposal: self.proposal.clone(),
            signatures,
        }
    }

    /// Check whether a given party has signed.
    pub fn is_signed_by(&self, party: &PartyId) -> bool {
        self.signatures.iter().any(|sig| &sig.signer == party)
    }

    /// Required signers declared by the transaction's commands that have
    /// not yet signed.
    pub fn missing_signers(&self) -> Vec<PartyId> {
        let mut missing = Vec::new();
        for command in &self.proposal.commands {
            for signer in &command.required_signers {
                if !self.is_signed_by(signer) && !missing.contains(signer) {
                    missing.push(signer.clone());
                }
            }
        }
        missing
    }
}

/// A fully-signed transaction certified by the notary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarizedTransaction {
    /// The fully-signed transaction.
    pub signed: SignedTransaction,
    /// The notary's certifying signature.
    pub notary_signature: TransactionSignature,
}

impl NotarizedTransaction {
    /// The transaction identifier.
    pub fn id(&self) -> TransactionId {
        self.signed.proposal.id
    }
}

/// Initiator-side lifecycle stage of one issuance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitiatorStage {
    /// Building the proposal from application inputs.
    Assembling,
    /// Running the contract verifier locally.
    SelfVerifying,
    /// Producing the initiator's signature.
    Signing,
    /// Suspended on the session waiting for the counterparty signature.
    AwaitingCounterSignature,
    /// Suspended on the notary call.
    AwaitingNotarization,
    /// Sending the finalized transaction to the counterparty.
    Distributing,
    /// Finalized transaction returned to the caller.
    Done,
    /// Terminal failure; the reason travels in the error.
    Failed,
}

impl InitiatorStage {
    /// Check if this is a final stage.
    pub fn is_final(&self) -> bool {
        matches!(self, InitiatorStage::Done | InitiatorStage::Failed)
    }

    /// Get valid next stages from the current stage.
    pub fn valid_transitions(&self) -> &[InitiatorStage] {
        match self {
            InitiatorStage::Assembling => {
                &[InitiatorStage::SelfVerifying, InitiatorStage::Failed]
            }
            InitiatorStage::SelfVerifying => &[InitiatorStage::Signing, InitiatorStage::Failed],
            InitiatorStage::Signing => &[
                InitiatorStage::AwaitingCounterSignature,
                InitiatorStage::Failed,
            ],
            InitiatorStage::AwaitingCounterSignature => &[
                InitiatorStage::AwaitingNotarization,
                InitiatorStage::Failed,
            ],
            InitiatorStage::AwaitingNotarization => {
                &[InitiatorStage::Distributing, InitiatorStage::Failed]
            }
            InitiatorStage::Distributing => &[InitiatorStage::Done, InitiatorStage::Failed],
            InitiatorStage::Done => &[],
            InitiatorStage::Failed => &[],
        }
    }

    /// Check if transition to the given stage is valid.
    pub fn can_transition_to(&self, next: InitiatorStage) -> bool {
        self.valid_transitions().contains(&next)
    }
}

/// Responder-side lifecycle stage of one issuance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponderStage {
    /// Suspended on the session waiting for a proposal.
    AwaitingProposal,
    /// Independently re-running the contract verifier.
    Verifying,
    /// Producing and returning the countersignature.
    Countersigning,
    /// Suspended waiting for the notarized transaction.
    AwaitingFinalized,
    /// Finalized transaction recorded locally.
    Done,
    /// Terminal failure; the reason travels in the error.
    Failed,
}

impl ResponderStage {
    /// Check if this is a final stage.
    pub fn is_final(&self) -> bool {
        matches!(self, ResponderStage::Done | ResponderStage::Failed)
    }

    /// Get valid next stages from the current stage.
    pub fn valid_transitions(&self) -> &[ResponderStage] {
        match self {
            ResponderStage::AwaitingProposal => {
                &[ResponderStage::Verifying, ResponderStage::Failed]
            }
            ResponderStage::Verifying => {
                &[ResponderStage::Countersigning, ResponderStage::Failed]
            }
            ResponderStage::Countersigning => {
                &[ResponderStage::AwaitingFinalized, ResponderStage::Failed]
            }
            ResponderStage::AwaitingFinalized => &[ResponderStage::Done, ResponderStage::Failed],
            ResponderStage::Done => &[],
            ResponderStage::Failed => &[],
        }
    }

    /// Check if transition to the given stage is valid.
    pub fn can_transition_to(&self, next: ResponderStage) -> bool {
        self.valid_transitions().contains(&next)
    }
}
