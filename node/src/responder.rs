//! Responder side of the issuance protocol.
//!
//! The responder never trusts the initiator's self-check: it re-runs the
//! contract verifier and checks the attached signatures before
//! countersigning. Its rejection is the counterparty's sole veto point;
//! once the countersignature is sent there is no unilateral withdrawal.

use std::sync::Arc;

use tracing::{error, info, warn};

use chit_common::{ChitError, NotarizedTransaction, ResponderStage, SignedTransaction};
use chit_contract::verify;
use chit_protocol::SessionMessage;

use crate::identity::{verify_attached_signatures, verify_notarized, LocalIdentity};
use crate::session::Session;
use crate::vault::Vault;

/// State machine for one responder-side issuance run.
pub struct IssuanceResponder {
    identity: Arc<LocalIdentity>,
    vault: Arc<Vault>,
    stage: ResponderStage,
}

impl IssuanceResponder {
    /// Create a responder for a single issuance run.
    pub fn new(identity: Arc<LocalIdentity>, vault: Arc<Vault>) -> Self {
        Self {
            identity,
            vault,
            stage: ResponderStage::AwaitingProposal,
        }
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> ResponderStage {
        self.stage
    }

    /// Drive one issuance run over the given session, recording the
    /// finalized transaction on success.
    pub async fn run(
        &mut self,
        session: &mut dyn Session,
    ) -> Result<NotarizedTransaction, ChitError> {
        match self.respond(session).await {
            Ok(notarized) => Ok(notarized),
            Err(err) => {
                self.stage = ResponderStage::Failed;
                error!(error = %err, "Issuance response failed");
                Err(err)
            }
        }
    }

    async fn respond(
        &mut self,
        session: &mut dyn Session,
    ) -> Result<NotarizedTransaction, ChitError> {
        let proposed = match session.receive().await? {
            SessionMessage::Proposal { transaction, .. } => transaction,
            other => {
                return Err(ChitError::UnexpectedMessage {
                    expected: "PROPOSAL".to_string(),
                    got: other.kind().to_string(),
                });
            }
        };
        let txid = proposed.proposal.id;
        info!(txid = %txid, "Proposal received");

        self.advance(ResponderStage::Verifying)?;
        if let Err(err) = self.check_proposal(&proposed) {
            // One rejection message, then the run is terminal. A failed
            // send changes nothing for this side.
            warn!(txid = %txid, error = %err, "Rejecting proposal");
            if let Err(send_err) = session.send(SessionMessage::reject(err.to_string())).await {
                warn!(txid = %txid, error = %send_err, "Could not deliver rejection");
            }
            return Err(err);
        }

        self.advance(ResponderStage::Countersigning)?;
        let signature = self.identity.sign_proposal(&proposed.proposal)?;
        session
            .send(SessionMessage::counter_signature(signature))
            .await?;
        info!(txid = %txid, "Countersigned");

        self.advance(ResponderStage::AwaitingFinalized)?;
        let notarized = match session.receive().await? {
            SessionMessage::Finalized { transaction, .. } => transaction,
            other => {
                return Err(ChitError::UnexpectedMessage {
                    expected: "FINALIZED".to_string(),
                    got: other.kind().to_string(),
                });
            }
        };
        if notarized.id() != txid {
            return Err(ChitError::UnexpectedMessage {
                expected: format!("FINALIZED for {txid}"),
                got: format!("FINALIZED for {}", notarized.id()),
            });
        }
        verify_notarized(&notarized)?;

        self.vault.record(notarized.clone());
        session.send(SessionMessage::ack()).await?;

        self.advance(ResponderStage::Done)?;
        info!(txid = %txid, "Finalized transaction recorded");
        Ok(notarized)
    }

    /// The responder's independent checks: contract rules plus the
    /// cryptographic validity of every signature already attached.
    fn check_proposal(&self, transaction: &SignedTransaction) -> Result<(), ChitError> {
        verify(&transaction.proposal)?;
        verify_attached_signatures(transaction)?;
        Ok(())
    }

    fn advance(&mut self, next: ResponderStage) -> Result<(), ChitError> {
        if !self.stage.can_transition_to(next) {
            return Err(ChitError::InvalidResponderTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }
}
