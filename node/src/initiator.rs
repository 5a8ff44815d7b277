//! Initiator side of the issuance protocol.
//!
//! One `IssuanceInitiator` drives one issuance run: assemble, self-verify,
//! sign, collect the counterparty signature, notarize, distribute. The
//! instance owns its transaction exclusively until it hands it off by
//! sending; after a send it never mutates its copy.

use std::sync::Arc;

use tracing::{error, info, instrument};

use chit_common::{
    ChitError, InitiatorStage, NotarizedTransaction, Party, SignedTransaction,
};
use chit_contract::{build_issue, verify};
use chit_protocol::SessionMessage;

use crate::config::NodeConfig;
use crate::identity::{verify_fully_signed, LocalIdentity};
use crate::notary::Notary;
use crate::session::{Session, SessionFactory};
use crate::vault::Vault;

/// State machine for one initiator-side issuance run.
pub struct IssuanceInitiator {
    identity: Arc<LocalIdentity>,
    vault: Arc<Vault>,
    notary: Arc<dyn Notary>,
    sessions: Arc<dyn SessionFactory>,
    config: NodeConfig,
    stage: InitiatorStage,
}

impl IssuanceInitiator {
    /// Create an initiator for a single issuance run.
    pub fn new(
        identity: Arc<LocalIdentity>,
        vault: Arc<Vault>,
        notary: Arc<dyn Notary>,
        sessions: Arc<dyn SessionFactory>,
        config: NodeConfig,
    ) -> Self {
        Self {
            identity,
            vault,
            notary,
            sessions,
            config,
            stage: InitiatorStage::Assembling,
        }
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> InitiatorStage {
        self.stage
    }

    /// Issue a new obligation to `owner` for `amount`.
    ///
    /// Returns the finalized transaction, or the reason the run failed.
    /// Any failure is terminal for this instance; the caller may
    /// construct a new attempt.
    #[instrument(skip(self, owner), fields(issuer = %self.identity.party(), owner = %owner, amount))]
    pub async fn issue(
        &mut self,
        owner: Party,
        amount: i64,
    ) -> Result<NotarizedTransaction, ChitError> {
        match self.run(owner, amount).await {
            Ok(notarized) => Ok(notarized),
            Err(err) => {
                self.stage = InitiatorStage::Failed;
                error!(error = %err, "Issuance failed");
                Err(err)
            }
        }
    }

    async fn run(
        &mut self,
        owner: Party,
        amount: i64,
    ) -> Result<NotarizedTransaction, ChitError> {
        let proposal = build_issue(self.identity.party(), &owner, amount, self.notary.party());
        let txid = proposal.id;
        info!(txid = %txid, "Proposal assembled");

        // Self-check before anything leaves this node. A violation here
        // aborts the run with no message sent.
        self.advance(InitiatorStage::SelfVerifying)?;
        verify(&proposal)?;

        self.advance(InitiatorStage::Signing)?;
        let signature = self.identity.sign_proposal(&proposal)?;
        let partially_signed = SignedTransaction::new(proposal, signature);

        self.advance(InitiatorStage::AwaitingCounterSignature)?;
        let mut session = self.sessions.open(&owner).await?;
        session
            .send(SessionMessage::proposal(partially_signed.clone()))
            .await?;
        let fully_signed = self
            .collect_counter_signature(session.as_mut(), partially_signed, &owner)
            .await?;

        self.advance(InitiatorStage::AwaitingNotarization)?;
        let notarized =
            tokio::time::timeout(self.config.notary_timeout, self.notary.notarize(fully_signed))
                .await
                .map_err(|_| {
                    ChitError::SessionFailure("notary call timed out".to_string())
                })??;
        info!(txid = %txid, "Transaction notarized");

        self.advance(InitiatorStage::Distributing)?;
        session
            .send(SessionMessage::finalized(notarized.clone()))
            .await?;
        match session.receive().await? {
            SessionMessage::Ack { .. } => {}
            other => {
                return Err(ChitError::UnexpectedMessage {
                    expected: "ACK".to_string(),
                    got: other.kind().to_string(),
                });
            }
        }

        self.vault.record(notarized.clone());
        self.advance(InitiatorStage::Done)?;
        info!(txid = %txid, "Issuance complete");
        Ok(notarized)
    }

    /// Suspend on the session until the counterparty signs, rejects, or
    /// the session fails.
    async fn collect_counter_signature(
        &self,
        session: &mut dyn Session,
        partially_signed: SignedTransaction,
        owner: &Party,
    ) -> Result<SignedTransaction, ChitError> {
        match session.receive().await? {
            SessionMessage::CounterSignature { signature, .. } => {
                if signature.signer != owner.id {
                    return Err(ChitError::Signature(format!(
                        "countersignature from {}, expected {}",
                        signature.signer, owner.id
                    )));
                }
                let fully_signed = partially_signed.with_signature(signature);
                verify_fully_signed(&fully_signed)?;
                Ok(fully_signed)
            }
            SessionMessage::Reject { reason, .. } => {
                Err(ChitError::CounterpartyRejected { reason })
            }
            other => Err(ChitError::UnexpectedMessage {
                expected: "COUNTER_SIGNATURE or REJECT".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    fn advance(&mut self, next: InitiatorStage) -> Result<(), ChitError> {
        if !self.stage.can_transition_to(next) {
            return Err(ChitError::InvalidInitiatorTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }
}
