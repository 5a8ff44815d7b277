//! Notary collaborator.
//!
//! The notary is the single serialization point for input consumption:
//! it certifies that a transaction's declared inputs are not already
//! consumed by a transaction it has certified before. Issue transactions
//! have no inputs, so the conflict path is structural for them, but the
//! contract must hold for any future command on the same ledger.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{info, warn};

use chit_common::{
    ChitError, NotarizedTransaction, Party, SignedTransaction, StateRef, TransactionId,
};
use chit_contract::verify;

use crate::identity::{verify_fully_signed, LocalIdentity};

/// Certifies transactions against double consumption of inputs.
#[async_trait]
pub trait Notary: Send + Sync {
    /// The notary's identity, designated in proposals.
    fn party(&self) -> &Party;

    /// Certify a fully-signed transaction, suspending until done.
    /// Fails with `NotaryConflict` if any input is already consumed.
    async fn notarize(
        &self,
        transaction: SignedTransaction,
    ) -> Result<NotarizedTransaction, ChitError>;
}

/// In-memory notary for in-process networks and tests.
pub struct InMemoryNotary {
    identity: LocalIdentity,
    /// Inputs consumed by certified transactions, and by whom.
    consumed: DashMap<StateRef, TransactionId>,
    /// Transactions certified so far.
    certified: DashMap<TransactionId, ()>,
}

impl InMemoryNotary {
    /// Create a notary with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            identity: LocalIdentity::generate(name),
            consumed: DashMap::new(),
            certified: DashMap::new(),
        }
    }

    /// Number of transactions this notary has certified.
    pub fn certified_count(&self) -> usize {
        self.certified.len()
    }

    /// Claim all inputs for a transaction, failing on the first one
    /// already held by another transaction. Claims made for this
    /// transaction are rolled back on conflict.
    fn claim_inputs(
        &self,
        inputs: &[StateRef],
        txid: TransactionId,
    ) -> Result<(), ChitError> {
        let mut claimed = Vec::with_capacity(inputs.len());

        for input in inputs {
            match self.consumed.entry(*input) {
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(txid);
                    claimed.push(*input);
                }
                dashmap::mapref::entry::Entry::Occupied(entry) => {
                    let holder = *entry.get();
                    for rollback in claimed {
                        self.consumed.remove(&rollback);
                    }
                    warn!(
                        txid = %txid,
                        input = %input,
                        holder = %holder,
                        "Input already consumed"
                    );
                    return Err(ChitError::NotaryConflict {
                        reason: format!("input {input} already consumed by {holder}"),
                    });
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Notary for InMemoryNotary {
    fn party(&self) -> &Party {
        self.identity.party()
    }

    async fn notarize(
        &self,
        transaction: SignedTransaction,
    ) -> Result<NotarizedTransaction, ChitError> {
        let txid = transaction.proposal.id;

        // Sanity layer: the notary runs the same contract rules and
        // signature checks every other party does.
        verify(&transaction.proposal)?;
        verify_fully_signed(&transaction)?;

        self.claim_inputs(&transaction.proposal.inputs, txid)?;

        let notary_signature = self.identity.sign_proposal(&transaction.proposal)?;
        self.certified.insert(txid, ());

        info!(txid = %txid, "Transaction certified");

        Ok(NotarizedTransaction {
            signed: transaction,
            notary_signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chit_contract::build_issue;

    fn fully_signed_issue(
        alice: &LocalIdentity,
        bob: &LocalIdentity,
        notary: &dyn Notary,
        amount: i64,
    ) -> SignedTransaction {
        let proposal = build_issue(alice.party(), bob.party(), amount, notary.party());
        let first = alice.sign_proposal(&proposal).unwrap();
        let second = bob.sign_proposal(&proposal).unwrap();
        SignedTransaction::new(proposal, first).with_signature(second)
    }

    #[tokio::test]
    async fn test_certifies_valid_issue() {
        let alice = LocalIdentity::generate("Alice");
        let bob = LocalIdentity::generate("Bob");
        let notary = InMemoryNotary::new("Notary");

        let transaction = fully_signed_issue(&alice, &bob, &notary, 10);
        let notarized = notary.notarize(transaction).await.unwrap();

        assert_eq!(notarized.notary_signature.signer, notary.party().id);
        assert_eq!(notary.certified_count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_missing_countersignature() {
        let alice = LocalIdentity::generate("Alice");
        let bob = LocalIdentity::generate("Bob");
        let notary = InMemoryNotary::new("Notary");

        let proposal = build_issue(alice.party(), bob.party(), 10, notary.party());
        let only_alice = alice.sign_proposal(&proposal).unwrap();
        let partially = SignedTransaction::new(proposal, only_alice);

        assert!(matches!(
            notary.notarize(partially).await,
            Err(ChitError::MissingSignatures(_))
        ));
        assert_eq!(notary.certified_count(), 0);
    }

    #[tokio::test]
    async fn test_rejects_invalid_transaction() {
        let alice = LocalIdentity::generate("Alice");
        let bob = LocalIdentity::generate("Bob");
        let notary = InMemoryNotary::new("Notary");

        let transaction = fully_signed_issue(&alice, &bob, &notary, 0);

        assert!(matches!(
            notary.notarize(transaction).await,
            Err(ChitError::Verification(_))
        ));
        assert_eq!(notary.certified_count(), 0);
    }

    #[tokio::test]
    async fn test_conflicting_inputs_rejected() {
        // Inputs only exist for future command types; drive the claim
        // index directly.
        let notary = InMemoryNotary::new("Notary");
        let input = StateRef::new(TransactionId::new(), 0);

        let first = TransactionId::new();
        let second = TransactionId::new();

        assert!(notary.claim_inputs(&[input], first).is_ok());
        assert!(matches!(
            notary.claim_inputs(&[input], second),
            Err(ChitError::NotaryConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_conflict_rolls_back_partial_claims() {
        let notary = InMemoryNotary::new("Notary");
        let fresh = StateRef::new(TransactionId::new(), 0);
        let taken = StateRef::new(TransactionId::new(), 1);

        notary.claim_inputs(&[taken], TransactionId::new()).unwrap();
        assert!(notary
            .claim_inputs(&[fresh, taken], TransactionId::new())
            .is_err());

        // The fresh input must remain claimable after the rollback.
        assert!(notary.claim_inputs(&[fresh], TransactionId::new()).is_ok());
    }
}
