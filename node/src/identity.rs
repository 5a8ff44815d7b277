//! Local identity and transaction signature checks.
//!
//! A `PartyId` is the hex encoding of the party's verifying key, so
//! signature verification derives keys directly from signer identifiers
//! instead of consulting a directory.

use chit_common::{
    ChitError, NotarizedTransaction, Party, SignedTransaction, TransactionProposal,
    TransactionSignature,
};
use chit_crypto::{SigningKey, VerifyingKey};

/// An identity this node controls: a party plus its signing key.
pub struct LocalIdentity {
    party: Party,
    signing_key: SigningKey,
}

impl LocalIdentity {
    /// Generate a fresh identity with the given display name.
    pub fn generate(name: impl Into<String>) -> Self {
        let signing_key = SigningKey::generate();
        let party = Party::new(signing_key.party_id().clone(), name);
        Self { party, signing_key }
    }

    /// The party this identity represents.
    pub fn party(&self) -> &Party {
        &self.party
    }

    /// Sign a transaction proposal.
    pub fn sign_proposal(
        &self,
        proposal: &TransactionProposal,
    ) -> Result<TransactionSignature, ChitError> {
        let bytes = proposal.signable_bytes()?;
        Ok(self.signing_key.sign(&bytes))
    }
}

/// Cryptographically verify every signature a transaction carries.
pub fn verify_attached_signatures(transaction: &SignedTransaction) -> Result<(), ChitError> {
    let bytes = transaction.proposal.signable_bytes()?;

    for signature in &transaction.signatures {
        let key = VerifyingKey::from_party_id(&signature.signer)
            .map_err(|e| ChitError::Signature(e.to_string()))?;
        key.verify(&bytes, signature).map_err(|_| {
            ChitError::Signature(format!("invalid signature from {}", signature.signer))
        })?;
    }

    Ok(())
}

/// Check that all required signers have signed and that every signature
/// verifies.
pub fn verify_fully_signed(transaction: &SignedTransaction) -> Result<(), ChitError> {
    let missing = transaction.missing_signers();
    if !missing.is_empty() {
        return Err(ChitError::MissingSignatures(missing));
    }
    verify_attached_signatures(transaction)
}

/// Check a notarized transaction: fully signed, and certified by the
/// notary the proposal designated.
pub fn verify_notarized(transaction: &NotarizedTransaction) -> Result<(), ChitError> {
    verify_fully_signed(&transaction.signed)?;

    let proposal = &transaction.signed.proposal;
    if transaction.notary_signature.signer != proposal.notary.id {
        return Err(ChitError::Signature(format!(
            "certified by {}, expected notary {}",
            transaction.notary_signature.signer, proposal.notary.id
        )));
    }

    let bytes = proposal.signable_bytes()?;
    let key = VerifyingKey::from_party_id(&transaction.notary_signature.signer)
        .map_err(|e| ChitError::Signature(e.to_string()))?;
    key.verify(&bytes, &transaction.notary_signature)
        .map_err(|_| ChitError::Signature("invalid notary signature".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chit_contract::build_issue;

    #[test]
    fn test_sign_and_verify_proposal() {
        let alice = LocalIdentity::generate("Alice");
        let bob = LocalIdentity::generate("Bob");
        let notary = LocalIdentity::generate("Notary");

        let proposal = build_issue(alice.party(), bob.party(), 5, notary.party());
        let signature = alice.sign_proposal(&proposal).unwrap();
        let partially = SignedTransaction::new(proposal, signature);

        assert!(verify_attached_signatures(&partially).is_ok());
        assert!(matches!(
            verify_fully_signed(&partially),
            Err(ChitError::MissingSignatures(_))
        ));

        let counter = bob.sign_proposal(&partially.proposal).unwrap();
        let fully = partially.with_signature(counter);
        assert!(verify_fully_signed(&fully).is_ok());
    }

    #[test]
    fn test_forged_signer_rejected() {
        let alice = LocalIdentity::generate("Alice");
        let bob = LocalIdentity::generate("Bob");
        let notary = LocalIdentity::generate("Notary");

        let proposal = build_issue(alice.party(), bob.party(), 5, notary.party());
        let mut signature = alice.sign_proposal(&proposal).unwrap();
        // Attribute Alice's signature bytes to Bob.
        signature.signer = bob.party().id.clone();
        let transaction = SignedTransaction::new(proposal, signature);

        assert!(matches!(
            verify_attached_signatures(&transaction),
            Err(ChitError::Signature(_))
        ));
    }
}
