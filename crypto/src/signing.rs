//! Transaction signing and verification using Ed25519.
//!
//! Signatures are produced over the SHA-256 digest of a proposal's
//! canonical bytes and attributed to the signer's key-derived `PartyId`.

use ed25519_dalek::{
    Signer, SigningKey as Ed25519SigningKey, Verifier, VerifyingKey as Ed25519VerifyingKey,
};
use rand::rngs::OsRng;

use chit_common::{PartyId, TransactionSignature};

use crate::hash::sha256;
use crate::{CryptoError, Result};

/// Signature algorithm identifier carried on every signature.
pub const ALGORITHM: &str = "Ed25519";

/// A signing key (private key) for creating transaction signatures.
pub struct SigningKey {
    inner: Ed25519SigningKey,
    party_id: PartyId,
}

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        let inner = Ed25519SigningKey::generate(&mut csprng);
        let party_id = PartyId::new(hex::encode(inner.verifying_key().as_bytes()));

        Self { inner, party_id }
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Invalid key length".to_string()))?;

        let inner = Ed25519SigningKey::from_bytes(&bytes);
        let party_id = PartyId::new(hex::encode(inner.verifying_key().as_bytes()));

        Ok(Self { inner, party_id })
    }

    /// Get the corresponding verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            inner: self.inner.verifying_key(),
            party_id: self.party_id.clone(),
        }
    }

    /// Identity derived from this key.
    pub fn party_id(&self) -> &PartyId {
        &self.party_id
    }

    /// Sign transaction bytes, producing an attributed signature over
    /// their SHA-256 digest.
    pub fn sign(&self, message: &[u8]) -> TransactionSignature {
        let sig = self.inner.sign(&sha256(message));
        TransactionSignature {
            signer: self.party_id.clone(),
            bytes: sig.to_bytes().to_vec(),
            algorithm: ALGORITHM.to_string(),
        }
    }

    /// Get raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }
}

/// A verifying key (public key) for checking transaction signatures.
#[derive(Clone)]
pub struct VerifyingKey {
    inner: Ed25519VerifyingKey,
    party_id: PartyId,
}

impl VerifyingKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Invalid key length".to_string()))?;

        let inner = Ed25519VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        Ok(Self {
            inner,
            party_id: PartyId::new(hex::encode(bytes)),
        })
    }

    /// Parse from the hex encoding a `PartyId` carries.
    pub fn from_party_id(party_id: &PartyId) -> Result<Self> {
        let bytes = hex::decode(party_id.as_str())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Identity derived from this key.
    pub fn party_id(&self) -> &PartyId {
        &self.party_id
    }

    /// Verify an attributed signature over transaction bytes.
    pub fn verify(&self, message: &[u8], signature: &TransactionSignature) -> Result<()> {
        if signature.algorithm != ALGORITHM {
            return Err(CryptoError::UnsupportedAlgorithm(
                signature.algorithm.clone(),
            ));
        }

        let sig_bytes: [u8; 64] = signature
            .bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;

        let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

        self.inner
            .verify(&sha256(message), &sig)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Get raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let signing_key = SigningKey::generate();
        let verifying_key = signing_key.verifying_key();

        let message = b"issue 100 to Bob";
        let signature = signing_key.sign(message);

        assert_eq!(&signature.signer, signing_key.party_id());
        assert!(verifying_key.verify(message, &signature).is_ok());
    }

    #[test]
    fn test_corrupted_signature_fails() {
        let signing_key = SigningKey::generate();
        let verifying_key = signing_key.verifying_key();

        let message = b"issue 100 to Bob";
        let mut signature = signing_key.sign(message);
        signature.bytes[0] ^= 0xff;

        assert!(verifying_key.verify(message, &signature).is_err());
    }

    #[test]
    fn test_wrong_message_fails() {
        let signing_key = SigningKey::generate();
        let verifying_key = signing_key.verifying_key();

        let signature = signing_key.sign(b"issue 100 to Bob");
        assert!(verifying_key.verify(b"issue 999 to Bob", &signature).is_err());
    }

    #[test]
    fn test_key_round_trip() {
        let signing_key = SigningKey::generate();
        let restored = SigningKey::from_bytes(&signing_key.to_bytes()).unwrap();
        assert_eq!(signing_key.party_id(), restored.party_id());

        let from_id = VerifyingKey::from_party_id(signing_key.party_id()).unwrap();
        assert_eq!(from_id.party_id(), signing_key.party_id());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let signing_key = SigningKey::generate();
        let verifying_key = signing_key.verifying_key();

        let mut signature = signing_key.sign(b"message");
        signature.algorithm = "RSA".to_string();

        assert!(matches!(
            verifying_key.verify(b"message", &signature),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
    }
}
