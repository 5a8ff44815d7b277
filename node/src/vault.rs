//! Append-only store of finalized transactions.

use parking_lot::RwLock;

use chit_common::{NotarizedTransaction, TransactionId};

/// A party's record of finalized transactions. Append-only; the core
/// never scans or mutates stored state.
#[derive(Default)]
pub struct Vault {
    transactions: RwLock<Vec<NotarizedTransaction>>,
}

impl Vault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finalized transaction.
    pub fn record(&self, transaction: NotarizedTransaction) {
        self.transactions.write().push(transaction);
    }

    /// Look up a recorded transaction by ID.
    pub fn get(&self, id: TransactionId) -> Option<NotarizedTransaction> {
        self.transactions
            .read()
            .iter()
            .find(|tx| tx.id() == id)
            .cloned()
    }

    /// Number of recorded transactions.
    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    /// Whether the vault holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentity;
    use chit_common::SignedTransaction;
    use chit_contract::build_issue;

    #[test]
    fn test_record_and_get() {
        let alice = LocalIdentity::generate("Alice");
        let bob = LocalIdentity::generate("Bob");
        let notary = LocalIdentity::generate("Notary");

        let proposal = build_issue(alice.party(), bob.party(), 3, notary.party());
        let txid = proposal.id;
        let signature = alice.sign_proposal(&proposal).unwrap();
        let notary_signature = notary.sign_proposal(&proposal).unwrap();
        let notarized = NotarizedTransaction {
            signed: SignedTransaction::new(proposal, signature),
            notary_signature,
        };

        let vault = Vault::new();
        assert!(vault.is_empty());

        vault.record(notarized);
        assert_eq!(vault.len(), 1);
        assert!(vault.get(txid).is_some());
        assert!(vault.get(TransactionId::new()).is_none());
    }
}
