//! Transaction assembly.
//!
//! The builder performs no validation: assembly always succeeds
//! syntactically, and callers must run the verifier before signing.

use chit_common::{
    ChitError, Command, CommandWithSigners, LedgerState, ObligationState, Party, StateRef,
    TransactionId, TransactionProposal,
};

/// Builder for transaction proposals.
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    notary: Option<Party>,
    inputs: Vec<StateRef>,
    outputs: Vec<LedgerState>,
    commands: Vec<CommandWithSigners>,
}

impl TransactionBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the designated notary.
    pub fn set_notary(mut self, notary: Party) -> Self {
        self.notary = Some(notary);
        self
    }

    /// Add an input state reference.
    pub fn add_input(mut self, input: StateRef) -> Self {
        self.inputs.push(input);
        self
    }

    /// Add an output state.
    pub fn add_output(mut self, output: LedgerState) -> Self {
        self.outputs.push(output);
        self
    }

    /// Add a command with its required signers.
    pub fn add_command(mut self, command: Command, required_signers: Vec<Party>) -> Self {
        self.commands.push(CommandWithSigners::new(
            command,
            required_signers.into_iter().map(|p| p.id).collect(),
        ));
        self
    }

    /// Build the proposal. Fails only if no notary was designated.
    pub fn build(self) -> Result<TransactionProposal, ChitError> {
        let notary = self
            .notary
            .ok_or_else(|| ChitError::Config("transaction notary is required".to_string()))?;

        Ok(TransactionProposal {
            id: TransactionId::new(),
            inputs: self.inputs,
            outputs: self.outputs,
            commands: self.commands,
            notary,
        })
    }
}

/// Assemble an issuance proposal: one obligation output and one Issue
/// command requiring signatures from exactly {issuer, owner}.
pub fn build_issue(
    issuer: &Party,
    owner: &Party,
    amount: i64,
    notary: &Party,
) -> TransactionProposal {
    let state = ObligationState::new(issuer.clone(), owner.clone(), amount);

    TransactionProposal {
        id: TransactionId::new(),
        inputs: vec![],
        outputs: vec![LedgerState::Obligation(state)],
        commands: vec![CommandWithSigners::new(
            Command::Issue,
            vec![issuer.id.clone(), owner.id.clone()],
        )],
        notary: notary.clone(),
    }
}
