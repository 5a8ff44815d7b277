//! The contract verifier.
//!
//! `verify` applies the issuance rule set to a proposed transaction and
//! rejects on the first violated rule. It performs no I/O and never
//! inspects which party invoked it.

use chit_common::{Command, CommandWithSigners, TransactionProposal, VerificationError};

/// Verify a transaction proposal against the contract rules.
///
/// Rules are applied in a fixed priority order; each failure carries a
/// distinct diagnosable reason. Verification is all-or-nothing.
pub fn verify(proposal: &TransactionProposal) -> Result<(), VerificationError> {
    if proposal.commands.len() != 1 {
        return Err(VerificationError::ShapeViolation(
            "transaction must have exactly one command",
        ));
    }

    let command = &proposal.commands[0];
    match command.command {
        Command::Issue => verify_issue(proposal, command),
        // Commands without a rule set are rejected, not ignored. The arm
        // is unreachable until a second variant is added to `Command`.
        #[allow(unreachable_patterns)]
        _ => Err(VerificationError::UnrecognizedCommand),
    }
}

fn verify_issue(
    proposal: &TransactionProposal,
    command: &CommandWithSigners,
) -> Result<(), VerificationError> {
    // Shape constraints: no inputs, exactly one output.
    if !proposal.inputs.is_empty() {
        return Err(VerificationError::ShapeViolation(
            "issue transaction must have no inputs",
        ));
    }
    if proposal.outputs.len() != 1 {
        return Err(VerificationError::ShapeViolation(
            "issue transaction must have exactly one output",
        ));
    }

    // Content constraints: the output is an obligation with a positive
    // amount.
    let obligation = proposal.outputs[0]
        .as_obligation()
        .ok_or(VerificationError::WrongStateType)?;
    if obligation.amount <= 0 {
        return Err(VerificationError::InvalidAmount(obligation.amount));
    }

    // Required-signer constraint: the issuer must be on the hook for this
    // transaction. Owner consent is enforced by protocol convention, not
    // here (see DESIGN.md).
    if !command.required_signers.contains(&obligation.issuer.id) {
        return Err(VerificationError::MissingRequiredSigner(
            obligation.issuer.id.clone(),
        ));
    }

    Ok(())
}
