//! Chit demo binary.
//!
//! Wires two in-process parties and a notary, then runs one issuance
//! end to end: Alice issues an IOU to Bob.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chit_node::{
    ChannelSession, InMemoryNotary, IssuanceInitiator, IssuanceResponder, NodeConfig,
    StaticSessionFactory, Vault,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Chit issuance demo");

    let config = NodeConfig::from_env();
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    let amount: i64 = std::env::var("CHIT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);

    let alice = Arc::new(chit_node::LocalIdentity::generate("Alice"));
    let bob = Arc::new(chit_node::LocalIdentity::generate("Bob"));
    let notary = Arc::new(InMemoryNotary::new("Notary"));

    let alice_vault = Arc::new(Vault::new());
    let bob_vault = Arc::new(Vault::new());

    let (initiator_end, mut responder_end) =
        ChannelSession::pair(config.session_buffer, config.session_receive_timeout);
    let sessions = Arc::new(StaticSessionFactory::new());
    sessions.register(bob.party(), initiator_end);

    let bob_party = bob.party().clone();
    let responder_vault = bob_vault.clone();
    let responder = tokio::spawn(async move {
        let mut responder = IssuanceResponder::new(bob, responder_vault);
        responder.run(&mut responder_end).await
    });

    let mut initiator =
        IssuanceInitiator::new(alice, alice_vault.clone(), notary.clone(), sessions, config);
    let notarized = initiator.issue(bob_party, amount).await?;

    responder
        .await
        .map_err(|e| anyhow::anyhow!("responder task panicked: {e}"))??;

    info!(
        txid = %notarized.id(),
        amount,
        signatures = notarized.signed.signatures.len(),
        recorded_by_issuer = alice_vault.len(),
        recorded_by_owner = bob_vault.len(),
        "Issuance finalized"
    );

    Ok(())
}
