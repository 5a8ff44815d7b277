//! Chit Node
//!
//! Runs the two-party issuance protocol: the initiator assembles,
//! self-verifies, signs, collects the counterparty signature, notarizes,
//! and distributes; the responder independently re-verifies before
//! countersigning. Sessions and the notary are injected collaborators.

pub mod config;
pub mod identity;
pub mod initiator;
pub mod notary;
pub mod responder;
pub mod session;
pub mod vault;

pub use config::NodeConfig;
pub use identity::LocalIdentity;
pub use initiator::IssuanceInitiator;
pub use notary::{InMemoryNotary, Notary};
pub use responder::IssuanceResponder;
pub use session::{ChannelSession, Session, SessionFactory, StaticSessionFactory};
pub use vault::Vault;
