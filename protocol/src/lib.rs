//! Chit Protocol Messages
//!
//! The messages exchanged over a session between the initiator and the
//! responder during one issuance run.

pub mod messages;

pub use messages::{SessionMessage, PROTOCOL_VERSION};
