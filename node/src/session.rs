//! Session channel between two protocol instances.
//!
//! A session delivers ordered, at-most-once messages between exactly two
//! parties for the duration of one issuance. Flows receive sessions from
//! an injected factory, so tests can wire fakes without any transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use chit_common::{ChitError, Party, PartyId};
use chit_protocol::SessionMessage;

/// A bidirectional message channel to one counterparty.
#[async_trait]
pub trait Session: Send {
    /// Send a message. Logical ownership of the payload transfers with
    /// the send; the sender must not rely on its copy afterward.
    async fn send(&mut self, message: SessionMessage) -> Result<(), ChitError>;

    /// Receive the next message, suspending until it arrives or the
    /// session fails.
    async fn receive(&mut self) -> Result<SessionMessage, ChitError>;
}

/// Opens sessions to counterparties.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a session to the given counterparty.
    async fn open(&self, counterparty: &Party) -> Result<Box<dyn Session>, ChitError>;
}

/// In-process session over a pair of tokio channels.
pub struct ChannelSession {
    tx: mpsc::Sender<SessionMessage>,
    rx: mpsc::Receiver<SessionMessage>,
    receive_timeout: Duration,
}

impl ChannelSession {
    /// Create a connected pair of sessions, one per party.
    pub fn pair(buffer: usize, receive_timeout: Duration) -> (Self, Self) {
        let (tx_a, rx_b) = mpsc::channel(buffer);
        let (tx_b, rx_a) = mpsc::channel(buffer);

        (
            Self {
                tx: tx_a,
                rx: rx_a,
                receive_timeout,
            },
            Self {
                tx: tx_b,
                rx: rx_b,
                receive_timeout,
            },
        )
    }
}

#[async_trait]
impl Session for ChannelSession {
    async fn send(&mut self, message: SessionMessage) -> Result<(), ChitError> {
        debug!(kind = message.kind(), "Sending session message");
        self.tx
            .send(message)
            .await
            .map_err(|_| ChitError::SessionFailure("counterparty disconnected".to_string()))
    }

    async fn receive(&mut self) -> Result<SessionMessage, ChitError> {
        match tokio::time::timeout(self.receive_timeout, self.rx.recv()).await {
            Ok(Some(message)) => {
                debug!(kind = message.kind(), "Received session message");
                Ok(message)
            }
            Ok(None) => Err(ChitError::SessionFailure(
                "session closed by counterparty".to_string(),
            )),
            Err(_) => Err(ChitError::SessionFailure(
                "session receive timed out".to_string(),
            )),
        }
    }
}

/// Session factory over pre-wired channel sessions.
///
/// Register one endpoint per expected counterparty; `open` hands each out
/// once. The other endpoint of each pair is driven by a responder task
/// (or by a test).
pub struct StaticSessionFactory {
    endpoints: Mutex<HashMap<PartyId, Vec<ChannelSession>>>,
    opened: AtomicUsize,
}

impl StaticSessionFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            endpoints: Mutex::new(HashMap::new()),
            opened: AtomicUsize::new(0),
        }
    }

    /// Register a session endpoint for a counterparty.
    pub fn register(&self, counterparty: &Party, session: ChannelSession) {
        self.endpoints
            .lock()
            .entry(counterparty.id.clone())
            .or_default()
            .push(session);
    }

    /// Number of sessions handed out so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Default for StaticSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionFactory for StaticSessionFactory {
    async fn open(&self, counterparty: &Party) -> Result<Box<dyn Session>, ChitError> {
        let session = self
            .endpoints
            .lock()
            .get_mut(&counterparty.id)
            .and_then(Vec::pop)
            .ok_or_else(|| {
                ChitError::SessionFailure(format!("no route to counterparty {counterparty}"))
            })?;

        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pair_delivers_in_order() {
        let (mut a, mut b) = ChannelSession::pair(4, Duration::from_secs(1));

        a.send(SessionMessage::reject("first")).await.unwrap();
        a.send(SessionMessage::ack()).await.unwrap();

        assert_eq!(b.receive().await.unwrap().kind(), "REJECT");
        assert_eq!(b.receive().await.unwrap().kind(), "ACK");
    }

    #[tokio::test]
    async fn test_receive_times_out() {
        let (_a, mut b) = ChannelSession::pair(4, Duration::from_millis(10));

        assert!(matches!(
            b.receive().await,
            Err(ChitError::SessionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_receive_fails_when_peer_drops() {
        let (a, mut b) = ChannelSession::pair(4, Duration::from_secs(1));
        drop(a);

        assert!(matches!(
            b.receive().await,
            Err(ChitError::SessionFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_factory_hands_out_registered_endpoint_once() {
        let alice = Party::new(chit_common::PartyId::new("aa".repeat(32)), "Alice");
        let (a, _b) = ChannelSession::pair(4, Duration::from_secs(1));

        let factory = StaticSessionFactory::new();
        factory.register(&alice, a);

        assert!(factory.open(&alice).await.is_ok());
        assert_eq!(factory.opened(), 1);
        assert!(factory.open(&alice).await.is_err());
    }
}
