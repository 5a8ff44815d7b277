//! Node configuration.

use std::time::Duration;

use chit_common::ChitError;

/// Configuration for one node's protocol runs.
///
/// Passed explicitly to flows and collaborators; there is no process-wide
/// registry.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// How long a session receive may suspend before it is treated as a
    /// session failure.
    pub session_receive_timeout: Duration,
    /// How long a notary call may suspend before it is treated as a
    /// session failure.
    pub notary_timeout: Duration,
    /// Buffered messages per session channel.
    pub session_buffer: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            session_receive_timeout: Duration::from_secs(30),
            notary_timeout: Duration::from_secs(10),
            session_buffer: 16,
        }
    }
}

impl NodeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ms) = std::env::var("CHIT_SESSION_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.session_receive_timeout = Duration::from_millis(ms);
            }
        }

        if let Ok(ms) = std::env::var("CHIT_NOTARY_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.notary_timeout = Duration::from_millis(ms);
            }
        }

        if let Ok(buffer) = std::env::var("CHIT_SESSION_BUFFER") {
            if let Ok(buffer) = buffer.parse() {
                config.session_buffer = buffer;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ChitError> {
        if self.session_receive_timeout.is_zero() {
            return Err(ChitError::Config(
                "session receive timeout cannot be zero".to_string(),
            ));
        }
        if self.notary_timeout.is_zero() {
            return Err(ChitError::Config(
                "notary timeout cannot be zero".to_string(),
            ));
        }
        if self.session_buffer == 0 {
            return Err(ChitError::Config(
                "session buffer cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}
