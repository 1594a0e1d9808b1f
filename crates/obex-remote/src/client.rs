//! The remote-system client capability

use crate::error::RemoteError;
use crate::row::Row;
use serde::{Deserialize, Serialize};

/// Asynchronous command/query surface of one remote-system session
///
/// Implementations own the connection. Handlers receive the client as
/// `Arc<dyn RemoteSystemClient>` at construction time; nothing in OBEX
/// reaches for a process-wide session singleton. Many handlers may share one
/// client concurrently - serialization of the underlying wire, if required,
/// is the implementation's responsibility.
#[async_trait::async_trait]
pub trait RemoteSystemClient: Send + Sync {
    /// Run a CL-style command on the remote system
    ///
    /// Command-level failures (the remote rejects the command) come back as
    /// an unsuccessful [`CommandOutcome`], not an error.
    ///
    /// # Errors
    /// Returns [`RemoteError`] only for transport/session failures.
    async fn run_command(&self, command: &str) -> Result<CommandOutcome, RemoteError>;

    /// Run an SQL-style query and collect all result rows
    ///
    /// An empty result set is `Ok(vec![])`, never an error.
    ///
    /// # Errors
    /// Returns [`RemoteError`] for transport/session failures.
    async fn query(&self, statement: &str) -> Result<Vec<Row>, RemoteError>;
}

/// Result of one remote command invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Whether the remote accepted and completed the command
    pub successful: bool,
    /// Message feedback from the remote job, most significant first
    pub messages: Vec<String>,
}

impl CommandOutcome {
    /// Successful outcome with no messages
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            successful: true,
            messages: Vec::new(),
        }
    }

    /// Failed outcome carrying one message
    #[inline]
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            messages: vec![message.into()],
        }
    }

    /// First message, or a generic fallback when the remote sent none
    #[inline]
    #[must_use]
    pub fn first_message(&self) -> &str {
        self.messages
            .first()
            .map_or("command failed with no message", String::as_str)
    }
}
