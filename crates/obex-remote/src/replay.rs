//! Scripted remote client for tests and offline rendering
//!
//! [`ReplayClient`] answers commands and queries from pre-loaded scripts in
//! FIFO order and records every request it sees. Tests use it to script a
//! handler's remote traffic; the CLI uses [`ReplayClient::from_fixture`] to
//! render documents against canned data with no live connection.

use crate::client::{CommandOutcome, RemoteSystemClient};
use crate::error::RemoteError;
use crate::row::Row;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

/// Remote client that replays scripted responses
#[derive(Debug, Default)]
pub struct ReplayClient {
    commands: Mutex<VecDeque<CommandOutcome>>,
    queries: Mutex<VecDeque<Vec<Row>>>,
    issued: Mutex<Vec<String>>,
}

/// On-disk fixture shape consumed by [`ReplayClient::from_fixture`]
#[derive(Debug, Default, Deserialize)]
struct ReplayFixture {
    #[serde(default)]
    queries: Vec<Vec<Row>>,
    #[serde(default)]
    commands: Vec<CommandOutcome>,
}

impl ReplayClient {
    /// Empty script; every request errors with `ScriptExhausted`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a script from a JSON fixture file
    ///
    /// The fixture holds `queries` (a list of result sets, consumed in
    /// order) and `commands` (a list of outcomes, consumed in order).
    ///
    /// # Errors
    /// Returns [`RemoteError::Connection`] when the file cannot be read or
    /// parsed.
    pub fn from_fixture(path: impl AsRef<Path>) -> Result<Self, RemoteError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::Connection(format!("fixture {}: {e}", path.display())))?;
        let fixture: ReplayFixture = serde_json::from_str(&raw)
            .map_err(|e| RemoteError::Connection(format!("fixture {}: {e}", path.display())))?;

        let client = Self::new();
        for rows in fixture.queries {
            client.push_query(rows);
        }
        for outcome in fixture.commands {
            client.push_command(outcome);
        }
        Ok(client)
    }

    /// Queue the outcome for the next command
    pub fn push_command(&self, outcome: CommandOutcome) {
        self.commands.lock().push_back(outcome);
    }

    /// Queue the result set for the next query
    pub fn push_query(&self, rows: Vec<Row>) {
        self.queries.lock().push_back(rows);
    }

    /// Every command and query statement issued so far, in order
    #[must_use]
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().clone()
    }
}

#[async_trait::async_trait]
impl RemoteSystemClient for ReplayClient {
    async fn run_command(&self, command: &str) -> Result<CommandOutcome, RemoteError> {
        tracing::debug!("replay command: {command}");
        self.issued.lock().push(command.to_string());
        self.commands
            .lock()
            .pop_front()
            .ok_or_else(|| RemoteError::ScriptExhausted(command.to_string()))
    }

    async fn query(&self, statement: &str) -> Result<Vec<Row>, RemoteError> {
        tracing::debug!("replay query: {statement}");
        self.issued.lock().push(statement.to_string());
        self.queries
            .lock()
            .pop_front()
            .ok_or_else(|| RemoteError::ScriptExhausted(statement.to_string()))
    }
}
