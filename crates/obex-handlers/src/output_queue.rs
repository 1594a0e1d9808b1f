//! Output queue handler
//!
//! Shows one output queue's status and spooled-file count, with hold and
//! release actions. Both mutate remote state, re-fetch, and rerender.

use obex_engine::{ActionPayload, ActionResult, FetchOutcome, HandlerError, ObjectHandler};
use obex_remote::{RemoteError, RemoteSystemClient, Row};
use obex_resource::ResourceIdentifier;
use std::sync::Arc;

/// Fetched state of one output queue
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputQueueState {
    status: String,
    files: i64,
    writer: Option<String>,
    text: String,
}

impl OutputQueueState {
    fn from_row(row: &Row) -> Result<Self, RemoteError> {
        Ok(Self {
            status: row.string("OUTPUT_QUEUE_STATUS")?.to_string(),
            files: row.integer("NUMBER_OF_FILES")?,
            writer: row.opt_string("WRITER_JOB_NAME").map(str::to_string),
            text: row
                .opt_string("TEXT_DESCRIPTION")
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Handler for `*OUTQ` objects
pub struct OutputQueueHandler {
    identifier: ResourceIdentifier,
    client: Arc<dyn RemoteSystemClient>,
    state: Option<OutputQueueState>,
}

impl OutputQueueHandler {
    /// Type tag this handler registers under
    pub const TYPE_TAG: &'static str = "OUTQ";

    /// Create a handler for one output queue; no I/O happens here
    #[must_use]
    pub fn new(identifier: ResourceIdentifier, client: Arc<dyn RemoteSystemClient>) -> Self {
        Self {
            identifier,
            client,
            state: None,
        }
    }

    fn catalog_statement(&self) -> String {
        format!(
            "SELECT OUTPUT_QUEUE_STATUS, NUMBER_OF_FILES, WRITER_JOB_NAME, TEXT_DESCRIPTION \
             FROM QSYS2.OUTPUT_QUEUE_INFO \
             WHERE OUTPUT_QUEUE_LIBRARY = '{}' AND OUTPUT_QUEUE_NAME = '{}'",
            self.identifier.library(),
            self.identifier.name()
        )
    }

    async fn run_and_refetch(&mut self, command: String) -> Result<ActionResult, HandlerError> {
        let outcome = self.client.run_command(&command).await?;
        if !outcome.successful {
            return Err(HandlerError::message(outcome.first_message()));
        }
        self.fetch().await?;
        Ok(ActionResult::rerender())
    }
}

#[async_trait::async_trait]
impl ObjectHandler for OutputQueueHandler {
    async fn fetch(&mut self) -> Result<FetchOutcome, HandlerError> {
        let rows = self.client.query(&self.catalog_statement()).await?;
        match rows.first() {
            None => {
                self.state = None;
                Ok(FetchOutcome::Missing)
            }
            Some(row) => {
                self.state = Some(OutputQueueState::from_row(row)?);
                Ok(FetchOutcome::Loaded)
            }
        }
    }

    fn render(&self) -> String {
        let Some(state) = &self.state else {
            return format!(
                "# Output Queue {}\n\nObject not found or not readable.\n\n[Retry](action:refresh)\n",
                self.identifier
            );
        };

        let mut markup = format!("# Output Queue {}\n\n", self.identifier);
        if !state.text.is_empty() {
            markup.push_str(&format!("{}\n\n", state.text));
        }
        markup.push_str(&format!(
            "| Field | Value |\n| --- | --- |\n| Status | {} |\n| Spooled files | {} |\n",
            state.status, state.files
        ));
        if let Some(writer) = &state.writer {
            markup.push_str(&format!("| Writer | {writer} |\n"));
        }
        markup.push_str("\n[Hold](action:hold) · [Release](action:release) · [Refresh](action:refresh)\n");
        markup
    }

    async fn handle_action(&mut self, payload: ActionPayload) -> Result<ActionResult, HandlerError> {
        match payload.name.as_str() {
            "hold" => {
                let command = format!("HLDOUTQ OUTQ({})", self.identifier.qualified_name());
                self.run_and_refetch(command).await
            }
            "release" => {
                let command = format!("RLSOUTQ OUTQ({})", self.identifier.qualified_name());
                self.run_and_refetch(command).await
            }
            "refresh" => {
                self.fetch().await?;
                Ok(ActionResult::rerender())
            }
            other => {
                tracing::warn!("output queue {}: unknown action {other}", self.identifier);
                Ok(ActionResult::none())
            }
        }
    }

    async fn save(&mut self) -> Result<(), HandlerError> {
        // All mutations apply immediately through actions
        Ok(())
    }

    fn dispose(&mut self) {
        tracing::debug!("output queue {}: disposed", self.identifier);
        self.state = None;
    }
}
