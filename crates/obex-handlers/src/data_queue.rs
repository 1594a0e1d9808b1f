//! Data queue handler
//!
//! Browses one data queue and exercises the rerender flow: `refresh` and
//! `clear` re-fetch internally before asking the engine to regenerate
//! markup. `clear` only runs when the confirmation survived the dialog
//! (`confirm=yes` in the action token); a declined dialog is informational.

use obex_engine::{ActionPayload, ActionResult, FetchOutcome, HandlerError, ObjectHandler};
use obex_remote::{RemoteError, RemoteSystemClient, Row};
use obex_resource::ResourceIdentifier;
use std::sync::Arc;

/// Fetched state of one data queue
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataQueueState {
    queue_type: String,
    max_message_length: i64,
    current_messages: i64,
    text: String,
}

impl DataQueueState {
    fn from_row(row: &Row) -> Result<Self, RemoteError> {
        Ok(Self {
            queue_type: row.string("DATA_QUEUE_TYPE")?.to_string(),
            max_message_length: row.integer("MAXIMUM_MESSAGE_LENGTH")?,
            current_messages: row.integer("CURRENT_MESSAGES")?,
            text: row
                .opt_string("TEXT_DESCRIPTION")
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Handler for `*DTAQ` objects
pub struct DataQueueHandler {
    identifier: ResourceIdentifier,
    client: Arc<dyn RemoteSystemClient>,
    state: Option<DataQueueState>,
}

impl DataQueueHandler {
    /// Type tag this handler registers under
    pub const TYPE_TAG: &'static str = "DTAQ";

    /// Create a handler for one data queue; no I/O happens here
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
            "SELECT DATA_QUEUE_TYPE, MAXIMUM_MESSAGE_LENGTH, CURRENT_MESSAGES, TEXT_DESCRIPTION \
             FROM QSYS2.DATA_QUEUE_INFO \
             WHERE DATA_QUEUE_LIBRARY = '{}' AND DATA_QUEUE_NAME = '{}'",
            self.identifier.library(),
            self.identifier.name()
        )
    }
}

#[async_trait::async_trait]
impl ObjectHandler for DataQueueHandler {
    async fn fetch(&mut self) -> Result<FetchOutcome, HandlerError> {
        let rows = self.client.query(&self.catalog_statement()).await?;
        match rows.first() {
            None => {
                self.state = None;
                Ok(FetchOutcome::Missing)
            }
            Some(row) => {
                self.state = Some(DataQueueState::from_row(row)?);
                Ok(FetchOutcome::Loaded)
            }
        }
    }

    fn render(&self) -> String {
        let Some(state) = &self.state else {
            return format!(
                "# Data Queue {}\n\nObject not found or not readable.\n\n[Retry](action:refresh)\n",
                self.identifier
            );
        };

        let mut markup = format!("# Data Queue {}\n\n", self.identifier);
        if !state.text.is_empty() {
            markup.push_str(&format!("{}\n\n", state.text));
        }
        markup.push_str(&format!(
            "| Field | Value |\n| --- | --- |\n| Type | {} |\n| Max message length | {} |\n| Current messages | {} |\n",
            state.queue_type, state.max_message_length, state.current_messages
        ));
        markup.push_str("\n[Refresh](action:refresh) · [Clear](action:clear?confirm=yes)\n");
        markup
    }

    async fn handle_action(&mut self, payload: ActionPayload) -> Result<ActionResult, HandlerError> {
        match payload.name.as_str() {
            "refresh" => {
                self.fetch().await?;
                Ok(ActionResult::rerender())
            }
            "clear" => {
                if payload.query("confirm") != Some("yes") {
                    // Declined confirmation dialog
                    return Ok(ActionResult::none());
                }
                let command = format!("CLRDTAQ DTAQ({})", self.identifier.qualified_name());
                let outcome = self.client.run_command(&command).await?;
                if !outcome.successful {
                    return Err(HandlerError::message(outcome.first_message()));
                }
                self.fetch().await?;
                Ok(ActionResult::rerender())
            }
            other => {
                tracing::warn!("data queue {}: unknown action {other}", self.identifier);
                Ok(ActionResult::none())
            }
        }
    }

    async fn save(&mut self) -> Result<(), HandlerError> {
        // Browsing a queue stages nothing locally
        Ok(())
    }

    fn dispose(&mut self) {
        tracing::debug!("data queue {}: disposed", self.identifier);
        self.state = None;
    }
}
