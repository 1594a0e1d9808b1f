//! Data area handler
//!
//! A data area is a small named value on the remote system. The handler
//! exercises the unsaved-edit flow: the `edit` action stages a new value
//! from the bound field and marks the document dirty without re-rendering,
//! and `save` writes it back with `CHGDTAARA`.

use obex_engine::{ActionPayload, ActionResult, FetchOutcome, HandlerError, ObjectHandler};
use obex_remote::{RemoteError, RemoteSystemClient, Row};
use obex_resource::ResourceIdentifier;
use std::sync::Arc;

/// Fetched state of one data area
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataAreaState {
    area_type: String,
    length: i64,
    value: String,
    text: String,
}

impl DataAreaState {
    fn from_row(row: &Row) -> Result<Self, RemoteError> {
        Ok(Self {
            area_type: row.string("DATA_AREA_TYPE")?.to_string(),
            length: row.integer("LENGTH")?,
            value: row.string("DATA_AREA_VALUE")?.to_string(),
            text: row
                .opt_string("TEXT_DESCRIPTION")
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Handler for `*DTAARA` objects
pub struct DataAreaHandler {
    identifier: ResourceIdentifier,
    client: Arc<dyn RemoteSystemClient>,
    state: Option<DataAreaState>,
    pending_value: Option<String>,
}

impl DataAreaHandler {
    /// Type tag this handler registers under
    pub const TYPE_TAG: &'static str = "DTAARA";

    /// Create a handler for one data area; no I/O happens here
    #[must_use]
    pub fn new(identifier: ResourceIdentifier, client: Arc<dyn RemoteSystemClient>) -> Self {
        Self {
            identifier,
            client,
            state: None,
            pending_value: None,
        }
    }

    /// The value the user currently sees: staged edit if any, else fetched
    fn effective_value(&self) -> Option<&str> {
        self.pending_value
            .as_deref()
            .or(self.state.as_ref().map(|s| s.value.as_str()))
    }

    fn catalog_statement(&self) -> String {
        format!(
            "SELECT DATA_AREA_TYPE, LENGTH, DATA_AREA_VALUE, TEXT_DESCRIPTION \
             FROM QSYS2.DATA_AREA_INFO \
             WHERE DATA_AREA_LIBRARY = '{}' AND DATA_AREA_NAME = '{}'",
            self.identifier.library(),
            self.identifier.name()
        )
    }
}

#[async_trait::async_trait]
impl ObjectHandler for DataAreaHandler {
    async fn fetch(&mut self) -> Result<FetchOutcome, HandlerError> {
        let rows = self.client.query(&self.catalog_statement()).await?;
        match rows.first() {
            None => {
                self.state = None;
                Ok(FetchOutcome::Missing)
            }
            Some(row) => {
                self.state = Some(DataAreaState::from_row(row)?);
                Ok(FetchOutcome::Loaded)
            }
        }
    }

    fn render(&self) -> String {
        let Some(state) = &self.state else {
            return format!(
                "# Data Area {}\n\nObject not found or not readable.\n\n[Retry](action:refresh)\n",
                self.identifier
            );
        };

        let mut markup = format!("# Data Area {}\n\n", self.identifier);
        if !state.text.is_empty() {
            markup.push_str(&format!("{}\n\n", state.text));
        }
        markup.push_str(&format!(
            "| Field | Value |\n| --- | --- |\n| Type | {} |\n| Length | {} |\n",
            state.area_type, state.length
        ));
        match &self.pending_value {
            Some(pending) => {
                markup.push_str(&format!("| Value | {pending} *(unsaved)* |\n"));
            }
            None => {
                markup.push_str(&format!("| Value | {} |\n", state.value));
            }
        }
        markup.push_str("\n[Change value](action:edit) · [Refresh](action:refresh)\n");
        markup
    }

    async fn handle_action(&mut self, payload: ActionPayload) -> Result<ActionResult, HandlerError> {
        match payload.name.as_str() {
            "edit" => {
                let value = payload.require_binding("value")?;
                if self.effective_value() == Some(value) {
                    // Nothing actually changed
                    return Ok(ActionResult::none());
                }
                self.pending_value = Some(value.to_string());
                Ok(ActionResult::dirty())
            }
            "refresh" => {
                self.pending_value = None;
                self.fetch().await?;
                Ok(ActionResult::rerender())
            }
            other => {
                tracing::warn!("data area {}: unknown action {other}", self.identifier);
                Ok(ActionResult::none())
            }
        }
    }

    async fn save(&mut self) -> Result<(), HandlerError> {
        let Some(value) = self.pending_value.clone() else {
            return Ok(());
        };

        let command = format!(
            "CHGDTAARA DTAARA({}) VALUE('{}')",
            self.identifier.qualified_name(),
            value.replace('\'', "''")
        );
        let outcome = self.client.run_command(&command).await?;
        if !outcome.successful {
            return Err(HandlerError::message(outcome.first_message()));
        }

        if let Some(state) = &mut self.state {
            state.value = value;
        }
        self.pending_value = None;
        Ok(())
    }

    fn dispose(&mut self) {
        tracing::debug!("data area {}: disposed", self.identifier);
        self.state = None;
        self.pending_value = None;
    }
}
