//! The handler capability interface and its result contract
//!
//! Every object type plugs into the engine through [`ObjectHandler`]. The
//! engine is fully generic over handler state: it drives the capability set
//! and interprets nothing beyond the two-bit [`ActionResult`] signal.

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handler-level outcome of a fetch
///
/// `Missing` covers logical no-data conditions (object does not exist, no
/// authority to read it); the handler keeps empty/default internal state and
/// the document is flagged `failed_fetch` so the UI can render an error panel
/// instead of crashing. Transport failures are errors, not outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Remote state was loaded into the handler
    Loaded,
    /// The object could not be found; internal state is empty/default
    Missing,
}

/// What a handler tells the engine after an action
///
/// A strict two-bit signal. `dirty` means the handler now holds unsaved,
/// user-intended changes; `rerender` means the markup must be regenerated
/// from the handler's current in-memory state. Handlers must only set
/// `dirty` when state actually changed, and must re-fetch internally before
/// returning `rerender` if they need fresh remote data - the engine performs
/// no implicit re-fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// The document now has unsaved changes
    #[serde(default)]
    pub dirty: bool,
    /// The view markup must be regenerated
    #[serde(default)]
    pub rerender: bool,
}

impl ActionResult {
    /// Purely informational action; no document-state change
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self {
            dirty: false,
            rerender: false,
        }
    }

    /// Mark unsaved changes without touching the markup
    #[inline]
    #[must_use]
    pub const fn dirty() -> Self {
        Self {
            dirty: true,
            rerender: false,
        }
    }

    /// Regenerate markup from current handler state
    #[inline]
    #[must_use]
    pub const fn rerender() -> Self {
        Self {
            dirty: false,
            rerender: true,
        }
    }

    /// Mark unsaved changes and regenerate markup
    #[inline]
    #[must_use]
    pub const fn dirty_rerender() -> Self {
        Self {
            dirty: true,
            rerender: true,
        }
    }
}

/// What a handler receives for one dispatched action
///
/// Explicit structure instead of a dynamic map: the action name, the query
/// parameters parsed out of the action token, and the editable-field values
/// bound in the view at the moment of the event.
#[derive(Debug, Clone, Default)]
pub struct ActionPayload {
    /// Action name from the token
    pub name: String,
    /// Query parameters from the token, percent-decoded
    pub query: HashMap<String, String>,
    /// Bound editable-field values keyed by field id
    pub bindings: HashMap<String, String>,
}

impl ActionPayload {
    /// Query parameter by key
    #[inline]
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Bound field value by field id
    #[inline]
    #[must_use]
    pub fn binding(&self, field: &str) -> Option<&str> {
        self.bindings.get(field).map(String::as_str)
    }

    /// Bound field value that must be present
    ///
    /// # Errors
    /// Returns [`HandlerError::Message`] naming the missing field.
    pub fn require_binding(&self, field: &str) -> Result<&str, HandlerError> {
        self.binding(field)
            .ok_or_else(|| HandlerError::Message(format!("no value bound for field {field}")))
    }
}

/// Capability set implemented by each per-object-type plug-in
///
/// One handler instance belongs to exactly one document and never outlives
/// it. Construction performs no I/O; all remote traffic happens inside
/// `fetch`, `handle_action` and `save`.
#[async_trait::async_trait]
pub trait ObjectHandler: Send {
    /// Populate internal state from the remote system
    ///
    /// Must not error for "no data found" - that is [`FetchOutcome::Missing`].
    ///
    /// # Errors
    /// Returns [`HandlerError`] only for transport/unexpected failures.
    async fn fetch(&mut self) -> Result<FetchOutcome, HandlerError>;

    /// Produce markup for the current internal state
    ///
    /// Pure and synchronous: identical state yields identical markup.
    fn render(&self) -> String;

    /// React to a user-triggered action
    ///
    /// # Errors
    /// Errors propagate to the UI unchanged; the engine leaves document
    /// state exactly as it was before the call.
    async fn handle_action(&mut self, payload: ActionPayload) -> Result<ActionResult, HandlerError>;

    /// Persist unsaved changes to the remote system
    ///
    /// # Errors
    /// Must error with a human-readable message on failure and must not
    /// error on success.
    async fn save(&mut self) -> Result<(), HandlerError>;

    /// Release local resources; called exactly once at close
    fn dispose(&mut self) {}
}
