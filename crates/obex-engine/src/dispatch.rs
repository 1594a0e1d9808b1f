//! Action parsing and dispatch
//!
//! Interactive elements in the rendered markup carry opaque tokens of the
//! form `action:<name>?<urlencoded-query>`. The dispatcher parses the token,
//! pairs it with the editable-field values bound in the view at event time,
//! invokes the handler, and applies the returned two-bit result to the
//! document. The engine needs no knowledge of what any action does.

use crate::document::Document;
use crate::error::EngineError;
use crate::handler::ActionPayload;
use crate::render::{RenderGate, RenderTrigger};
use std::collections::HashMap;

/// Token prefix on interactive markup elements
const ACTION_PREFIX: &str = "action:";

/// One user-triggered action, parsed and ready to dispatch
///
/// Ephemeral: built per event, consumed by the dispatcher, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    name: String,
    query: HashMap<String, String>,
    bindings: HashMap<String, String>,
}

impl ActionRequest {
    /// Parse an `action:<name>?<query>` token plus bound field values
    ///
    /// The query portion is optional; values are percent-decoded.
    ///
    /// # Errors
    /// Returns [`EngineError::MalformedAction`] when the prefix is missing
    /// or the action name is empty.
    pub fn parse(token: &str, bindings: HashMap<String, String>) -> Result<Self, EngineError> {
        let rest = token
            .strip_prefix(ACTION_PREFIX)
            .ok_or_else(|| EngineError::MalformedAction(token.to_string()))?;

        let (name, query_part) = match rest.split_once('?') {
            Some((name, query)) => (name, query),
            None => (rest, ""),
        };

        if name.is_empty() {
            return Err(EngineError::MalformedAction(token.to_string()));
        }

        let query = url::form_urlencoded::parse(query_part.as_bytes())
            .into_owned()
            .collect();

        Ok(Self {
            name: name.to_string(),
            query,
            bindings,
        })
    }

    /// Build a request directly, bypassing token syntax
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        query: HashMap<String, String>,
        bindings: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            query,
            bindings,
        }
    }

    /// Action name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Query parameter by key
    #[inline]
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

/// Applies parsed actions to a document
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    /// Dispatch one request against a document
    ///
    /// Returns regenerated markup when the action result asked for a
    /// rerender, `None` otherwise. The handler sees the query and bindings
    /// exactly as parsed; the engine applies only the `dirty`/`rerender`
    /// bits of the result.
    ///
    /// # Errors
    /// A handler error propagates unchanged as [`EngineError::Action`] and
    /// the document's dirty state is left exactly as it was before the call.
    pub async fn dispatch(
        document: &mut Document,
        request: ActionRequest,
    ) -> Result<Option<String>, EngineError> {
        tracing::debug!(
            "dispatching action {} on document {} ({})",
            request.name,
            document.id(),
            document.identifier()
        );

        let payload = ActionPayload {
            name: request.name,
            query: request.query,
            bindings: request.bindings,
        };

        let result = document
            .handler_mut()
            .handle_action(payload)
            .await
            .map_err(EngineError::Action)?;

        if result.dirty {
            document.mark_dirty();
        }

        let trigger = RenderTrigger::Action {
            rerender: result.rerender,
        };
        if RenderGate::should_render(trigger) {
            tracing::debug!("re-rendering document {}", document.id());
            Ok(Some(RenderGate::render(document)))
        } else {
            Ok(None)
        }
    }
}
