//! The document lifecycle controller
//!
//! Drives one document through
//! `Unopened → Fetching → Ready(clean) ⇄ Ready(dirty) → Saving → Ready(clean)`
//! with `Closed` terminal. A fetch that reports a logical no-data condition
//! folds into `Ready` with `failed_fetch` set - the document stays operable
//! so the UI can show an error panel and offer a reload. A fetch that errors
//! aborts the open and no document exists afterwards.
//!
//! Every operation is issued and awaited one at a time per document; the
//! controller takes `&mut self` so a second operation cannot start while one
//! is in flight. Cancellation of a mid-load open is the caller dropping the
//! `open` future.

use crate::dispatch::{ActionDispatcher, ActionRequest};
use crate::document::Document;
use crate::error::EngineError;
use crate::handler::{FetchOutcome, ObjectHandler};
use crate::render::RenderGate;
use obex_resource::ResourceIdentifier;

/// Owns one document and sequences its lifecycle
#[derive(Debug)]
pub struct DocumentController {
    document: Document,
}

impl DocumentController {
    /// Open a document: fetch remote state and render the initial markup
    ///
    /// On a logical no-data outcome the document is created with
    /// `failed_fetch` set and still rendered (the handler shows its error
    /// panel).
    ///
    /// # Errors
    /// Returns [`EngineError::Fetch`] when the handler's fetch errors; no
    /// document is created and the handler is disposed.
    pub async fn open(
        identifier: ResourceIdentifier,
        handler: Box<dyn ObjectHandler>,
    ) -> Result<(Self, String), EngineError> {
        tracing::debug!("opening document for {identifier}");
        let mut document = Document::new(identifier, handler);

        match document.handler_mut().fetch().await {
            Ok(FetchOutcome::Loaded) => document.record_fetch(false),
            Ok(FetchOutcome::Missing) => {
                tracing::warn!("fetch found no data for {}", document.identifier());
                document.record_fetch(true);
            }
            Err(e) => {
                tracing::error!("fetch failed for {}: {e}", document.identifier());
                // Document is dropped here; its handler is disposed on the way out
                return Err(EngineError::Fetch(e));
            }
        }

        // The gate always fires once after a successful open
        let markup = RenderGate::render(&document);
        tracing::info!(
            "opened document {} ({})",
            document.id(),
            document.identifier()
        );
        Ok((Self { document }, markup))
    }

    /// Dispatch a user-triggered action
    ///
    /// Returns `Some(markup)` exactly when the action's result asked for a
    /// rerender.
    ///
    /// # Errors
    /// Returns [`EngineError::Action`] with the document state untouched.
    pub async fn act(&mut self, request: ActionRequest) -> Result<Option<String>, EngineError> {
        ActionDispatcher::dispatch(&mut self.document, request).await
    }

    /// Persist unsaved changes
    ///
    /// Valid from both clean and dirty documents - a clean save is the
    /// allowed no-op collapse and still reaches the handler.
    ///
    /// # Errors
    /// Returns [`EngineError::Save`] with the handler's message verbatim;
    /// the dirty flag is not cleared on a failed save.
    pub async fn save(&mut self) -> Result<(), EngineError> {
        tracing::debug!("saving document {}", self.document.id());
        match self.document.handler_mut().save().await {
            Ok(()) => {
                self.document.clear_dirty();
                tracing::info!("saved document {}", self.document.id());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("save failed for document {}: {e}", self.document.id());
                Err(EngineError::Save(e))
            }
        }
    }

    /// Reload from remote, discarding unsaved changes
    ///
    /// Re-runs open semantics against the existing handler and renders.
    ///
    /// # Errors
    /// Returns [`EngineError::Fetch`] when the re-fetch errors; the document
    /// (including its dirty flag) is left as it was, so the caller can retry
    /// or close.
    pub async fn revert(&mut self) -> Result<String, EngineError> {
        tracing::debug!("reverting document {}", self.document.id());
        match self.document.handler_mut().fetch().await {
            Ok(outcome) => {
                self.document
                    .record_fetch(matches!(outcome, FetchOutcome::Missing));
                self.document.clear_dirty();
                Ok(RenderGate::render(&self.document))
            }
            Err(e) => Err(EngineError::Fetch(e)),
        }
    }

    /// Close the document, disposing the handler
    ///
    /// Consuming `self` makes the closed state terminal at the type level;
    /// a document dropped without close is disposed by its drop guard.
    pub fn close(mut self) {
        tracing::info!("closing document {}", self.document.id());
        self.document.dispose();
    }

    /// The owned document record
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}
