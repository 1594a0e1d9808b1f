//! Session-level document table
//!
//! Owns one controller per open resource and routes UI operations to it.
//! Two invariants live here:
//! - one logical editor session per resource: a second open for the same
//!   identifier is rejected with `AlreadyOpen`;
//! - one operation in flight per document: each controller sits behind a
//!   mutex acquired with `try_lock`, and an operation arriving while one is
//!   running is rejected with `Busy`. Operations that do acquire the lock
//!   apply in acquisition order; nothing is queued or coalesced.

use crate::config::EngineConfig;
use crate::controller::DocumentController;
use crate::dispatch::ActionRequest;
use crate::document::DocumentId;
use crate::error::EngineError;
use crate::registry::HandlerRegistry;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use obex_resource::ResourceIdentifier;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the UI gets back from a successful open
#[derive(Debug, Clone)]
pub struct OpenedDocument {
    /// Session identifier of the new document
    pub id: DocumentId,
    /// Normalized resource identifier; the key for later operations
    pub identifier: ResourceIdentifier,
    /// Initial markup
    pub markup: String,
    /// Whether the fetch reported a logical no-data condition
    pub failed_fetch: bool,
}

/// Point-in-time flags of an open document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStatus {
    /// Unsaved changes present
    pub dirty: bool,
    /// Last fetch reported no data
    pub failed_fetch: bool,
}

/// Session table of open documents
pub struct DocumentManager {
    config: EngineConfig,
    registry: HandlerRegistry,
    documents: DashMap<ResourceIdentifier, Arc<Mutex<DocumentController>>>,
}

impl DocumentManager {
    /// Create a manager over a registry
    #[must_use]
    pub fn new(registry: HandlerRegistry, config: EngineConfig) -> Self {
        Self {
            config,
            registry,
            documents: DashMap::new(),
        }
    }

    /// Open the resource at an editor path
    ///
    /// Resolves the path, constructs the handler through the registry, runs
    /// the initial fetch and render, and records the session.
    ///
    /// # Errors
    /// - [`EngineError::Resource`] for malformed paths (no document, no
    ///   handler constructed)
    /// - [`EngineError::UnsupportedType`] for unregistered tags (no fetch
    ///   runs)
    /// - [`EngineError::AlreadyOpen`] when a session for the identifier
    ///   exists
    /// - [`EngineError::TooManyDocuments`] when the table is full
    /// - [`EngineError::Fetch`] when the handler's fetch errors
    pub async fn open(&self, path: &str) -> Result<OpenedDocument, EngineError> {
        let identifier = ResourceIdentifier::resolve(path)?;

        if self.documents.contains_key(&identifier) {
            return Err(EngineError::AlreadyOpen(identifier.to_string()));
        }
        if self.documents.len() >= self.config.max_open_documents {
            return Err(EngineError::TooManyDocuments(
                self.config.max_open_documents,
            ));
        }

        let handler = self.registry.create(&identifier)?;
        let (controller, markup) = DocumentController::open(identifier.clone(), handler).await?;
        let opened = OpenedDocument {
            id: controller.document().id(),
            identifier: identifier.clone(),
            markup,
            failed_fetch: controller.document().failed_fetch(),
        };

        // Re-check under the entry: a concurrent open may have won the race
        // while our fetch was in flight.
        match self.documents.entry(identifier.clone()) {
            Entry::Occupied(_) => {
                controller.close();
                Err(EngineError::AlreadyOpen(identifier.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(controller)));
                Ok(opened)
            }
        }
    }

    /// Dispatch an action to an open document
    ///
    /// # Errors
    /// [`EngineError::NotOpen`], [`EngineError::Busy`], or whatever the
    /// controller surfaces.
    pub async fn act(
        &self,
        identifier: &ResourceIdentifier,
        request: ActionRequest,
    ) -> Result<Option<String>, EngineError> {
        let controller = self.controller(identifier)?;
        let mut guard = controller
            .try_lock()
            .map_err(|_| EngineError::Busy(identifier.to_string()))?;
        guard.act(request).await
    }

    /// Save an open document
    ///
    /// # Errors
    /// [`EngineError::NotOpen`], [`EngineError::Busy`], or the handler's
    /// save failure with the dirty flag preserved.
    pub async fn save(&self, identifier: &ResourceIdentifier) -> Result<(), EngineError> {
        let controller = self.controller(identifier)?;
        let mut guard = controller
            .try_lock()
            .map_err(|_| EngineError::Busy(identifier.to_string()))?;
        guard.save().await
    }

    /// Reload an open document from remote, discarding unsaved changes
    ///
    /// # Errors
    /// [`EngineError::NotOpen`], [`EngineError::Busy`], or the re-fetch
    /// failure.
    pub async fn revert(&self, identifier: &ResourceIdentifier) -> Result<String, EngineError> {
        let controller = self.controller(identifier)?;
        let mut guard = controller
            .try_lock()
            .map_err(|_| EngineError::Busy(identifier.to_string()))?;
        guard.revert().await
    }

    /// Close an open document and dispose its handler
    ///
    /// # Errors
    /// [`EngineError::NotOpen`] when no session exists;
    /// [`EngineError::Busy`] when an operation is still in flight (the
    /// session stays open for a later retry).
    pub fn close(&self, identifier: &ResourceIdentifier) -> Result<(), EngineError> {
        let (key, controller) = self
            .documents
            .remove(identifier)
            .ok_or_else(|| EngineError::NotOpen(identifier.to_string()))?;

        match Arc::try_unwrap(controller) {
            Ok(mutex) => {
                mutex.into_inner().close();
                Ok(())
            }
            Err(controller) => {
                self.documents.insert(key, controller);
                Err(EngineError::Busy(identifier.to_string()))
            }
        }
    }

    /// Current flags of an open document
    ///
    /// # Errors
    /// [`EngineError::NotOpen`] or [`EngineError::Busy`].
    pub fn status(&self, identifier: &ResourceIdentifier) -> Result<DocumentStatus, EngineError> {
        let controller = self.controller(identifier)?;
        let guard = controller
            .try_lock()
            .map_err(|_| EngineError::Busy(identifier.to_string()))?;
        Ok(DocumentStatus {
            dirty: guard.document().dirty(),
            failed_fetch: guard.document().failed_fetch(),
        })
    }

    /// Identifiers of all open documents
    #[must_use]
    pub fn open_identifiers(&self) -> Vec<ResourceIdentifier> {
        self.documents
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Number of open documents
    #[inline]
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.documents.len()
    }

    /// The registry backing this manager
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    fn controller(
        &self,
        identifier: &ResourceIdentifier,
    ) -> Result<Arc<Mutex<DocumentController>>, EngineError> {
        self.documents
            .get(identifier)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::NotOpen(identifier.to_string()))
    }
}

impl std::fmt::Debug for DocumentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentManager")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("open", &self.documents.len())
            .finish()
    }
}
