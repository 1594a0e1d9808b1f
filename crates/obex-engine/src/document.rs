//! The engine's runtime record for one open resource

use crate::handler::ObjectHandler;
use chrono::{DateTime, Utc};
use obex_resource::ResourceIdentifier;
use std::fmt;
use ulid::Ulid;

/// Unique document session identifier (ULID for sortability in logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub Ulid);

impl DocumentId {
    /// Generate new document ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open resource: identifier, handler instance, and lifecycle flags
///
/// The document exclusively owns its handler; no two documents share one.
/// `dirty` starts false, is set only when an applied action result says so,
/// and is cleared only by a successful save. `failed_fetch` marks a document
/// whose last fetch reported a logical no-data condition - it stays fully
/// operable so the UI can render an error panel and offer a reload.
pub struct Document {
    id: DocumentId,
    identifier: ResourceIdentifier,
    handler: Box<dyn ObjectHandler>,
    dirty: bool,
    failed_fetch: bool,
    disposed: bool,
    opened_at: DateTime<Utc>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create the record for a freshly constructed handler
    ///
    /// The caller (the controller) is responsible for running the initial
    /// fetch before the document is shown to anyone.
    #[must_use]
    pub(crate) fn new(identifier: ResourceIdentifier, handler: Box<dyn ObjectHandler>) -> Self {
        Self {
            id: DocumentId::new(),
            identifier,
            handler,
            dirty: false,
            failed_fetch: false,
            disposed: false,
            opened_at: Utc::now(),
            fetched_at: None,
        }
    }

    /// Session identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Resource identifier; immutable for the document's lifetime
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &ResourceIdentifier {
        &self.identifier
    }

    /// Whether the document has unsaved, user-intended changes
    #[inline]
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the last fetch reported a logical no-data condition
    #[inline]
    #[must_use]
    pub fn failed_fetch(&self) -> bool {
        self.failed_fetch
    }

    /// When the document was opened
    #[inline]
    #[must_use]
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// When the last successful fetch completed
    #[inline]
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub(crate) fn handler(&self) -> &dyn ObjectHandler {
        self.handler.as_ref()
    }

    pub(crate) fn handler_mut(&mut self) -> &mut dyn ObjectHandler {
        self.handler.as_mut()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn record_fetch(&mut self, failed: bool) {
        self.failed_fetch = failed;
        self.fetched_at = Some(Utc::now());
    }

    /// Dispose the handler; idempotent
    pub(crate) fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.handler.dispose();
            tracing::debug!("disposed document {} ({})", self.id, self.identifier);
        }
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        // Safety net for documents dropped without an explicit close
        self.dispose();
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("dirty", &self.dirty)
            .field("failed_fetch", &self.failed_fetch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handler::{ActionPayload, ActionResult, FetchOutcome};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct DisposeProbe {
        disposals: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ObjectHandler for DisposeProbe {
        async fn fetch(&mut self) -> Result<FetchOutcome, HandlerError> {
            Ok(FetchOutcome::Loaded)
        }

        fn render(&self) -> String {
            String::new()
        }

        async fn handle_action(
            &mut self,
            _payload: ActionPayload,
        ) -> Result<ActionResult, HandlerError> {
            Ok(ActionResult::none())
        }

        async fn save(&mut self) -> Result<(), HandlerError> {
            Ok(())
        }

        fn dispose(&mut self) {
            self.disposals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn identifier() -> ResourceIdentifier {
        ResourceIdentifier::resolve("/x/LIBA/OBJ1.DTAQ").unwrap()
    }

    #[test]
    fn document_id_generation() {
        assert_ne!(DocumentId::new(), DocumentId::new());
    }

    #[test]
    fn document_starts_clean() {
        let disposals = Arc::new(AtomicUsize::new(0));
        let document = Document::new(
            identifier(),
            Box::new(DisposeProbe {
                disposals: Arc::clone(&disposals),
            }),
        );

        assert!(!document.dirty());
        assert!(!document.failed_fetch());
        assert!(document.fetched_at().is_none());
    }

    #[test]
    fn dispose_runs_exactly_once() {
        let disposals = Arc::new(AtomicUsize::new(0));
        let mut document = Document::new(
            identifier(),
            Box::new(DisposeProbe {
                disposals: Arc::clone(&disposals),
            }),
        );

        document.dispose();
        document.dispose();
        drop(document);

        assert_eq!(disposals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_disposes_unclosed_document() {
        let disposals = Arc::new(AtomicUsize::new(0));
        let document = Document::new(
            identifier(),
            Box::new(DisposeProbe {
                disposals: Arc::clone(&disposals),
            }),
        );
        drop(document);

        assert_eq!(disposals.load(Ordering::SeqCst), 1);
    }
}
