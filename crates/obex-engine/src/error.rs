//! Error types for the engine
//!
//! The taxonomy mirrors the user-visible behavior: malformed paths and
//! unsupported types abort an open before any document exists, fetch throws
//! abort the open, and action/save failures propagate with the handler's
//! message verbatim while the document stays open and usable.

use obex_remote::RemoteError;
use obex_resource::ResourceError;

/// Failure inside a handler operation
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Remote transport/session failure underneath the handler
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Handler-level failure with a human-readable message
    #[error("{0}")]
    Message(String),
}

impl HandlerError {
    /// Build a message-carrying handler error
    #[inline]
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Resource path did not parse
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// No handler registered for the type tag
    #[error("no support for type {0:?} yet")]
    UnsupportedType(String),

    /// A document for this resource is already open
    #[error("document already open: {0}")]
    AlreadyOpen(String),

    /// No open document for this resource
    #[error("document not open: {0}")]
    NotOpen(String),

    /// Another operation is in flight for this document
    #[error("document busy: {0}")]
    Busy(String),

    /// Session table is full
    #[error("too many open documents (max: {0})")]
    TooManyDocuments(usize),

    /// Action token did not parse
    #[error("malformed action token: {0}")]
    MalformedAction(String),

    /// Handler `fetch` failed; no document was created
    #[error("{0}")]
    Fetch(HandlerError),

    /// Handler `handle_action` failed; document state untouched
    #[error("{0}")]
    Action(HandlerError),

    /// Handler `save` failed; document stays dirty
    #[error("{0}")]
    Save(HandlerError),
}

impl EngineError {
    /// Check if the operation was rejected because another one is in flight
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    /// Check if the open was aborted before a document existed
    #[inline]
    #[must_use]
    pub fn aborts_open(&self) -> bool {
        matches!(
            self,
            Self::Resource(_) | Self::UnsupportedType(_) | Self::Fetch(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_names_the_tag() {
        let err = EngineError::UnsupportedType("DTAQ".to_string());
        assert!(err.to_string().contains("DTAQ"));
    }

    #[test]
    fn save_error_message_is_verbatim() {
        let err = EngineError::Save(HandlerError::message("CPF1234 object locked"));
        assert_eq!(err.to_string(), "CPF1234 object locked");
    }

    #[test]
    fn busy_predicate() {
        assert!(EngineError::Busy("LIB/OBJ.DTAQ".to_string()).is_busy());
        assert!(!EngineError::NotOpen("LIB/OBJ.DTAQ".to_string()).is_busy());
    }

    #[test]
    fn open_aborting_classification() {
        assert!(EngineError::UnsupportedType("X".into()).aborts_open());
        assert!(EngineError::Fetch(HandlerError::message("boom")).aborts_open());
        assert!(!EngineError::Save(HandlerError::message("boom")).aborts_open());
    }
}
