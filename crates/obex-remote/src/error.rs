//! Error types for the remote capability

/// Failures surfaced by a remote-system client
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport failure while running a command
    #[error("remote command failed: {0}")]
    Command(String),

    /// Transport failure while running a query
    #[error("remote query failed: {0}")]
    Query(String),

    /// Session/connection level failure
    #[error("remote connection lost: {0}")]
    Connection(String),

    /// A result row did not have the expected shape
    #[error("unexpected row shape: {0}")]
    Shape(String),

    /// A replay script had no response left for the request
    #[error("replay script exhausted for: {0}")]
    ScriptExhausted(String),
}

impl RemoteError {
    /// Check if the failure is at the connection level
    #[inline]
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RemoteError::Query("table not found".to_string());
        assert!(err.to_string().contains("remote query failed"));
        assert!(err.to_string().contains("table not found"));
    }

    #[test]
    fn connection_predicate() {
        assert!(RemoteError::Connection("timeout".into()).is_connection());
        assert!(!RemoteError::Shape("missing column".into()).is_connection());
    }
}
