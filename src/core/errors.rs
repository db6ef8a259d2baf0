//! Error types for the chat client.

use thiserror::Error;

/// Chat client error type.
///
/// The `Display` text of these errors is what ends up in the `meta` line of a
/// failure message, so keep it short and user-readable.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Transport-level failure (connection refused, DNS, timeout, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// The response body was not the expected JSON.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No conversation with this id exists in the store.
    #[error("unknown conversation: {0}")]
    UnknownConversation(String),
    /// Selection index outside the conversation list.
    #[error("selection {index} out of range (have {len} conversations)")]
    SelectionOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of conversations in the store.
        len: usize,
    },
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for chat client operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_matches_failure_meta() {
        assert_eq!(ChatError::HttpStatus(500).to_string(), "HTTP 500");
    }

    #[test]
    fn test_selection_display() {
        let err = ChatError::SelectionOutOfRange { index: 3, len: 1 };
        assert_eq!(err.to_string(), "selection 3 out of range (have 1 conversations)");
    }
}
