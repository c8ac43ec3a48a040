//! Errors reported by database clients.

use thiserror::Error;

/// Server error code for a duplicate key (E11000).
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Server error code for an index that already exists under the same name
/// with different options.
pub const INDEX_KEY_SPECS_CONFLICT_CODE: i32 = 86;

/// Errors returned by a [`crate::DatabaseClient`].
///
/// Clients classify every failure into one of two kinds. Only
/// `DuplicateKey` can be an expected outcome; everything else is an
/// environment problem the harness does not try to recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The unique constraint cannot be satisfied by the stored data.
    #[error("Duplicate key error ({code}): {message}")]
    DuplicateKey { code: i32, message: String },

    /// Connectivity, authentication or any server error unrelated to uniqueness.
    #[error("Transport error{}: {message}", code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Transport { code: Option<i32>, message: String },
}

impl ClientError {
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        ClientError::DuplicateKey {
            code: DUPLICATE_KEY_CODE,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            code: None,
            message: message.into(),
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, ClientError::DuplicateKey { .. })
    }

    /// Server error code, when the server supplied one.
    pub fn code(&self) -> Option<i32> {
        match self {
            ClientError::DuplicateKey { code, .. } => Some(*code),
            ClientError::Transport { code, .. } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = ClientError::Transport {
            code: Some(6),
            message: "host unreachable".to_string(),
        };
        assert_eq!(err.to_string(), "Transport error (6): host unreachable");

        let err = ClientError::transport("connection reset");
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }

    #[test]
    fn test_duplicate_key_classification() {
        let err = ClientError::duplicate_key("dup key: { a: 0 }");
        assert!(err.is_duplicate_key());
        assert_eq!(err.code(), Some(DUPLICATE_KEY_CODE));
        assert!(!ClientError::transport("x").is_duplicate_key());
    }
}
