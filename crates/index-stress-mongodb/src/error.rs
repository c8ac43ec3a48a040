//! Error types and classification for the MongoDB backend.

use index_stress_core::error::DUPLICATE_KEY_CODE;
use index_stress_core::ClientError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Errors raised while setting up the MongoDB client.
#[derive(Error, Debug)]
pub enum MongoDBClientError {
    /// MongoDB connection or query error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),
}

/// Server error code carried by a driver error, if any.
fn server_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(e) => Some(e.code),
        ErrorKind::Write(WriteFailure::WriteError(e)) => Some(e.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(e)) => Some(e.code),
        // Unordered bulk inserts report per-document errors; the first one decides.
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.code)
            .or_else(|| e.write_concern_error.as_ref().map(|e| e.code)),
        _ => None,
    }
}

/// Map a driver error onto the harness's error classification.
///
/// Only server code 11000 counts as a duplicate key; every other failure,
/// including network and authentication errors, is a transport error.
pub fn classify(err: mongodb::error::Error) -> ClientError {
    let code = server_code(&err);
    let message = err.to_string();
    match code {
        Some(DUPLICATE_KEY_CODE) => ClientError::DuplicateKey {
            code: DUPLICATE_KEY_CODE,
            message,
        },
        code => ClientError::Transport { code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use mongodb::error::InsertManyError;

    fn insert_many_error(code: i32) -> mongodb::error::Error {
        let failure: InsertManyError = bson::from_document(doc! {
            "writeErrors": [
                { "index": 0, "code": code, "errmsg": format!("E{code} write error") },
            ],
        })
        .unwrap();
        mongodb::error::Error::from(ErrorKind::InsertMany(failure))
    }

    #[test]
    fn test_insert_many_duplicate_is_duplicate_key() {
        let err = classify(insert_many_error(DUPLICATE_KEY_CODE));
        assert!(err.is_duplicate_key(), "{err}");
        assert_eq!(err.code(), Some(DUPLICATE_KEY_CODE));
    }

    #[test]
    fn test_insert_many_other_code_is_transport() {
        let err = classify(insert_many_error(121));
        assert!(!err.is_duplicate_key());
        assert_eq!(err.code(), Some(121));
    }

    #[test]
    fn test_client_side_error_has_no_code() {
        let err = classify(mongodb::error::Error::custom("boom"));
        assert!(matches!(err, ClientError::Transport { code: None, .. }));
    }
}
