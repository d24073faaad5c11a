//! Classification of MongoDB driver errors.
//!
//! The driver reports failures through a large, open-ended `ErrorKind`. This
//! module folds them into the closed [`StoreError`] taxonomy so the repository
//! layer never sees driver types.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

use northwind_core::error::StoreError;

/// Server error codes that mean the request itself was rejected.
///
/// - `2` BadValue
/// - `9` FailedToParse
/// - `14` TypeMismatch
/// - `121` DocumentValidationFailure
/// - `11000` DuplicateKey
const VALIDATION_CODES: [i32; 5] = [2, 9, 14, 121, 11000];

pub(crate) fn classify(err: MongoError) -> StoreError {
    let message = err.to_string();

    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => StoreError::ConnectionFailure(message),
        ErrorKind::InvalidArgument { .. } => StoreError::Validation(message),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if VALIDATION_CODES.contains(&write_error.code) =>
        {
            StoreError::Validation(message)
        }
        ErrorKind::Command(command_error) if VALIDATION_CODES.contains(&command_error.code) => {
            StoreError::Validation(message)
        }
        _ => StoreError::Unknown(message),
    }
}
