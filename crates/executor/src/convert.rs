//! Error conversion from internal error types.

use crate::Error;
use entrystore_core::Error as CoreError;

/// Convert a core error to an executor Error, keeping every field.
impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OutOfBounds { index, len } => Error::OutOfBounds { index, len },
            CoreError::InvalidIndex { index, len } => Error::InvalidIndex { index, len },
            CoreError::EmptyStore => Error::EmptyStore,
            CoreError::LimitExceeded { max } => Error::LimitExceeded { max },
            CoreError::InvalidInput(reason) => Error::InvalidInput { reason },
            CoreError::IoError(e) => Error::Io {
                reason: e.to_string(),
            },
            CoreError::SerializationError(reason) => Error::Serialization { reason },
            CoreError::Corruption(reason) => Error::Corruption { reason },
        }
    }
}
