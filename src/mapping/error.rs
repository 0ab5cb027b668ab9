//! Error types for payload mapping

use thiserror::Error;

use super::transformer::TransformError;
use crate::models::FieldType;
use crate::storage::StoreError;

/// Errors that can occur while re-shaping a payload
#[derive(Error, Debug)]
pub enum MapperError {
    /// A field kind outside the mappable set (OBJECT, LIST, NUMBER, STRING)
    #[error("Invalid field type: {0}")]
    InvalidType(String),

    /// Declared schema kind does not match the runtime value
    #[error("Kind mismatch for field '{field}': expected {expected}, found {found}")]
    KindMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    /// Payload has no value for a schema field
    #[error("Missing value for field '{0}'")]
    MissingValue(String),

    /// Transformer lookup or application failed
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Store failure, including missing field maps
    #[error(transparent)]
    Store(#[from] StoreError),
}
