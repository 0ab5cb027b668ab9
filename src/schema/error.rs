//! Error types for schema materialization

use thiserror::Error;

use crate::inference::DescriptorError;
use crate::storage::StoreError;

/// Errors that can occur while persisting an inferred schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A descriptor kind falls outside the materializable set
    #[error("Invalid field type: {0}")]
    InvalidType(String),

    /// External descriptor document could not be parsed
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
