//! Validation functionality
//!
//! Pre-flight checks over the mapping graph, run before payloads are
//! mapped.

pub mod mapping;

pub use mapping::{
    MappingValidationResult, MappingValidator, UnbackedTransformer, UnmappedField,
};
