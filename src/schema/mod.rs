//! Schema materialization
//!
//! Turns [`TypeDescriptor`](crate::inference::TypeDescriptor) trees into
//! persisted Model/Field graphs. Materialization of one tree is atomic - a
//! failure part way through leaves no partial schema behind.

mod error;
mod materializer;
mod service;

pub use error::SchemaError;
pub use materializer::SchemaMaterializer;
pub use service::SchemaService;
