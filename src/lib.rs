//! Integration Mapping SDK - schema inference and payload mapping
//!
//! Provides unified interfaces for:
//! - Inferring typed schemas from example JSON payloads
//! - Persisting schemas as Model/Field graphs (via store backends)
//! - Defining maps between schemas, down to per-field transformers
//! - Re-shaping payloads from a source schema into a target schema
//! - Integration catalog bookkeeping (categories, integrations, endpoints)

pub mod catalog;
pub mod events;
pub mod inference;
pub mod mapping;
pub mod models;
pub mod schema;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use storage::memory::MemoryStore;
#[cfg(feature = "sled-backend")]
pub use storage::sled::SledStore;
pub use storage::{CatalogStore, MappingStore, SchemaStore, StoreError};

pub use inference::{DescriptorError, TypeDescriptor, infer};
pub use mapping::{JsonMapper, MapService, MapperError, TransformError};
pub use schema::{SchemaError, SchemaMaterializer, SchemaService};

pub use catalog::{EndpointService, IntegrationService};
pub use events::{EventHandlers, PayloadEvent};
pub use validation::{MappingValidationResult, MappingValidator};

// Re-export models
pub use models::{
    Category, Domain, Endpoint, Field, FieldMap, FieldType, Integration, JsonType, Map, Model,
    ModelMap, Transformer, TransformerKind,
};
