//! Store abstraction over the schema, mapping and catalog graphs
//!
//! Defines the store traits and implementations for different storage
//! systems:
//! - MemoryStore: in-process store (tests, short-lived consumers)
//! - SledStore: durable embedded store (native apps, default)

use uuid::Uuid;

use crate::models::{
    Category, Domain, Endpoint, Field, FieldMap, Integration, Map, Model, ModelMap, Transformer,
};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced entity does not exist for the given identifier
    #[error("Not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint was violated
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// A create/update referenced a non-existent related entity
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
    /// Row encoding/decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Storage backend error
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Persistence over the Model/Field schema graph
///
/// Field names are unique within their model; `insert_field` and the fields
/// carried by `insert_schema_tree` reject duplicates. `fields_of_model`
/// returns fields in creation order, which keeps re-serialization of mapped
/// documents deterministic.
pub trait SchemaStore: Send + Sync {
    fn insert_model(&self, model: &Model) -> Result<(), StoreError>;

    fn model(&self, id: Uuid) -> Result<Model, StoreError>;

    /// Fails `Unprocessable` when the owning model does not exist and
    /// `AlreadyExists` on a duplicate name within the model
    fn insert_field(&self, field: &Field) -> Result<(), StoreError>;

    /// Overwrites an existing field record, e.g. to point it at a nested
    /// model created after the field itself
    fn update_field(&self, field: &Field) -> Result<(), StoreError>;

    fn field(&self, id: Uuid) -> Result<Field, StoreError>;

    fn fields_of_model(&self, model_id: Uuid) -> Result<Vec<Field>, StoreError>;

    /// Atomically persist a whole materialized schema tree
    ///
    /// Either every model and field is written or none are; a failure part
    /// way through must leave no partial schema visible to readers.
    fn insert_schema_tree(&self, models: &[Model], fields: &[Field]) -> Result<(), StoreError>;
}

/// Persistence over the Map/ModelMap/FieldMap graph and transformers
pub trait MappingStore: Send + Sync {
    /// Fails `AlreadyExists` when a map for the same ordered
    /// (source, target) pair exists
    fn create_map(&self, map: &Map) -> Result<(), StoreError>;

    fn map(&self, id: Uuid) -> Result<Map, StoreError>;

    /// Fails `AlreadyExists` on a duplicate (source, map, target) triple
    fn create_model_map(&self, model_map: &ModelMap) -> Result<(), StoreError>;

    /// Fails `AlreadyExists` on a duplicate (source, map, target) triple
    fn create_field_map(&self, field_map: &FieldMap) -> Result<(), StoreError>;

    /// The field map of a source field under a map; `NotFound` when the
    /// field has no correspondence there
    fn field_map_for_source(
        &self,
        map_id: Uuid,
        source_field_id: Uuid,
    ) -> Result<FieldMap, StoreError>;

    fn field_maps_of_map(&self, map_id: Uuid) -> Result<Vec<FieldMap>, StoreError>;

    fn create_transformer(&self, transformer: &Transformer) -> Result<(), StoreError>;

    fn transformer(&self, id: Uuid) -> Result<Transformer, StoreError>;
}

/// Persistence over the integration catalog
pub trait CatalogStore: Send + Sync {
    /// Fails `AlreadyExists` on a duplicate category name
    fn create_category(&self, category: &Category) -> Result<(), StoreError>;

    fn category(&self, id: Uuid) -> Result<Category, StoreError>;

    fn category_by_name(&self, name: &str) -> Result<Category, StoreError>;

    /// Fails `AlreadyExists` on a duplicate (name, category) pair
    fn create_integration(&self, integration: &Integration) -> Result<(), StoreError>;

    fn integration(&self, id: Uuid) -> Result<Integration, StoreError>;

    fn integration_by_name(
        &self,
        name: &str,
        category_id: Uuid,
    ) -> Result<Integration, StoreError>;

    /// Fails `AlreadyExists` on a duplicate (integration, domain) pair
    fn create_domain(&self, domain: &Domain) -> Result<(), StoreError>;

    /// Fails `AlreadyExists` on a duplicate (integration, path, method)
    /// triple
    fn create_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError>;

    fn endpoint(&self, id: Uuid) -> Result<Endpoint, StoreError>;

    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError>;

    fn delete_endpoint(&self, id: Uuid) -> Result<(), StoreError>;

    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError>;
}

// Store backend implementations
pub mod memory;

#[cfg(feature = "sled-backend")]
pub mod sled;
