//! Schema service - inference plus materialization

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::error::SchemaError;
use super::materializer::SchemaMaterializer;
use crate::inference::{TypeDescriptor, infer};
use crate::models::{Field, Model};
use crate::storage::SchemaStore;

/// Entry point for turning example payloads into persisted schemas
pub struct SchemaService {
    store: Arc<dyn SchemaStore>,
}

impl SchemaService {
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Persist an already-inferred descriptor tree
    pub fn materialize(
        &self,
        descriptor: &TypeDescriptor,
        root_name: &str,
    ) -> Result<Model, SchemaError> {
        SchemaMaterializer::new(self.store.clone()).materialize(descriptor, root_name)
    }

    /// Persist an external descriptor document (lower-case type tags)
    pub fn materialize_document(
        &self,
        document: &Value,
        root_name: &str,
    ) -> Result<Model, SchemaError> {
        let descriptor = TypeDescriptor::from_value(document)?;
        self.materialize(&descriptor, root_name)
    }

    /// Infer the shape of an example payload and persist it in one step
    pub fn infer_and_materialize(
        &self,
        example: &Value,
        root_name: &str,
    ) -> Result<Model, SchemaError> {
        self.materialize(&infer(example), root_name)
    }

    /// Fetch a model together with its fields in creation order
    pub fn model_with_fields(&self, model_id: Uuid) -> Result<(Model, Vec<Field>), SchemaError> {
        let model = self.store.model(model_id)?;
        let fields = self.store.fields_of_model(model_id)?;
        Ok((model, fields))
    }
}
