//! Persisting descriptor trees as Model/Field graphs

use std::sync::Arc;

use uuid::Uuid;

use super::error::SchemaError;
use crate::inference::TypeDescriptor;
use crate::models::{Field, FieldType, Model};
use crate::storage::SchemaStore;

/// Walks a [`TypeDescriptor`] tree and persists it as a Model/Field graph
///
/// Construction is two-phase: a field referencing a nested model is created
/// as a stub with its kind, and patched with the nested model id once that
/// model exists - the nested model is named after the field, so neither
/// record can be completed before the other is started. The finished tree is
/// committed in a single atomic store write.
pub struct SchemaMaterializer {
    store: Arc<dyn SchemaStore>,
}

/// Accumulated records for one materialization, written in one transaction
#[derive(Default)]
struct TreeBatch {
    models: Vec<Model>,
    fields: Vec<Field>,
}

impl SchemaMaterializer {
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Persist the descriptor tree under the given root name
    ///
    /// Fails with `InvalidType` on any `Unknown` kind in the tree (including
    /// unresolved empty-array item types) before anything is written.
    pub fn materialize(
        &self,
        descriptor: &TypeDescriptor,
        root_name: &str,
    ) -> Result<Model, SchemaError> {
        let mut batch = TreeBatch::default();
        build_model(descriptor, root_name, &mut batch)?;
        // build_model pushes the root model before any of its descendants
        let root = batch.models[0].clone();

        tracing::info!(
            root = root_name,
            models = batch.models.len(),
            fields = batch.fields.len(),
            "materializing inferred schema"
        );
        self.store
            .insert_schema_tree(&batch.models, &batch.fields)?;

        Ok(root)
    }
}

fn build_model(
    descriptor: &TypeDescriptor,
    name: &str,
    batch: &mut TreeBatch,
) -> Result<Uuid, SchemaError> {
    let TypeDescriptor::Object { properties } = descriptor else {
        return Err(SchemaError::InvalidType(format!(
            "model '{name}' must be described by an object, got {}",
            descriptor.kind()
        )));
    };

    let model = Model::new(name);
    let model_id = model.id;
    batch.models.push(model);

    for (position, (field_name, child)) in properties.iter().enumerate() {
        let field = Field::new(model_id, field_name, child.kind(), position as u32);
        let stub_index = batch.fields.len();
        batch.fields.push(field);

        match child {
            TypeDescriptor::Object { .. } => {
                let nested_id = build_model(child, field_name, batch)?;
                batch.fields[stub_index].object_model_id = Some(nested_id);
            }
            TypeDescriptor::Array { items } => {
                let item_kind = items.kind();
                if item_kind == FieldType::Unknown {
                    return Err(SchemaError::InvalidType(format!(
                        "field '{field_name}' has an unresolved list item type"
                    )));
                }
                batch.fields[stub_index].list_item_type = Some(item_kind);
                if let TypeDescriptor::Object { .. } = items.as_ref() {
                    let nested_id =
                        build_model(items, &format!("{field_name}_item"), batch)?;
                    batch.fields[stub_index].object_model_id = Some(nested_id);
                }
            }
            TypeDescriptor::Unknown => {
                return Err(SchemaError::InvalidType(format!(
                    "field '{field_name}' is of unknown type"
                )));
            }
            _ => {}
        }
    }

    Ok(model_id)
}
