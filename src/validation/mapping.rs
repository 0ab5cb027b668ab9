//! Mapping completeness validation
//!
//! A map must be total over the source fields it is used with, and every
//! attached transformer must be backed by the registry. This validator
//! reports both kinds of gap up front, before payloads hit the mapper.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::mapping::transformer;
use crate::models::TransformerKind;
use crate::storage::{MappingStore, SchemaStore, StoreError};

/// Result of validating a map against its source schema tree
#[derive(Debug, Default)]
pub struct MappingValidationResult {
    /// Source fields with no field map under the map
    pub unmapped_fields: Vec<UnmappedField>,
    /// Field maps whose transformer kind has no registered implementation
    pub unbacked_transformers: Vec<UnbackedTransformer>,
}

impl MappingValidationResult {
    /// Whether payloads of the source schema can be mapped without gaps
    pub fn is_complete(&self) -> bool {
        self.unmapped_fields.is_empty() && self.unbacked_transformers.is_empty()
    }
}

/// A source field that has no correspondence under the map
#[derive(Debug, Clone)]
pub struct UnmappedField {
    pub model_id: Uuid,
    pub field_id: Uuid,
    pub field_name: String,
}

/// A field map referencing a transformer kind without an implementation
#[derive(Debug, Clone)]
pub struct UnbackedTransformer {
    pub field_map_id: Uuid,
    pub kind: TransformerKind,
}

/// Mapping validator
pub struct MappingValidator {
    schema: Arc<dyn SchemaStore>,
    mappings: Arc<dyn MappingStore>,
}

impl MappingValidator {
    pub fn new(schema: Arc<dyn SchemaStore>, mappings: Arc<dyn MappingStore>) -> Self {
        Self { schema, mappings }
    }

    /// Walk the map's source schema tree and report every gap
    pub fn validate(&self, map_id: Uuid) -> Result<MappingValidationResult, StoreError> {
        let map = self.mappings.map(map_id)?;
        let mut result = MappingValidationResult::default();
        let mut visited = HashSet::new();
        self.validate_model(map.source_model_id, map_id, &mut visited, &mut result)?;
        Ok(result)
    }

    fn validate_model(
        &self,
        model_id: Uuid,
        map_id: Uuid,
        visited: &mut HashSet<Uuid>,
        result: &mut MappingValidationResult,
    ) -> Result<(), StoreError> {
        if !visited.insert(model_id) {
            return Ok(());
        }

        for field in self.schema.fields_of_model(model_id)? {
            match self.mappings.field_map_for_source(map_id, field.id) {
                Ok(field_map) => {
                    if let Some(transformer_id) = field_map.transformer_id {
                        let record = self.mappings.transformer(transformer_id)?;
                        if !transformer::is_backed(record.kind) {
                            result.unbacked_transformers.push(UnbackedTransformer {
                                field_map_id: field_map.id,
                                kind: record.kind,
                            });
                        }
                    }
                }
                Err(StoreError::NotFound(_)) => {
                    result.unmapped_fields.push(UnmappedField {
                        model_id,
                        field_id: field.id,
                        field_name: field.name.clone(),
                    });
                }
                Err(other) => return Err(other),
            }

            if let Some(nested_id) = field.object_model_id {
                self.validate_model(nested_id, map_id, visited, result)?;
            }
        }
        Ok(())
    }
}
