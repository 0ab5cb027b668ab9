//! Recursive payload re-shaping

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::MapperError;
use super::transformer;
use crate::models::{Field, FieldMap, FieldType};
use crate::storage::{MappingStore, SchemaStore};

/// Re-shapes source payloads into their target form under a map
///
/// Pure read/transform/produce - neither schema nor mapping records are
/// touched, so any number of concurrent mappings against the same graph are
/// safe. Every failure aborts the whole operation; there is no partial
/// output.
pub struct JsonMapper {
    schema: Arc<dyn SchemaStore>,
    mappings: Arc<dyn MappingStore>,
}

impl JsonMapper {
    pub fn new(schema: Arc<dyn SchemaStore>, mappings: Arc<dyn MappingStore>) -> Self {
        Self { schema, mappings }
    }

    /// Map a payload of the given source model to its target shape
    pub fn map_to_target(
        &self,
        data: &Value,
        source_model_id: Uuid,
        map_id: Uuid,
    ) -> Result<Value, MapperError> {
        // Fail fast on a dangling map reference
        self.mappings.map(map_id)?;
        tracing::info!(%source_model_id, %map_id, "mapping payload to target shape");
        self.map_model(data, source_model_id, map_id)
    }

    fn map_model(
        &self,
        value: &Value,
        model_id: Uuid,
        map_id: Uuid,
    ) -> Result<Value, MapperError> {
        let model = self.schema.model(model_id)?;
        let Value::Object(source) = value else {
            return Err(MapperError::KindMismatch {
                field: model.name,
                expected: FieldType::Object,
                found: json_kind_name(value),
            });
        };

        let mut result = Map::new();
        for field in self.schema.fields_of_model(model_id)? {
            let field_map = self.mappings.field_map_for_source(map_id, field.id)?;
            let target_field = self.schema.field(field_map.target_field_id)?;
            let raw = source
                .get(&field.name)
                .ok_or_else(|| MapperError::MissingValue(field.name.clone()))?;
            let mapped = self.map_field(&field, &field_map, raw, map_id)?;
            result.insert(target_field.name, mapped);
        }
        Ok(Value::Object(result))
    }

    fn map_field(
        &self,
        field: &Field,
        field_map: &FieldMap,
        value: &Value,
        map_id: Uuid,
    ) -> Result<Value, MapperError> {
        match field.field_type {
            FieldType::Object => {
                let nested_id = nested_model_id(field)?;
                self.map_model(value, nested_id, map_id)
            }
            FieldType::List => {
                let Value::Array(items) = value else {
                    return Err(MapperError::KindMismatch {
                        field: field.name.clone(),
                        expected: FieldType::List,
                        found: json_kind_name(value),
                    });
                };
                let item_type = field.list_item_type.ok_or_else(|| {
                    MapperError::InvalidType(format!(
                        "list field '{}' has no declared item type",
                        field.name
                    ))
                })?;
                let mapped: Result<Vec<Value>, MapperError> = items
                    .iter()
                    .map(|item| self.map_item(field, item_type, item, map_id))
                    .collect();
                Ok(Value::Array(mapped?))
            }
            FieldType::String | FieldType::Number => {
                check_scalar_kind(&field.name, field.field_type, value)?;
                self.apply_transformer(field_map, value)
            }
            other => Err(MapperError::InvalidType(format!(
                "unprocessable field type {other} on field '{}'",
                field.name
            ))),
        }
    }

    /// Map one list element by the field's declared item type
    fn map_item(
        &self,
        field: &Field,
        item_type: FieldType,
        value: &Value,
        map_id: Uuid,
    ) -> Result<Value, MapperError> {
        match item_type {
            FieldType::Object => {
                let nested_id = nested_model_id(field)?;
                self.map_model(value, nested_id, map_id)
            }
            FieldType::String | FieldType::Number => {
                check_scalar_kind(&field.name, item_type, value)?;
                Ok(value.clone())
            }
            other => Err(MapperError::InvalidType(format!(
                "unprocessable list item type {other} on field '{}'",
                field.name
            ))),
        }
    }

    fn apply_transformer(
        &self,
        field_map: &FieldMap,
        value: &Value,
    ) -> Result<Value, MapperError> {
        match field_map.transformer_id {
            Some(transformer_id) => {
                let record = self.mappings.transformer(transformer_id)?;
                Ok(transformer::apply(record.kind, value)?)
            }
            None => Ok(value.clone()),
        }
    }
}

fn nested_model_id(field: &Field) -> Result<Uuid, MapperError> {
    field.object_model_id.ok_or_else(|| {
        MapperError::InvalidType(format!(
            "field '{}' carries object values but has no nested model",
            field.name
        ))
    })
}

fn check_scalar_kind(
    field_name: &str,
    expected: FieldType,
    value: &Value,
) -> Result<(), MapperError> {
    let matches = match expected {
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        _ => false,
    };
    if !matches {
        return Err(MapperError::KindMismatch {
            field: field_name.to_string(),
            expected,
            found: json_kind_name(value),
        });
    }
    Ok(())
}

fn json_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
