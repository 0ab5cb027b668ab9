//! Type descriptor tree and its external document form

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::models::enums::{FieldType, JsonType};

/// Error raised when parsing an external descriptor document
#[derive(Error, Debug, Clone)]
pub enum DescriptorError {
    /// Document node is not a descriptor object
    #[error("Invalid descriptor document: {0}")]
    Invalid(String),

    /// Type tag outside the known set
    #[error("Unknown type tag: {0}")]
    UnknownTag(String),
}

/// Inferred kind structure of an example document, prior to persistence
///
/// Object properties keep the source document's key order, which makes the
/// descriptor of a given input deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Object {
        properties: Vec<(String, TypeDescriptor)>,
    },
    Array {
        items: Box<TypeDescriptor>,
    },
    String,
    Number,
    Boolean,
    Unknown,
}

impl TypeDescriptor {
    /// The persisted field kind this descriptor maps to
    pub fn kind(&self) -> FieldType {
        match self {
            TypeDescriptor::Object { .. } => FieldType::Object,
            TypeDescriptor::Array { .. } => FieldType::List,
            TypeDescriptor::String => FieldType::String,
            TypeDescriptor::Number => FieldType::Number,
            TypeDescriptor::Boolean => FieldType::Boolean,
            TypeDescriptor::Unknown => FieldType::Unknown,
        }
    }

    /// Render the external document form
    ///
    /// The document uses lower-case JSON-Schema-style tags:
    /// `{"type": "object", "properties": {...}}`, `{"type": "array",
    /// "items": {...}}`, `{"type": "string"}` and so on.
    pub fn to_value(&self) -> Value {
        let tag = self.kind().json_type().as_str();
        match self {
            TypeDescriptor::Object { properties } => {
                let mut props = Map::new();
                for (name, descriptor) in properties {
                    props.insert(name.clone(), descriptor.to_value());
                }
                json!({ "type": tag, "properties": props })
            }
            TypeDescriptor::Array { items } => {
                json!({ "type": tag, "items": items.to_value() })
            }
            _ => json!({ "type": tag }),
        }
    }

    /// Parse an external descriptor document back into a descriptor tree
    pub fn from_value(value: &Value) -> Result<Self, DescriptorError> {
        let node = value
            .as_object()
            .ok_or_else(|| DescriptorError::Invalid(format!("expected an object, got {value}")))?;
        let tag = node
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DescriptorError::Invalid("missing 'type' tag".to_string()))?;
        let json_type =
            JsonType::parse(tag).ok_or_else(|| DescriptorError::UnknownTag(tag.to_string()))?;

        match json_type {
            JsonType::Object => {
                let props = node
                    .get("properties")
                    .and_then(Value::as_object)
                    .ok_or_else(|| {
                        DescriptorError::Invalid("object descriptor without 'properties'".to_string())
                    })?;
                let mut properties = Vec::with_capacity(props.len());
                for (name, child) in props {
                    properties.push((name.clone(), TypeDescriptor::from_value(child)?));
                }
                Ok(TypeDescriptor::Object { properties })
            }
            JsonType::Array => {
                let items = node.get("items").ok_or_else(|| {
                    DescriptorError::Invalid("array descriptor without 'items'".to_string())
                })?;
                Ok(TypeDescriptor::Array {
                    items: Box::new(TypeDescriptor::from_value(items)?),
                })
            }
            JsonType::String => Ok(TypeDescriptor::String),
            JsonType::Number => Ok(TypeDescriptor::Number),
            JsonType::Boolean => Ok(TypeDescriptor::Boolean),
            JsonType::Unknown => Ok(TypeDescriptor::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_value_scalar() {
        assert_eq!(TypeDescriptor::String.to_value(), json!({"type": "string"}));
        assert_eq!(
            TypeDescriptor::Unknown.to_value(),
            json!({"type": "unknown"})
        );
    }

    #[test]
    fn test_to_value_preserves_property_order() {
        let descriptor = TypeDescriptor::Object {
            properties: vec![
                ("zebra".to_string(), TypeDescriptor::String),
                ("apple".to_string(), TypeDescriptor::Number),
            ],
        };
        let value = descriptor.to_value();
        let keys: Vec<&String> = value["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zebra", "apple"]);
    }

    #[test]
    fn test_document_round_trip() {
        let descriptor = TypeDescriptor::Object {
            properties: vec![
                ("name".to_string(), TypeDescriptor::String),
                (
                    "skills".to_string(),
                    TypeDescriptor::Array {
                        items: Box::new(TypeDescriptor::Object {
                            properties: vec![("id".to_string(), TypeDescriptor::String)],
                        }),
                    },
                ),
            ],
        };

        let round_tripped = TypeDescriptor::from_value(&descriptor.to_value()).unwrap();
        assert_eq!(round_tripped, descriptor);
    }

    #[test]
    fn test_from_value_rejects_unknown_tag() {
        let err = TypeDescriptor::from_value(&json!({"type": "integer"})).unwrap_err();
        assert!(matches!(err, DescriptorError::UnknownTag(_)));
    }

    #[test]
    fn test_from_value_rejects_missing_tag() {
        let err = TypeDescriptor::from_value(&json!({"properties": {}})).unwrap_err();
        assert!(matches!(err, DescriptorError::Invalid(_)));
    }
}
