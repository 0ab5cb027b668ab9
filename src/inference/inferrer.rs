//! Shape inference over example JSON values

use serde_json::Value;

use super::descriptor::TypeDescriptor;

/// Infer the type descriptor of an example JSON value
///
/// Total over all JSON values: nulls (and anything else outside the known
/// kinds) come back as `Unknown` rather than failing, and consumers decide
/// whether an unresolved kind is acceptable. The walk is deterministic -
/// object keys keep their source order and array element types are taken
/// from the first element, so the same input always yields a deep-equal
/// descriptor.
pub fn infer(value: &Value) -> TypeDescriptor {
    match value {
        Value::Object(entries) => TypeDescriptor::Object {
            properties: entries
                .iter()
                .map(|(name, child)| (name.clone(), infer(child)))
                .collect(),
        },
        Value::Array(items) => {
            if items.is_empty() {
                tracing::warn!("inferring over an empty array, item type left unresolved");
            }
            TypeDescriptor::Array {
                items: Box::new(match items.first() {
                    Some(first) => infer(first),
                    None => TypeDescriptor::Unknown,
                }),
            }
        }
        Value::String(_) => TypeDescriptor::String,
        Value::Number(_) => TypeDescriptor::Number,
        Value::Bool(_) => TypeDescriptor::Boolean,
        Value::Null => TypeDescriptor::Unknown,
    }
}
