//! Transformer registry - pure scalar value transforms

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::models::TransformerKind;

/// Errors raised when applying a transformer
#[derive(Error, Debug, Clone)]
pub enum TransformError {
    /// Kind is declared but has no registered implementation
    #[error("No transformer implementation for kind {0}")]
    Unsupported(TransformerKind),

    /// Value cannot be transformed by this kind
    #[error("Transformer {kind} cannot be applied: {reason}")]
    InvalidValue {
        kind: TransformerKind,
        reason: String,
    },
}

type TransformFn = fn(&Value) -> Result<Value, TransformError>;

/// Backed transformer kinds
///
/// The remaining declared kinds (LOWERCASE, CAPITALIZE, STRING_TO_INTEGER,
/// STRING_TO_BOOLEAN, NUMBER_TO_STRING) stay representable but fail lookup
/// until an implementation lands here.
static REGISTRY: Lazy<HashMap<TransformerKind, TransformFn>> = Lazy::new(|| {
    let mut registry: HashMap<TransformerKind, TransformFn> = HashMap::new();
    registry.insert(TransformerKind::Uppercase, uppercase);
    registry.insert(TransformerKind::StringToFloat, string_to_float);
    registry
});

/// Apply the registered transform for `kind` to a scalar value
pub fn apply(kind: TransformerKind, value: &Value) -> Result<Value, TransformError> {
    let transform = REGISTRY
        .get(&kind)
        .ok_or(TransformError::Unsupported(kind))?;
    transform(value)
}

/// Whether the registry has an implementation for `kind`
pub fn is_backed(kind: TransformerKind) -> bool {
    REGISTRY.contains_key(&kind)
}

fn uppercase(value: &Value) -> Result<Value, TransformError> {
    let text = value.as_str().ok_or_else(|| TransformError::InvalidValue {
        kind: TransformerKind::Uppercase,
        reason: format!("expected a string, got {value}"),
    })?;
    Ok(Value::String(text.to_uppercase()))
}

fn string_to_float(value: &Value) -> Result<Value, TransformError> {
    let invalid = |reason: String| TransformError::InvalidValue {
        kind: TransformerKind::StringToFloat,
        reason,
    };
    match value {
        Value::String(text) => {
            let parsed: f64 = text
                .trim()
                .parse()
                .map_err(|_| invalid(format!("'{text}' is not a number")))?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| invalid(format!("'{text}' is not a finite number")))
        }
        // Numbers pass through, already numeric
        Value::Number(n) => Ok(Value::Number(n.clone())),
        other => Err(invalid(format!("expected a string, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uppercase() {
        assert_eq!(
            apply(TransformerKind::Uppercase, &json!("Mike")).unwrap(),
            json!("MIKE")
        );
    }

    #[test]
    fn test_uppercase_rejects_non_string() {
        assert!(matches!(
            apply(TransformerKind::Uppercase, &json!(5)),
            Err(TransformError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_string_to_float() {
        assert_eq!(
            apply(TransformerKind::StringToFloat, &json!("4.25")).unwrap(),
            json!(4.25)
        );
        assert_eq!(
            apply(TransformerKind::StringToFloat, &json!(3)).unwrap(),
            json!(3)
        );
        assert!(matches!(
            apply(TransformerKind::StringToFloat, &json!("abc")),
            Err(TransformError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unbacked_kind_fails_lookup() {
        for kind in [
            TransformerKind::Lowercase,
            TransformerKind::Capitalize,
            TransformerKind::StringToInteger,
            TransformerKind::StringToBoolean,
            TransformerKind::NumberToString,
        ] {
            assert!(!is_backed(kind));
            assert!(matches!(
                apply(kind, &json!("x")),
                Err(TransformError::Unsupported(_))
            ));
        }
    }

    #[test]
    fn test_apply_is_pure() {
        let value = json!("Repeat");
        let first = apply(TransformerKind::Uppercase, &value).unwrap();
        let second = apply(TransformerKind::Uppercase, &value).unwrap();
        assert_eq!(first, second);
        assert_eq!(value, json!("Repeat"));
    }
}
