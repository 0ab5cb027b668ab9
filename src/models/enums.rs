//! Enumerations for field kinds and transformers

use serde::{Deserialize, Serialize};

/// Primitive kind of a persisted field
///
/// Serialized with the upper-case tags used by the persisted graph. The
/// lower-case JSON-Schema-style tags of descriptor documents are a separate
/// contract, covered by [`JsonType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Object,
    List,
    String,
    Number,
    Boolean,
    Unknown,
}

impl FieldType {
    /// The JSON-Schema-style tag for this kind, if one exists
    pub fn json_type(self) -> JsonType {
        match self {
            FieldType::Object => JsonType::Object,
            FieldType::List => JsonType::Array,
            FieldType::String => JsonType::String,
            FieldType::Number => JsonType::Number,
            FieldType::Boolean => JsonType::Boolean,
            FieldType::Unknown => JsonType::Unknown,
        }
    }

    /// The persisted kind for a JSON-Schema-style tag
    pub fn from_json_type(json_type: JsonType) -> Self {
        match json_type {
            JsonType::Object => FieldType::Object,
            JsonType::Array => FieldType::List,
            JsonType::String => FieldType::String,
            JsonType::Number => FieldType::Number,
            JsonType::Boolean => FieldType::Boolean,
            JsonType::Unknown => FieldType::Unknown,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Object => write!(f, "OBJECT"),
            FieldType::List => write!(f, "LIST"),
            FieldType::String => write!(f, "STRING"),
            FieldType::Number => write!(f, "NUMBER"),
            FieldType::Boolean => write!(f, "BOOLEAN"),
            FieldType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Lower-case type tag of the external descriptor document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Unknown,
}

impl JsonType {
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Unknown => "unknown",
        }
    }

    /// Parse an external type tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "object" => Some(JsonType::Object),
            "array" => Some(JsonType::Array),
            "string" => Some(JsonType::String),
            "number" => Some(JsonType::Number),
            "boolean" => Some(JsonType::Boolean),
            "unknown" => Some(JsonType::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind tag of a registered value transformer
///
/// The full declared set; only a subset is backed by a function in the
/// registry (see `mapping::transformer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformerKind {
    Uppercase,
    Lowercase,
    Capitalize,
    StringToFloat,
    StringToInteger,
    StringToBoolean,
    NumberToString,
}

impl std::fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformerKind::Uppercase => write!(f, "UPPERCASE"),
            TransformerKind::Lowercase => write!(f, "LOWERCASE"),
            TransformerKind::Capitalize => write!(f, "CAPITALIZE"),
            TransformerKind::StringToFloat => write!(f, "STRING_TO_FLOAT"),
            TransformerKind::StringToInteger => write!(f, "STRING_TO_INTEGER"),
            TransformerKind::StringToBoolean => write!(f, "STRING_TO_BOOLEAN"),
            TransformerKind::NumberToString => write!(f, "NUMBER_TO_STRING"),
        }
    }
}
