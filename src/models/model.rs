//! Model and Field - the persisted schema graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::FieldType;

/// One persisted JSON object shape
///
/// A model owns an ordered set of [`Field`]s; field names are unique within
/// their model. Nested object shapes are separate models referenced through
/// `Field::object_model_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// One named, typed member of a [`Model`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub id: Uuid,
    /// Model this field belongs to
    pub model_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    /// Item kind, set if and only if `field_type` is LIST
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item_type: Option<FieldType>,
    /// Enum choices for this field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<serde_json::Value>,
    /// Nested model, set for OBJECT and LIST-of-OBJECT fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_model_id: Option<Uuid>,
    /// Creation order within the owning model
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Field {
    pub fn new(
        model_id: Uuid,
        name: impl Into<String>,
        field_type: FieldType,
        position: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            model_id,
            name: name.into(),
            field_type,
            list_item_type: None,
            choices: Vec::new(),
            object_model_id: None,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_list_item_type(mut self, item_type: FieldType) -> Self {
        self.list_item_type = Some(item_type);
        self
    }

    pub fn with_object_model(mut self, model_id: Uuid) -> Self {
        self.object_model_id = Some(model_id);
        self
    }

    /// Whether the field's values carry a nested model shape
    pub fn is_nested(&self) -> bool {
        matches!(self.field_type, FieldType::Object)
            || (matches!(self.field_type, FieldType::List)
                && matches!(self.list_item_type, Some(FieldType::Object)))
    }
}
