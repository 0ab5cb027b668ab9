//! Map, ModelMap, FieldMap and Transformer - the persisted mapping graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::TransformerKind;

/// Root correspondence between a source model and a target model
///
/// At most one map exists per ordered (source, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Map {
    pub id: Uuid,
    pub source_model_id: Uuid,
    pub target_model_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Map {
    pub fn new(source_model_id: Uuid, target_model_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            source_model_id,
            target_model_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Correspondence between nested models, scoped to a [`Map`]
///
/// The same model can be nested under different maps with different
/// correspondences, so the map id is part of the identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMap {
    pub id: Uuid,
    pub map_id: Uuid,
    pub source_model_id: Uuid,
    pub target_model_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ModelMap {
    pub fn new(map_id: Uuid, source_model_id: Uuid, target_model_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            map_id,
            source_model_id,
            target_model_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Leaf correspondence between two fields, scoped to a [`Map`], with an
/// optional transformer applied when mapping scalar values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldMap {
    pub id: Uuid,
    pub map_id: Uuid,
    pub source_field_id: Uuid,
    pub target_field_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FieldMap {
    pub fn new(map_id: Uuid, source_field_id: Uuid, target_field_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            map_id,
            source_field_id,
            target_field_id,
            transformer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_transformer(mut self, transformer_id: Uuid) -> Self {
        self.transformer_id = Some(transformer_id);
        self
    }
}

/// A registered transformer, identified by its kind tag
///
/// Transformers are stateless; the record only names which pure function of
/// the registry applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transformer {
    pub id: Uuid,
    pub kind: TransformerKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transformer {
    pub fn new(kind: TransformerKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }
}
