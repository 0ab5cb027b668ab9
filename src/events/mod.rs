//! Event handlers for inbound payloads
//!
//! The delivery mechanism (queue, webhook) lives outside this crate; these
//! handlers take an already-decoded event and run the mapping or inference
//! side of it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::inference::infer;
use crate::mapping::{JsonMapper, MapperError};
use crate::storage::{MappingStore, SchemaStore};

/// An inbound payload event, referencing its known source model and map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadEvent {
    pub data: Value,
    /// Correlation id assigned by the delivery mechanism
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_id: Option<String>,
    pub source_model_id: Uuid,
    pub map_id: Uuid,
}

/// Handlers invoked when a payload arrives
pub struct EventHandlers {
    mapper: JsonMapper,
}

impl EventHandlers {
    pub fn new(schema: Arc<dyn SchemaStore>, mappings: Arc<dyn MappingStore>) -> Self {
        Self {
            mapper: JsonMapper::new(schema, mappings),
        }
    }

    /// Map a received payload to its target shape, ready for publication
    pub fn handle_payload(&self, event: &PayloadEvent) -> Result<Value, MapperError> {
        tracing::info!(sync_id = event.sync_id.as_deref(), "handling payload event");
        let target = self
            .mapper
            .map_to_target(&event.data, event.source_model_id, event.map_id)?;
        tracing::info!(
            sync_id = event.sync_id.as_deref(),
            "payload mapped to target shape"
        );
        Ok(target)
    }

    /// Produce the descriptor document for an example payload
    pub fn handle_example(&self, data: &Value) -> Value {
        infer(data).to_value()
    }
}
