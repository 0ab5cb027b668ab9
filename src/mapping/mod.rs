//! Payload mapping between materialized schemas
//!
//! This module provides functionality to:
//! - Define maps between two models, down to per-field correspondences
//! - Re-shape a source payload into its target form under a map
//! - Apply registered value transformers on scalar leaves
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_mapping_sdk::mapping::{JsonMapper, MapService};
//!
//! let maps = MapService::new(store.clone(), store.clone());
//! let map = maps.create_map(source_model_id, target_model_id)?;
//! maps.create_field_map(source_field_id, target_field_id, map.id, None)?;
//!
//! let mapper = JsonMapper::new(store.clone(), store.clone());
//! let target_payload = mapper.map_to_target(&payload, source_model_id, map.id)?;
//! ```

mod error;
mod mapper;
mod service;
pub mod transformer;

pub use error::MapperError;
pub use mapper::JsonMapper;
pub use service::MapService;
pub use transformer::TransformError;
