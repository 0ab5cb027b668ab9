//! Models module for the SDK
//!
//! Defines the persisted data structures: the Model/Field schema graph, the
//! Map/ModelMap/FieldMap mapping graph, transformers and the integration
//! catalog entities.

pub mod catalog;
pub mod enums;
pub mod mapping;
pub mod model;

pub use catalog::{Category, Domain, Endpoint, Integration};
pub use enums::{FieldType, JsonType, TransformerKind};
pub use mapping::{FieldMap, Map, ModelMap, Transformer};
pub use model::{Field, Model};
