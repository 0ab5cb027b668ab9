//! Type inference engine for example JSON payloads
//!
//! Walks an arbitrary JSON value and produces a [`TypeDescriptor`] tree, the
//! JSON-Schema-like structure that the schema materializer persists as a
//! Model/Field graph.
//!
//! ## Example
//!
//! ```rust
//! use integration_mapping_sdk::inference::infer;
//! use serde_json::json;
//!
//! let descriptor = infer(&json!({"name": "Alice", "age": 30}));
//! assert_eq!(
//!     descriptor.to_value(),
//!     json!({
//!         "type": "object",
//!         "properties": {
//!             "name": {"type": "string"},
//!             "age": {"type": "number"}
//!         }
//!     })
//! );
//! ```

mod descriptor;
mod inferrer;

pub use descriptor::{DescriptorError, TypeDescriptor};
pub use inferrer::infer;
