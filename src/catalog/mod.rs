//! Integration catalog services
//!
//! Registry of external API integrations, their categories, domains and
//! endpoints, and the association between an endpoint and the model its
//! payloads conform to.

mod service;

pub use service::{EndpointService, IntegrationService};
