//! Services over the integration catalog

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Category, Domain, Endpoint, Integration};
use crate::storage::{CatalogStore, SchemaStore, StoreError};

/// Categories, integrations and their domains
pub struct IntegrationService {
    store: Arc<dyn CatalogStore>,
}

impl IntegrationService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let category = Category::new(name);
        self.store.create_category(&category)?;
        tracing::info!(category = name, "created category");
        Ok(category)
    }

    /// Fails `Unprocessable` when the category does not exist and
    /// `AlreadyExists` on a duplicate name within the category
    pub fn create_integration(
        &self,
        name: &str,
        category_id: Uuid,
    ) -> Result<Integration, StoreError> {
        self.store.category(category_id).map_err(|_| {
            StoreError::Unprocessable(format!("category {category_id} does not exist"))
        })?;
        let integration = Integration::new(name, category_id);
        self.store.create_integration(&integration)?;
        tracing::info!(integration = name, "created integration");
        Ok(integration)
    }

    pub fn get_by_name_and_category(
        &self,
        name: &str,
        category_name: &str,
    ) -> Result<Integration, StoreError> {
        let category = self.store.category_by_name(category_name)?;
        self.store.integration_by_name(name, category.id)
    }

    pub fn add_domain(
        &self,
        integration_id: Uuid,
        domain: &str,
    ) -> Result<Domain, StoreError> {
        self.store.integration(integration_id).map_err(|_| {
            StoreError::Unprocessable(format!("integration {integration_id} does not exist"))
        })?;
        let domain = Domain::new(integration_id, domain);
        self.store.create_domain(&domain)?;
        Ok(domain)
    }
}

/// Endpoints of an integration and their inferred-model association
pub struct EndpointService {
    catalog: Arc<dyn CatalogStore>,
    schema: Arc<dyn SchemaStore>,
}

impl EndpointService {
    pub fn new(catalog: Arc<dyn CatalogStore>, schema: Arc<dyn SchemaStore>) -> Self {
        Self { catalog, schema }
    }

    /// Fails `Unprocessable` when the integration does not exist
    pub fn create(
        &self,
        method: &str,
        path: &str,
        integration_id: Uuid,
    ) -> Result<Endpoint, StoreError> {
        self.catalog.integration(integration_id).map_err(|_| {
            StoreError::Unprocessable(format!("integration {integration_id} does not exist"))
        })?;
        let endpoint = Endpoint::new(integration_id, method, path);
        self.catalog.create_endpoint(&endpoint)?;
        tracing::info!(method, path, "created endpoint");
        Ok(endpoint)
    }

    pub fn get(&self, id: Uuid) -> Result<Endpoint, StoreError> {
        self.catalog.endpoint(id)
    }

    pub fn list(&self) -> Result<Vec<Endpoint>, StoreError> {
        self.catalog.endpoints()
    }

    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.catalog.delete_endpoint(id)
    }

    /// Record that this endpoint's payloads conform to the given model
    pub fn attach_model(&self, endpoint_id: Uuid, model_id: Uuid) -> Result<Endpoint, StoreError> {
        self.schema
            .model(model_id)
            .map_err(|_| StoreError::Unprocessable(format!("model {model_id} does not exist")))?;
        let mut endpoint = self.catalog.endpoint(endpoint_id)?;
        endpoint.model_id = Some(model_id);
        endpoint.updated_at = chrono::Utc::now();
        self.catalog.update_endpoint(&endpoint)?;
        tracing::info!(endpoint = %endpoint_id, model = %model_id, "attached model to endpoint");
        Ok(endpoint)
    }

    /// Endpoints that already have an inferred model attached
    pub fn list_with_models(&self) -> Result<Vec<Endpoint>, StoreError> {
        Ok(self
            .catalog
            .endpoints()?
            .into_iter()
            .filter(|e| e.model_id.is_some())
            .collect())
    }
}
