//! In-process store backed by hash maps

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::{CatalogStore, MappingStore, SchemaStore, StoreError};
use crate::models::{
    Category, Domain, Endpoint, Field, FieldMap, Integration, Map, Model, ModelMap, Transformer,
};

/// In-memory store implementing every store trait
///
/// All writes take the single write lock, so the multi-row schema tree
/// insert is atomic with respect to concurrent readers.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    models: HashMap<Uuid, Model>,
    fields: HashMap<Uuid, Field>,
    maps: HashMap<Uuid, Map>,
    model_maps: HashMap<Uuid, ModelMap>,
    field_maps: HashMap<Uuid, FieldMap>,
    transformers: HashMap<Uuid, Transformer>,
    categories: HashMap<Uuid, Category>,
    integrations: HashMap<Uuid, Integration>,
    domains: HashMap<Uuid, Domain>,
    endpoints: HashMap<Uuid, Endpoint>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn check_field_unique(&self, field: &Field) -> Result<(), StoreError> {
        if !self.models.contains_key(&field.model_id) {
            return Err(StoreError::Unprocessable(format!(
                "model {} for field '{}' does not exist",
                field.model_id, field.name
            )));
        }
        let duplicate = self
            .fields
            .values()
            .any(|f| f.model_id == field.model_id && f.name == field.name && f.id != field.id);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "field '{}' on model {}",
                field.name, field.model_id
            )));
        }
        Ok(())
    }
}

impl SchemaStore for MemoryStore {
    fn insert_model(&self, model: &Model) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        inner.models.insert(model.id, model.clone());
        Ok(())
    }

    fn model(&self, id: Uuid) -> Result<Model, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .models
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("model {id}")))
    }

    fn insert_field(&self, field: &Field) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        inner.check_field_unique(field)?;
        inner.fields.insert(field.id, field.clone());
        Ok(())
    }

    fn update_field(&self, field: &Field) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.fields.contains_key(&field.id) {
            return Err(StoreError::NotFound(format!("field {}", field.id)));
        }
        inner.fields.insert(field.id, field.clone());
        Ok(())
    }

    fn field(&self, id: Uuid) -> Result<Field, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .fields
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("field {id}")))
    }

    fn fields_of_model(&self, model_id: Uuid) -> Result<Vec<Field>, StoreError> {
        let inner = self.inner.read().unwrap();
        if !inner.models.contains_key(&model_id) {
            return Err(StoreError::NotFound(format!("model {model_id}")));
        }
        let mut fields: Vec<Field> = inner
            .fields
            .values()
            .filter(|f| f.model_id == model_id)
            .cloned()
            .collect();
        fields.sort_by_key(|f| f.position);
        Ok(fields)
    }

    fn insert_schema_tree(&self, models: &[Model], fields: &[Field]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        // Validate the whole batch against existing data before any write
        for field in fields {
            let owned_by_batch = models.iter().any(|m| m.id == field.model_id);
            if !owned_by_batch {
                inner.check_field_unique(field)?;
            }
            let duplicate_in_batch = fields
                .iter()
                .any(|f| f.model_id == field.model_id && f.name == field.name && f.id != field.id);
            if duplicate_in_batch {
                return Err(StoreError::AlreadyExists(format!(
                    "field '{}' on model {}",
                    field.name, field.model_id
                )));
            }
        }
        for model in models {
            inner.models.insert(model.id, model.clone());
        }
        for field in fields {
            inner.fields.insert(field.id, field.clone());
        }
        Ok(())
    }
}

impl MappingStore for MemoryStore {
    fn create_map(&self, map: &Map) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner.maps.values().any(|m| {
            m.source_model_id == map.source_model_id && m.target_model_id == map.target_model_id
        });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "map from {} to {}",
                map.source_model_id, map.target_model_id
            )));
        }
        inner.maps.insert(map.id, map.clone());
        Ok(())
    }

    fn map(&self, id: Uuid) -> Result<Map, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .maps
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("map {id}")))
    }

    fn create_model_map(&self, model_map: &ModelMap) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner.model_maps.values().any(|m| {
            m.map_id == model_map.map_id
                && m.source_model_id == model_map.source_model_id
                && m.target_model_id == model_map.target_model_id
        });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "model map from {} to {} under map {}",
                model_map.source_model_id, model_map.target_model_id, model_map.map_id
            )));
        }
        inner.model_maps.insert(model_map.id, model_map.clone());
        Ok(())
    }

    fn create_field_map(&self, field_map: &FieldMap) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner.field_maps.values().any(|m| {
            m.map_id == field_map.map_id
                && m.source_field_id == field_map.source_field_id
                && m.target_field_id == field_map.target_field_id
        });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "field map from {} to {} under map {}",
                field_map.source_field_id, field_map.target_field_id, field_map.map_id
            )));
        }
        inner.field_maps.insert(field_map.id, field_map.clone());
        Ok(())
    }

    fn field_map_for_source(
        &self,
        map_id: Uuid,
        source_field_id: Uuid,
    ) -> Result<FieldMap, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .field_maps
            .values()
            .find(|m| m.map_id == map_id && m.source_field_id == source_field_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "field map for source field {source_field_id} under map {map_id}"
                ))
            })
    }

    fn field_maps_of_map(&self, map_id: Uuid) -> Result<Vec<FieldMap>, StoreError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .field_maps
            .values()
            .filter(|m| m.map_id == map_id)
            .cloned()
            .collect())
    }

    fn create_transformer(&self, transformer: &Transformer) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        inner.transformers.insert(transformer.id, transformer.clone());
        Ok(())
    }

    fn transformer(&self, id: Uuid) -> Result<Transformer, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .transformers
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("transformer {id}")))
    }
}

impl CatalogStore for MemoryStore {
    fn create_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if inner.categories.values().any(|c| c.name == category.name) {
            return Err(StoreError::AlreadyExists(format!(
                "category '{}'",
                category.name
            )));
        }
        inner.categories.insert(category.id, category.clone());
        Ok(())
    }

    fn category(&self, id: Uuid) -> Result<Category, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("category {id}")))
    }

    fn category_by_name(&self, name: &str) -> Result<Category, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("category '{name}'")))
    }

    fn create_integration(&self, integration: &Integration) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner
            .integrations
            .values()
            .any(|i| i.name == integration.name && i.category_id == integration.category_id);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "integration '{}' in category {}",
                integration.name, integration.category_id
            )));
        }
        inner.integrations.insert(integration.id, integration.clone());
        Ok(())
    }

    fn integration(&self, id: Uuid) -> Result<Integration, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .integrations
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("integration {id}")))
    }

    fn integration_by_name(
        &self,
        name: &str,
        category_id: Uuid,
    ) -> Result<Integration, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .integrations
            .values()
            .find(|i| i.name == name && i.category_id == category_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::NotFound(format!("integration '{name}' in category {category_id}"))
            })
    }

    fn create_domain(&self, domain: &Domain) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner
            .domains
            .values()
            .any(|d| d.integration_id == domain.integration_id && d.domain == domain.domain);
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "domain '{}' on integration {}",
                domain.domain, domain.integration_id
            )));
        }
        inner.domains.insert(domain.id, domain.clone());
        Ok(())
    }

    fn create_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        let duplicate = inner.endpoints.values().any(|e| {
            e.integration_id == endpoint.integration_id
                && e.path == endpoint.path
                && e.method == endpoint.method
        });
        if duplicate {
            return Err(StoreError::AlreadyExists(format!(
                "endpoint {} {} on integration {}",
                endpoint.method, endpoint.path, endpoint.integration_id
            )));
        }
        inner.endpoints.insert(endpoint.id, endpoint.clone());
        Ok(())
    }

    fn endpoint(&self, id: Uuid) -> Result<Endpoint, StoreError> {
        let inner = self.inner.read().unwrap();
        inner
            .endpoints
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("endpoint {id}")))
    }

    fn update_endpoint(&self, endpoint: &Endpoint) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if !inner.endpoints.contains_key(&endpoint.id) {
            return Err(StoreError::NotFound(format!("endpoint {}", endpoint.id)));
        }
        inner.endpoints.insert(endpoint.id, endpoint.clone());
        Ok(())
    }

    fn delete_endpoint(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        inner
            .endpoints
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("endpoint {id}")))
    }

    fn endpoints(&self) -> Result<Vec<Endpoint>, StoreError> {
        let inner = self.inner.read().unwrap();
        let mut endpoints: Vec<Endpoint> = inner.endpoints.values().cloned().collect();
        endpoints.sort_by_key(|e| e.created_at);
        Ok(endpoints)
    }
}
