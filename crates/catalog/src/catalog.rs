// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema catalog
//!
//! The catalog is the pure lookup table at the bottom of the pipeline: a map
//! from lowercased model name to [`ModelMetadata`]. It is built once from the
//! external schema description and is read-only afterwards; the load/clear
//! lifecycle lives with whichever component composes the pipeline.
//!
//! Loading never fails outward. A missing or malformed description file
//! produces an empty catalog and a logged warning; schema-dependent
//! completions and diagnostics then degrade to no-ops.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::description::SchemaDescription;
use crate::error::{CatalogError, CatalogResult};
use crate::metadata::{FieldMetadata, ModelMetadata};

/// Model lookup table built from the external schema description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    /// Lowercased model name → metadata
    models: HashMap<String, ModelMetadata>,
    /// Model names in declaration order (lookup map loses it)
    order: Vec<String>,
}

impl SchemaCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a schema description file
    ///
    /// Never fails: any read or parse problem is logged and yields an empty
    /// catalog, so downstream consumers degrade instead of crashing.
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    models = catalog.len(),
                    "schema catalog loaded"
                );
                catalog
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "schema catalog unavailable, using empty catalog");
                Self::default()
            }
        }
    }

    async fn try_load(path: &Path) -> CatalogResult<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_json(&text)
    }

    /// Build a catalog from schema description JSON text
    pub fn from_json(text: &str) -> CatalogResult<Self> {
        let description: SchemaDescription =
            serde_json::from_str(text).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        Ok(Self::from_description(&description))
    }

    /// Build a catalog from a parsed schema description
    ///
    /// `required` is derived as `isRequired && !hasDefaultValue && no
    /// relationName`; `nullable` as `!isRequired`. The relation predicate is
    /// resolved in a second pass once every model name is known.
    pub fn from_description(description: &SchemaDescription) -> Self {
        let mut models = HashMap::new();
        let mut order = Vec::new();

        for model in &description.datamodel.models {
            let fields = model
                .fields
                .iter()
                .map(|f| FieldMetadata {
                    name: f.name.clone(),
                    field_type: f.field_type.clone(),
                    is_list: f.is_list,
                    nullable: !f.is_required,
                    required: f.is_required && !f.has_default_value && f.relation_name.is_none(),
                    is_relation: false,
                })
                .collect();

            let key = model.name.to_lowercase();
            if models
                .insert(key.clone(), ModelMetadata::new(&model.name).with_fields(fields))
                .is_none()
            {
                order.push(key);
            }
        }

        let known: Vec<String> = models.keys().cloned().collect();
        for model in models.values_mut() {
            for field in &mut model.fields {
                field.is_relation = known.contains(&field.field_type.to_lowercase());
            }
        }

        Self { models, order }
    }

    /// Look up a model by name (case-insensitive)
    pub fn model(&self, name: &str) -> Option<&ModelMetadata> {
        self.models.get(&name.to_lowercase())
    }

    /// Look up a field on a model
    pub fn field(&self, model: &str, field: &str) -> Option<&FieldMetadata> {
        self.model(model)?.field(field)
    }

    /// Resolve a relation field to its target model
    ///
    /// Returns `None` for scalar fields.
    pub fn relation_target(&self, field: &FieldMetadata) -> Option<&ModelMetadata> {
        field.is_relation.then(|| self.model(&field.field_type)).flatten()
    }

    /// Model names in declaration order
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter_map(|key| self.models.get(key))
            .map(|m| m.name.as_str())
    }

    /// Number of models in the catalog
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog holds no models (e.g. after a degraded load)
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "datamodel": {
            "models": [
                {
                    "name": "User",
                    "fields": [
                        {"name": "id", "type": "Int", "isRequired": true, "hasDefaultValue": true, "isList": false},
                        {"name": "name", "type": "String", "isRequired": true, "hasDefaultValue": false, "isList": false},
                        {"name": "bio", "type": "String", "isRequired": false, "hasDefaultValue": false, "isList": false},
                        {"name": "posts", "type": "Post", "isRequired": true, "hasDefaultValue": false, "isList": true, "relationName": "PostToUser"}
                    ]
                },
                {
                    "name": "Post",
                    "fields": [
                        {"name": "id", "type": "Int", "isRequired": true, "hasDefaultValue": true, "isList": false},
                        {"name": "title", "type": "String", "isRequired": true, "hasDefaultValue": false, "isList": false}
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_from_json_builds_models() {
        let catalog = SchemaCatalog::from_json(SCHEMA).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.model("User").is_some());
        assert!(catalog.model("user").is_some());
        assert!(catalog.model("Comment").is_none());
    }

    #[test]
    fn test_required_and_nullable_derivation() {
        let catalog = SchemaCatalog::from_json(SCHEMA).unwrap();
        let user = catalog.model("User").unwrap();

        // id has a default value, so it is not required on create
        let id = user.field("id").unwrap();
        assert!(!id.required);
        assert!(!id.nullable);

        let name = user.field("name").unwrap();
        assert!(name.required);
        assert!(!name.nullable);

        let bio = user.field("bio").unwrap();
        assert!(!bio.required);
        assert!(bio.nullable);

        // relation fields are never required on create
        let posts = user.field("posts").unwrap();
        assert!(!posts.required);
    }

    #[test]
    fn test_relation_predicate_and_target() {
        let catalog = SchemaCatalog::from_json(SCHEMA).unwrap();
        let user = catalog.model("User").unwrap();

        let posts = user.field("posts").unwrap();
        assert!(posts.is_relation);
        assert!(posts.is_list);
        assert_eq!(catalog.relation_target(posts).unwrap().name, "Post");

        let name = user.field("name").unwrap();
        assert!(!name.is_relation);
        assert!(catalog.relation_target(name).is_none());
    }

    #[test]
    fn test_model_names_preserve_declaration_order() {
        let catalog = SchemaCatalog::from_json(SCHEMA).unwrap();
        let names: Vec<_> = catalog.model_names().collect();
        assert_eq!(names, vec!["User", "Post"]);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let result = SchemaCatalog::from_json("{\"datamodel\": 42}");
        assert!(matches!(result, Err(CatalogError::ParseFailed(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file_degrades_to_empty() {
        let catalog = SchemaCatalog::load(Path::new("/nonexistent/schema.json")).await;
        assert!(catalog.is_empty());
    }
}
