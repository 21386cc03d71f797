// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Mock catalog builder
//!
//! Builds a [`SchemaCatalog`] from terse `(name, type)` tuples so tests do
//! not need to spell out JSON descriptions. A small type syntax mirrors the
//! schema language:
//!
//! - `"Post[]"` — list field of type `Post`
//! - `"String?"` — optional (nullable) field
//! - anything naming another declared model becomes a relation, exactly as
//!   the real loader derives it

use fluent_query_lsp_catalog::{
    Datamodel, FieldDescription, ModelDescription, SchemaCatalog, SchemaDescription,
};

/// Builder for test catalogs
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    models: Vec<ModelDescription>,
}

impl MockCatalogBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model from `(field_name, type)` tuples
    pub fn with_model(mut self, name: &str, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(field_name, spec)| {
                let (base, is_list, nullable) = parse_type_spec(spec);
                FieldDescription {
                    name: (*field_name).to_string(),
                    field_type: base.to_string(),
                    is_required: !nullable,
                    has_default_value: *field_name == "id",
                    is_list,
                    relation_name: None,
                }
            })
            .collect();
        self.models.push(ModelDescription {
            name: name.to_string(),
            fields,
        });
        self
    }

    /// Build the catalog
    pub fn build(mut self) -> SchemaCatalog {
        // Mark relation fields so `required` derives the way the loader does.
        let model_names: Vec<String> = self.models.iter().map(|m| m.name.to_lowercase()).collect();
        for model in &mut self.models {
            for field in &mut model.fields {
                if model_names.contains(&field.field_type.to_lowercase()) {
                    field.relation_name = Some(format!("{}Relation", field.name));
                }
            }
        }
        SchemaCatalog::from_description(&SchemaDescription {
            datamodel: Datamodel {
                models: self.models,
            },
        })
    }
}

/// Split a type spec into (base type, is_list, nullable)
fn parse_type_spec(spec: &str) -> (&str, bool, bool) {
    if let Some(base) = spec.strip_suffix("[]") {
        (base, true, false)
    } else if let Some(base) = spec.strip_suffix('?') {
        (base, false, true)
    } else {
        (spec, false, false)
    }
}
