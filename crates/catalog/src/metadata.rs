// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for schema information
//!
//! This module defines the types that represent models and their fields once
//! the external schema description has been digested. The key derived fact is
//! [`FieldMetadata::is_relation`]: a field is a relation iff its declared
//! type names another model in the catalog. That predicate is computed once
//! at catalog construction so completion and validation can never disagree
//! about it.

use serde::{Deserialize, Serialize};

/// Metadata for a single model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Field name
    pub name: String,
    /// Declared type: a scalar type name (`Int`, `String`, ...) or another
    /// model's name
    pub field_type: String,
    /// Whether the field is a list (`Post[]`)
    pub is_list: bool,
    /// Whether the field accepts an explicit null
    pub nullable: bool,
    /// Whether a value must be supplied on create (required, no default,
    /// not a relation)
    pub required: bool,
    /// Whether `field_type` names another model in the catalog
    pub is_relation: bool,
}

impl FieldMetadata {
    /// Create a scalar, non-nullable field
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            is_list: false,
            nullable: false,
            required: false,
            is_relation: false,
        }
    }

    /// Builder method: mark as a list
    pub fn with_list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Builder method: mark as nullable
    pub fn with_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Builder method: mark as required on create
    pub fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether the field is scalar (not a relation)
    pub fn is_scalar(&self) -> bool {
        !self.is_relation
    }
}

/// Metadata for a model: an ordered field list with by-name lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    /// Model name as declared in the schema description
    pub name: String,
    /// Field definitions in declaration order
    pub fields: Vec<FieldMetadata>,
}

impl ModelMetadata {
    /// Create new model metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder method: set fields
    pub fn with_fields(mut self, fields: Vec<FieldMetadata>) -> Self {
        self.fields = fields;
        self
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with this name exists
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Iterate over relation fields in declaration order
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|f| f.is_relation)
    }

    /// Iterate over scalar fields in declaration order
    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|f| !f.is_relation)
    }
}
