// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent Query LSP - Catalog Layer
//!
//! This crate provides the schema catalog: a model→field→type lookup table
//! built from an externally supplied JSON schema description.
//!
//! ## Architecture
//!
//! The catalog layer is responsible for:
//! - Digesting the schema description format (`datamodel.models[].fields[]`)
//! - Deriving per-field facts once (`required`, `nullable`, `is_relation`)
//! - Degrading to an empty catalog on any load failure, never crashing
//!
//! ## Metadata Types
//!
//! - [`ModelMetadata`]: one model with its ordered field list
//! - [`FieldMetadata`]: field name, declared type, and derived facts
//!
//! ## Usage
//!
//! ```rust
//! use fluent_query_lsp_catalog::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::from_json(
//!     r#"{"datamodel": {"models": [
//!         {"name": "User", "fields": [
//!             {"name": "id", "type": "Int", "isRequired": true}
//!         ]}
//!     ]}}"#,
//! )
//! .unwrap();
//!
//! let user = catalog.model("user").unwrap();
//! assert!(user.field("id").unwrap().is_scalar());
//! ```

pub mod catalog;
pub mod description;
pub mod error;
pub mod metadata;

// Re-exports
pub use catalog::SchemaCatalog;
pub use description::{Datamodel, FieldDescription, ModelDescription, SchemaDescription};
pub use error::{CatalogError, CatalogResult};
pub use metadata::{FieldMetadata, ModelMetadata};
