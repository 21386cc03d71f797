// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent Query LSP - Validation Layer
//!
//! This crate validates whole query calls against the schema catalog and
//! surfaces every finding as a [`Diagnostic`] — never an error. It walks each
//! discovered call's complete argument independent of any cursor position.
//!
//! ## Rules enforced
//!
//! - required root blocks per operation (`findUnique` needs `where`, ...)
//! - `select`/`include` exclusivity per block level
//! - column existence and scalar literal/type consistency
//! - filter-operator vs relation-operator placement inside `where`
//! - boolean-only selection and aggregation leaves
//! - `orderBy` sort directions, `by`/`distinct` column lists, integer and
//!   boolean scalar options
//!
//! ## Usage
//!
//! ```rust
//! use fluent_query_lsp_catalog::SchemaCatalog;
//! use fluent_query_lsp_semantic::QueryValidator;
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
//! let validator = QueryValidator::new(&catalog);
//! let diagnostics =
//!     validator.validate_source("$db->user->findUnique(['select' => ['id' => true]]);", "$db");
//! assert_eq!(diagnostics.len(), 1); // missing 'where'
//! ```

pub mod diagnostic;
pub mod issue;
pub mod validator;

// Re-export commonly used types
pub use diagnostic::{Diagnostic, Severity};
pub use issue::ValidationIssue;
pub use validator::QueryValidator;
