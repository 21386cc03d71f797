// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Validation issue catalog
//!
//! Every rule the validator enforces has one variant here; the `Display`
//! implementations are the user-facing diagnostic messages. Keeping them in
//! one enum keeps wording consistent across the engine.

use thiserror::Error;

use crate::diagnostic::Severity;

/// All findings the validator can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A mandatory root block is absent for this operation
    #[error("'{operation}()' requires a '{block}' block")]
    MissingRequiredBlock { operation: String, block: String },

    /// `select` and `include` used at the same block level
    #[error("'select' and 'include' cannot be used at the same level")]
    SelectIncludeExclusive,

    /// Key does not name a column of the model in scope
    #[error("Column '{column}' does not exist on model '{model}'")]
    UnknownColumn { column: String, model: String },

    /// Literal shape contradicts the column's declared type
    #[error("Column '{column}' expects {expected}")]
    TypeMismatch { column: String, expected: String },

    /// Explicit null on a column that does not accept one
    #[error("Column '{column}' is not nullable")]
    NotNullable { column: String },

    /// Unrecognized key inside a scalar filter block
    #[error("'{operator}' is not a valid filter operator")]
    InvalidOperator { operator: String },

    /// Relation operator applied to a scalar column
    #[error("Relation operator '{operator}' cannot be used on scalar column '{column}'")]
    RelationOperatorOnScalar { operator: String, column: String },

    /// Filter operator applied to a relation column
    #[error("Column '{column}' is a relation; use 'every', 'none' or 'some'")]
    RelationNeedsQuantifier { column: String },

    /// `in`/`notIn` used without an array-shaped value
    #[error("'{operator}' expects an array value")]
    ExpectsArray { operator: String },

    /// `orderBy` value other than the two sort directions
    #[error("orderBy expects 'asc' or 'desc'")]
    InvalidSortDirection,

    /// Non-boolean leaf inside a `select`/`include`/`omit` block
    #[error("Selection for '{column}' must be a boolean")]
    NonBooleanSelection { column: String },

    /// Scalar column listed inside `include`
    #[error("Only relation columns can be included; '{column}' is a scalar")]
    IncludeScalar { column: String },

    /// `_count` block with a key other than `select`
    #[error("Only 'select' is valid inside '_count'")]
    CountOnlySelect,

    /// `by`/`distinct` value that is not an array of column names
    #[error("'{key}' expects an array of column names")]
    ExpectsColumnList { key: String },

    /// Root key whose value must be an integer literal
    #[error("'{key}' expects Int")]
    ExpectsInt { key: String },

    /// Root key whose value must be a boolean literal
    #[error("'{key}' expects true or false")]
    ExpectsBoolean { key: String },

    /// Root key that is not part of the operation's schema
    #[error("Unknown option '{key}' for '{operation}()'")]
    UnknownOption { key: String, operation: String },
}

impl ValidationIssue {
    /// Severity this issue surfaces with
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::UnknownOption { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
