// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for catalog operations
//!
//! This module defines the error types used throughout the catalog layer.
//! Callers on the hot path never see these: loading degrades to an empty
//! catalog, and lookups return `Option`.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while building a catalog
#[derive(Debug, Error, Clone, Serialize)]
pub enum CatalogError {
    /// The schema description file could not be read
    #[error("Failed to read schema description '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    /// The schema description was not valid JSON of the expected shape
    #[error("Failed to parse schema description: {0}")]
    ParseFailed(String),
}
