// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Engine Configuration
//!
//! This module provides configuration management for the LSP engine.
//!
//! ## Configuration Structure
//!
//! The engine configuration includes:
//! - The base invocation token the query DSL hangs off (default `$db`)
//! - The path to the external schema description file
//!
//! ## Example
//!
//! Client settings payload:
//!
//! ```json
//! {
//!   "fluentQueryLsp": {
//!     "baseToken": "$db",
//!     "schemaPath": "/project/schema.json"
//!   }
//! }
//! ```

use serde_json::Value;
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base invocation token, sigil included
    pub base_token: String,

    /// Path to the schema description file, once the client has told us
    pub schema_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_token: "$db".to_string(),
            schema_path: None,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration
    ///
    /// Checks that the base token looks like a host-language variable; an
    /// arbitrary token would make call recognition misfire on plain text.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_token.starts_with('$') || self.base_token.len() < 2 {
            return Err(ConfigError::InvalidBaseToken {
                token: self.base_token.clone(),
            });
        }
        Ok(())
    }

    /// Parse engine config from an LSP client settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "fluentQueryLsp": {
    ///     "baseToken": "$db",
    ///     "schemaPath": "/abs/path/schema.json"
    ///   }
    /// }
    ///
    /// Missing keys fall back to defaults; a missing section returns `None`
    /// so callers can keep their current configuration.
    pub fn from_lsp_settings(settings: &Value) -> Option<Self> {
        let section = settings.get("fluentQueryLsp")?;

        let base_token = section
            .get("baseToken")
            .and_then(Value::as_str)
            .unwrap_or("$db")
            .to_string();

        let schema_path = section
            .get("schemaPath")
            .and_then(Value::as_str)
            .map(PathBuf::from);

        Some(Self {
            base_token,
            schema_path,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Base token is not a host-language variable
    #[error("Invalid base token '{token}': expected a variable like '$db'")]
    InvalidBaseToken { token: String },
}
