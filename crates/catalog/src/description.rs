// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # External schema description format
//!
//! Serde model of the JSON document the catalog is built from:
//!
//! ```json
//! {
//!   "datamodel": {
//!     "models": [
//!       {
//!         "name": "User",
//!         "fields": [
//!           {
//!             "name": "posts", "type": "Post",
//!             "isRequired": false, "hasDefaultValue": false,
//!             "isList": true, "relationName": "PostToUser"
//!           }
//!         ]
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Unknown keys are ignored so the description may carry generator-specific
//! extras without breaking the load.

use serde::Deserialize;

/// Top-level schema description document
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDescription {
    pub datamodel: Datamodel,
}

/// The data model section of the description
#[derive(Debug, Clone, Deserialize)]
pub struct Datamodel {
    #[serde(default)]
    pub models: Vec<ModelDescription>,
}

/// One declared model
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
}

/// One declared field
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub has_default_value: bool,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub relation_name: Option<String>,
}
