// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog manager
//!
//! This module owns the schema catalog's load/clear lifecycle for the LSP
//! server.
//!
//! The catalog manager is responsible for:
//! - Loading the catalog from the configured schema description file once
//! - Serving the cached `Arc<SchemaCatalog>` to completion and diagnostics
//! - Clearing the cache when the description file changes
//!
//! The cache is guarded by an "already loaded" flag; racing loads are
//! harmless because a load of the same file is idempotent and the last
//! writer wins.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::info;

use fluent_query_lsp_catalog::SchemaCatalog;

/// Cached schema catalog with an explicit load/clear lifecycle
pub struct CatalogManager {
    catalog: RwLock<Arc<SchemaCatalog>>,
    loaded: AtomicBool,
    schema_path: RwLock<Option<PathBuf>>,
}

impl CatalogManager {
    /// Create a manager with an empty catalog and no schema path
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Arc::new(SchemaCatalog::new())),
            loaded: AtomicBool::new(false),
            schema_path: RwLock::new(None),
        }
    }

    /// Point the manager at a schema description file
    ///
    /// Clears the cache so the next access reloads from the new path.
    pub async fn set_schema_path(&self, path: Option<PathBuf>) {
        *self.schema_path.write().await = path;
        self.clear().await;
    }

    /// Get the catalog, loading it on first access
    pub async fn catalog(&self) -> Arc<SchemaCatalog> {
        if !self.loaded.load(Ordering::Acquire) {
            self.reload().await;
        }
        self.catalog.read().await.clone()
    }

    /// Force a reload from the configured schema path
    ///
    /// With no path configured this installs an empty catalog; either way
    /// the manager counts as loaded until the next clear.
    pub async fn reload(&self) {
        let path = self.schema_path.read().await.clone();
        let catalog = match &path {
            Some(path) => SchemaCatalog::load(path).await,
            None => SchemaCatalog::new(),
        };
        *self.catalog.write().await = Arc::new(catalog);
        self.loaded.store(true, Ordering::Release);
    }

    /// Drop the cached catalog; the next access loads afresh
    pub async fn clear(&self) {
        *self.catalog.write().await = Arc::new(SchemaCatalog::new());
        self.loaded.store(false, Ordering::Release);
        info!("schema catalog cache cleared");
    }

    /// Install a prebuilt catalog (tests and tooling)
    pub async fn install(&self, catalog: SchemaCatalog) {
        *self.catalog.write().await = Arc::new(catalog);
        self.loaded.store(true, Ordering::Release);
    }
}

impl Default for CatalogManager {
    fn default() -> Self {
        Self::new()
    }
}
