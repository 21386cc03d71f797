// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! This module provides the main LSP server backend using tower-lsp.
//!
//! ## Overview
//!
//! The backend handles:
//! - LSP protocol communication via tower-lsp
//! - Document lifecycle (open, change, close)
//! - Completion requests inside recognized query calls
//! - Whole-document diagnostics on open, change and save
//!
//! ## Architecture
//!
//! ```text
//! Client → LSP Backend → Document Store
//!                ↓
//!         Catalog Manager ← schema description file
//!                ↓
//!     Completion Engine / Diagnostic Collector
//! ```

use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{info, warn};

use crate::catalog_manager::CatalogManager;
use crate::completion::CompletionEngine;
use crate::config::EngineConfig;
use crate::diagnostic::{DiagnosticCollector, publish_diagnostics_for_document};
use crate::document::DocumentStore;

/// LSP backend implementation
///
/// Main entry point for all LSP protocol operations.
/// Uses the tower-lsp framework for protocol handling.
pub struct LspBackend {
    /// LSP client for sending notifications and requests
    client: Client,

    /// Document store for managing open documents
    documents: Arc<DocumentStore>,

    /// Engine configuration
    config: Arc<RwLock<EngineConfig>>,

    /// Schema catalog lifecycle
    catalog: Arc<CatalogManager>,

    /// Completion engine
    completion: CompletionEngine,

    /// Diagnostic collector
    diagnostics: DiagnosticCollector,
}

impl LspBackend {
    /// Create a new LSP backend
    ///
    /// # Arguments
    ///
    /// - `client`: LSP client handle
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            config: Arc::new(RwLock::new(EngineConfig::default())),
            catalog: Arc::new(CatalogManager::new()),
            completion: CompletionEngine::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Get the document store
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Apply a configuration payload from the client
    async fn apply_settings(&self, settings: &serde_json::Value) {
        let Some(config) = EngineConfig::from_lsp_settings(settings) else {
            return;
        };
        if let Err(err) = config.validate() {
            warn!(%err, "rejecting client configuration");
            self.client
                .log_message(MessageType::WARNING, err.to_string())
                .await;
            return;
        }
        info!(base_token = %config.base_token, "engine configuration updated");
        let schema_path = config.schema_path.clone();
        *self.config.write().await = config;
        self.catalog.set_schema_path(schema_path).await;
    }

    /// Run a diagnostic pass over one document and publish the result
    async fn refresh_diagnostics(&self, uri: Url) {
        let Some(document) = self.documents.get_document(&uri).await else {
            return;
        };
        let catalog = self.catalog.catalog().await;
        let base_token = self.config.read().await.base_token.clone();
        publish_diagnostics_for_document(
            &self.diagnostics,
            &self.client,
            uri,
            &document,
            &catalog,
            &base_token,
        )
        .await;
    }

    /// Re-publish diagnostics for every open document
    async fn refresh_all_diagnostics(&self) {
        for uri in self.documents.list_uris().await {
            self.refresh_diagnostics(uri).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspBackend {
    /// Initialize the LSP server
    ///
    /// Called when the client starts the server.
    /// Returns server capabilities and configuration.
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("initializing LSP server");

        if let Some(options) = &params.initialization_options {
            self.apply_settings(options).await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Text synchronization
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),

                // Completion fires right after a quote character opens a key
                // or value inside a call argument
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec!["'".to_string(), "\"".to_string()]),
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: Some(false),
                    },
                    all_commit_characters: None,
                    completion_item: None,
                }),

                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: crate::SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    /// Initialized notification
    ///
    /// Called after `initialize` completes successfully.
    async fn initialized(&self, _params: InitializedParams) {
        info!("LSP server initialized");
        // Warm the catalog so the first completion request does not pay for
        // the schema load
        let catalog = self.catalog.catalog().await;
        if catalog.is_empty() {
            self.client
                .log_message(
                    MessageType::INFO,
                    "No schema loaded; completions are limited to query structure",
                )
                .await;
        }
    }

    /// Shutdown the LSP server
    async fn shutdown(&self) -> Result<()> {
        info!("shutting down LSP server");
        Ok(())
    }

    /// Document opened notification
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents
            .open_document(doc.uri.clone(), doc.text, doc.version, doc.language_id)
            .await;
        self.refresh_diagnostics(doc.uri).await;
    }

    /// Document changed notification
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Err(err) = self
            .documents
            .update_document(&params.text_document, &params.content_changes)
            .await
        {
            warn!(%err, uri = %params.text_document.uri, "failed to apply document changes");
            return;
        }
        self.refresh_diagnostics(params.text_document.uri).await;
    }

    /// Document saved notification
    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.refresh_diagnostics(params.text_document.uri).await;
    }

    /// Document closed notification
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.close_document(&uri).await;
        // Clear any published diagnostics for the closed document
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    /// Configuration change notification
    ///
    /// A changed schema path clears the catalog cache; diagnostics for all
    /// open documents are recomputed against the new schema.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_settings(&params.settings).await;
        self.refresh_all_diagnostics().await;
    }

    /// Completion request
    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(document) = self.documents.get_document(&uri).await else {
            return Ok(None);
        };
        let catalog = self.catalog.catalog().await;
        let base_token = self.config.read().await.base_token.clone();

        let items = self
            .completion
            .complete(&catalog, &document, position, &base_token);
        Ok(items.map(CompletionResponse::Array))
    }
}
