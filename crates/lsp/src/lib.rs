// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent Query LSP - Language Server Protocol
//!
//! This crate provides the LSP server for the embedded query DSL.
//!
//! ## Overview
//!
//! The LSP server provides:
//! - Schema-aware completion inside `base->model->operation([...])` calls
//! - Whole-document query validation published as diagnostics
//! - Multi-document management with incremental synchronization
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Client (VS Code, etc.)          │
//! └──────────────┬──────────────────────────┘
//!                │ LSP Protocol
//!                ↓
//! ┌─────────────────────────────────────────┐
//! │         LSP Backend (tower-lsp)         │
//! ├─────────────────────────────────────────┤
//! │  • did_open / did_change / did_close    │
//! │  • completion / published diagnostics   │
//! └──────────────┬──────────────────────────┘
//!                │
//!         ┌──────┴──────┬────────────────┐
//!         ↓             ↓                ↓
//! ┌────────────┐ ┌──────────┐  ┌──────────────┐
//! │   Config   │ │ Document │  │   Catalog    │
//! │   Engine   │ │   Store  │  │   Manager    │
//! └────────────┘ └──────────┘  └──────────────┘
//! ```
//!
//! ## Configuration
//!
//! The server is configured through client settings:
//!
//! ```json
//! {
//!   "fluentQueryLsp.baseToken": "$db",
//!   "fluentQueryLsp.schemaPath": "/project/schema.json"
//! }
//! ```
//!
//! A missing or malformed schema file degrades gracefully: the catalog is
//! empty, structure-level completions keep working, and nothing crashes.
//!
//! ## Modules
//!
//! - [`backend`]: Main LSP server implementation
//! - [`document`]: Document management and storage
//! - [`completion`]: Candidate rules and rendering
//! - [`diagnostic`]: Validation-to-LSP bridging
//! - [`catalog_manager`]: Schema catalog load/clear lifecycle
//! - [`config`]: Engine configuration and validation

pub mod backend;
pub mod catalog_manager;
pub mod completion;
pub mod config;
pub mod diagnostic;
pub mod document;

// Re-exports for convenience
pub use backend::LspBackend;
pub use catalog_manager::CatalogManager;
pub use completion::{CompletionCandidate, CompletionEngine};
pub use config::{ConfigError, EngineConfig};
pub use diagnostic::{DiagnosticCollector, publish_diagnostics_for_document};
pub use document::{Document, DocumentError, DocumentMetadata, DocumentStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const SERVER_NAME: &str = "fluent-query-lsp";
