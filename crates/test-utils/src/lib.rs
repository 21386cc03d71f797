// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent Query LSP - Test Utilities
//!
//! Shared helpers for the workspace's test suites:
//!
//! - [`MockCatalogBuilder`]: build schema catalogs from `(name, type)` tuples
//! - [`fixtures`]: the blog-shaped catalog and cursor-marker helpers

pub mod fixtures;
pub mod mock_catalog;

// Re-exports
pub use fixtures::{BLOG_SCHEMA_JSON, blog_catalog, cursor_marker};
pub use mock_catalog::MockCatalogBuilder;
