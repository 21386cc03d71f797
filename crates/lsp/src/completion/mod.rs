// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion module
//!
//! This module provides schema-aware completion for the query DSL.
//!
//! ## Architecture
//!
//! The completion system is organized into two modules:
//! - `candidates`: the pure rule table from resolved context to suggestions
//! - `render`: converts candidates to LSP completion items
//!
//! ## Flow
//!
//! ```text
//! 1. LSP backend receives a completion request
//!    ↓
//! 2. Document position → byte offset
//!    ↓
//! 3. candidates::resolve_candidates (locate → context → chain → rules)
//!    ↓
//! 4. CompletionRenderer::render
//!    ↓
//! 5. CompletionResponse to the client
//! ```
//!
//! The prefix up to the cursor is re-parsed on every request; there is no
//! tree reuse between keystrokes.

pub mod candidates;
pub mod render;

use tower_lsp::lsp_types::{CompletionItem, Position};

use fluent_query_lsp_catalog::SchemaCatalog;

use crate::completion::candidates::resolve_candidates;
use crate::completion::render::CompletionRenderer;
use crate::document::Document;

pub use crate::completion::candidates::{CandidateKind, CompletionCandidate};

/// Completion engine
///
/// Orchestrates the completion flow from position conversion to rendering.
#[derive(Debug, Default)]
pub struct CompletionEngine;

impl CompletionEngine {
    /// Create a new completion engine
    pub fn new() -> Self {
        Self
    }

    /// Compute completion items at a position
    ///
    /// # Arguments
    ///
    /// * `catalog` - The schema catalog to suggest from
    /// * `document` - The document being completed in
    /// * `position` - The cursor position
    /// * `base_token` - The configured base invocation token
    ///
    /// # Returns
    ///
    /// `None` when the position is invalid or no candidates apply — the
    /// normal outcome outside a recognized query call.
    pub fn complete(
        &self,
        catalog: &SchemaCatalog,
        document: &Document,
        position: Position,
        base_token: &str,
    ) -> Option<Vec<CompletionItem>> {
        let offset = document.byte_offset(position)?;
        let source = document.get_content();
        let candidates = resolve_candidates(catalog, &source, offset, base_token);
        if candidates.is_empty() {
            return None;
        }
        Some(CompletionRenderer::render(candidates))
    }
}
