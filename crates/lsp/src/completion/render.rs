// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion rendering
//!
//! Converts [`CompletionCandidate`] values to LSP completion items. The
//! candidate's table order is preserved through `sort_text` so the client
//! does not reorder schema-derived suggestions alphabetically.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use crate::completion::candidates::{CandidateKind, CompletionCandidate};

/// Renderer for completion candidates
pub struct CompletionRenderer;

impl CompletionRenderer {
    /// Render candidates into LSP completion items
    pub fn render(candidates: Vec<CompletionCandidate>) -> Vec<CompletionItem> {
        candidates.into_iter().map(Self::render_one).collect()
    }

    fn render_one(candidate: CompletionCandidate) -> CompletionItem {
        CompletionItem {
            label: candidate.label,
            kind: Some(match candidate.kind {
                CandidateKind::Field => CompletionItemKind::FIELD,
                CandidateKind::Keyword => CompletionItemKind::KEYWORD,
                CandidateKind::Literal => CompletionItemKind::VALUE,
            }),
            detail: candidate.documentation,
            sort_text: Some(format!("{:04}", candidate.sort_rank)),
            insert_text: Some(candidate.insert_text),
            ..CompletionItem::default()
        }
    }
}
