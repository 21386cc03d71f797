// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostics Infrastructure
//!
//! This module bridges the validation engine to the LSP protocol.
//!
//! ## Overview
//!
//! The diagnostics system handles:
//! - Running the validator over whole documents
//! - Converting byte-span findings to LSP ranges
//! - Publishing diagnostics to clients, replacing any prior list
//!
//! ## Architecture
//!
//! ```text
//! Document → QueryValidator → semantic::Diagnostic → LSP Diagnostic → Client
//! ```
//!
//! Each pass re-parses and re-walks the whole document; passes are
//! idempotent and side-effect-free, so repeated runs are safe to re-issue.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Url};
use tracing::debug;

use fluent_query_lsp_catalog::SchemaCatalog;
use fluent_query_lsp_semantic::{QueryValidator, Severity};

use crate::document::Document;

/// Source tag attached to every published diagnostic
const DIAGNOSTIC_SOURCE: &str = "fluent-query-lsp";

/// Diagnostic collector
///
/// Runs whole-document validation and converts findings to LSP format.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollector;

impl DiagnosticCollector {
    /// Create a new diagnostic collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect diagnostics for a document
    ///
    /// # Arguments
    ///
    /// - `document`: The document to validate
    /// - `catalog`: The schema catalog to validate against
    /// - `base_token`: The configured base invocation token
    pub fn collect_diagnostics(
        &self,
        document: &Document,
        catalog: &SchemaCatalog,
        base_token: &str,
    ) -> Vec<Diagnostic> {
        let source = document.get_content();
        let validator = QueryValidator::new(catalog);
        let findings = validator.validate_source(&source, base_token);

        debug!(
            uri = %document.uri(),
            count = findings.len(),
            "collected diagnostics"
        );

        findings
            .into_iter()
            .map(|finding| Diagnostic {
                range: document.range_of(finding.span),
                severity: Some(match finding.severity {
                    Severity::Error => DiagnosticSeverity::ERROR,
                    Severity::Warning => DiagnosticSeverity::WARNING,
                }),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message: finding.message,
                ..Diagnostic::default()
            })
            .collect()
    }
}

/// Validate a document and publish the result to the client
///
/// Publishing replaces the document's previous diagnostic list; an empty
/// list clears it.
///
/// # Returns
///
/// The number of diagnostics published
pub async fn publish_diagnostics_for_document(
    collector: &DiagnosticCollector,
    client: &tower_lsp::Client,
    uri: Url,
    document: &Document,
    catalog: &SchemaCatalog,
    base_token: &str,
) -> usize {
    let diagnostics = collector.collect_diagnostics(document, catalog, base_token);
    let count = diagnostics.len();
    client
        .publish_diagnostics(uri, diagnostics, Some(document.version()))
        .await;
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_query_lsp_test_utils::blog_catalog;

    fn document(content: &str) -> Document {
        Document::new(
            Url::parse("file:///test.php").unwrap(),
            content.to_string(),
            1,
            "php".to_string(),
        )
    }

    #[test]
    fn test_collect_converts_spans_to_ranges() {
        let doc = document("<?php\n$db->user->findMany(['where' => ['nmae' => 'x']]);\n");
        let catalog = blog_catalog();
        let diagnostics = DiagnosticCollector::new().collect_diagnostics(&doc, &catalog, "$db");

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diagnostic.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
        assert!(diagnostic.message.contains("does not exist"));
        // The finding anchors to the 'nmae' key on line 1
        assert_eq!(diagnostic.range.start.line, 1);
        assert!(diagnostic.range.start.character > 0);
    }

    #[test]
    fn test_collect_clean_document_is_empty() {
        let doc = document("<?php\n$db->user->findMany(['take' => 5]);\n");
        let catalog = blog_catalog();
        let diagnostics = DiagnosticCollector::new().collect_diagnostics(&doc, &catalog, "$db");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_collect_with_empty_catalog_skips_schema_rules() {
        let doc = document("<?php\n$db->user->findMany(['where' => ['nmae' => 'x']]);\n");
        let catalog = SchemaCatalog::new();
        let diagnostics = DiagnosticCollector::new().collect_diagnostics(&doc, &catalog, "$db");
        assert!(diagnostics.is_empty());
    }
}
