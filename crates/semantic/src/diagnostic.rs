// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostic value types
//!
//! Validation findings are plain values with byte spans; the LSP layer
//! converts them to protocol positions. Validation never throws: every rule
//! violation becomes a [`Diagnostic`] and the walk continues.

use fluent_query_lsp_syntax::Span;

use crate::issue::ValidationIssue;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Byte range the finding is anchored to
    pub span: Span,
    /// Human-readable message
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Create a diagnostic from a validation issue at a span
    pub fn from_issue(span: Span, issue: ValidationIssue) -> Self {
        Self {
            span,
            severity: issue.severity(),
            message: issue.to_string(),
        }
    }
}
