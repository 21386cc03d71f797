// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Call-site locator
//!
//! Finds the query invocation relevant to a request. Two modes:
//!
//! - [`locate_call_at`]: completion-time. Takes the textual prefix up to the
//!   cursor, finds the last occurrence of the base invocation token, balances
//!   and parses that suffix alone, and picks the first call with a recognized
//!   operation. The suffix is bounded, so this is cheap enough to run on
//!   every keystroke.
//! - [`discover_calls`]: validation-time. Parses the whole document and
//!   returns every recognized call.
//!
//! `None` / empty results are the normal not-inside-a-query outcome, never an
//! error.

use tracing::debug;

use fluent_query_lsp_syntax::{CallExpr, QueryParser, balance_snippet};

use crate::operations::is_operation;

/// Locate the query call enclosing the cursor
///
/// # Arguments
///
/// * `source` - Full document text
/// * `offset` - Cursor byte offset
/// * `base_token` - Base invocation token, sigil included (e.g. `$db`)
pub fn locate_call_at(source: &str, offset: usize, base_token: &str) -> Option<CallExpr> {
    let offset = offset.min(source.len());
    let prefix = &source[..offset];
    let start = prefix.rfind(base_token)?;
    let snippet = balance_snippet(&prefix[start..]);

    let mut parser = QueryParser::new();
    let tree = parser.parse(&snippet)?;

    let call = tree
        .calls(base_token, start)
        .into_iter()
        .find(|call| is_operation(&call.operation));
    if call.is_none() {
        debug!(offset, "no recognized query call in suffix");
    }
    call
}

/// Discover every recognized query call in a document
pub fn discover_calls(source: &str, base_token: &str) -> Vec<CallExpr> {
    let mut parser = QueryParser::new();
    let Some(tree) = parser.parse(source) else {
        return Vec::new();
    };
    tree.calls(base_token, 0)
        .into_iter()
        .filter(|call| is_operation(&call.operation))
        .collect()
}
