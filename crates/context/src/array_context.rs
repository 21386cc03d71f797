// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Array context resolution
//!
//! Given a call's literal-block argument and a cursor offset, this module
//! answers three questions:
//!
//! - which is the **host block** — the deepest literal block containing the
//!   cursor,
//! - is the cursor on an entry's **key** or **value** side,
//! - what is the key **path** from the argument root down to the host block.
//!
//! A short-form entry (no `=>` yet) always counts as a key being typed: an
//! unwritten key is never a value. Keyless list elements are transparent for
//! the path; a non-string-literal key aborts resolution for that branch.

use fluent_query_lsp_syntax::{BlockNode, ValueNode};

/// Which side of an entry the cursor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySide {
    /// Cursor is on an entry key (or a short-form entry)
    Key,
    /// Cursor is on an entry value
    Value,
    /// Cursor is inside the block but on no entry (e.g. after a comma)
    None,
}

/// Resolved cursor context within a call argument
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayContext<'a> {
    /// Deepest literal block containing the cursor
    pub host: &'a BlockNode,
    /// Side of the host entry the cursor is on
    pub entry_side: EntrySide,
    /// String keys traversed from the argument root to the host block
    pub path: Vec<String>,
    /// Key of the host entry holding the cursor, when it has one
    pub entry_key: Option<String>,
}

impl<'a> ArrayContext<'a> {
    /// First path segment, i.e. the root key the cursor is nested under
    pub fn root_key(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Whether the cursor sits directly in the call's root argument block
    pub fn at_root(&self) -> bool {
        self.path.is_empty()
    }
}

/// Resolve the cursor's host block, entry side and key path
///
/// Returns `None` when the offset lies outside the root block or a traversed
/// key is not a string literal.
pub fn resolve_array_context(root: &BlockNode, offset: usize) -> Option<ArrayContext<'_>> {
    if !root.span.contains(offset) {
        return None;
    }
    let mut path = Vec::new();
    let host = descend(root, offset, &mut path)?;
    let (entry_side, entry_key) = classify_entry(host, offset);
    Some(ArrayContext {
        host,
        entry_side,
        path,
        entry_key,
    })
}

/// Walk into the deepest nested block containing the offset, recording
/// string keys along the way.
fn descend<'a>(
    block: &'a BlockNode,
    offset: usize,
    path: &mut Vec<String>,
) -> Option<&'a BlockNode> {
    for entry in &block.entries {
        let ValueNode::Block(inner) = &entry.value else {
            continue;
        };
        if !inner.span.contains_strict(offset) {
            continue;
        }
        return match &entry.key {
            // List elements are transparent for the path
            None => descend(inner, offset, path),
            Some(ValueNode::Str(key)) => {
                path.push(key.value.clone());
                descend(inner, offset, path)
            }
            // A computed or numeric key makes the path meaningless
            Some(_) => None,
        };
    }
    Some(block)
}

/// Classify the cursor against the host block's entries
fn classify_entry(host: &BlockNode, offset: usize) -> (EntrySide, Option<String>) {
    for entry in &host.entries {
        match &entry.key {
            Some(key) => {
                if key.span().contains(offset) {
                    return (EntrySide::Key, entry.key_string().map(str::to_string));
                }
                if entry.value.span().contains(offset) {
                    return (EntrySide::Value, entry.key_string().map(str::to_string));
                }
            }
            // Short-form entry: whatever is being typed is a future key
            None => {
                if entry.value.span().contains(offset) {
                    return (EntrySide::Key, None);
                }
            }
        }
    }
    (EntrySide::None, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_query_lsp_syntax::QueryParser;

    /// Parse `source` (with `|` marking the cursor) and resolve the context
    /// of the first call's argument.
    fn context_at(source_with_cursor: &str) -> Option<(Vec<String>, EntrySide, Option<String>)> {
        let offset = source_with_cursor.find('|').expect("cursor marker");
        let source = source_with_cursor.replacen('|', "", 1);
        let mut parser = QueryParser::new();
        let tree = parser.parse(&source)?;
        let calls = tree.calls("$db", 0);
        let block = calls.first()?.argument_block()?.clone();
        let ctx = resolve_array_context(&block, offset)?;
        Some((ctx.path.clone(), ctx.entry_side, ctx.entry_key.clone()))
    }

    #[test]
    fn test_root_block_key_side() {
        let (path, side, key) =
            context_at("$db->user->findMany(['wh|ere' => ['name' => 'a']]);").unwrap();
        assert!(path.is_empty());
        assert_eq!(side, EntrySide::Key);
        assert_eq!(key.as_deref(), Some("where"));
    }

    #[test]
    fn test_nested_key_side_builds_path() {
        let (path, side, key) =
            context_at("$db->user->findMany(['where' => ['na|me' => 'a']]);").unwrap();
        assert_eq!(path, vec!["where"]);
        assert_eq!(side, EntrySide::Key);
        assert_eq!(key.as_deref(), Some("name"));
    }

    #[test]
    fn test_value_side() {
        let (path, side, key) =
            context_at("$db->user->findMany(['orderBy' => ['name' => 'a|sc']]);").unwrap();
        assert_eq!(path, vec!["orderBy"]);
        assert_eq!(side, EntrySide::Value);
        assert_eq!(key.as_deref(), Some("name"));
    }

    #[test]
    fn test_short_form_entry_is_key_side() {
        let (path, side, key) =
            context_at("$db->user->findMany(['where' => ['se|']]);").unwrap();
        assert_eq!(path, vec!["where"]);
        assert_eq!(side, EntrySide::Key);
        assert_eq!(key, None);
    }

    #[test]
    fn test_list_entries_are_transparent() {
        let (path, side, _) = context_at(
            "$db->user->findMany(['where' => ['AND' => [['na|me' => 'a']]]]);",
        )
        .unwrap();
        assert_eq!(path, vec!["where", "AND"]);
        assert_eq!(side, EntrySide::Key);
    }

    #[test]
    fn test_deep_path() {
        let (path, _, key) = context_at(
            "$db->user->findMany(['include' => ['posts' => ['select' => ['tit|le' => true]]]]);",
        )
        .unwrap();
        assert_eq!(path, vec!["include", "posts", "select"]);
        assert_eq!(key.as_deref(), Some("title"));
    }

    #[test]
    fn test_empty_nested_block_has_no_entry() {
        let (path, side, key) =
            context_at("$db->user->findMany(['where' => [|]]);").unwrap();
        assert_eq!(path, vec!["where"]);
        assert_eq!(side, EntrySide::None);
        assert_eq!(key, None);
    }

    #[test]
    fn test_non_string_key_aborts() {
        let source = "$db->user->findMany([$key => ['na|me' => 'a']]);";
        assert!(context_at(source).is_none());
    }

    #[test]
    fn test_offset_outside_root_block() {
        let source = "$db->user->findMany(['take' => 1]);| ";
        assert!(context_at(source).is_none());
    }
}
