// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end tests of the context pipeline: locate a call around a cursor,
//! resolve the array context, and walk the relation chain against a catalog.

use fluent_query_lsp_catalog::SchemaCatalog;
use fluent_query_lsp_context::{
    ChainOperation, EntrySide, locate_call_at, resolve_array_context, resolve_relation_chain,
};

fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_json(
        r#"{"datamodel": {"models": [
            {"name": "User", "fields": [
                {"name": "id", "type": "Int", "isRequired": true},
                {"name": "name", "type": "String", "isRequired": true},
                {"name": "posts", "type": "Post", "isList": true, "relationName": "PostToUser"}
            ]},
            {"name": "Post", "fields": [
                {"name": "id", "type": "Int", "isRequired": true},
                {"name": "title", "type": "String", "isRequired": true}
            ]}
        ]}}"#,
    )
    .unwrap()
}

/// Split a source with a `|` cursor marker into (source, offset).
fn with_cursor(marked: &str) -> (String, usize) {
    let offset = marked.find('|').expect("cursor marker");
    (marked.replacen('|', "", 1), offset)
}

#[test]
fn resolves_chain_for_half_typed_nested_selection() {
    let (source, offset) =
        with_cursor("<?php\n$db->user->findMany(['include' => ['posts' => ['select' => ['|");
    let call = locate_call_at(&source, offset, "$db").unwrap();
    assert_eq!(call.operation, "findMany");

    let block = call.argument_block().unwrap();
    let ctx = resolve_array_context(block, offset).unwrap();
    assert_eq!(ctx.path, vec!["include", "posts", "select"]);
    // Nothing typed inside the freshly opened block yet
    assert_eq!(ctx.entry_side, EntrySide::None);

    let chain = resolve_relation_chain(&catalog(), &call.model, &ctx.path);
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].model_type, "Post");
    assert_eq!(chain[0].operation, ChainOperation::Select);
}

#[test]
fn resolves_where_context_mid_document() {
    let (source, offset) = with_cursor(
        "<?php\nfunction f($db) {\n    return $db->user->findMany(['where' => ['posts' => ['some' => ['tit|",
    );
    let call = locate_call_at(&source, offset, "$db").unwrap();
    let block = call.argument_block().unwrap();
    let ctx = resolve_array_context(block, offset).unwrap();
    assert_eq!(ctx.path, vec!["where", "posts", "some"]);

    let chain = resolve_relation_chain(&catalog(), &call.model, &ctx.path);
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].operation, ChainOperation::Where);
    assert_eq!(chain[0].model_type, "Post");
}

#[test]
fn cursor_before_any_call_resolves_nothing() {
    let (source, offset) = with_cursor("<?php\n$x = |1;\n$db->user->findMany([]);");
    assert!(locate_call_at(&source, offset, "$db").is_none());
}

#[test]
fn non_literal_argument_has_no_array_context() {
    let (source, offset) = with_cursor("$db->user->findMany($args|);");
    let call = locate_call_at(&source, offset, "$db").unwrap();
    assert!(call.argument_block().is_none());
}
