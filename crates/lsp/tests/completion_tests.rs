// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Completion rule tests: cursor-marked sources through the whole pipeline.

use fluent_query_lsp_catalog::SchemaCatalog;
use fluent_query_lsp_lsp::completion::candidates::{CandidateKind, resolve_candidates};
use fluent_query_lsp_test_utils::{MockCatalogBuilder, blog_catalog, cursor_marker};

fn labels(catalog: &SchemaCatalog, marked: &str) -> Vec<String> {
    let (source, offset) = cursor_marker(marked);
    resolve_candidates(catalog, &source, offset, "$db")
        .into_iter()
        .map(|c| c.label)
        .collect()
}

fn blog_labels(marked: &str) -> Vec<String> {
    labels(&blog_catalog(), marked)
}

#[test]
fn root_keys_for_find_many_in_table_order() {
    // Cursor immediately after the opening quote, no prior keys: the full
    // root-key set for the operation, in table order.
    let labels = blog_labels("$db->user->findMany(['|");
    assert_eq!(
        labels,
        vec!["where", "select", "include", "orderBy", "take", "skip", "cursor", "distinct"]
    );
}

#[test]
fn root_keys_exclude_already_present_keys_in_any_order() {
    let one_order = blog_labels("$db->user->findMany(['take' => 5, 'where' => [], '|");
    assert_eq!(one_order, vec!["select", "include", "orderBy", "skip", "cursor", "distinct"]);

    let other_order = blog_labels("$db->user->findMany(['where' => [], 'take' => 5, '|");
    assert_eq!(one_order, other_order);
}

#[test]
fn select_and_include_are_never_co_suggested() {
    let with_include = blog_labels("$db->user->findMany(['include' => ['posts' => true], '|");
    assert!(!with_include.contains(&"select".to_string()));
    assert!(!with_include.contains(&"include".to_string()));

    let with_select = blog_labels("$db->user->findMany(['select' => ['id' => true], '|");
    assert!(!with_select.contains(&"include".to_string()));
}

#[test]
fn include_at_top_level_suggests_relations_and_count() {
    let labels = blog_labels("$db->user->findMany(['include' => ['|");
    assert_eq!(labels, vec!["posts", "profile", "_count"]);
}

#[test]
fn select_at_top_level_suggests_all_fields_and_count() {
    let labels = blog_labels("$db->user->findMany(['select' => ['|");
    assert_eq!(
        labels,
        vec!["id", "name", "email", "age", "bio", "active", "posts", "profile", "_count"]
    );
}

#[test]
fn chain_resolution_suggests_target_model_fields() {
    // The round-trip property: include -> posts -> select resolves to Post
    // and suggests Post's columns, not User's relations.
    let catalog = MockCatalogBuilder::new()
        .with_model("User", &[("id", "Int"), ("name", "String"), ("posts", "Post[]")])
        .with_model("Post", &[("id", "Int"), ("title", "String")])
        .build();

    let labels = labels(
        &catalog,
        "$db->user->findMany(['include' => ['posts' => ['select' => ['|",
    );
    assert_eq!(labels, vec!["id", "title", "_count"]);
    assert!(!labels.contains(&"posts".to_string()));
}

#[test]
fn nested_relation_block_suggests_query_arguments() {
    let labels = blog_labels("$db->user->findMany(['include' => ['posts' => ['|");
    assert_eq!(
        labels,
        vec!["where", "select", "include", "omit", "orderBy", "take", "skip", "cursor", "distinct"]
    );
}

#[test]
fn count_block_suggests_only_select() {
    let labels = blog_labels("$db->user->findMany(['select' => ['_count' => ['|");
    assert_eq!(labels, vec!["select"]);
}

#[test]
fn count_select_suggests_relations_without_count() {
    let labels =
        blog_labels("$db->user->findMany(['select' => ['_count' => ['select' => ['|");
    assert_eq!(labels, vec!["posts", "profile"]);
}

#[test]
fn where_top_level_suggests_fields_and_combinators() {
    let labels = blog_labels("$db->user->findMany(['where' => ['|");
    assert_eq!(
        labels,
        vec!["id", "name", "email", "age", "bio", "active", "posts", "profile", "AND", "OR", "NOT"]
    );
}

#[test]
fn where_inside_combinator_suggests_fields_only() {
    let labels = blog_labels("$db->user->findMany(['where' => ['AND' => [['|");
    assert_eq!(
        labels,
        vec!["id", "name", "email", "age", "bio", "active", "posts", "profile"]
    );
}

#[test]
fn scalar_field_in_where_suggests_filter_operators_only() {
    let labels = blog_labels("$db->user->findMany(['where' => ['name' => ['|");
    assert_eq!(
        labels,
        vec![
            "contains",
            "startsWith",
            "endsWith",
            "in",
            "notIn",
            "lt",
            "lte",
            "gt",
            "gte",
            "equals",
            "not"
        ]
    );
    assert!(!labels.contains(&"every".to_string()));
}

#[test]
fn relation_field_in_where_suggests_relation_operators_only() {
    let labels = blog_labels("$db->user->findMany(['where' => ['posts' => ['|");
    assert_eq!(labels, vec!["every", "none", "some"]);
    assert!(!labels.contains(&"contains".to_string()));
}

#[test]
fn where_inside_relation_operator_suggests_target_fields() {
    let labels =
        blog_labels("$db->user->findMany(['where' => ['posts' => ['some' => ['|");
    assert_eq!(labels, vec!["id", "title", "views", "author", "AND", "OR", "NOT"]);
}

#[test]
fn filter_operator_value_hints_follow_field_type() {
    let boolean = blog_labels("$db->user->findMany(['where' => ['active' => ['equals' => '|");
    assert_eq!(boolean, vec!["true", "false"]);

    // nullable string column: only null is a useful literal hint
    let nullable = blog_labels("$db->user->findMany(['where' => ['bio' => ['equals' => '|");
    assert_eq!(nullable, vec!["null"]);

    // non-nullable string column: no literal hints, and never field names
    let plain = blog_labels("$db->user->findMany(['where' => ['name' => ['equals' => '|");
    assert!(plain.is_empty());
}

#[test]
fn order_by_value_side_suggests_directions() {
    let nested = blog_labels("$db->user->findMany(['orderBy' => ['name' => '|");
    assert_eq!(nested, vec!["asc", "desc"]);

    let root = blog_labels("$db->user->findMany(['orderBy' => '|");
    assert_eq!(root, vec!["asc", "desc"]);
}

#[test]
fn order_by_key_side_suggests_fields() {
    let labels = blog_labels("$db->user->findMany(['orderBy' => ['|");
    assert_eq!(
        labels,
        vec!["id", "name", "email", "age", "bio", "active", "posts", "profile"]
    );
}

#[test]
fn boolean_root_key_value_suggests_booleans() {
    let labels = blog_labels("$db->user->createMany(['data' => [], 'skipDuplicates' => '|");
    assert_eq!(labels, vec!["true", "false"]);
}

#[test]
fn sibling_keys_are_excluded_everywhere() {
    let where_used = blog_labels("$db->user->findMany(['where' => ['name' => 'x', '|");
    assert!(!where_used.contains(&"name".to_string()));
    assert!(where_used.contains(&"email".to_string()));

    let ops_used =
        blog_labels("$db->user->findMany(['where' => ['name' => ['contains' => 'x', '|");
    assert!(!ops_used.contains(&"contains".to_string()));
    assert!(ops_used.contains(&"equals".to_string()));
}

#[test]
fn empty_catalog_still_offers_root_keys() {
    let labels = labels(&SchemaCatalog::new(), "$db->user->findUnique(['|");
    assert_eq!(labels, vec!["where", "select", "include"]);

    // but schema-dependent suggestions degrade to nothing
    let fields = labels_empty("$db->user->findUnique(['where' => ['|");
    assert!(fields.is_empty());
}

fn labels_empty(marked: &str) -> Vec<String> {
    labels(&SchemaCatalog::new(), marked)
}

#[test]
fn outside_a_query_call_there_are_no_candidates() {
    assert!(blog_labels("echo 'hi|';").is_empty());
    assert!(blog_labels("$db->user->frobnicate(['|").is_empty());
}

#[test]
fn candidate_kinds_distinguish_fields_from_keywords() {
    let (source, offset) = cursor_marker("$db->user->findMany(['where' => ['|");
    let catalog = blog_catalog();
    let candidates = resolve_candidates(&catalog, &source, offset, "$db");

    let name = candidates.iter().find(|c| c.label == "name").unwrap();
    assert_eq!(name.kind, CandidateKind::Field);
    assert_eq!(name.documentation.as_deref(), Some("User.name: String"));

    let and = candidates.iter().find(|c| c.label == "AND").unwrap();
    assert_eq!(and.kind, CandidateKind::Keyword);
}

#[test]
fn engine_completes_through_document_positions() {
    use fluent_query_lsp_lsp::completion::CompletionEngine;
    use fluent_query_lsp_lsp::document::Document;
    use tower_lsp::lsp_types::{Position, Url};

    let content = "<?php\n$db->user->findMany(['";
    let document = Document::new(
        Url::parse("file:///test.php").unwrap(),
        content.to_string(),
        1,
        "php".to_string(),
    );

    let catalog = blog_catalog();
    let items = CompletionEngine::new()
        .complete(&catalog, &document, Position::new(1, 22), "$db")
        .unwrap();

    assert_eq!(items.len(), 8);
    assert_eq!(items[0].label, "where");
    assert_eq!(items[0].sort_text.as_deref(), Some("0000"));
}
