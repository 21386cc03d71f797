// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lowering tests over messier host source: full documents with the opening
//! tag, surrounding code, and half-typed call arguments.

use fluent_query_lsp_syntax::{QueryParser, ValueNode, balance_snippet};

fn calls(source: &str) -> Vec<fluent_query_lsp_syntax::CallExpr> {
    let mut parser = QueryParser::new();
    parser.parse(source).unwrap().calls("$db", 0)
}

#[test]
fn finds_calls_inside_a_tagged_document() {
    let source = r#"<?php

namespace App\Http\Controllers;

class UserController
{
    public function index($db)
    {
        $users = $db->user->findMany([
            'where' => ['active' => true],
            'take' => 25,
        ]);
        return view('users.index', ['users' => $users]);
    }
}
"#;
    let calls = calls(source);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "user");
    assert_eq!(calls[0].operation, "findMany");

    let block = calls[0].argument_block().unwrap();
    assert!(block.has_key("where"));
    assert!(block.has_key("take"));
}

#[test]
fn multiple_calls_in_one_document() {
    let source = "<?php\n$a = $db->user->count([]);\n$b = $db->post->findFirst(['take' => 1]);\n";
    let calls = calls(source);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].operation, "count");
    assert_eq!(calls[1].model, "post");
}

#[test]
fn balanced_half_typed_argument_lowers_deeply() {
    let snippet = balance_snippet(
        "$db->user->findMany(['where' => ['posts' => ['some' => ['title' => ['contains' => '",
    );
    let calls = calls(&snippet);
    assert_eq!(calls.len(), 1);

    let block = calls[0].argument_block().unwrap();
    let r#where = block.entry("where").unwrap().value.as_block().unwrap();
    let posts = r#where.entry("posts").unwrap().value.as_block().unwrap();
    let some = posts.entry("some").unwrap().value.as_block().unwrap();
    let title = some.entry("title").unwrap().value.as_block().unwrap();
    assert!(title.entry("contains").is_some());
}

#[test]
fn keys_spanning_strings_numbers_and_nested_lists() {
    let source = "$db->post->updateMany([
        'where' => ['id' => ['in' => [1, 2, 3]]],
        'data' => ['title' => 'renamed', 'views' => 0],
    ]);";
    let calls = calls(source);
    let block = calls[0].argument_block().unwrap();

    let r#where = block.entry("where").unwrap().value.as_block().unwrap();
    let id = r#where.entry("id").unwrap().value.as_block().unwrap();
    let in_list = id.entry("in").unwrap().value.as_block().unwrap();
    assert!(in_list.is_list());
    assert_eq!(in_list.entries.len(), 3);
    assert!(matches!(in_list.entries[0].value, ValueNode::Number(_)));

    let data = block.entry("data").unwrap().value.as_block().unwrap();
    assert!(matches!(
        data.entry("views").unwrap().value,
        ValueNode::Number(_)
    ));
}

#[test]
fn spans_nest_consistently() {
    let source = "$db->user->findMany(['where' => ['name' => 'a']]);";
    let calls = calls(source);
    let call = &calls[0];
    let block = call.argument_block().unwrap();
    let r#where = block.entry("where").unwrap();

    assert!(call.span.start < block.span.start);
    assert!(block.span.contains(r#where.span.start));
    assert!(r#where.value.span().start > r#where.key_span().unwrap().end);
    assert!(r#where.value.span().end <= block.span.end);
}
