// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Host-language parser adapter
//!
//! This module wraps the foreign tree-sitter parser and lowers the parts of
//! the CST the query DSL cares about into the closed node union of
//! [`crate::node`]. Everything else in the host source is ignored.
//!
//! The host grammar is PHP-shaped; the `php_only` variant is used so that
//! bare snippets parse without an opening tag. Tree-sitter recovers from
//! broken input with ERROR nodes, which keeps call discovery working inside
//! half-typed documents; [`balance_snippet`] closes dangling delimiters first
//! so completion-time suffixes form usable trees.

use tracing::{trace, warn};
use tree_sitter::Node;

use crate::node::{
    BlockNode, BoolNode, CallExpr, EntryNode, IdentNode, NumberNode, Span, StrNode, ValueNode,
    VarNode,
};

/// Parser for host-language source text
///
/// Wraps a `tree_sitter::Parser`. Full documents carry an opening `<?php`
/// tag and parse with the mixed grammar; completion-time suffixes are sliced
/// mid-script and parse with the tag-free `php_only` variant. Parsers are
/// cheap to construct; callers create one per request rather than sharing.
pub struct QueryParser {
    parser: tree_sitter::Parser,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParser {
    /// Create a parser for the host grammar
    pub fn new() -> Self {
        Self {
            parser: tree_sitter::Parser::new(),
        }
    }

    /// Parse source text into a [`SourceTree`]
    ///
    /// Returns `None` only when tree-sitter produces no tree at all; broken
    /// input still yields a tree with ERROR nodes.
    pub fn parse(&mut self, source: &str) -> Option<SourceTree> {
        let language: tree_sitter::Language = if source.contains("<?php") {
            tree_sitter_php::LANGUAGE_PHP.into()
        } else {
            tree_sitter_php::LANGUAGE_PHP_ONLY.into()
        };
        if let Err(err) = self.parser.set_language(&language) {
            warn!(%err, "host grammar rejected by tree-sitter runtime");
            return None;
        }
        let tree = self.parser.parse(source, None)?;
        Some(SourceTree {
            tree,
            source: source.to_string(),
        })
    }
}

/// A parsed host document or snippet
pub struct SourceTree {
    tree: tree_sitter::Tree,
    source: String,
}

impl SourceTree {
    /// The parsed source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Collect all recognized `base->model->operation(...)` calls
    ///
    /// # Arguments
    ///
    /// * `base_token` - The base invocation token, sigil included (e.g. `$db`)
    /// * `span_base` - Offset added to every span, for snippets cut out of a
    ///   larger document
    ///
    /// Operation names are not filtered here; the locator decides which
    /// operations it recognizes.
    pub fn calls(&self, base_token: &str, span_base: usize) -> Vec<CallExpr> {
        let mut out = Vec::new();
        let lowering = Lowering {
            source: &self.source,
            span_base,
        };
        lowering.collect_calls(self.tree.root_node(), base_token, &mut out);
        out
    }
}

/// Lowering context: source text plus the span rebase offset
struct Lowering<'a> {
    source: &'a str,
    span_base: usize,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn span(&self, node: Node) -> Span {
        let range = node.byte_range();
        Span::new(range.start + self.span_base, range.end + self.span_base)
    }

    fn collect_calls(&self, node: Node, base_token: &str, out: &mut Vec<CallExpr>) {
        if node.kind() == "member_call_expression"
            && let Some(call) = self.lower_call(node, base_token)
        {
            out.push(call);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(child, base_token, out);
        }
    }

    /// Lower a `member_call_expression` whose callee is the two-level chain
    /// `base_token->model->operation`. Anything else returns `None`.
    fn lower_call(&self, node: Node, base_token: &str) -> Option<CallExpr> {
        let object = node.child_by_field_name("object")?;
        if object.kind() != "member_access_expression" {
            return None;
        }
        let base = object.child_by_field_name("object")?;
        if base.kind() != "variable_name" || self.text(base) != base_token {
            return None;
        }
        let model = object.child_by_field_name("name")?;
        let operation = node.child_by_field_name("name")?;
        if model.kind() != "name" || operation.kind() != "name" {
            return None;
        }

        let argument = node
            .child_by_field_name("arguments")
            .and_then(|args| self.first_argument(args))
            .map(|expr| self.lower_value(expr));

        trace!(
            model = self.text(model),
            operation = self.text(operation),
            "lowered query call"
        );

        Some(CallExpr {
            base: base_token.to_string(),
            model: self.text(model).to_string(),
            operation: self.text(operation).to_string(),
            span: self.span(node),
            operation_span: self.span(operation),
            argument,
        })
    }

    /// The expression of the first argument, skipping named-argument labels
    fn first_argument<'tree>(&self, arguments: Node<'tree>) -> Option<Node<'tree>> {
        let mut cursor = arguments.walk();
        let argument = arguments
            .named_children(&mut cursor)
            .find(|n| n.kind() == "argument")?;
        // The expression is the last named child; a leading `name` child
        // belongs to PHP named-argument syntax.
        let count = argument.named_child_count();
        if count == 0 {
            return None;
        }
        argument.named_child((count - 1) as u32)
    }

    fn lower_value(&self, node: Node) -> ValueNode {
        let span = self.span(node);
        match node.kind() {
            "array_creation_expression" => ValueNode::Block(self.lower_block(node)),
            "string" | "encapsed_string" => ValueNode::Str(self.lower_string(node)),
            "integer" => ValueNode::Number(NumberNode {
                span,
                raw: self.text(node).to_string(),
                is_float: false,
            }),
            "float" => ValueNode::Number(NumberNode {
                span,
                raw: self.text(node).to_string(),
                is_float: true,
            }),
            "boolean" => ValueNode::Bool(BoolNode {
                span,
                value: self.text(node).eq_ignore_ascii_case("true"),
                negated: false,
            }),
            "null" => ValueNode::Null(span),
            "variable_name" => ValueNode::Variable(VarNode {
                span,
                name: self.text(node).to_string(),
            }),
            "member_access_expression"
            | "nullsafe_member_access_expression"
            | "scoped_property_access_expression"
            | "subscript_expression"
            | "member_call_expression"
            | "nullsafe_member_call_expression"
            | "scoped_call_expression"
            | "function_call_expression"
            | "object_creation_expression" => ValueNode::PropertyAccess(span),
            "name" | "qualified_name" | "class_constant_access_expression" => {
                ValueNode::Identifier(IdentNode {
                    span,
                    name: self.text(node).to_string(),
                })
            }
            "unary_op_expression" => self.lower_unary(node, span),
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.lower_value(inner),
                None => ValueNode::Other(span),
            },
            _ => ValueNode::Other(span),
        }
    }

    /// Fold `!` over boolean literals and sign operators over numbers; any
    /// other unary expression is runtime-typed.
    fn lower_unary(&self, node: Node, span: Span) -> ValueNode {
        let count = node.named_child_count();
        let Some(operand) = (count > 0).then(|| node.named_child((count - 1) as u32)).flatten() else {
            return ValueNode::Other(span);
        };
        let operator = self.text(node).as_bytes().first().copied();
        match (operator, self.lower_value(operand)) {
            (Some(b'!'), ValueNode::Bool(inner)) => ValueNode::Bool(BoolNode {
                span,
                value: inner.value,
                negated: true,
            }),
            (Some(b'!'), ValueNode::Variable(_) | ValueNode::PropertyAccess(_)) => {
                ValueNode::PropertyAccess(span)
            }
            (Some(b'-') | Some(b'+'), ValueNode::Number(inner)) => ValueNode::Number(NumberNode {
                span,
                raw: self.text(node).to_string(),
                is_float: inner.is_float,
            }),
            _ => ValueNode::Other(span),
        }
    }

    fn lower_string(&self, node: Node) -> StrNode {
        let span = self.span(node);
        let raw = self.text(node);
        // Strip matching quotes; an unterminated string (possible under
        // error recovery) keeps whatever content is there.
        let (value, content_span) = if raw.len() >= 2
            && (raw.starts_with('\'') || raw.starts_with('"'))
            && raw.ends_with(raw.as_bytes()[0] as char)
        {
            (
                raw[1..raw.len() - 1].to_string(),
                Span::new(span.start + 1, span.end - 1),
            )
        } else if raw.starts_with('\'') || raw.starts_with('"') {
            (raw[1..].to_string(), Span::new(span.start + 1, span.end))
        } else {
            (raw.to_string(), span)
        };
        StrNode {
            span,
            content_span,
            value,
        }
    }

    fn lower_block(&self, node: Node) -> BlockNode {
        let mut entries = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "array_element_initializer" {
                continue;
            }
            let mut parts = Vec::new();
            let mut inner = child.walk();
            for part in child.named_children(&mut inner) {
                parts.push(part);
            }
            let entry = match parts.len() {
                0 => continue,
                1 => EntryNode {
                    span: self.span(child),
                    key: None,
                    value: self.lower_value(parts[0]),
                },
                _ => EntryNode {
                    span: self.span(child),
                    key: Some(self.lower_value(parts[0])),
                    value: self.lower_value(parts[parts.len() - 1]),
                },
            };
            entries.push(entry);
        }
        BlockNode {
            span: self.span(node),
            entries,
        }
    }
}

/// Close dangling string and bracket delimiters at the end of a snippet
///
/// Completion requests parse the textual prefix up to the cursor, which is
/// almost always mid-expression. Appending the missing closers turns the
/// prefix into something the grammar can shape without guessing: delimiters
/// are counted, never inferred.
pub fn balance_snippet(snippet: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in snippet.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.last() == Some(&ch) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut balanced = String::with_capacity(snippet.len() + stack.len() + 2);
    balanced.push_str(snippet);
    if let Some(q) = quote {
        balanced.push(q);
    }
    while let Some(closer) = stack.pop() {
        balanced.push(closer);
    }
    balanced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_calls(source: &str) -> Vec<CallExpr> {
        let mut parser = QueryParser::new();
        let tree = parser.parse(source).unwrap();
        tree.calls("$db", 0)
    }

    #[test]
    fn test_balance_closes_quote_and_brackets() {
        assert_eq!(
            balance_snippet("$db->user->findMany(['where' => ['"),
            "$db->user->findMany(['where' => ['']])"
        );
    }

    #[test]
    fn test_balance_leaves_complete_input_alone() {
        let src = "$db->user->findMany(['take' => 5])";
        assert_eq!(balance_snippet(src), src);
    }

    #[test]
    fn test_balance_ignores_brackets_inside_strings() {
        assert_eq!(balance_snippet("['a(b' => '["), "['a(b' => '[']");
    }

    #[test]
    fn test_lower_simple_call() {
        let calls = parse_calls("$db->user->findMany(['take' => 5]);");
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.model, "user");
        assert_eq!(call.operation, "findMany");
        let block = call.argument_block().unwrap();
        assert_eq!(block.entries.len(), 1);
        assert_eq!(block.entries[0].key_string(), Some("take"));
        assert!(matches!(
            block.entries[0].value,
            ValueNode::Number(NumberNode { is_float: false, .. })
        ));
    }

    #[test]
    fn test_lower_nested_blocks_and_literals() {
        let source = r#"$db->user->findMany([
            'where' => ['name' => ['contains' => 'bob'], 'active' => !true],
            'orderBy' => ['name' => 'asc'],
            'skip' => $offset,
        ]);"#;
        let calls = parse_calls(source);
        assert_eq!(calls.len(), 1);
        let block = calls[0].argument_block().unwrap();

        let r#where = block.entry("where").unwrap().value.as_block().unwrap();
        let name = r#where.entry("name").unwrap().value.as_block().unwrap();
        let contains = &name.entry("contains").unwrap().value;
        assert_eq!(contains.as_str().unwrap().value, "bob");

        match &r#where.entry("active").unwrap().value {
            ValueNode::Bool(b) => {
                assert!(b.value);
                assert!(b.negated);
            }
            other => panic!("expected negated bool, got {other:?}"),
        }

        assert!(matches!(
            block.entry("skip").unwrap().value,
            ValueNode::Variable(_)
        ));
    }

    #[test]
    fn test_lower_list_block() {
        let calls = parse_calls("$db->user->findMany(['distinct' => ['name', 'email']]);");
        let block = calls[0].argument_block().unwrap();
        let distinct = block.entry("distinct").unwrap().value.as_block().unwrap();
        assert!(distinct.is_list());
        assert_eq!(distinct.entries.len(), 2);
    }

    #[test]
    fn test_ignores_other_receivers() {
        assert!(parse_calls("$other->user->findMany([]);").is_empty());
        assert!(parse_calls("$db->findMany([]);").is_empty());
    }

    #[test]
    fn test_call_without_argument() {
        let calls = parse_calls("$db->user->deleteMany();");
        assert_eq!(calls.len(), 1);
        assert!(calls[0].argument.is_none());
    }

    #[test]
    fn test_balanced_suffix_parses_into_call() {
        let snippet = balance_snippet("$x = 1; $db->user->findMany(['where' => ['");
        let mut parser = QueryParser::new();
        let tree = parser.parse(&snippet).unwrap();
        let calls = tree.calls("$db", 0);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].argument_block().is_some());
    }

    #[test]
    fn test_span_rebase() {
        let source = "$db->user->count([]);";
        let mut parser = QueryParser::new();
        let tree = parser.parse(source).unwrap();
        let calls = tree.calls("$db", 100);
        assert_eq!(calls[0].span.start, 100);
        assert_eq!(calls[0].span.end, 100 + source.len() - 1);
    }
}
