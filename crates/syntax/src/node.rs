// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Literal-block syntax tree
//!
//! This module defines the closed node union produced by lowering the host
//! language's CST. Query arguments are nested key-value literal blocks; every
//! consumer downstream (context detection, completion, validation) works
//! exclusively against these types rather than raw tree-sitter nodes.
//!
//! ## Node kinds
//!
//! - [`BlockNode`]: a literal block (`['k' => v, ...]`), ordered entries
//! - [`EntryNode`]: one `key => value` pair; `key` is absent for list-style
//!   elements (`[1, 2, 3]`)
//! - [`ValueNode`]: the closed value union (block, string, number, boolean,
//!   null, variable, property access, identifier, other)
//! - [`CallExpr`]: one recognized `base->model->operation(argument)` call

use serde::{Deserialize, Serialize};

/// A byte range into the analyzed source text.
///
/// Spans are half-open on construction but containment checks are inclusive
/// of the end offset: a cursor sitting immediately after the last character
/// of an unterminated literal still belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `offset` falls inside this span (end-inclusive)
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether `offset` falls strictly inside this span
    pub fn contains_strict(&self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A string literal value
#[derive(Debug, Clone, PartialEq)]
pub struct StrNode {
    /// Span including the quote characters
    pub span: Span,
    /// Span of the content between the quotes
    pub content_span: Span,
    /// Unquoted content
    pub value: String,
}

/// A numeric literal value
#[derive(Debug, Clone, PartialEq)]
pub struct NumberNode {
    pub span: Span,
    /// Raw source text, sign included
    pub raw: String,
    pub is_float: bool,
}

/// A boolean literal value, possibly behind one or more `!` operators
#[derive(Debug, Clone, PartialEq)]
pub struct BoolNode {
    pub span: Span,
    /// The literal as written, before negation
    pub value: bool,
    /// Whether the literal appeared behind a leading `!`
    pub negated: bool,
}

/// A runtime variable reference (`$foo`)
#[derive(Debug, Clone, PartialEq)]
pub struct VarNode {
    pub span: Span,
    /// Variable name including the `$` sigil
    pub name: String,
}

/// A bare identifier or constant access (`SORT_ASC`, `Order::Desc`)
#[derive(Debug, Clone, PartialEq)]
pub struct IdentNode {
    pub span: Span,
    pub name: String,
}

/// The closed value union for literal-block contents
///
/// Runtime-typed values (variables, property accesses, calls, identifiers)
/// cannot be checked statically; consumers accept them unverified.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Block(BlockNode),
    Str(StrNode),
    Number(NumberNode),
    Bool(BoolNode),
    Null(Span),
    Variable(VarNode),
    /// `$x->y`, `$x['y']`, `X::$y`, method and function calls
    PropertyAccess(Span),
    Identifier(IdentNode),
    /// Any expression the lowering does not model
    Other(Span),
}

impl ValueNode {
    /// The source span of this value
    pub fn span(&self) -> Span {
        match self {
            ValueNode::Block(b) => b.span,
            ValueNode::Str(s) => s.span,
            ValueNode::Number(n) => n.span,
            ValueNode::Bool(b) => b.span,
            ValueNode::Null(span)
            | ValueNode::PropertyAccess(span)
            | ValueNode::Other(span) => *span,
            ValueNode::Variable(v) => v.span,
            ValueNode::Identifier(i) => i.span,
        }
    }

    /// Borrow the inner block, if this value is one
    pub fn as_block(&self) -> Option<&BlockNode> {
        match self {
            ValueNode::Block(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow the inner string literal, if this value is one
    pub fn as_str(&self) -> Option<&StrNode> {
        match self {
            ValueNode::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value can only be checked at runtime
    ///
    /// Variables, property accesses, calls and bare identifiers carry no
    /// statically known type; validation accepts them as-is.
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            ValueNode::Variable(_)
                | ValueNode::PropertyAccess(_)
                | ValueNode::Identifier(_)
                | ValueNode::Other(_)
        )
    }
}

/// One entry of a literal block
#[derive(Debug, Clone, PartialEq)]
pub struct EntryNode {
    pub span: Span,
    /// Key expression; `None` for list-style elements
    pub key: Option<ValueNode>,
    pub value: ValueNode,
}

impl EntryNode {
    /// The entry's key as a string literal, if it is one
    pub fn key_string(&self) -> Option<&str> {
        match &self.key {
            Some(ValueNode::Str(s)) => Some(&s.value),
            _ => None,
        }
    }

    /// Span of the key, if present
    pub fn key_span(&self) -> Option<Span> {
        self.key.as_ref().map(ValueNode::span)
    }
}

/// A literal block: ordered `key => value` entries
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub span: Span,
    pub entries: Vec<EntryNode>,
}

impl BlockNode {
    /// Iterate over the string keys present in this block
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(EntryNode::key_string)
    }

    /// Whether a string key is present in this block
    pub fn has_key(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    /// Find the entry with the given string key
    pub fn entry(&self, key: &str) -> Option<&EntryNode> {
        self.entries.iter().find(|e| e.key_string() == Some(key))
    }

    /// Whether every entry is a keyless list element
    ///
    /// An empty block counts as a list; `['a', 'b']` and `[]` are lists,
    /// `['a' => 1]` is not.
    pub fn is_list(&self) -> bool {
        self.entries.iter().all(|e| e.key.is_none())
    }
}

/// One recognized query invocation: `base->model->operation(argument)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// The base invocation token as written, sigil included (e.g. `$db`)
    pub base: String,
    /// Model segment of the callee chain, as written
    pub model: String,
    /// Operation segment of the callee chain
    pub operation: String,
    /// Span of the whole call expression
    pub span: Span,
    /// Span of the operation name (diagnostic anchor for call-level findings)
    pub operation_span: Span,
    /// First argument, lowered; `None` when absent or not an expression
    pub argument: Option<ValueNode>,
}

impl CallExpr {
    /// The call's argument as a literal block, if it is one
    pub fn argument_block(&self) -> Option<&BlockNode> {
        self.argument.as_ref().and_then(ValueNode::as_block)
    }
}
