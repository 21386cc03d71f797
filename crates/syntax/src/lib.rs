// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent Query LSP - Syntax Layer
//!
//! This crate is the boundary to the host-language parser. It consumes the
//! foreign tree-sitter CST and exposes a closed, DSL-shaped view of it:
//!
//! - [`node`]: the literal-block node union (`BlockNode`, `EntryNode`,
//!   `ValueNode`, `CallExpr`) with byte [`Span`]s
//! - [`parser`]: [`QueryParser`] / [`SourceTree`] for parsing documents and
//!   snippets, plus [`balance_snippet`] for tolerant suffix parsing
//!
//! Downstream crates never touch tree-sitter types; the query grammar's
//! context rules operate on this union alone.

pub mod node;
pub mod parser;

// Re-export commonly used types
pub use node::{
    BlockNode, BoolNode, CallExpr, EntryNode, IdentNode, NumberNode, Span, StrNode, ValueNode,
    VarNode,
};
pub use parser::{QueryParser, SourceTree, balance_snippet};
