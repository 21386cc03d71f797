// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent Query LSP - Context Detection Layer
//!
//! This crate resolves *where inside the query grammar* a position sits.
//! It is the middle of the pipeline: the syntax layer hands it lowered call
//! expressions, and the completion and validation engines consume what it
//! resolves.
//!
//! ## Pipeline
//!
//! ```text
//! source + offset
//!   → locator          (which call, which operation, which model)
//!   → array_context    (host block, entry side, key path)
//!   → relation_chain   (path → relation hops with target models)
//! ```
//!
//! ## Core Concepts
//!
//! - [`operations`]: the fixed operation schema and keyword tables shared by
//!   completion and validation
//! - [`locator::locate_call_at`]: tolerant suffix parsing around the cursor
//! - [`array_context::resolve_array_context`]: host block / entry side / path
//! - [`relation_chain::resolve_relation_chain`]: schema-driven traversal of
//!   the path, partial on failure

pub mod array_context;
pub mod locator;
pub mod operations;
pub mod relation_chain;

// Re-export commonly used types
pub use array_context::{ArrayContext, EntrySide, resolve_array_context};
pub use locator::{discover_calls, locate_call_at};
pub use relation_chain::{ChainOperation, RelationChainItem, resolve_relation_chain};
