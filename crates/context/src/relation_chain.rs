// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Relation chain resolution
//!
//! Turns the key path produced by array-context resolution into an ordered
//! chain of relation traversals with resolved target models. The path mixes
//! operation keywords, combinators, operators and field names; the resolver
//! consults the current model's field map *before* treating a token as a
//! keyword, so a relation field that happens to be named `select` or `where`
//! still resolves as a relation hop.
//!
//! Resolution is best-effort by contract: an unresolvable token truncates the
//! chain and callers work with the partial result.

use fluent_query_lsp_catalog::SchemaCatalog;

use crate::operations::{
    is_aggregate_key, is_combinator, is_filter_operator, is_operation_keyword,
    is_relation_operator,
};

/// The operation governing one relation hop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOperation {
    Select,
    Include,
    Where,
    Omit,
}

impl ChainOperation {
    /// Parse an operation keyword
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "select" => Some(Self::Select),
            "include" => Some(Self::Include),
            "where" => Some(Self::Where),
            "omit" => Some(Self::Omit),
            _ => None,
        }
    }
}

/// One hop of a relation traversal
#[derive(Debug, Clone, PartialEq)]
pub struct RelationChainItem {
    /// The relation field's name
    pub relation_name: String,
    /// Operation governing the blocks nested under this relation
    pub operation: ChainOperation,
    /// The relation's target model type
    pub model_type: String,
}

/// Resolve a key path into a relation chain
///
/// # Arguments
///
/// * `catalog` - Schema catalog for field lookups
/// * `base_model` - The call's model name (case-insensitive)
/// * `path` - Key path from the argument root to the host block
///
/// The chain truncates at the first token that is neither a structural
/// keyword nor a relation field of the current model; partial chains are
/// normal and expected.
pub fn resolve_relation_chain(
    catalog: &SchemaCatalog,
    base_model: &str,
    path: &[String],
) -> Vec<RelationChainItem> {
    let mut chain = Vec::new();
    let Some(mut current) = catalog.model(base_model) else {
        return chain;
    };

    let root_operation = path
        .first()
        .and_then(|token| ChainOperation::from_keyword(token))
        .unwrap_or(ChainOperation::Select);

    let mut index = 0;
    while index < path.len() {
        let token = &path[index];

        // Field map first: a relation named like a keyword is still a relation.
        if let Some(field) = current.field(token)
            && field.is_relation
        {
            let Some(target) = catalog.relation_target(field) else {
                break;
            };
            let operation = path
                .get(index + 1)
                .filter(|next| {
                    // The next token only reads as an explicit operation
                    // keyword if the target model has no relation by that name.
                    !target.field(next).is_some_and(|f| f.is_relation)
                })
                .and_then(|next| ChainOperation::from_keyword(next))
                .unwrap_or(root_operation);

            chain.push(RelationChainItem {
                relation_name: token.clone(),
                operation,
                model_type: target.name.clone(),
            });
            current = target;
            index += 1;
            continue;
        }

        if is_structural(token) {
            index += 1;
            continue;
        }

        // Scalar field or unknown token: traversal ends here.
        break;
    }

    chain
}

/// Tokens that shape the path without naming a relation
fn is_structural(token: &str) -> bool {
    is_operation_keyword(token)
        || is_combinator(token)
        || is_relation_operator(token)
        || is_filter_operator(token)
        || is_aggregate_key(token)
        || matches!(token, "data" | "update" | "create" | "by" | "having")
}
