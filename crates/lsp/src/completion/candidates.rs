// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion candidate rules
//!
//! The context-dependent vocabulary of the query DSL, as pure functions from
//! resolved context to candidate lists. Which keys, operators and literals
//! are legal at a position depends on the operation being called, the key
//! path that led here, and the scalar/relation distinctions of the schema —
//! all of that dispatch lives in this module, free of any LSP types.
//!
//! Every candidate set excludes keys already present as siblings in the host
//! block.

use std::collections::HashSet;

use fluent_query_lsp_catalog::{ModelMetadata, SchemaCatalog};
use fluent_query_lsp_context::operations::{
    COMBINATORS, FILTER_OPERATORS, RELATION_OPERATORS, SORT_DIRECTIONS, is_boolean_root_key,
    is_combinator, is_filter_operator, is_operation_keyword, is_relation_operator, root_keys,
};
use fluent_query_lsp_context::{
    ArrayContext, EntrySide, RelationChainItem, locate_call_at, resolve_array_context,
    resolve_relation_chain,
};
use fluent_query_lsp_syntax::CallExpr;

/// Keys valid directly inside a nested relation block
const NESTED_ARG_KEYS: &[&str] = &[
    "where", "select", "include", "omit", "orderBy", "take", "skip", "cursor", "distinct",
];

/// What a candidate completes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// A model column
    Field,
    /// A DSL keyword (root key, operator, combinator)
    Keyword,
    /// A literal value (`true`, `asc`, ...)
    Literal,
}

/// One completion suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCandidate {
    pub label: String,
    /// Text inserted on accept; plain label unless a template applies
    pub insert_text: String,
    pub kind: CandidateKind,
    /// Stable ordering key, table order first
    pub sort_rank: usize,
    pub documentation: Option<String>,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CandidateKind, sort_rank: usize) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
            sort_rank,
            documentation: None,
        }
    }

    fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Resolve candidates for a cursor position in a document
///
/// Runs the whole pipeline: locate the call, resolve the array context, walk
/// the relation chain, then apply the rule table. An empty result is the
/// normal outcome when the cursor is not inside a recognized query.
pub fn resolve_candidates(
    catalog: &SchemaCatalog,
    source: &str,
    offset: usize,
    base_token: &str,
) -> Vec<CompletionCandidate> {
    let Some(call) = locate_call_at(source, offset, base_token) else {
        return Vec::new();
    };
    let Some(block) = call.argument_block() else {
        return Vec::new();
    };
    let Some(ctx) = resolve_array_context(block, offset) else {
        return Vec::new();
    };
    candidates_for(catalog, &call, &ctx)
}

/// Apply the rule table to an already-resolved context
pub fn candidates_for(
    catalog: &SchemaCatalog,
    call: &CallExpr,
    ctx: &ArrayContext<'_>,
) -> Vec<CompletionCandidate> {
    let used: HashSet<&str> = ctx.host.keys().collect();

    if ctx.at_root() {
        return match ctx.entry_side {
            EntrySide::Value => root_value_candidates(ctx),
            _ => root_key_candidates(&call.operation, &used),
        };
    }

    let chain = resolve_relation_chain(catalog, &call.model, &ctx.path);
    let model_name = chain
        .last()
        .map(|item| item.model_type.as_str())
        .unwrap_or(call.model.as_str());
    let Some(model) = catalog.model(model_name) else {
        return Vec::new();
    };

    // `_count` is grammar, not schema: at its top only `select` is legal,
    // and inside `_count.select` the model's relations (minus `_count`).
    if ctx.path.last().map(String::as_str) == Some("_count") {
        return keyword_candidates(&["select"], &used);
    }
    if ends_with_count_select(&ctx.path) {
        return field_candidates(model, &used, FieldFilter::RelationsOnly, false);
    }

    let at_relation_args = chain
        .last()
        .is_some_and(|item| ctx.path.last() == Some(&item.relation_name));

    let Some(context_keyword) = last_context_keyword(&ctx.path) else {
        return Vec::new();
    };
    match context_keyword {
        "select" | "include" | "omit" => {
            if ctx.entry_side == EntrySide::Value {
                return Vec::new();
            }
            // Directly inside `['posts' => [ ... ]]`: a nested query argument
            if at_relation_args {
                return keyword_candidates(NESTED_ARG_KEYS, &used);
            }
            match context_keyword {
                "include" => field_candidates(model, &used, FieldFilter::RelationsOnly, true),
                "omit" => field_candidates(model, &used, FieldFilter::All, false),
                _ => field_candidates(model, &used, FieldFilter::All, true),
            }
        }
        "orderBy" => match ctx.entry_side {
            EntrySide::Value => literal_candidates(SORT_DIRECTIONS),
            _ => field_candidates(model, &used, FieldFilter::All, false),
        },
        "where" => where_candidates(model, ctx, &chain, &used),
        _ => Vec::new(),
    }
}

/// How field candidates are filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldFilter {
    All,
    RelationsOnly,
}

fn root_key_candidates(operation: &str, used: &HashSet<&str>) -> Vec<CompletionCandidate> {
    let Some(keys) = root_keys(operation) else {
        return Vec::new();
    };
    keys.iter()
        .enumerate()
        .filter(|(_, key)| !used.contains(*key))
        .filter(|(_, key)| !excluded_by_sibling(key, used))
        .map(|(rank, key)| CompletionCandidate::new(*key, CandidateKind::Keyword, rank))
        .collect()
}

/// `select` and `include` are mutually exclusive: once one is present, the
/// other must never be suggested alongside it.
fn excluded_by_sibling(key: &str, used: &HashSet<&str>) -> bool {
    (key == "select" && used.contains("include")) || (key == "include" && used.contains("select"))
}

/// Value-side candidates directly inside the root block
fn root_value_candidates(ctx: &ArrayContext<'_>) -> Vec<CompletionCandidate> {
    match ctx.entry_key.as_deref() {
        Some("orderBy") => literal_candidates(SORT_DIRECTIONS),
        Some(key) if is_boolean_root_key(key) => literal_candidates(&["true", "false"]),
        _ => Vec::new(),
    }
}

fn where_candidates(
    model: &ModelMetadata,
    ctx: &ArrayContext<'_>,
    chain: &[RelationChainItem],
    used: &HashSet<&str>,
) -> Vec<CompletionCandidate> {
    let keyword_position = ctx.path.iter().rposition(|t| t == "where").unwrap_or(0);
    let trailing = &ctx.path[keyword_position + 1..];

    if ctx.entry_side == EntrySide::Value {
        // Operator-appropriate literal hints; never field names here
        let field = match ctx.entry_key.as_deref() {
            Some(key) if is_filter_operator(key) => {
                trailing.last().and_then(|name| model.field(name))
            }
            Some(key) => model.field(key),
            None => None,
        };
        return match field {
            Some(field) => {
                let mut hints = Vec::new();
                if field.field_type == "Boolean" {
                    hints.push("true");
                    hints.push("false");
                }
                if field.nullable {
                    hints.push("null");
                }
                literal_candidates(&hints)
            }
            None => Vec::new(),
        };
    }

    // The final path token being the last resolved relation hop means the
    // cursor is directly inside that relation's condition block.
    if chain
        .last()
        .is_some_and(|item| ctx.path.last() == Some(&item.relation_name))
    {
        return keyword_candidates(RELATION_OPERATORS, used);
    }

    match trailing.last().map(String::as_str) {
        // Top level of a `where` tree: columns plus combinators
        None => with_combinators(field_candidates(model, used, FieldFilter::All, false), used),
        Some(token) if is_combinator(token) => {
            field_candidates(model, used, FieldFilter::All, false)
        }
        // Inside `every`/`none`/`some`: a fresh where tree on the target model
        Some(token) if is_relation_operator(token) => {
            with_combinators(field_candidates(model, used, FieldFilter::All, false), used)
        }
        // Inside a `not` block: the filter vocabulary again
        Some(token) if is_filter_operator(token) => keyword_candidates(FILTER_OPERATORS, used),
        Some(token) => match model.field(token) {
            Some(field) if !field.is_relation => keyword_candidates(FILTER_OPERATORS, used),
            _ => Vec::new(),
        },
    }
}

fn field_candidates(
    model: &ModelMetadata,
    used: &HashSet<&str>,
    filter: FieldFilter,
    with_count: bool,
) -> Vec<CompletionCandidate> {
    let mut out: Vec<CompletionCandidate> = model
        .fields
        .iter()
        .filter(|field| match filter {
            FieldFilter::All => true,
            FieldFilter::RelationsOnly => field.is_relation,
        })
        .filter(|field| !used.contains(field.name.as_str()))
        .enumerate()
        .map(|(rank, field)| {
            let list_suffix = if field.is_list { "[]" } else { "" };
            CompletionCandidate::new(&field.name, CandidateKind::Field, rank).with_documentation(
                format!("{}.{}: {}{}", model.name, field.name, field.field_type, list_suffix),
            )
        })
        .collect();
    if with_count && !used.contains("_count") {
        let rank = out.len();
        out.push(
            CompletionCandidate::new("_count", CandidateKind::Keyword, rank)
                .with_documentation(format!("Relation counts for {}", model.name)),
        );
    }
    out
}

fn with_combinators(
    mut candidates: Vec<CompletionCandidate>,
    used: &HashSet<&str>,
) -> Vec<CompletionCandidate> {
    let base = candidates.len();
    for (index, combinator) in COMBINATORS
        .iter()
        .filter(|c| !used.contains(**c))
        .enumerate()
    {
        candidates.push(CompletionCandidate::new(
            *combinator,
            CandidateKind::Keyword,
            base + index,
        ));
    }
    candidates
}

fn keyword_candidates(keywords: &[&str], used: &HashSet<&str>) -> Vec<CompletionCandidate> {
    keywords
        .iter()
        .enumerate()
        .filter(|(_, key)| !used.contains(**key))
        .filter(|(_, key)| !excluded_by_sibling(key, used))
        .map(|(rank, key)| CompletionCandidate::new(*key, CandidateKind::Keyword, rank))
        .collect()
}

fn literal_candidates(literals: &[&str]) -> Vec<CompletionCandidate> {
    literals
        .iter()
        .enumerate()
        .map(|(rank, literal)| CompletionCandidate::new(*literal, CandidateKind::Literal, rank))
        .collect()
}

/// Whether the path ends in `.. _count -> select`
fn ends_with_count_select(path: &[String]) -> bool {
    path.len() >= 2 && path[path.len() - 2] == "_count" && path[path.len() - 1] == "select"
}

/// The innermost operation keyword on the path
fn last_context_keyword(path: &[String]) -> Option<&str> {
    path.iter()
        .rev()
        .map(String::as_str)
        .find(|token| is_operation_keyword(token))
}
