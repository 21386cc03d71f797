// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Operation schema and keyword tables
//!
//! The query DSL's vocabulary is fixed at build time: which operations
//! exist, which root keys each permits, which blocks are mandatory, and the
//! keyword sets that structure `where` trees. Both the completion engine and
//! the validator read these tables, so they can never drift apart.

/// Operation name → permitted root keys, in suggestion order
pub const OPERATIONS: &[(&str, &[&str])] = &[
    (
        "findMany",
        &["where", "select", "include", "orderBy", "take", "skip", "cursor", "distinct"],
    ),
    (
        "findFirst",
        &["where", "select", "include", "orderBy", "take", "skip", "cursor", "distinct"],
    ),
    (
        "findFirstOrThrow",
        &["where", "select", "include", "orderBy", "take", "skip", "cursor", "distinct"],
    ),
    ("findUnique", &["where", "select", "include"]),
    ("findUniqueOrThrow", &["where", "select", "include"]),
    ("create", &["data", "select", "include"]),
    ("createMany", &["data", "skipDuplicates"]),
    ("update", &["where", "data", "select", "include"]),
    ("updateMany", &["where", "data"]),
    ("upsert", &["where", "update", "create", "select", "include"]),
    ("delete", &["where", "select", "include"]),
    ("deleteMany", &["where"]),
    ("count", &["where", "orderBy", "take", "skip", "cursor", "select"]),
    (
        "aggregate",
        &["where", "orderBy", "take", "skip", "cursor", "_count", "_avg", "_sum", "_min", "_max"],
    ),
    (
        "groupBy",
        &["by", "where", "having", "orderBy", "take", "skip", "_count", "_avg", "_sum", "_min", "_max"],
    ),
];

/// Operation name → root keys that must be present
pub const REQUIRED_BLOCKS: &[(&str, &[&str])] = &[
    ("findUnique", &["where"]),
    ("findUniqueOrThrow", &["where"]),
    ("create", &["data"]),
    ("createMany", &["data"]),
    ("update", &["where", "data"]),
    ("updateMany", &["data"]),
    ("upsert", &["where", "update", "create"]),
    ("delete", &["where"]),
    ("groupBy", &["by"]),
];

/// Keywords that select what a nested block does rather than naming a field
pub const OPERATION_KEYWORDS: &[&str] = &["select", "include", "where", "omit", "orderBy"];

/// Logical combinators valid at any level of a `where` tree
pub const COMBINATORS: &[&str] = &["AND", "OR", "NOT"];

/// Quantifiers valid only under relation fields inside `where`
pub const RELATION_OPERATORS: &[&str] = &["every", "none", "some"];

/// Comparison operators valid only under scalar fields inside `where`
pub const FILTER_OPERATORS: &[&str] = &[
    "contains", "startsWith", "endsWith", "in", "notIn", "lt", "lte", "gt", "gte", "equals", "not",
];

/// Aggregation root keys of `aggregate` and `groupBy`
pub const AGGREGATE_KEYS: &[&str] = &["_count", "_avg", "_sum", "_min", "_max"];

/// Root keys whose value is a bare boolean
pub const BOOLEAN_ROOT_KEYS: &[&str] = &["skipDuplicates"];

/// Sort directions accepted by `orderBy`
pub const SORT_DIRECTIONS: &[&str] = &["asc", "desc"];

/// Permitted root keys for an operation, in suggestion order
pub fn root_keys(operation: &str) -> Option<&'static [&'static str]> {
    OPERATIONS
        .iter()
        .find(|(name, _)| *name == operation)
        .map(|(_, keys)| *keys)
}

/// Root keys that must be present for an operation
pub fn required_blocks(operation: &str) -> &'static [&'static str] {
    REQUIRED_BLOCKS
        .iter()
        .find(|(name, _)| *name == operation)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

/// Whether a name is a recognized operation
pub fn is_operation(name: &str) -> bool {
    root_keys(name).is_some()
}

/// Whether a path token is an operation keyword (`select`, `include`, ...)
pub fn is_operation_keyword(token: &str) -> bool {
    OPERATION_KEYWORDS.contains(&token)
}

/// Whether a key is a `where` combinator (`AND`/`OR`/`NOT`)
pub fn is_combinator(key: &str) -> bool {
    COMBINATORS.contains(&key)
}

/// Whether a key is a relation operator (`every`/`none`/`some`)
pub fn is_relation_operator(key: &str) -> bool {
    RELATION_OPERATORS.contains(&key)
}

/// Whether a key is a scalar filter operator
pub fn is_filter_operator(key: &str) -> bool {
    FILTER_OPERATORS.contains(&key)
}

/// Whether a key is an aggregation root key
pub fn is_aggregate_key(key: &str) -> bool {
    AGGREGATE_KEYS.contains(&key)
}

/// Whether a root key takes a bare boolean value
pub fn is_boolean_root_key(key: &str) -> bool {
    BOOLEAN_ROOT_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_many_root_keys_in_table_order() {
        let keys = root_keys("findMany").unwrap();
        assert_eq!(
            keys,
            &["where", "select", "include", "orderBy", "take", "skip", "cursor", "distinct"]
        );
    }

    #[test]
    fn test_unknown_operation() {
        assert!(root_keys("findSome").is_none());
        assert!(!is_operation("findSome"));
        assert!(is_operation("upsert"));
    }

    #[test]
    fn test_required_blocks() {
        assert_eq!(required_blocks("findUnique"), &["where"]);
        assert_eq!(required_blocks("upsert"), &["where", "update", "create"]);
        assert!(required_blocks("findMany").is_empty());
    }

    #[test]
    fn test_keyword_sets_are_disjoint() {
        for op in OPERATION_KEYWORDS {
            assert!(!is_filter_operator(op));
            assert!(!is_relation_operator(op));
            assert!(!is_combinator(op));
        }
        for f in FILTER_OPERATORS {
            assert!(!is_relation_operator(f));
        }
    }
}
