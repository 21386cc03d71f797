// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Shared test fixtures
//!
//! A blog-shaped schema (User ↔ Post, plus a Profile to-one) used across the
//! crates' test suites, and the cursor-marker helper for completion tests.

use fluent_query_lsp_catalog::SchemaCatalog;

use crate::mock_catalog::MockCatalogBuilder;

/// Schema description JSON matching [`blog_catalog`]
pub const BLOG_SCHEMA_JSON: &str = r#"{
    "datamodel": {
        "models": [
            {
                "name": "User",
                "fields": [
                    {"name": "id", "type": "Int", "isRequired": true, "hasDefaultValue": true},
                    {"name": "name", "type": "String", "isRequired": true},
                    {"name": "email", "type": "String", "isRequired": true},
                    {"name": "age", "type": "Int", "isRequired": true},
                    {"name": "bio", "type": "String", "isRequired": false},
                    {"name": "active", "type": "Boolean", "isRequired": true},
                    {"name": "posts", "type": "Post", "isList": true, "relationName": "PostToUser"},
                    {"name": "profile", "type": "Profile", "relationName": "ProfileToUser"}
                ]
            },
            {
                "name": "Post",
                "fields": [
                    {"name": "id", "type": "Int", "isRequired": true, "hasDefaultValue": true},
                    {"name": "title", "type": "String", "isRequired": true},
                    {"name": "views", "type": "Int", "isRequired": true},
                    {"name": "author", "type": "User", "relationName": "PostToUser"}
                ]
            },
            {
                "name": "Profile",
                "fields": [
                    {"name": "id", "type": "Int", "isRequired": true, "hasDefaultValue": true},
                    {"name": "handle", "type": "String", "isRequired": true}
                ]
            }
        ]
    }
}"#;

/// The blog catalog all cross-crate tests share
pub fn blog_catalog() -> SchemaCatalog {
    MockCatalogBuilder::new()
        .with_model(
            "User",
            &[
                ("id", "Int"),
                ("name", "String"),
                ("email", "String"),
                ("age", "Int"),
                ("bio", "String?"),
                ("active", "Boolean"),
                ("posts", "Post[]"),
                ("profile", "Profile"),
            ],
        )
        .with_model(
            "Post",
            &[
                ("id", "Int"),
                ("title", "String"),
                ("views", "Int"),
                ("author", "User"),
            ],
        )
        .with_model("Profile", &[("id", "Int"), ("handle", "String")])
        .build()
}

/// Split a source with a `|` cursor marker into (source, byte offset)
///
/// # Panics
///
/// Panics when the marker is missing; that is a broken test, not input.
pub fn cursor_marker(marked: &str) -> (String, usize) {
    let offset = marked.find('|').expect("source fixture must contain a | cursor marker");
    (marked.replacen('|', "", 1), offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_catalog_shape() {
        let catalog = blog_catalog();
        assert_eq!(catalog.len(), 3);
        let user = catalog.model("user").unwrap();
        assert!(user.field("posts").unwrap().is_relation);
        assert!(user.field("profile").unwrap().is_relation);
        assert!(!user.field("profile").unwrap().is_list);
    }

    #[test]
    fn test_blog_schema_json_parses_identically() {
        let from_json = SchemaCatalog::from_json(BLOG_SCHEMA_JSON).unwrap();
        assert_eq!(from_json.len(), 3);
        assert!(from_json.model("post").unwrap().field("author").unwrap().is_relation);
    }

    #[test]
    fn test_cursor_marker() {
        let (source, offset) = cursor_marker("ab|cd");
        assert_eq!(source, "abcd");
        assert_eq!(offset, 2);
    }
}
