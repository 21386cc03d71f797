// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query validator
//!
//! Walks the *entire* argument of every discovered call, independent of any
//! cursor, and collects diagnostics. The walk is failure-tolerant by
//! contract: a finding on one entry never stops validation of its siblings.
//!
//! Schema-independent rules (required blocks, select/include exclusivity,
//! root-key vocabulary) run even when the model cannot be resolved; every
//! schema-dependent rule silently stands down when the catalog has no answer,
//! matching the degraded-catalog behavior of the rest of the pipeline.

use tracing::debug;

use fluent_query_lsp_catalog::{FieldMetadata, ModelMetadata, SchemaCatalog};
use fluent_query_lsp_context::operations::{
    is_combinator, is_filter_operator, is_relation_operator, required_blocks, root_keys,
};
use fluent_query_lsp_context::discover_calls;
use fluent_query_lsp_syntax::{BlockNode, CallExpr, EntryNode, Span, ValueNode};

use crate::diagnostic::Diagnostic;
use crate::issue::ValidationIssue;

/// How a selection block interprets its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionMode {
    Select,
    Include,
    Omit,
}

/// Validator engine over a schema catalog
pub struct QueryValidator<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> QueryValidator<'a> {
    /// Create a validator backed by the given catalog
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Validate every recognized call in a document
    pub fn validate_source(&self, source: &str, base_token: &str) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for call in discover_calls(source, base_token) {
            self.validate_call(&call, &mut out);
        }
        debug!(count = out.len(), "document validation finished");
        out
    }

    /// Validate a single call
    pub fn validate_call(&self, call: &CallExpr, out: &mut Vec<Diagnostic>) {
        match &call.argument {
            Some(ValueNode::Block(block)) => {
                self.check_required_blocks(call, Some(block), out);
                self.check_exclusivity(block, out);
                self.check_root_keys(call, block, out);
                if let Some(model) = self.catalog.model(&call.model) {
                    self.check_root_entries(call, block, model, out);
                }
            }
            // A runtime-built argument cannot be inspected statically
            Some(_) => {}
            None => self.check_required_blocks(call, None, out),
        }
    }

    // -------------------------------------------------------------------------
    // Call-level rules
    // -------------------------------------------------------------------------

    fn check_required_blocks(
        &self,
        call: &CallExpr,
        block: Option<&BlockNode>,
        out: &mut Vec<Diagnostic>,
    ) {
        for required in required_blocks(&call.operation) {
            if block.is_none_or(|b| !b.has_key(required)) {
                out.push(Diagnostic::from_issue(
                    call.operation_span,
                    ValidationIssue::MissingRequiredBlock {
                        operation: call.operation.clone(),
                        block: (*required).to_string(),
                    },
                ));
            }
        }
    }

    /// One diagnostic per offending key when `select` and `include` share a
    /// block level.
    fn check_exclusivity(&self, block: &BlockNode, out: &mut Vec<Diagnostic>) {
        if !(block.has_key("select") && block.has_key("include")) {
            return;
        }
        for entry in &block.entries {
            if matches!(entry.key_string(), Some("select") | Some("include")) {
                out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::SelectIncludeExclusive,
                ));
            }
        }
    }

    fn check_root_keys(&self, call: &CallExpr, block: &BlockNode, out: &mut Vec<Diagnostic>) {
        let permitted = root_keys(&call.operation).unwrap_or(&[]);
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            if !permitted.contains(&key) {
                out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::UnknownOption {
                        key: key.to_string(),
                        operation: call.operation.clone(),
                    },
                ));
            }
        }
    }

    fn check_root_entries(
        &self,
        call: &CallExpr,
        block: &BlockNode,
        model: &ModelMetadata,
        out: &mut Vec<Diagnostic>,
    ) {
        let permitted = root_keys(&call.operation).unwrap_or(&[]);
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            // Unknown options were already flagged; do not validate inside them
            if !permitted.contains(&key) {
                continue;
            }
            match key {
                "where" | "having" => {
                    if let Some(b) = entry.value.as_block() {
                        self.where_block(b, model, out);
                    }
                }
                "select" => self.selection_value(&entry.value, model, SelectionMode::Select, out),
                "include" => self.selection_value(&entry.value, model, SelectionMode::Include, out),
                "omit" => self.selection_value(&entry.value, model, SelectionMode::Omit, out),
                "data" | "update" | "create" => {
                    if let Some(b) = entry.value.as_block() {
                        self.data_block(b, model, out);
                    }
                }
                "orderBy" => self.order_by_value(&entry.value, model, out),
                "by" | "distinct" => self.column_list_value(key, &entry.value, model, out),
                "take" | "skip" => self.int_value(key, &entry.value, out),
                "cursor" => {
                    if let Some(b) = entry.value.as_block() {
                        self.data_block(b, model, out);
                    }
                }
                "skipDuplicates" => self.bool_value(key, &entry.value, out),
                "_count" | "_avg" | "_sum" | "_min" | "_max" => {
                    self.aggregation_value(key, &entry.value, model, out);
                }
                _ => {}
            }
        }
    }

    // -------------------------------------------------------------------------
    // where
    // -------------------------------------------------------------------------

    fn where_block(&self, block: &BlockNode, model: &ModelMetadata, out: &mut Vec<Diagnostic>) {
        for entry in &block.entries {
            self.where_entry(entry, model, out);
        }
    }

    fn where_entry(&self, entry: &EntryNode, model: &ModelMetadata, out: &mut Vec<Diagnostic>) {
        let Some(key) = entry.key_string() else {
            return;
        };
        if is_combinator(key) {
            if let Some(b) = entry.value.as_block() {
                if b.is_list() {
                    for element in &b.entries {
                        if let Some(inner) = element.value.as_block() {
                            self.where_block(inner, model, out);
                        }
                    }
                } else {
                    self.where_block(b, model, out);
                }
            }
            return;
        }
        match model.field(key) {
            None => out.push(Diagnostic::from_issue(
                key_span(entry),
                ValidationIssue::UnknownColumn {
                    column: key.to_string(),
                    model: model.name.clone(),
                },
            )),
            Some(field) if field.is_relation => self.relation_condition(entry, field, out),
            Some(field) => self.scalar_condition(entry, field, out),
        }
    }

    /// A relation column inside `where` takes `every`/`none`/`some` blocks,
    /// or direct conditions on the target model for to-one traversal. Filter
    /// operators are rejected here, as relation operators are on scalars.
    fn relation_condition(
        &self,
        entry: &EntryNode,
        field: &FieldMetadata,
        out: &mut Vec<Diagnostic>,
    ) {
        let Some(target) = self.catalog.relation_target(field) else {
            return;
        };
        let Some(block) = entry.value.as_block() else {
            return;
        };
        for inner in &block.entries {
            let Some(key) = inner.key_string() else {
                continue;
            };
            if is_relation_operator(key) {
                if let Some(b) = inner.value.as_block() {
                    self.where_block(b, target, out);
                }
            } else if is_filter_operator(key) {
                out.push(Diagnostic::from_issue(
                    key_span(inner),
                    ValidationIssue::RelationNeedsQuantifier {
                        column: field.name.clone(),
                    },
                ));
            } else {
                self.where_entry(inner, target, out);
            }
        }
    }

    fn scalar_condition(
        &self,
        entry: &EntryNode,
        field: &FieldMetadata,
        out: &mut Vec<Diagnostic>,
    ) {
        match &entry.value {
            ValueNode::Block(block) => self.filter_block(block, field, out),
            value => self.scalar_literal(field, value, out),
        }
    }

    fn filter_block(&self, block: &BlockNode, field: &FieldMetadata, out: &mut Vec<Diagnostic>) {
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            if is_relation_operator(key) {
                out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::RelationOperatorOnScalar {
                        operator: key.to_string(),
                        column: field.name.clone(),
                    },
                ));
                continue;
            }
            if !is_filter_operator(key) {
                out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::InvalidOperator {
                        operator: key.to_string(),
                    },
                ));
                continue;
            }
            match key {
                "in" | "notIn" => match &entry.value {
                    ValueNode::Block(b) if b.is_list() => {
                        for element in &b.entries {
                            self.scalar_literal(field, &element.value, out);
                        }
                    }
                    value if value.is_runtime() => {}
                    value => out.push(Diagnostic::from_issue(
                        value.span(),
                        ValidationIssue::ExpectsArray {
                            operator: key.to_string(),
                        },
                    )),
                },
                "not" => match &entry.value {
                    ValueNode::Block(b) => self.filter_block(b, field, out),
                    value => self.scalar_literal(field, value, out),
                },
                _ => match &entry.value {
                    ValueNode::Block(b) => out.push(Diagnostic::from_issue(
                        b.span,
                        ValidationIssue::TypeMismatch {
                            column: field.name.clone(),
                            expected: field.field_type.clone(),
                        },
                    )),
                    value => self.scalar_literal(field, value, out),
                },
            }
        }
    }

    // -------------------------------------------------------------------------
    // select / include / omit
    // -------------------------------------------------------------------------

    fn selection_value(
        &self,
        value: &ValueNode,
        model: &ModelMetadata,
        mode: SelectionMode,
        out: &mut Vec<Diagnostic>,
    ) {
        if let Some(block) = value.as_block() {
            self.selection_block(block, model, mode, out);
        }
    }

    fn selection_block(
        &self,
        block: &BlockNode,
        model: &ModelMetadata,
        mode: SelectionMode,
        out: &mut Vec<Diagnostic>,
    ) {
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            if key == "_count" && mode != SelectionMode::Omit {
                self.count_entry(entry, model, out);
                continue;
            }
            match model.field(key) {
                None => out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::UnknownColumn {
                        column: key.to_string(),
                        model: model.name.clone(),
                    },
                )),
                Some(field) if field.is_relation => match &entry.value {
                    ValueNode::Block(nested) => {
                        if let Some(target) = self.catalog.relation_target(field) {
                            self.nested_relation_args(nested, target, out);
                        }
                    }
                    ValueNode::Bool(_) => {}
                    value if value.is_runtime() => {}
                    value => out.push(Diagnostic::from_issue(
                        value.span(),
                        ValidationIssue::NonBooleanSelection {
                            column: key.to_string(),
                        },
                    )),
                },
                Some(_) => {
                    if mode == SelectionMode::Include {
                        out.push(Diagnostic::from_issue(
                            key_span(entry),
                            ValidationIssue::IncludeScalar {
                                column: key.to_string(),
                            },
                        ));
                        continue;
                    }
                    match &entry.value {
                        ValueNode::Bool(_) => {}
                        value if value.is_runtime() => {}
                        value => out.push(Diagnostic::from_issue(
                            value.span(),
                            ValidationIssue::NonBooleanSelection {
                                column: key.to_string(),
                            },
                        )),
                    }
                }
            }
        }
    }

    /// `_count` accepts `true` or a block whose only key is `select`
    fn count_entry(&self, entry: &EntryNode, model: &ModelMetadata, out: &mut Vec<Diagnostic>) {
        match &entry.value {
            ValueNode::Bool(_) => {}
            value if value.is_runtime() => {}
            ValueNode::Block(block) => {
                for inner in &block.entries {
                    let Some(key) = inner.key_string() else {
                        continue;
                    };
                    if key != "select" {
                        out.push(Diagnostic::from_issue(
                            key_span(inner),
                            ValidationIssue::CountOnlySelect,
                        ));
                        continue;
                    }
                    self.aggregation_value("_count", &inner.value, model, out);
                }
            }
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::NonBooleanSelection {
                    column: "_count".to_string(),
                },
            )),
        }
    }

    /// A relation block nested in a selection reads like a sub-query
    /// argument, scoped to the relation's target model.
    fn nested_relation_args(
        &self,
        block: &BlockNode,
        model: &ModelMetadata,
        out: &mut Vec<Diagnostic>,
    ) {
        self.check_exclusivity(block, out);
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            match key {
                "select" => self.selection_value(&entry.value, model, SelectionMode::Select, out),
                "include" => self.selection_value(&entry.value, model, SelectionMode::Include, out),
                "omit" => self.selection_value(&entry.value, model, SelectionMode::Omit, out),
                "where" => {
                    if let Some(b) = entry.value.as_block() {
                        self.where_block(b, model, out);
                    }
                }
                "orderBy" => self.order_by_value(&entry.value, model, out),
                "take" | "skip" => self.int_value(key, &entry.value, out),
                "cursor" => {
                    if let Some(b) = entry.value.as_block() {
                        self.data_block(b, model, out);
                    }
                }
                "distinct" => self.column_list_value(key, &entry.value, model, out),
                _ => {}
            }
        }
    }

    // -------------------------------------------------------------------------
    // data / orderBy / by / aggregates / scalar options
    // -------------------------------------------------------------------------

    fn data_block(&self, block: &BlockNode, model: &ModelMetadata, out: &mut Vec<Diagnostic>) {
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            match model.field(key) {
                None => out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::UnknownColumn {
                        column: key.to_string(),
                        model: model.name.clone(),
                    },
                )),
                // Nested-write payloads are resolved by the engine at runtime
                Some(field) if field.is_relation => {}
                Some(field) if field.is_list => match &entry.value {
                    ValueNode::Block(b) if b.is_list() => {
                        for element in &b.entries {
                            self.scalar_literal(field, &element.value, out);
                        }
                    }
                    _ => {}
                },
                Some(field) => self.scalar_literal(field, &entry.value, out),
            }
        }
    }

    fn order_by_value(&self, value: &ValueNode, model: &ModelMetadata, out: &mut Vec<Diagnostic>) {
        match value {
            value if value.is_runtime() => {}
            ValueNode::Block(block) if block.is_list() && !block.entries.is_empty() => {
                for element in &block.entries {
                    if let Some(inner) = element.value.as_block() {
                        self.order_by_block(inner, model, out);
                    }
                }
            }
            ValueNode::Block(block) => self.order_by_block(block, model, out),
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::InvalidSortDirection,
            )),
        }
    }

    fn order_by_block(&self, block: &BlockNode, model: &ModelMetadata, out: &mut Vec<Diagnostic>) {
        for entry in &block.entries {
            let Some(key) = entry.key_string() else {
                continue;
            };
            match model.field(key) {
                None => out.push(Diagnostic::from_issue(
                    key_span(entry),
                    ValidationIssue::UnknownColumn {
                        column: key.to_string(),
                        model: model.name.clone(),
                    },
                )),
                Some(field) if field.is_relation => match &entry.value {
                    ValueNode::Block(inner) => {
                        if let Some(target) = self.catalog.relation_target(field) {
                            self.order_by_block(inner, target, out);
                        }
                    }
                    value => self.sort_direction(value, out),
                },
                Some(_) => self.sort_direction(&entry.value, out),
            }
        }
    }

    fn sort_direction(&self, value: &ValueNode, out: &mut Vec<Diagnostic>) {
        match value {
            ValueNode::Str(s) if s.value == "asc" || s.value == "desc" => {}
            value if value.is_runtime() => {}
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::InvalidSortDirection,
            )),
        }
    }

    fn column_list_value(
        &self,
        key: &str,
        value: &ValueNode,
        model: &ModelMetadata,
        out: &mut Vec<Diagnostic>,
    ) {
        match value {
            value if value.is_runtime() => {}
            ValueNode::Block(block) => {
                for element in &block.entries {
                    if element.key.is_some() {
                        out.push(Diagnostic::from_issue(
                            element.span,
                            ValidationIssue::ExpectsColumnList {
                                key: key.to_string(),
                            },
                        ));
                        continue;
                    }
                    match &element.value {
                        ValueNode::Str(s) => {
                            if !model.has_field(&s.value) {
                                out.push(Diagnostic::from_issue(
                                    element.value.span(),
                                    ValidationIssue::UnknownColumn {
                                        column: s.value.clone(),
                                        model: model.name.clone(),
                                    },
                                ));
                            }
                        }
                        element_value if element_value.is_runtime() => {}
                        element_value => out.push(Diagnostic::from_issue(
                            element_value.span(),
                            ValidationIssue::ExpectsColumnList {
                                key: key.to_string(),
                            },
                        )),
                    }
                }
            }
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::ExpectsColumnList {
                    key: key.to_string(),
                },
            )),
        }
    }

    fn aggregation_value(
        &self,
        key: &str,
        value: &ValueNode,
        model: &ModelMetadata,
        out: &mut Vec<Diagnostic>,
    ) {
        match value {
            ValueNode::Bool(_) => {}
            value if value.is_runtime() => {}
            ValueNode::Block(block) => {
                for entry in &block.entries {
                    let Some(column) = entry.key_string() else {
                        continue;
                    };
                    if column != "_all" && model.field(column).is_none() {
                        out.push(Diagnostic::from_issue(
                            key_span(entry),
                            ValidationIssue::UnknownColumn {
                                column: column.to_string(),
                                model: model.name.clone(),
                            },
                        ));
                        continue;
                    }
                    match &entry.value {
                        ValueNode::Bool(_) => {}
                        value if value.is_runtime() => {}
                        value => out.push(Diagnostic::from_issue(
                            value.span(),
                            ValidationIssue::NonBooleanSelection {
                                column: column.to_string(),
                            },
                        )),
                    }
                }
            }
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::ExpectsBoolean {
                    key: key.to_string(),
                },
            )),
        }
    }

    fn int_value(&self, key: &str, value: &ValueNode, out: &mut Vec<Diagnostic>) {
        match value {
            ValueNode::Number(n) if !n.is_float => {}
            value if value.is_runtime() => {}
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::ExpectsInt {
                    key: key.to_string(),
                },
            )),
        }
    }

    fn bool_value(&self, key: &str, value: &ValueNode, out: &mut Vec<Diagnostic>) {
        match value {
            ValueNode::Bool(_) => {}
            value if value.is_runtime() => {}
            value => out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::ExpectsBoolean {
                    key: key.to_string(),
                },
            )),
        }
    }

    /// Check a scalar leaf literal against the column's declared type.
    /// Runtime-typed values always pass; nullable columns accept an explicit
    /// null; booleans tolerate leading negation.
    fn scalar_literal(&self, field: &FieldMetadata, value: &ValueNode, out: &mut Vec<Diagnostic>) {
        if value.is_runtime() {
            return;
        }
        if let ValueNode::Null(span) = value {
            if !field.nullable {
                out.push(Diagnostic::from_issue(
                    *span,
                    ValidationIssue::NotNullable {
                        column: field.name.clone(),
                    },
                ));
            }
            return;
        }
        let matches = match field.field_type.as_str() {
            "Int" | "BigInt" => matches!(value, ValueNode::Number(n) if !n.is_float),
            "Float" | "Decimal" => matches!(value, ValueNode::Number(_)),
            "String" | "DateTime" | "Bytes" => matches!(value, ValueNode::Str(_)),
            "Boolean" => matches!(value, ValueNode::Bool(_)),
            "Json" => true,
            // Enum-typed columns: any scalar literal is plausible
            _ => !matches!(value, ValueNode::Block(_)),
        };
        if !matches {
            out.push(Diagnostic::from_issue(
                value.span(),
                ValidationIssue::TypeMismatch {
                    column: field.name.clone(),
                    expected: field.field_type.clone(),
                },
            ));
        }
    }
}

fn key_span(entry: &EntryNode) -> Span {
    entry.key_span().unwrap_or(entry.span)
}
