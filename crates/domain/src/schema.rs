use std::collections::HashSet;

use fieldgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::field::{FieldDescriptor, FieldKind, FlexibleLayout};

/// Field group as published by the schema source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    key: NonEmptyString,
    title: NonEmptyString,
    fields: Vec<FieldDescriptor>,
}

impl FieldGroup {
    /// Creates a validated field group.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> AppResult<Self> {
        Ok(Self {
            key: NonEmptyString::new(key)
                .map_err(|_| AppError::Validation("field group key must not be empty".to_owned()))?,
            title: NonEmptyString::new(title).map_err(|_| {
                AppError::Validation("field group title must not be empty".to_owned())
            })?,
            fields,
        })
    }

    /// Returns the group key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the group title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the top-level fields of the group.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// Node produced by the schema walker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    /// A schema field.
    Field(&'a FieldDescriptor),
    /// Display-only row introducing a flexible-content layout.
    Layout(&'a FlexibleLayout),
}

/// One flattened schema node with its nesting depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaEntry<'a> {
    /// Walked node.
    pub node: SchemaNode<'a>,
    /// Nesting depth, zero for top-level fields.
    pub depth: usize,
}

impl<'a> SchemaEntry<'a> {
    /// Returns the node key.
    #[must_use]
    pub fn key(&self) -> &'a str {
        match self.node {
            SchemaNode::Field(field) => field.key(),
            SchemaNode::Layout(layout) => layout.key(),
        }
    }

    /// Returns the node label.
    #[must_use]
    pub fn label(&self) -> &'a str {
        match self.node {
            SchemaNode::Field(field) => field.label(),
            SchemaNode::Layout(layout) => layout.label(),
        }
    }

    /// Returns the node type name; layouts report `layout`.
    #[must_use]
    pub fn type_name(&self) -> &'a str {
        match self.node {
            SchemaNode::Field(field) => field.type_name(),
            SchemaNode::Layout(_) => "layout",
        }
    }

    /// Returns whether the node carries grant checkboxes.
    ///
    /// Tabs, group headers and layout rows are display-only.
    #[must_use]
    pub fn is_permission_bearing(&self) -> bool {
        match self.node {
            SchemaNode::Field(field) => {
                !matches!(field.kind(), FieldKind::Tab | FieldKind::Group { .. })
            }
            SchemaNode::Layout(_) => false,
        }
    }
}

enum Pending<'a> {
    Field(&'a FieldDescriptor, usize),
    Layout(&'a FlexibleLayout, usize),
}

/// Flattens a field tree depth-first in source order.
///
/// Fields whose key was already emitted are skipped together with their
/// subtree. Group and repeater children sit one level below their parent;
/// flexible-content layouts sit one level below the field and their
/// sub-fields one level below the layout.
#[must_use]
pub fn flatten(fields: &[FieldDescriptor]) -> Vec<SchemaEntry<'_>> {
    let mut entries = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Pending<'_>> = fields
        .iter()
        .rev()
        .map(|field| Pending::Field(field, 0))
        .collect();

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Field(field, depth) => {
                if !visited.insert(field.key()) {
                    continue;
                }

                entries.push(SchemaEntry {
                    node: SchemaNode::Field(field),
                    depth,
                });

                for layout in field.kind().layouts().iter().rev() {
                    stack.push(Pending::Layout(layout, depth + 1));
                }
                for child in field.kind().sub_fields().iter().rev() {
                    stack.push(Pending::Field(child, depth + 1));
                }
            }
            Pending::Layout(layout, depth) => {
                entries.push(SchemaEntry {
                    node: SchemaNode::Layout(layout),
                    depth,
                });

                for child in layout.sub_fields().iter().rev() {
                    stack.push(Pending::Field(child, depth + 1));
                }
            }
        }
    }

    entries
}
