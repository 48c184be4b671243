use std::collections::BTreeSet;

use serde::Serialize;

use crate::field::FieldKind;
use crate::grant::GrantTable;
use crate::schema::{FieldGroup, SchemaEntry, SchemaNode, flatten};

/// Presentation kind of one matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixRowKind {
    /// Header row for a group field.
    GroupHeader,
    /// Header row for a tab separator.
    TabHeader,
    /// Row with one grant checkbox per role.
    Field,
    /// Display-only row for a flexible-content layout.
    Layout,
}

/// One row of the permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    /// Field or layout key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Host type name, `layout` for layout rows.
    pub type_name: String,
    /// Nesting depth used for indentation.
    pub depth: usize,
    /// Presentation kind.
    pub kind: MatrixRowKind,
    /// Roles whose checkbox is checked.
    pub granted_roles: BTreeSet<String>,
}

/// Rows of one field group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixSection {
    /// Field group key.
    pub group_key: String,
    /// Field group title.
    pub title: String,
    /// Flattened rows.
    pub rows: Vec<MatrixRow>,
}

/// Settings page projection: field groups against configurable roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionMatrix {
    /// Role columns in display order.
    pub roles: Vec<String>,
    /// One section per field group.
    pub sections: Vec<MatrixSection>,
    /// Help text describing the unconfigured-field default.
    pub help: &'static str,
}

impl PermissionMatrix {
    /// Builds the matrix for the given groups, role columns and stored grants.
    #[must_use]
    pub fn build(groups: &[FieldGroup], roles: &[String], grants: &GrantTable) -> Self {
        let sections = groups
            .iter()
            .map(|group| MatrixSection {
                group_key: group.key().to_owned(),
                title: group.title().to_owned(),
                rows: flatten(group.fields())
                    .iter()
                    .map(|entry| row(entry, roles, grants))
                    .collect(),
            })
            .collect();

        Self {
            roles: roles.to_vec(),
            sections,
            help: GrantTable::UNCONFIGURED_FIELD_HELP,
        }
    }
}

fn row(entry: &SchemaEntry<'_>, roles: &[String], grants: &GrantTable) -> MatrixRow {
    let kind = match entry.node {
        SchemaNode::Layout(_) => MatrixRowKind::Layout,
        SchemaNode::Field(field) => match field.kind() {
            FieldKind::Group { .. } => MatrixRowKind::GroupHeader,
            FieldKind::Tab => MatrixRowKind::TabHeader,
            _ => MatrixRowKind::Field,
        },
    };

    let granted_roles = if entry.is_permission_bearing() {
        roles
            .iter()
            .filter(|role| grants.is_granted(entry.key(), role))
            .cloned()
            .collect()
    } else {
        BTreeSet::new()
    };

    MatrixRow {
        key: entry.key().to_owned(),
        label: entry.label().to_owned(),
        type_name: entry.type_name().to_owned(),
        depth: entry.depth,
        kind,
        granted_roles,
    }
}
