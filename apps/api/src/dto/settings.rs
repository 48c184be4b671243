use fieldgate_domain::{
    FieldGroup, GrantTable, MatrixRow, MatrixRowKind, MatrixSection, PermissionMatrix,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Permission matrix rendered by the settings page.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-matrix-response.ts"
)]
pub struct PermissionMatrixResponse {
    pub roles: Vec<String>,
    pub help: String,
    pub sections: Vec<MatrixSectionResponse>,
}

/// Rows of one field group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/matrix-section-response.ts"
)]
pub struct MatrixSectionResponse {
    pub group_key: String,
    pub title: String,
    pub rows: Vec<MatrixRowResponse>,
}

/// One matrix row. Only `field` rows carry checkboxes.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/matrix-row-response.ts"
)]
pub struct MatrixRowResponse {
    pub key: String,
    pub label: String,
    pub type_name: String,
    pub depth: u32,
    #[ts(type = "\"group_header\" | \"tab_header\" | \"field\" | \"layout\"")]
    pub kind: String,
    pub checkboxes: Vec<MatrixCheckboxResponse>,
}

/// Grant checkbox for one role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/matrix-checkbox-response.ts"
)]
pub struct MatrixCheckboxResponse {
    pub role: String,
    pub input_name: String,
    pub checked: bool,
}

/// Outcome of a settings form submission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-permissions-response.ts"
)]
pub struct SavePermissionsResponse {
    pub message: String,
    pub controlled_fields: u32,
}

/// Field groups the host currently registers.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-field-groups-request.ts"
)]
pub struct PublishFieldGroupsRequest {
    #[ts(type = "Array<Record<string, unknown>>")]
    pub field_groups: Vec<FieldGroup>,
}

/// Number of stored field groups.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-field-groups-response.ts"
)]
pub struct PublishFieldGroupsResponse {
    pub published: u32,
}

impl From<PermissionMatrix> for PermissionMatrixResponse {
    fn from(value: PermissionMatrix) -> Self {
        let roles = value.roles;
        let sections = value
            .sections
            .into_iter()
            .map(|section| MatrixSectionResponse::from_section(section, &roles))
            .collect();

        Self {
            help: value.help.to_owned(),
            roles,
            sections,
        }
    }
}

impl MatrixSectionResponse {
    fn from_section(section: MatrixSection, roles: &[String]) -> Self {
        Self {
            group_key: section.group_key,
            title: section.title,
            rows: section
                .rows
                .into_iter()
                .map(|row| MatrixRowResponse::from_row(row, roles))
                .collect(),
        }
    }
}

impl MatrixRowResponse {
    fn from_row(row: MatrixRow, roles: &[String]) -> Self {
        let checkboxes = if row.kind == MatrixRowKind::Field {
            roles
                .iter()
                .map(|role| MatrixCheckboxResponse {
                    role: role.clone(),
                    input_name: GrantTable::form_input_name(row.key.as_str(), role),
                    checked: row.granted_roles.contains(role),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            kind: match row.kind {
                MatrixRowKind::GroupHeader => "group_header",
                MatrixRowKind::TabHeader => "tab_header",
                MatrixRowKind::Field => "field",
                MatrixRowKind::Layout => "layout",
            }
            .to_owned(),
            depth: u32::try_from(row.depth).unwrap_or(u32::MAX),
            key: row.key,
            label: row.label,
            type_name: row.type_name,
            checkboxes,
        }
    }
}
