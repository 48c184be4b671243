//! Field permission domain: schema model, grant table and enforcement rules.

#![forbid(unsafe_code)]

mod access;
mod enforcement;
mod field;
mod grant;
mod matrix;
mod menu;
mod role;
mod schema;

pub use access::{ADMINISTRATOR_CAPABILITY, AccessGate, MANAGE_OPTIONS_CAPABILITY};
pub use enforcement::{DEFAULT_DENIED_NOTICE, DEFAULT_EXEMPT_FIELD, FieldPolicy, WritePlan};
pub use field::{
    DISABLED_FIELD_CLASS, FieldDescriptor, FieldKind, FlexibleLayout, LINK_BUTTON_DISABLED_CLASS,
    WysiwygToolbar,
};
pub use grant::{FieldAccess, GrantTable, PERMISSIONS_FORM_FIELD};
pub use matrix::{MatrixRow, MatrixRowKind, MatrixSection, PermissionMatrix};
pub use menu::{
    AdminMenu, AdminMenuPolicy, CONSULTANT_ALLOWED_MENUS, ChromeDecisions,
    FRANCHISEE_DENIED_META_CAPABILITIES, FRANCHISEE_HIDDEN_MENUS, MenuItem, SubmenuItem,
};
pub use role::{
    ADMINISTRATOR_ROLE, CustomRole, DASHBOARD_CAPABILITIES, EDITOR_ROLE, ESTATE_SALE_CAPABILITIES,
    FORM_PLUGIN_CAPABILITIES, PAGE_MANAGEMENT_CAPABILITIES, RoleDefinition,
};
pub use schema::{FieldGroup, SchemaEntry, SchemaNode, flatten};
