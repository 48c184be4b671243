//! Application services and ports.

#![forbid(unsafe_code)]

mod field_permission_ports;
mod field_permission_service;
mod permission_matrix_service;
mod role_ports;
mod role_provisioning_service;

pub use field_permission_ports::{FieldSchemaSource, FieldValueStore, GrantTableRepository};
pub use field_permission_service::FieldPermissionService;
pub use permission_matrix_service::PermissionMatrixService;
pub use role_ports::RoleRepository;
pub use role_provisioning_service::{RoleProvisioningReport, RoleProvisioningService};
