use std::sync::Arc;

use fieldgate_application::{
    FieldPermissionService, FieldSchemaSource, FieldValueStore, GrantTableRepository,
    PermissionMatrixService, RoleProvisioningService, RoleRepository,
};
use fieldgate_core::AppError;
use fieldgate_domain::{AccessGate, AdminMenuPolicy, FieldPolicy};
use fieldgate_infrastructure::{
    InMemoryFieldSchemaSource, InMemoryFieldValueStore, InMemoryGrantTableRepository,
    InMemoryRoleRepository, PostgresFieldSchemaSource, PostgresFieldValueStore,
    PostgresGrantTableRepository, PostgresRoleRepository,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::api_config::{ApiConfig, FieldPolicyConfig};
use crate::state::AppState;

/// Port implementations selected by the storage backend.
#[derive(Clone)]
pub struct StoragePorts {
    pub grants: Arc<dyn GrantTableRepository>,
    pub schema: Arc<dyn FieldSchemaSource>,
    pub values: Arc<dyn FieldValueStore>,
    pub roles: Arc<dyn RoleRepository>,
}

impl StoragePorts {
    pub fn in_memory() -> Self {
        Self {
            grants: Arc::new(InMemoryGrantTableRepository::new()),
            schema: Arc::new(InMemoryFieldSchemaSource::new()),
            values: Arc::new(InMemoryFieldValueStore::new()),
            roles: Arc::new(InMemoryRoleRepository::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            grants: Arc::new(PostgresGrantTableRepository::new(pool.clone())),
            schema: Arc::new(PostgresFieldSchemaSource::new(pool.clone())),
            values: Arc::new(PostgresFieldValueStore::new(pool.clone())),
            roles: Arc::new(PostgresRoleRepository::new(pool)),
        }
    }
}

pub async fn connect_database(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub fn build_app_state(config: &ApiConfig, ports: StoragePorts) -> Result<AppState, AppError> {
    build_state_with_policy(&config.field_policy, config.host_token.as_str(), ports)
}

pub fn build_state_with_policy(
    policy: &FieldPolicyConfig,
    host_token: &str,
    ports: StoragePorts,
) -> Result<AppState, AppError> {
    let gate = AccessGate::new(
        policy.administrator_capabilities.iter().cloned(),
        policy.elevated_roles.iter().cloned(),
    );
    let field_policy = FieldPolicy::new(
        gate.clone(),
        policy.exempt_fields.iter().cloned(),
        policy.denied_notice.as_str(),
    )?;

    Ok(AppState {
        field_permission_service: FieldPermissionService::new(
            ports.grants.clone(),
            ports.values,
            field_policy,
        ),
        permission_matrix_service: PermissionMatrixService::new(
            ports.grants,
            ports.schema,
            gate.clone(),
        )
        .with_matrix_roles(policy.matrix_roles.iter().cloned())?,
        role_provisioning_service: RoleProvisioningService::new(ports.roles, gate.clone()),
        admin_menu_policy: AdminMenuPolicy::new(gate),
        host_token: Arc::from(host_token),
    })
}
