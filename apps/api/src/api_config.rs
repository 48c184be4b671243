use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use fieldgate_core::AppError;
use fieldgate_domain::{
    ADMINISTRATOR_CAPABILITY, CustomRole, DEFAULT_DENIED_NOTICE, DEFAULT_EXEMPT_FIELD,
};
use tracing_subscriber::EnvFilter;

const HOST_TOKEN_MIN_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendConfig {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicyConfig {
    pub exempt_fields: Vec<String>,
    pub elevated_roles: Vec<String>,
    pub administrator_capabilities: Vec<String>,
    pub matrix_roles: Vec<String>,
    pub denied_notice: String,
}

impl Default for FieldPolicyConfig {
    fn default() -> Self {
        Self {
            exempt_fields: vec![DEFAULT_EXEMPT_FIELD.to_owned()],
            elevated_roles: vec![CustomRole::FranchiseBusinessConsultant.as_str().to_owned()],
            administrator_capabilities: vec![ADMINISTRATOR_CAPABILITY.to_owned()],
            matrix_roles: CustomRole::matrix_defaults()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            denied_notice: DEFAULT_DENIED_NOTICE.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub host_token: String,
    pub storage: StorageBackendConfig,
    pub field_policy: FieldPolicyConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let host_token = required_non_empty_env("FIELDGATE_HOST_TOKEN")?;
        if host_token.len() < HOST_TOKEN_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "FIELDGATE_HOST_TOKEN must be at least {HOST_TOKEN_MIN_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => StorageBackendConfig::Memory,
            "postgres" => StorageBackendConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let defaults = FieldPolicyConfig::default();
        let field_policy = FieldPolicyConfig {
            exempt_fields: list_env("FIELD_POLICY_EXEMPT_FIELDS", defaults.exempt_fields),
            elevated_roles: list_env("FIELD_POLICY_ELEVATED_ROLES", defaults.elevated_roles),
            administrator_capabilities: list_env(
                "FIELD_POLICY_ADMIN_CAPABILITIES",
                defaults.administrator_capabilities,
            ),
            matrix_roles: list_env("FIELD_POLICY_MATRIX_ROLES", defaults.matrix_roles),
            denied_notice: env::var("FIELD_POLICY_DENIED_NOTICE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.denied_notice),
        };

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            host_token,
            storage,
            field_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Splits a comma separated list, dropping blank entries.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn list_env(name: &str, default: Vec<String>) -> Vec<String> {
    env::var(name)
        .ok()
        .map(|value| parse_list(value.as_str()))
        .filter(|entries| !entries.is_empty())
        .unwrap_or(default)
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ApiConfig, FieldPolicyConfig, StorageBackendConfig, parse_list};

    #[test]
    fn parse_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_list(" fsm_restricted, ,corporate,franchisee "),
            vec!["fsm_restricted", "corporate", "franchisee"]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn default_policy_matches_plugin_defaults() {
        let defaults = FieldPolicyConfig::default();

        assert_eq!(defaults.exempt_fields, vec!["iframe_embed_code"]);
        assert_eq!(defaults.elevated_roles, vec!["franchise_business_consultant"]);
        assert_eq!(
            defaults.matrix_roles,
            vec!["fsm_restricted", "corporate", "franchisee"]
        );
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let config = ApiConfig {
            migrate_only: false,
            api_host: "localhost".to_owned(),
            api_port: 3001,
            host_token: "x".repeat(32),
            storage: StorageBackendConfig::Memory,
            field_policy: FieldPolicyConfig::default(),
        };

        assert!(config.socket_address().is_err());
    }

    proptest! {
        #[test]
        fn parse_list_entries_are_trimmed_and_non_empty(value in "[a-z_ ,]{0,40}") {
            for entry in parse_list(value.as_str()) {
                prop_assert!(!entry.is_empty());
                prop_assert_eq!(entry.trim(), entry.as_str());
                prop_assert!(!entry.contains(','));
            }
        }
    }
}
