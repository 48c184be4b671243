use std::sync::Arc;

use fieldgate_core::{AppResult, EntityId, UserIdentity};
use fieldgate_domain::{FieldAccess, FieldDescriptor, FieldPolicy};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{FieldValueStore, GrantTableRepository};

mod render;
mod write;


/// Application service behind the host's field load and value update hooks.
#[derive(Clone)]
pub struct FieldPermissionService {
    grant_repository: Arc<dyn GrantTableRepository>,
    value_store: Arc<dyn FieldValueStore>,
    policy: FieldPolicy,
}

impl FieldPermissionService {
    /// Creates a service from its ports and enforcement policy.
    #[must_use]
    pub fn new(
        grant_repository: Arc<dyn GrantTableRepository>,
        value_store: Arc<dyn FieldValueStore>,
        policy: FieldPolicy,
    ) -> Self {
        Self {
            grant_repository,
            value_store,
            policy,
        }
    }

    /// Returns the enforcement policy.
    #[must_use]
    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }
}
