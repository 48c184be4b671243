use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fieldgate_core::{AppError, AppResult, SiteId, UserIdentity};
use fieldgate_domain::{AccessGate, FieldDescriptor, FieldGroup, FieldKind, GrantTable};
use tokio::sync::Mutex;

use crate::{FieldSchemaSource, GrantTableRepository};

use super::PermissionMatrixService;

#[derive(Default)]
struct FakeGrantTableRepository {
    tables: Mutex<HashMap<SiteId, GrantTable>>,
}

#[async_trait]
impl GrantTableRepository for FakeGrantTableRepository {
    async fn load_grant_table(&self, site_id: SiteId) -> AppResult<GrantTable> {
        Ok(self
            .tables
            .lock()
            .await
            .get(&site_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_grant_table(&self, site_id: SiteId, table: GrantTable) -> AppResult<()> {
        self.tables.lock().await.insert(site_id, table);
        Ok(())
    }
}

#[derive(Default)]
struct FakeFieldSchemaSource {
    groups: Mutex<HashMap<SiteId, Vec<FieldGroup>>>,
}

#[async_trait]
impl FieldSchemaSource for FakeFieldSchemaSource {
    async fn list_field_groups(&self, site_id: SiteId) -> AppResult<Vec<FieldGroup>> {
        Ok(self
            .groups
            .lock()
            .await
            .get(&site_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_field_groups(&self, site_id: SiteId, groups: Vec<FieldGroup>) -> AppResult<()> {
        self.groups.lock().await.insert(site_id, groups);
        Ok(())
    }
}

fn site() -> SiteId {
    SiteId::new(5).unwrap_or_else(|_| unreachable!())
}

fn site_admin() -> UserIdentity {
    UserIdentity::new("1", "Admin", site()).with_capabilities(["manage_options"])
}

fn page_group() -> FieldGroup {
    FieldGroup::new(
        "group_page",
        "Page",
        vec![
            FieldDescriptor::new("field_tab", "", "Content", FieldKind::Tab)
                .unwrap_or_else(|_| unreachable!()),
            FieldDescriptor::new("field_headline", "headline", "Headline", FieldKind::Text)
                .unwrap_or_else(|_| unreachable!()),
        ],
    )
    .unwrap_or_else(|_| unreachable!())
}

fn service() -> (PermissionMatrixService, Arc<FakeGrantTableRepository>) {
    let grants = Arc::new(FakeGrantTableRepository::default());
    let service = PermissionMatrixService::new(
        grants.clone(),
        Arc::new(FakeFieldSchemaSource::default()),
        AccessGate::default(),
    );
    (service, grants)
}

#[tokio::test]
async fn saved_permissions_show_up_in_matrix() {
    let (service, _) = service();
    let admin = site_admin();

    assert!(
        service
            .publish_field_groups(&admin, vec![page_group()])
            .await
            .is_ok()
    );
    assert!(
        service
            .save_permissions(
                &admin,
                [
                    ("permissions[field_headline][corporate]", "on"),
                    ("submit", "Save Changes"),
                ],
            )
            .await
            .is_ok()
    );

    let matrix = service
        .permission_matrix(&admin)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(matrix.roles, vec!["fsm_restricted", "corporate", "franchisee"]);
    let headline = &matrix.sections[0].rows[1];
    assert_eq!(headline.key, "field_headline");
    assert!(headline.granted_roles.contains("corporate"));
}

#[tokio::test]
async fn saving_replaces_the_whole_table() {
    let (service, grants) = service();
    let admin = site_admin();

    assert!(
        service
            .save_permissions(&admin, [("permissions[field_a][corporate]", "on")])
            .await
            .is_ok()
    );
    assert!(
        service
            .save_permissions(&admin, [("permissions[field_b][franchisee]", "on")])
            .await
            .is_ok()
    );

    let table = grants
        .load_grant_table(site())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(!table.is_controlled("field_a"));
    assert!(table.is_granted("field_b", "franchisee"));
}

#[tokio::test]
async fn settings_are_forbidden_without_manage_options() {
    let (service, _) = service();
    let franchisee = UserIdentity::new("8", "Jamie", site()).with_roles(["franchisee"]);

    let result = service.permission_matrix(&franchisee).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let result = service
        .save_permissions(&franchisee, [("permissions[field_a][franchisee]", "on")])
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn malformed_permission_input_is_rejected() {
    let (service, _) = service();

    let result = service
        .save_permissions(&site_admin(), [("permissions[field_a]", "on")])
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn duplicate_field_groups_conflict() {
    let (service, _) = service();

    let result = service
        .publish_field_groups(&site_admin(), vec![page_group(), page_group()])
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[test]
fn matrix_roles_require_a_column() {
    let (service, _) = service();
    assert!(service.clone().with_matrix_roles(Vec::<String>::new()).is_err());

    let service = service
        .with_matrix_roles(["corporate", " corporate ", "franchisee"])
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(service.matrix_roles(), ["corporate", "franchisee"]);
}
