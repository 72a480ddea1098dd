use std::sync::Arc;

use kindernav_core::{AppError, AppResult};
use kindernav_domain::{NavigationConfigUpdate, Permission, Role};

use crate::test_support::{FakeRoleRepository, fixed_time, guardian_config, item, permissions};

use super::RoleDirectory;

async fn seeded_repository() -> AppResult<Arc<FakeRoleRepository>> {
    let guardian = Role::new(
        "guardian",
        "Guardian",
        "Parent or legal guardian",
        permissions(&["view:dashboard", "view:messages"]),
        fixed_time(),
    )?;

    Ok(Arc::new(
        FakeRoleRepository::default()
            .with_role(guardian)
            .await
            .with_user_permissions("u1", &["view:dashboard", "view:messages"])
            .await
            .with_navigation_config(guardian_config())
            .await,
    ))
}

#[tokio::test]
async fn role_lookup_is_served_from_cache() -> AppResult<()> {
    let repository = seeded_repository().await?;
    let directory = RoleDirectory::new(repository.clone());

    let first = directory.get_role_by_id("guardian").await;
    let second = directory.get_role_by_id("guardian").await;

    assert_eq!(first.as_ref().map(Role::id), Some("guardian"));
    assert_eq!(first, second);
    assert_eq!(FakeRoleRepository::count(&repository.calls.roles), 1);
    Ok(())
}

#[tokio::test]
async fn missing_role_is_none_and_retried() -> AppResult<()> {
    let repository = seeded_repository().await?;
    let directory = RoleDirectory::new(repository.clone());

    assert_eq!(directory.get_role_by_id("partner").await, None);
    assert_eq!(directory.get_role_by_id("partner").await, None);
    assert_eq!(FakeRoleRepository::count(&repository.calls.roles), 2);
    Ok(())
}

#[tokio::test]
async fn transport_failure_degrades_to_no_data() -> AppResult<()> {
    let repository = seeded_repository().await?;
    let directory = RoleDirectory::new(repository.clone());
    repository.set_unreachable(true);

    assert_eq!(directory.get_role_by_id("guardian").await, None);
    assert!(directory.get_all_roles().await.is_empty());
    assert!(directory.get_user_permissions("u1").await.is_empty());
    assert!(directory.get_role_navigation_config("guardian").await.is_none());

    repository.set_unreachable(false);
    assert!(directory.get_role_navigation_config("guardian").await.is_some());
    assert_eq!(
        FakeRoleRepository::count(&repository.calls.navigation_configs),
        2
    );
    Ok(())
}

#[tokio::test]
async fn update_invalidates_only_the_updated_config() -> AppResult<()> {
    let repository = seeded_repository().await?;
    let directory = RoleDirectory::new(repository.clone());

    let before = directory.get_role_navigation_config("guardian").await;
    assert_eq!(
        before.map(|config| config.navigation_items().len()),
        Some(3)
    );
    let _ = directory.get_user_permissions("u1").await;

    let updated = directory
        .update_role_navigation_config(
            "guardian",
            NavigationConfigUpdate {
                navigation_items: Some(vec![item("dashboard", 1, &[])]),
                layout_settings: None,
            },
        )
        .await;
    assert!(updated);

    let after = directory.get_role_navigation_config("guardian").await;
    assert_eq!(after.map(|config| config.navigation_items().len()), Some(1));
    assert_eq!(
        FakeRoleRepository::count(&repository.calls.navigation_configs),
        2
    );

    let _ = directory.get_user_permissions("u1").await;
    assert_eq!(
        FakeRoleRepository::count(&repository.calls.user_permissions),
        1
    );
    Ok(())
}

#[tokio::test]
async fn rejected_update_reports_false() -> AppResult<()> {
    let repository = seeded_repository().await?;
    let directory = RoleDirectory::new(repository.clone());

    let updated = directory
        .update_role_navigation_config("educator", NavigationConfigUpdate::default())
        .await;
    assert!(!updated);

    repository.set_unreachable(true);
    let updated = directory
        .update_role_navigation_config("guardian", NavigationConfigUpdate::default())
        .await;
    assert!(!updated);
    Ok(())
}

#[tokio::test]
async fn user_permissions_are_deduplicated_by_id() -> AppResult<()> {
    let repository = Arc::new(
        FakeRoleRepository::default()
            .with_user_permissions("u2", &["view:cases", "edit:cases", "view:cases"])
            .await,
    );
    let directory = RoleDirectory::new(repository);

    let ids: Vec<String> = directory
        .get_user_permissions("u2")
        .await
        .iter()
        .map(|permission: &Permission| permission.id().to_owned())
        .collect();

    assert_eq!(ids, vec!["view:cases".to_owned(), "edit:cases".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn role_permissions_are_deduplicated_by_id() -> AppResult<()> {
    let role: Role = serde_json::from_value(serde_json::json!({
        "id": "caseworker",
        "name": "caseworker",
        "displayName": "Case Worker",
        "description": "Municipal case worker",
        "permissions": permissions(&["view:cases", "edit:cases", "view:cases"]),
        "isActive": true,
        "createdAt": "2026-01-15T08:00:00Z",
        "updatedAt": "2026-01-15T08:00:00Z"
    }))
    .map_err(|error| AppError::Internal(error.to_string()))?;
    let repository = Arc::new(FakeRoleRepository::default().with_role(role).await);
    let directory = RoleDirectory::new(repository);

    let role_ids = |role: &Role| -> Vec<String> {
        role.permissions()
            .iter()
            .map(|permission| permission.id().to_owned())
            .collect()
    };
    let expected = vec!["view:cases".to_owned(), "edit:cases".to_owned()];

    assert_eq!(
        directory.get_role_by_id("caseworker").await.as_ref().map(role_ids),
        Some(expected.clone())
    );
    assert_eq!(
        directory.get_all_roles().await.iter().map(role_ids).collect::<Vec<_>>(),
        vec![expected]
    );
    Ok(())
}

#[tokio::test]
async fn clear_cache_forces_refetch() -> AppResult<()> {
    let repository = seeded_repository().await?;
    let directory = RoleDirectory::new(repository.clone());

    assert_eq!(directory.get_all_roles().await.len(), 1);
    directory.clear_cache().await;
    assert_eq!(directory.get_all_roles().await.len(), 1);

    assert_eq!(FakeRoleRepository::count(&repository.calls.all_roles), 2);
    Ok(())
}
