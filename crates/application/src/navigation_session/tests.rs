use std::collections::HashMap;
use std::sync::Arc;

use kindernav_core::{AppResult, UserIdentity};
use kindernav_domain::{
    BadgeValue, NavigationBadge, NavigationConfigUpdate, NavigationItem, RouteDecision,
    RouteRequirement,
};

use crate::test_support::{FakeRoleRepository, config, guardian_config, item};
use crate::{NavigationService, PermissionService, RoleDirectory, RoleRepository};

use super::NavigationSession;

async fn session() -> (Arc<FakeRoleRepository>, NavigationSession) {
    let caseworker = config(
        "caseworker",
        vec![
            item("dashboard", 1, &["view:dashboard"]),
            item("case-management", 2, &["view:cases"]),
            item("application-review", 3, &["review:applications"]),
        ],
    );
    let repository = Arc::new(
        FakeRoleRepository::default()
            .with_user_permissions("u1", &["view:dashboard", "view:messages"])
            .await
            .with_user_permissions("u2", &["view:dashboard", "view:cases"])
            .await
            .with_navigation_config(guardian_config())
            .await
            .with_navigation_config(caseworker)
            .await,
    );

    let directory = RoleDirectory::new(repository.clone());
    let permissions = PermissionService::new(directory.clone());
    let service = NavigationService::new(directory, permissions);
    (repository, NavigationSession::new(service))
}

fn guardian() -> UserIdentity {
    UserIdentity::new("u1", "Ingrid Hansen", "guardian")
}

fn messages_badge(session: &NavigationSession) -> Option<String> {
    session
        .navigation()
        .secondary
        .iter()
        .find(|item| item.id() == "messages")
        .and_then(NavigationItem::badge)
        .and_then(NavigationBadge::text)
        .map(ToOwned::to_owned)
}

#[tokio::test]
async fn signed_out_session_is_empty() {
    let (_, mut session) = session().await;

    session.load().await;

    assert!(session.identity().is_none());
    assert!(!session.is_loaded());
    assert!(!session.has_navigation());
    assert!(!session.has_permission("view:dashboard").await);
    assert!(!session.has_any_permission(&["view:dashboard".to_owned()]).await);
    assert!(session.has_all_permissions(&["view:dashboard".to_owned()]).await);
}

#[tokio::test]
async fn sign_in_builds_navigation() {
    let (_, mut session) = session().await;

    session.sign_in(guardian()).await;

    assert!(session.is_loaded());
    assert!(session.has_navigation());
    assert!(session.last_updated().is_some());
    let primary: Vec<&str> = session
        .navigation()
        .primary
        .iter()
        .map(NavigationItem::id)
        .collect();
    assert_eq!(primary, vec!["dashboard"]);
}

#[tokio::test]
async fn badge_mutations_rebuild_navigation() {
    let (_, mut session) = session().await;
    session.sign_in(guardian()).await;
    assert_eq!(messages_badge(&session).as_deref(), Some("0"));

    session.set_badge("unreadMessages", 2_u32).await;
    assert_eq!(messages_badge(&session).as_deref(), Some("2"));

    session
        .update_badges(HashMap::from([(
            "unreadMessages".to_owned(),
            BadgeValue::from(9_u32),
        )]))
        .await;
    assert_eq!(messages_badge(&session).as_deref(), Some("9"));
}

#[tokio::test]
async fn switch_role_rebuilds_for_new_role() {
    let (_, mut session) = session().await;
    assert!(!session.switch_role("caseworker").await);

    session
        .sign_in(UserIdentity::new("u2", "Per Olsen", "guardian"))
        .await;
    assert!(session.switch_role("caseworker").await);

    assert_eq!(
        session.identity().map(UserIdentity::role_id),
        Some("caseworker")
    );
    let secondary: Vec<&str> = session
        .navigation()
        .secondary
        .iter()
        .map(NavigationItem::id)
        .collect();
    assert_eq!(secondary, vec!["case-management"]);
    assert!(session.navigation().applications.is_empty());
}

#[tokio::test]
async fn refresh_refetches_navigation_config() {
    let (repository, mut session) = session().await;
    session.sign_in(guardian()).await;

    session.refresh().await;

    assert_eq!(
        FakeRoleRepository::count(&repository.calls.navigation_configs),
        2
    );
}

#[tokio::test]
async fn sign_out_clears_state_and_caches() {
    let (repository, mut session) = session().await;
    session.sign_in(guardian()).await;
    session.set_badge("unreadMessages", 4_u32).await;

    session.sign_out().await;
    assert!(session.identity().is_none());
    assert!(!session.is_loaded());
    assert!(!session.has_navigation());

    session.sign_in(guardian()).await;
    assert_eq!(messages_badge(&session).as_deref(), Some("0"));
    assert_eq!(
        FakeRoleRepository::count(&repository.calls.user_permissions),
        2
    );
    assert_eq!(
        FakeRoleRepository::count(&repository.calls.navigation_configs),
        2
    );
}

#[tokio::test]
async fn sign_in_after_sign_out_sees_store_changes() -> AppResult<()> {
    let (repository, mut session) = session().await;
    session.sign_in(guardian()).await;
    assert!(
        session
            .navigation()
            .secondary
            .iter()
            .any(|item| item.id() == "messages")
    );

    let updated = repository
        .update_navigation_config(
            "guardian",
            NavigationConfigUpdate {
                navigation_items: Some(vec![item("dashboard", 1, &["view:dashboard"])]),
                layout_settings: None,
            },
        )
        .await?
        .into_data("update")?;
    assert!(updated);

    session.sign_out().await;
    session.sign_in(guardian()).await;

    let primary: Vec<&str> = session.navigation().primary.iter().map(NavigationItem::id).collect();
    assert_eq!(primary, vec!["dashboard"]);
    assert!(session.navigation().secondary.is_empty());
    Ok(())
}

#[tokio::test]
async fn predicates_follow_list_policies() {
    let (_, mut session) = session().await;
    session.sign_in(guardian()).await;
    let none: Vec<String> = Vec::new();

    assert!(session.has_permission("view:messages").await);
    assert!(!session.has_any_permission(&none).await);
    assert!(session.has_all_permissions(&none).await);
    assert!(
        !session
            .has_all_permissions(&["view:messages".to_owned(), "view:payments".to_owned()])
            .await
    );
    assert!(session.can_access_route("/guardian", &none).await);
    assert!(
        !session
            .can_access_route("/guardian/payments", &["view:payments".to_owned()])
            .await
    );
}

#[tokio::test]
async fn route_guards_use_session_identity() {
    let (_, mut session) = session().await;
    let protected = RouteRequirement::authenticated().with_required_permissions(["view:messages"]);

    assert_eq!(
        session.evaluate_route(&protected).await,
        RouteDecision::RedirectToLogin
    );

    session.sign_in(guardian()).await;
    assert_eq!(session.evaluate_route(&protected).await, RouteDecision::Allow);
    assert_eq!(
        session.evaluate_route(&RouteRequirement::guest()).await,
        RouteDecision::RedirectTo("/guardian".to_owned())
    );
    assert_eq!(
        session
            .evaluate_route(&RouteRequirement::authenticated().with_role("caseworker"))
            .await,
        RouteDecision::RedirectToHome
    );
}
