//! Development roles, users and navigation trees for the in-memory store.

use chrono::Utc;
use kindernav_core::AppResult;
use kindernav_domain::{
    LayoutSettings, NavigationBadge, NavigationItem, Permission, Role, RoleNavigationConfig,
};

use crate::InMemoryRoleRepository;

const GUARDIAN_PERMISSIONS: &[&str] = &[
    "view:dashboard",
    "view:children",
    "view:applications",
    "create:application",
    "view:schedule",
    "view:attendance",
    "view:messages",
    "view:notices",
    "view:payments",
    "view:documents",
    "manage:profile",
];

const CASEWORKER_PERMISSIONS: &[&str] = &[
    "view:dashboard",
    "view:applications",
    "create:application",
    "review:applications",
    "manage:placements",
    "view:messages",
    "view:waiting-lists",
    "manage:offers",
    "view:kindergartens",
    "view:reports",
];

const EDUCATOR_PERMISSIONS: &[&str] = &[
    "view:dashboard",
    "view:children",
    "manage:attendance",
    "create:reports",
    "view:messages",
];

const ADMIN_PERMISSIONS: &[&str] = &[
    "view:dashboard",
    "manage:users",
    "manage:roles",
    "manage:permissions",
    "view:reports",
    "manage:system",
    "view:audit",
];

/// Development users and the role each one acts under.
pub const DEVELOPMENT_USERS: &[(&str, &str)] = &[
    ("dev-user", "guardian"),
    ("dev-guardian", "guardian"),
    ("dev-caseworker", "caseworker"),
    ("dev-educator", "educator"),
    ("dev-admin", "admin"),
];

impl InMemoryRoleRepository {
    /// Creates a repository holding the development roles, users and
    /// navigation trees.
    pub async fn with_development_data() -> AppResult<Self> {
        let repository = Self::new();
        let now = Utc::now();

        for (role_id, display_name, description, permission_ids) in [
            (
                "guardian",
                "Guardian",
                "Parent or guardian of children",
                GUARDIAN_PERMISSIONS,
            ),
            (
                "caseworker",
                "Case Worker",
                "Municipal case worker",
                CASEWORKER_PERMISSIONS,
            ),
            (
                "educator",
                "Educator",
                "Kindergarten educator",
                EDUCATOR_PERMISSIONS,
            ),
            ("admin", "Administrator", "System administrator", ADMIN_PERMISSIONS),
        ] {
            let permissions = permission_ids
                .iter()
                .map(|id| Permission::from_id(*id))
                .collect::<AppResult<Vec<_>>>()?;
            repository
                .save_role(Role::new(role_id, display_name, description, permissions, now)?)
                .await;
        }

        for (user_id, role_id) in DEVELOPMENT_USERS {
            repository.assign_user_role(user_id, role_id).await?;
        }

        for (role_id, items) in [
            ("guardian", guardian_navigation()?),
            ("caseworker", caseworker_navigation()?),
            ("educator", educator_navigation()?),
        ] {
            repository
                .save_navigation_config(RoleNavigationConfig::new(
                    role_id,
                    items,
                    LayoutSettings::default(),
                    now,
                )?)
                .await;
        }

        Ok(repository)
    }
}

fn entry(
    id: &str,
    label: &str,
    icon: &str,
    route: Option<&str>,
    permission: &str,
    order: i32,
) -> AppResult<NavigationItem> {
    let item = NavigationItem::new(id, label, icon, order)?.with_required_permissions([permission]);
    Ok(match route {
        Some(route) => item.with_route(route),
        None => item,
    })
}

fn guardian_navigation() -> AppResult<Vec<NavigationItem>> {
    let route = |path: &str| Some(format!("/guardian{path}"));

    Ok(vec![
        entry("dashboard", "Dashboard", "pi pi-th-large", Some("/guardian"), "view:dashboard", 1)?,
        entry("children", "My Children", "pi pi-users", None, "view:children", 2)?
            .with_badge(NavigationBadge::dynamic("childrenCount"))
            .with_children(vec![
                entry("children-list", "Children List", "pi pi-list", route("/children").as_deref(), "view:children", 1)?,
                entry("child-profile", "Child Profile", "pi pi-user", route("/child-profile").as_deref(), "view:children", 2)?,
            ]),
        entry("applications", "Applications", "pi pi-file", None, "view:applications", 3)?
            .with_children(vec![
                entry("new-application", "New Application", "pi pi-plus", route("/new-application").as_deref(), "create:application", 1)?,
                entry("application-status", "Application Status", "pi pi-clock", route("/application-status").as_deref(), "view:applications", 2)?,
            ]),
        entry("daily-schedule", "Daily Schedule", "pi pi-calendar", route("/daily-schedule").as_deref(), "view:schedule", 4)?,
        entry("attendance", "Attendance", "pi pi-clock", route("/attendance-tracking").as_deref(), "view:attendance", 5)?,
        entry("messages", "Messages", "pi pi-comments", route("/messages").as_deref(), "view:messages", 6)?
            .with_badge(NavigationBadge::dynamic("unreadMessages")),
        entry("notice-board", "Notice Board", "pi pi-megaphone", route("/notice-board").as_deref(), "view:notices", 7)?,
        entry("payments", "Payments", "pi pi-credit-card", route("/payments").as_deref(), "view:payments", 8)?,
        entry("documents", "Documents", "pi pi-folder", route("/documents").as_deref(), "view:documents", 9)?,
        entry("living-arrangements", "Living Arrangements", "pi pi-home", route("/living-arrangements").as_deref(), "manage:profile", 10)?,
    ])
}

fn caseworker_navigation() -> AppResult<Vec<NavigationItem>> {
    let route = |path: &str| Some(format!("/caseworker{path}"));

    Ok(vec![
        entry("dashboard", "Dashboard", "pi pi-th-large", Some("/caseworker"), "view:dashboard", 1)?,
        entry("review-queue", "Review Queue", "pi pi-list-check", route("/review-queue").as_deref(), "review:applications", 2)?
            .with_badge(NavigationBadge::dynamic("pendingReviews")),
        entry("placement-management", "Placement Management", "pi pi-home", route("/placement-management").as_deref(), "manage:placements", 3)?,
        entry("applications", "Applications", "pi pi-file", None, "view:applications", 4)?
            .with_children(vec![
                entry("manual-application", "Manual Application", "pi pi-plus", route("/manual-application").as_deref(), "create:application", 1)?,
                entry("applications-in-progress", "In Progress", "pi pi-clock", route("/applications-in-progress").as_deref(), "view:applications", 2)?
                    .with_badge(NavigationBadge::dynamic("inProgressCount")),
                entry("applications-submitted", "Submitted", "pi pi-check", route("/applications-submitted").as_deref(), "view:applications", 3)?
                    .with_badge(NavigationBadge::dynamic("submittedCount")),
                entry("applications-follow-up", "Follow Up", "pi pi-exclamation-triangle", route("/applications-follow-up").as_deref(), "view:applications", 4)?,
            ]),
        entry("messages", "Messages", "pi pi-comments", route("/messages").as_deref(), "view:messages", 5)?
            .with_badge(NavigationBadge::dynamic("unreadMessages")),
        entry("waiting-lists", "Waiting Lists", "pi pi-list", route("/waiting-lists").as_deref(), "view:waiting-lists", 6)?,
        entry("offers", "Offers", "pi pi-gift", route("/offers").as_deref(), "manage:offers", 7)?,
        entry("kindergartens", "Kindergartens", "pi pi-building", route("/kindergartens").as_deref(), "view:kindergartens", 8)?,
        entry("reports", "Reports", "pi pi-chart-bar", route("/reports").as_deref(), "view:reports", 9)?,
    ])
}

fn educator_navigation() -> AppResult<Vec<NavigationItem>> {
    let route = |path: &str| Some(format!("/educator{path}"));

    Ok(vec![
        entry("dashboard", "Dashboard", "pi pi-th-large", Some("/educator"), "view:dashboard", 1)?,
        entry("my-children", "My Children", "pi pi-users", route("/children").as_deref(), "view:children", 2)?,
        entry("attendance", "Attendance", "pi pi-clock", route("/attendance").as_deref(), "manage:attendance", 3)?,
        entry("daily-reports", "Daily Reports", "pi pi-file-edit", route("/daily-reports").as_deref(), "create:reports", 4)?,
        entry("messages", "Messages", "pi pi-comments", route("/messages").as_deref(), "view:messages", 5)?,
    ])
}
