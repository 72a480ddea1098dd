//! Domain entities and invariants of the role-based navigation engine.

#![forbid(unsafe_code)]

mod navigation;
mod navigation_config;
mod permission;
mod role;
mod route;

pub use navigation::{
    BadgeKind, BadgeSeverity, BadgeValue, NavigationBadge, NavigationCategory, NavigationItem,
    UserNavigation,
};
pub use navigation_config::{
    CustomComponents, LayoutSettings, NavigationConfigUpdate, RoleNavigationConfig, Theme,
};
pub use permission::{
    Permission, UserPermissionCheck, validate_component_permissions, validate_route_permissions,
};
pub use role::{Role, UserRole, home_route_for};
pub use route::{RouteDecision, RouteRequirement};
