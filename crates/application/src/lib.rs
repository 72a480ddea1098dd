//! Application services and ports of the role-based navigation engine.

#![forbid(unsafe_code)]

mod badge_store;
mod cache;
mod navigation_service;
mod navigation_session;
mod permission_service;
mod role_directory;
mod role_ports;

#[cfg(test)]
mod test_support;

pub use badge_store::BadgeStore;
pub use cache::{CACHE_TTL, TtlCache};
pub use navigation_service::NavigationService;
pub use navigation_session::NavigationSession;
pub use permission_service::PermissionService;
pub use role_directory::RoleDirectory;
pub use role_ports::{ApiEnvelope, RoleRepository};
