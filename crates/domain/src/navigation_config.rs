use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kindernav_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::NavigationItem;

/// Colour theme of the portal shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

/// Optional component overrides for the portal shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomComponents {
    /// Sidebar component name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    /// Header component name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Footer component name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// Layout preferences stored alongside a role's navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    /// Whether breadcrumbs are shown.
    pub show_breadcrumb: bool,
    /// Whether the notification bell is shown.
    pub show_notifications: bool,
    /// Whether the sidebar can be collapsed.
    pub sidebar_collapsible: bool,
    /// Colour theme.
    pub theme: Theme,
    /// Optional component overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_components: Option<CustomComponents>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            show_breadcrumb: true,
            show_notifications: true,
            sidebar_collapsible: true,
            theme: Theme::Light,
            custom_components: None,
        }
    }
}

/// Raw navigation tree and layout for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleNavigationConfig {
    role_id: NonEmptyString,
    navigation_items: Vec<NavigationItem>,
    #[serde(default)]
    layout_settings: LayoutSettings,
    last_updated: DateTime<Utc>,
}

impl RoleNavigationConfig {
    /// Creates a validated navigation config.
    pub fn new(
        role_id: impl Into<String>,
        navigation_items: Vec<NavigationItem>,
        layout_settings: LayoutSettings,
        last_updated: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            role_id: NonEmptyString::new(role_id)?,
            navigation_items,
            layout_settings,
            last_updated,
        })
    }

    /// Returns the owning role id.
    #[must_use]
    pub fn role_id(&self) -> &str {
        self.role_id.as_str()
    }

    /// Returns the top-level items in configured order.
    #[must_use]
    pub fn navigation_items(&self) -> &[NavigationItem] {
        &self.navigation_items
    }

    /// Returns the layout settings.
    #[must_use]
    pub fn layout_settings(&self) -> &LayoutSettings {
        &self.layout_settings
    }

    /// Returns when the config was last changed.
    #[must_use]
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Applies a partial update, stamping `now` as the change time.
    #[must_use]
    pub fn apply(mut self, update: NavigationConfigUpdate, now: DateTime<Utc>) -> Self {
        if let Some(items) = update.navigation_items {
            self.navigation_items = items;
        }
        if let Some(layout_settings) = update.layout_settings {
            self.layout_settings = layout_settings;
        }
        self.last_updated = now;
        self
    }

    /// Returns ids that appear more than once among the same siblings, at
    /// any depth.
    #[must_use]
    pub fn duplicate_sibling_ids(&self) -> Vec<String> {
        let mut duplicates = Vec::new();
        collect_duplicate_sibling_ids(&self.navigation_items, &mut duplicates);
        duplicates
    }
}

fn collect_duplicate_sibling_ids(items: &[NavigationItem], duplicates: &mut Vec<String>) {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            duplicates.push(item.id().to_owned());
        }
        if let Some(children) = item.children() {
            collect_duplicate_sibling_ids(children, duplicates);
        }
    }
}

/// Partial navigation config sent to the backing store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfigUpdate {
    /// Replacement item tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_items: Option<Vec<NavigationItem>>,
    /// Replacement layout settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_settings: Option<LayoutSettings>,
}

impl NavigationConfigUpdate {
    /// Returns whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.navigation_items.is_none() && self.layout_settings.is_none()
    }
}
