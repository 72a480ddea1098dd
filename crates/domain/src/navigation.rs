use std::fmt::{Display, Formatter};

use kindernav_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Menu bucket a top-level navigation item is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationCategory {
    /// Main entries such as the dashboard.
    Primary,
    /// Everything that is neither primary nor application-scoped.
    Secondary,
    /// Application (enrolment) workflows.
    Application,
}

impl NavigationCategory {
    /// Returns a stable value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Application => "application",
        }
    }

    /// Infers the category from the item id naming convention.
    ///
    /// Ids containing `application` are application-scoped, ids containing
    /// `dashboard` or `main` are primary, everything else is secondary.
    #[must_use]
    pub fn infer_from_id(id: &str) -> Self {
        if id.contains("application") {
            Self::Application
        } else if id.contains("dashboard") || id.contains("main") {
            Self::Primary
        } else {
            Self::Secondary
        }
    }
}

/// How a badge obtains its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// Text is fixed in the configuration.
    #[default]
    Static,
    /// Text is resolved per user from badge data at build time.
    Dynamic,
}

/// Visual severity of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeSeverity {
    /// Positive state.
    Success,
    /// Neutral information.
    Info,
    /// Needs attention.
    Warning,
    /// Needs action.
    Danger,
}

/// Counter or label attached to a navigation item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationBadge {
    #[serde(rename = "type", default)]
    kind: BadgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity: Option<BadgeSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
}

impl NavigationBadge {
    /// Creates a static badge with fixed text.
    #[must_use]
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            kind: BadgeKind::Static,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates a dynamic badge resolved from the named badge data source.
    #[must_use]
    pub fn dynamic(source: impl Into<String>) -> Self {
        Self {
            kind: BadgeKind::Dynamic,
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: BadgeSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the display condition expression.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Returns a copy with resolved text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the badge kind.
    #[must_use]
    pub fn kind(&self) -> BadgeKind {
        self.kind
    }

    /// Returns the badge text, if fixed or already resolved.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the badge data source key.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Option<BadgeSeverity> {
        self.severity
    }

    /// Returns the display condition expression.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

/// Value stored for one badge data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BadgeValue {
    /// Numeric value, integral or fractional.
    Number(Number),
    /// Free text.
    Text(String),
}

impl Display for BadgeValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<i64> for BadgeValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u32> for BadgeValue {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for BadgeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for BadgeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Node of a role's navigation tree.
///
/// Siblings are rendered by ascending `order`. Each node is gated on its own
/// `required_permissions`; children inherit nothing from their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    id: NonEmptyString,
    label: String,
    icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    route: Option<String>,
    #[serde(default)]
    required_permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<NavigationItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    badge: Option<NavigationBadge>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    separator: bool,
    order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<NavigationCategory>,
}

impl NavigationItem {
    /// Creates a validated navigation item without route, gate or children.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        order: i32,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            label: label.into(),
            icon: icon.into(),
            route: None,
            required_permissions: Vec::new(),
            children: None,
            badge: None,
            hidden: false,
            separator: false,
            order,
            parent_id: None,
            category: None,
        })
    }

    /// Sets the target route.
    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Sets the permissions gating this item (any one of them grants access).
    #[must_use]
    pub fn with_required_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the children, recording this item as their parent.
    #[must_use]
    pub fn with_children(mut self, children: Vec<NavigationItem>) -> Self {
        let parent_id = self.id.as_str().to_owned();
        self.children = Some(
            children
                .into_iter()
                .map(|mut child| {
                    child.parent_id = Some(parent_id.clone());
                    child
                })
                .collect(),
        );
        self
    }

    /// Sets the badge.
    #[must_use]
    pub fn with_badge(mut self, badge: NavigationBadge) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Sets the hidden flag.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets the separator flag.
    #[must_use]
    pub fn with_separator(mut self, separator: bool) -> Self {
        self.separator = separator;
        self
    }

    /// Pins the item to a menu bucket instead of inferring it from the id.
    #[must_use]
    pub fn with_category(mut self, category: NavigationCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns the item id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_str()
    }

    /// Returns the target route.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Returns the gating permissions.
    #[must_use]
    pub fn required_permissions(&self) -> &[String] {
        &self.required_permissions
    }

    /// Returns the children, if the item declares any.
    #[must_use]
    pub fn children(&self) -> Option<&[NavigationItem]> {
        self.children.as_deref()
    }

    /// Returns the badge.
    #[must_use]
    pub fn badge(&self) -> Option<&NavigationBadge> {
        self.badge.as_ref()
    }

    /// Returns whether the item is forced hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns whether the item renders as a separator.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        self.separator
    }

    /// Returns the sibling order.
    #[must_use]
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Returns the parent item id.
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Returns the explicitly configured category.
    #[must_use]
    pub fn explicit_category(&self) -> Option<NavigationCategory> {
        self.category
    }

    /// Returns the effective category, falling back to the id heuristic.
    #[must_use]
    pub fn category(&self) -> NavigationCategory {
        self.category
            .unwrap_or_else(|| NavigationCategory::infer_from_id(self.id.as_str()))
    }

    /// Detaches the children, leaving `None` behind.
    pub fn take_children(&mut self) -> Option<Vec<NavigationItem>> {
        self.children.take()
    }

    /// Replaces the children as-is.
    pub fn set_children(&mut self, children: Option<Vec<NavigationItem>>) {
        self.children = children;
    }

    /// Detaches the badge, leaving `None` behind.
    pub fn take_badge(&mut self) -> Option<NavigationBadge> {
        self.badge.take()
    }

    /// Replaces the badge as-is.
    pub fn set_badge(&mut self, badge: Option<NavigationBadge>) {
        self.badge = badge;
    }
}

/// Navigation tree of one user, split into menu buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNavigation {
    /// Primary entries.
    pub primary: Vec<NavigationItem>,
    /// Secondary entries.
    pub secondary: Vec<NavigationItem>,
    /// Application-scoped entries.
    pub applications: Vec<NavigationItem>,
}

impl UserNavigation {
    /// Returns whether every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.applications.is_empty()
    }

    /// Returns the bucket for a category.
    #[must_use]
    pub fn bucket(&self, category: NavigationCategory) -> &[NavigationItem] {
        match category {
            NavigationCategory::Primary => &self.primary,
            NavigationCategory::Secondary => &self.secondary,
            NavigationCategory::Application => &self.applications,
        }
    }

    /// Returns the mutable bucket for a category.
    pub fn bucket_mut(&mut self, category: NavigationCategory) -> &mut Vec<NavigationItem> {
        match category {
            NavigationCategory::Primary => &mut self.primary,
            NavigationCategory::Secondary => &mut self.secondary,
            NavigationCategory::Application => &mut self.applications,
        }
    }
}
