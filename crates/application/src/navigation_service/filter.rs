use std::collections::HashMap;

use kindernav_domain::{BadgeValue, NavigationItem, UserPermissionCheck};

use super::badges::resolve_badge;

/// Returns whether an item passes its own permission gate.
///
/// Items without requirements are open; otherwise one held permission is
/// enough.
pub(super) fn passes_gate(item: &NavigationItem, check: &UserPermissionCheck) -> bool {
    item.required_permissions().is_empty() || check.has_any_permission(item.required_permissions())
}

/// Filters one sibling list and, recursively, the children of every item
/// that passes.
///
/// Badges are resolved before hidden items are dropped. A child list that
/// ends up empty is kept. Every returned sibling list is ordered by `order`.
pub(super) fn filter_items(
    items: Vec<NavigationItem>,
    check: &UserPermissionCheck,
    badges: &HashMap<String, BadgeValue>,
) -> Vec<NavigationItem> {
    let mut visible: Vec<NavigationItem> = items
        .into_iter()
        .filter(|item| passes_gate(item, check))
        .map(|mut item| {
            let badge = item.take_badge().map(|badge| resolve_badge(badge, badges));
            item.set_badge(badge);

            let children = item
                .take_children()
                .map(|children| filter_items(children, check, badges));
            item.set_children(children);

            item
        })
        .filter(|item| !item.is_hidden())
        .collect();

    visible.sort_by_key(NavigationItem::order);
    visible
}
