use std::collections::HashMap;

use kindernav_domain::{BadgeKind, BadgeValue, NavigationBadge};

const MISSING_BADGE_TEXT: &str = "0";

/// Resolves the text of a dynamic badge from the user's badge values.
///
/// A dynamic badge without a source and every static badge pass through
/// unchanged.
pub(super) fn resolve_badge(
    badge: NavigationBadge,
    badges: &HashMap<String, BadgeValue>,
) -> NavigationBadge {
    if badge.kind() != BadgeKind::Dynamic {
        return badge;
    }

    let text = match badge.source() {
        Some(source) => badges
            .get(source)
            .map(ToString::to_string)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| MISSING_BADGE_TEXT.to_owned()),
        None => return badge,
    };

    badge.with_text(text)
}
