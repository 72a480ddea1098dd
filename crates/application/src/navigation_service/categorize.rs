use kindernav_domain::{NavigationItem, UserNavigation};

/// Splits top-level items into menu buckets, each ordered by `order`.
///
/// The sort is stable, so items sharing an `order` keep their configured
/// sequence.
pub(super) fn categorize(items: &[NavigationItem]) -> UserNavigation {
    let mut navigation = UserNavigation::default();
    for item in items {
        navigation.bucket_mut(item.category()).push(item.clone());
    }

    for bucket in [
        &mut navigation.primary,
        &mut navigation.secondary,
        &mut navigation.applications,
    ] {
        bucket.sort_by_key(NavigationItem::order);
    }

    navigation
}
