//! Content catalog filtering
//!
//! Pure filters over content item lists. Callers pass items already sorted
//! (typically created_at descending); input order is preserved. The admin
//! variant is a distinct entry point rather than a flag default, so a call
//! site can never leak drafts by forgetting an argument.

use crate::domain::tier;
use crate::models::{ContentItem, Tier};

/// Filter items for a non-admin audience: published only, optional
/// case-insensitive substring query on title/description, optional exact
/// tier filter (`None` means all tiers).
pub fn list_published(
    items: &[ContentItem],
    query: &str,
    tier_filter: Option<Tier>,
) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| item.published && matches(item, query, tier_filter))
        .cloned()
        .collect()
}

/// Admin variant: drafts included, same query/tier filtering.
pub fn list_all(items: &[ContentItem], query: &str, tier_filter: Option<Tier>) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| matches(item, query, tier_filter))
        .cloned()
        .collect()
}

/// Whether a user of `user_tier` may access the gated payload of `item`
pub fn is_accessible(user_tier: Tier, item: &ContentItem) -> bool {
    tier::can_access(user_tier, item.tier_required)
}

fn matches(item: &ContentItem, query: &str, tier_filter: Option<Tier>) -> bool {
    if let Some(wanted) = tier_filter {
        if item.tier_required != wanted {
            return false;
        }
    }

    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(title: &str, description: &str, tier: Tier, published: bool) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            kind: ContentKind::Course,
            title: title.to_string(),
            description: Some(description.to_string()),
            body: None,
            tier_required: tier,
            published,
            thumbnail_url: None,
            section_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<ContentItem> {
        vec![
            item("Scalping Basics", "entry course", Tier::Free, true),
            item("Advanced Futures", "risk management deep dive", Tier::Tier2, true),
            item("Draft Course", "unfinished", Tier::Free, false),
            item("Swing Setups", "futures and spot setups", Tier::Tier1, true),
        ]
    }

    #[test]
    fn hides_unpublished_from_non_admin() {
        let result = list_published(&sample(), "", None);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|i| i.published));
    }

    #[test]
    fn admin_listing_includes_drafts() {
        let result = list_all(&sample(), "", None);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn query_is_case_insensitive_and_checks_description() {
        let result = list_published(&sample(), "FUTURES", None);
        let titles: Vec<_> = result.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Advanced Futures", "Swing Setups"]);
    }

    #[test]
    fn tier_filter_is_exact_match() {
        let result = list_published(&sample(), "", Some(Tier::Tier1));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Swing Setups");
    }

    #[test]
    fn preserves_input_order() {
        let items = sample();
        let result = list_published(&items, "", None);
        let titles: Vec<_> = result.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Scalping Basics", "Advanced Futures", "Swing Setups"]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = sample();
        let first: Vec<_> = list_published(&items, "course", None)
            .iter()
            .map(|i| i.id)
            .collect();
        let second: Vec<_> = list_published(&items, "course", None)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn accessibility_delegates_to_tier_policy() {
        let gated = item("Advanced", "", Tier::Tier2, true);
        assert!(!is_accessible(Tier::Free, &gated));
        assert!(!is_accessible(Tier::Tier1, &gated));
        assert!(is_accessible(Tier::Tier2, &gated));
    }
}
