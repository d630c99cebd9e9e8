//! Catalog service
//!
//! Read-side access to the content catalog for a specific audience. The
//! caller's privilege is an explicit parameter: there is no code path that
//! returns drafts or gated payloads without the caller stating it is an
//! admin or holds a sufficient tier.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::domain::{catalog, tier};
use crate::models::{ContentDetail, ContentItem, ContentKind, Tier};
use crate::services::stores::ContentStore;
use crate::utils::errors::{Result, TholviError};

/// Who is looking at the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// A signed-in (or anonymous, i.e. free) user with the given tier
    User(Tier),
    /// An admin console view: drafts visible, nothing gated
    Admin,
}

#[derive(Clone)]
pub struct CatalogService {
    content: Arc<dyn ContentStore>,
}

impl CatalogService {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    /// List catalog items of a kind for an audience.
    ///
    /// A store failure on this read path degrades to an empty list — the
    /// storefront renders empty rather than erroring — but is always logged.
    pub async fn list(
        &self,
        audience: Audience,
        kind: ContentKind,
        query: &str,
        tier_filter: Option<Tier>,
    ) -> Vec<ContentItem> {
        let items = match self.content.list_items(kind).await {
            Ok(items) => items,
            Err(e) => {
                error!(kind = ?kind, error = %e, "Catalog listing failed, degrading to empty");
                return Vec::new();
            }
        };

        match audience {
            Audience::User(_) => catalog::list_published(&items, query, tier_filter),
            Audience::Admin => catalog::list_all(&items, query, tier_filter),
        }
    }

    /// Fraction of the published catalog of a kind unlocked for a tier
    pub async fn unlock_percentage(&self, user_tier: Tier, kind: ContentKind) -> Result<u8> {
        let items = self.content.list_items(kind).await?;
        let published: Vec<_> = items.into_iter().filter(|i| i.published).collect();

        let total = published.len() as u32;
        let free_count = published
            .iter()
            .filter(|i| i.tier_required == Tier::Free)
            .count() as u32;
        let tier1_count = published
            .iter()
            .filter(|i| i.tier_required == Tier::Tier1)
            .count() as u32;

        Ok(tier::unlock_percentage(user_tier, total, free_count, tier1_count))
    }

    /// Resolve one item for a viewer.
    ///
    /// Drafts are not found for non-admin audiences. The gated payload —
    /// sections for courses/tools, the article body for blogs — is withheld
    /// from viewers whose tier does not grant access, even though the store
    /// returned the full row; only the preview metadata passes through.
    pub async fn get_detail(&self, audience: Audience, content_id: Uuid) -> Result<ContentDetail> {
        let item = self
            .content
            .get_item(content_id)
            .await?
            .ok_or(TholviError::ContentNotFound { content_id })?;

        let accessible = match audience {
            Audience::Admin => true,
            Audience::User(user_tier) => {
                if !item.published {
                    // Drafts do not exist for non-admin viewers.
                    return Err(TholviError::ContentNotFound { content_id });
                }
                catalog::is_accessible(user_tier, &item)
            }
        };

        match item.kind {
            ContentKind::Course | ContentKind::Tool => {
                let sections = if accessible {
                    self.content.list_sections(item.id).await?
                } else {
                    Vec::new()
                };
                Ok(ContentDetail::Sectioned { item, sections })
            }
            ContentKind::Blog => {
                let mut item = item;
                let body = if accessible { item.body.take() } else { None };
                // The row's body never leaks through the preview copy.
                item.body = None;
                Ok(ContentDetail::Article { item, body })
            }
        }
    }
}
