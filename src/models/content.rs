//! Content item and section models
//!
//! A content item is a course, a tool, or a blog post. Courses and tools
//! carry an ordered collection of sections; blog posts carry a single body.
//! The `kind` tag decides which shape applies, resolved by pattern matching
//! rather than string comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::Tier;

/// Discriminator for the three content shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "content_kind", rename_all = "lowercase")]
pub enum ContentKind {
    Course,
    Tool,
    Blog,
}

impl ContentKind {
    /// Whether items of this kind own an ordered section collection
    pub fn has_sections(self) -> bool {
        matches!(self, ContentKind::Course | ContentKind::Tool)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentItem {
    pub id: Uuid,
    pub kind: ContentKind,
    pub title: String,
    pub description: Option<String>,
    /// Full article body; blog posts only, gated by tier on read.
    pub body: Option<String>,
    pub tier_required: Tier,
    pub published: bool,
    pub thumbnail_url: Option<String>,
    /// Denormalized count of live sections, kept in sync by SectionService
    /// and repaired by reconciliation on drift.
    pub section_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub video_url: Option<String>,
    /// Relative sort key among siblings; not necessarily contiguous,
    /// duplicates allowed. Ties are broken by creation order.
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContentRequest {
    pub kind: ContentKind,
    pub title: String,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tier_required: Tier,
    pub published: bool,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tier_required: Option<Tier>,
    pub published: Option<bool>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionRequest {
    pub parent_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub video_url: Option<String>,
    /// Defaults to the current sibling count when not provided
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSectionRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub video_url: Option<String>,
    pub order_index: Option<i32>,
}

/// A content item resolved for a specific viewer.
///
/// The gated payload (sections or article body) is only present when the
/// viewer's tier grants access; otherwise the item metadata alone serves
/// as the preview.
#[derive(Debug, Clone, Serialize)]
pub enum ContentDetail {
    Sectioned {
        item: ContentItem,
        sections: Vec<Section>,
    },
    Article {
        item: ContentItem,
        body: Option<String>,
    },
}
