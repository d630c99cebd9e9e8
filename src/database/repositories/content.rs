//! Content repository implementation
//!
//! Covers content items and their section collections, including the
//! denormalized section counter writes.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::content::{
    ContentItem, ContentKind, CreateContentRequest, CreateSectionRequest, Section,
    UpdateContentRequest, UpdateSectionRequest,
};
use crate::services::stores::ContentStore;
use crate::utils::errors::{Result, TholviError};

const ITEM_COLUMNS: &str = "id, kind, title, description, body, tier_required, published, thumbnail_url, section_count, created_at, updated_at";
const SECTION_COLUMNS: &str = "id, parent_id, title, body, video_url, order_index, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a content item (admin console)
    pub async fn create_item(&self, request: CreateContentRequest) -> Result<ContentItem> {
        let item = sqlx::query_as::<_, ContentItem>(&format!(
            r#"
            INSERT INTO content_items (kind, title, description, body, tier_required, published, thumbnail_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(request.kind)
        .bind(request.title)
        .bind(request.description)
        .bind(request.body)
        .bind(request.tier_required)
        .bind(request.published)
        .bind(request.thumbnail_url)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Update a content item (admin console)
    pub async fn update_item(
        &self,
        content_id: Uuid,
        request: UpdateContentRequest,
    ) -> Result<ContentItem> {
        let item = sqlx::query_as::<_, ContentItem>(&format!(
            r#"
            UPDATE content_items
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                body = COALESCE($4, body),
                tier_required = COALESCE($5, tier_required),
                published = COALESCE($6, published),
                thumbnail_url = COALESCE($7, thumbnail_url),
                updated_at = $8
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(content_id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.body)
        .bind(request.tier_required)
        .bind(request.published)
        .bind(request.thumbnail_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or(TholviError::ContentNotFound { content_id })
    }

    /// Delete a content item; sections cascade in the schema
    pub async fn delete_item(&self, content_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
            .bind(content_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TholviError::ContentNotFound { content_id });
        }

        Ok(())
    }
}

#[async_trait]
impl ContentStore for ContentRepository {
    async fn list_items(&self, kind: ContentKind) -> Result<Vec<ContentItem>> {
        let items = sqlx::query_as::<_, ContentItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM content_items WHERE kind = $1 ORDER BY created_at DESC"
        ))
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn get_item(&self, content_id: Uuid) -> Result<Option<ContentItem>> {
        let item = sqlx::query_as::<_, ContentItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM content_items WHERE id = $1"
        ))
        .bind(content_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn insert_section(
        &self,
        request: CreateSectionRequest,
        order_index: i32,
    ) -> Result<Section> {
        let section = sqlx::query_as::<_, Section>(&format!(
            r#"
            INSERT INTO sections (parent_id, title, body, video_url, order_index, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SECTION_COLUMNS}
            "#
        ))
        .bind(request.parent_id)
        .bind(request.title)
        .bind(request.body)
        .bind(request.video_url)
        .bind(order_index)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(section)
    }

    async fn get_section(&self, section_id: Uuid) -> Result<Option<Section>> {
        let section = sqlx::query_as::<_, Section>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE id = $1"
        ))
        .bind(section_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(section)
    }

    async fn update_section(
        &self,
        section_id: Uuid,
        request: UpdateSectionRequest,
    ) -> Result<Section> {
        let section = sqlx::query_as::<_, Section>(&format!(
            r#"
            UPDATE sections
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                video_url = COALESCE($4, video_url),
                order_index = COALESCE($5, order_index),
                updated_at = $6
            WHERE id = $1
            RETURNING {SECTION_COLUMNS}
            "#
        ))
        .bind(section_id)
        .bind(request.title)
        .bind(request.body)
        .bind(request.video_url)
        .bind(request.order_index)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        section.ok_or(TholviError::SectionNotFound { section_id })
    }

    async fn delete_section(&self, section_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(section_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TholviError::SectionNotFound { section_id });
        }

        Ok(())
    }

    async fn list_sections(&self, parent_id: Uuid) -> Result<Vec<Section>> {
        let sections = sqlx::query_as::<_, Section>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE parent_id = $1 ORDER BY order_index ASC, created_at ASC, id ASC"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sections)
    }

    async fn count_sections(&self, parent_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sections WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn increment_section_count(&self, parent_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE content_items SET section_count = section_count + 1, updated_at = $2 WHERE id = $1",
        )
        .bind(parent_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn decrement_section_count(&self, parent_id: Uuid) -> Result<()> {
        // GREATEST keeps the counter at zero even if it was already
        // inconsistent with the live collection.
        sqlx::query(
            "UPDATE content_items SET section_count = GREATEST(section_count - 1, 0), updated_at = $2 WHERE id = $1",
        )
        .bind(parent_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_section_count(&self, parent_id: Uuid, count: i32) -> Result<()> {
        sqlx::query(
            "UPDATE content_items SET section_count = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(parent_id)
        .bind(count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
