//! Section ordering service
//!
//! Maintains the ordered lesson/module collection under a course or tool
//! and keeps the parent's denormalized section count in sync. The section
//! row and the counter are two separate writes against the hosted store;
//! divergence between them is detected and repaired by reconciliation.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{ContentKind, CreateSectionRequest, Section, UpdateSectionRequest};
use crate::services::stores::ContentStore;
use crate::utils::errors::{Result, TholviError};

#[derive(Clone)]
pub struct SectionService {
    content: Arc<dyn ContentStore>,
}

impl SectionService {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    /// Add a section under a course or tool.
    ///
    /// When no order index is given, the section is appended: the index
    /// defaults to the current sibling count.
    pub async fn add_section(&self, request: CreateSectionRequest) -> Result<Section> {
        if request.title.trim().is_empty() {
            return Err(TholviError::Validation(
                "Section title is required".to_string(),
            ));
        }

        let parent = self
            .content
            .get_item(request.parent_id)
            .await?
            .ok_or(TholviError::ContentNotFound {
                content_id: request.parent_id,
            })?;

        if !parent.kind.has_sections() {
            return Err(TholviError::Validation(
                "Blog posts do not have sections".to_string(),
            ));
        }

        let order_index = match request.order_index {
            Some(index) => index,
            None => self.content.count_sections(parent.id).await? as i32,
        };

        let section = self.content.insert_section(request, order_index).await?;
        self.content.increment_section_count(parent.id).await?;

        info!(
            section_id = %section.id,
            parent_id = %parent.id,
            order_index = order_index,
            "Section added"
        );

        Ok(section)
    }

    /// Update a section's title, body, video reference or order index.
    ///
    /// Changing the order index does not renumber siblings; duplicate
    /// indices are legal and the listing order stays stable.
    pub async fn update_section(
        &self,
        section_id: Uuid,
        request: UpdateSectionRequest,
    ) -> Result<Section> {
        self.content
            .get_section(section_id)
            .await?
            .ok_or(TholviError::SectionNotFound { section_id })?;

        let section = self.content.update_section(section_id, request).await?;
        debug!(section_id = %section_id, "Section updated");
        Ok(section)
    }

    /// Delete a section and decrement the parent's count, floored at zero.
    pub async fn delete_section(&self, section_id: Uuid) -> Result<()> {
        let section = self
            .content
            .get_section(section_id)
            .await?
            .ok_or(TholviError::SectionNotFound { section_id })?;

        self.content.delete_section(section_id).await?;
        self.content
            .decrement_section_count(section.parent_id)
            .await?;

        info!(section_id = %section_id, parent_id = %section.parent_id, "Section deleted");
        Ok(())
    }

    /// Sibling sections sorted ascending by order index, ties broken by
    /// creation order. Deterministic for identical stored data.
    pub async fn list_ordered(&self, parent_id: Uuid) -> Result<Vec<Section>> {
        let parent = self
            .content
            .get_item(parent_id)
            .await?
            .ok_or(TholviError::ContentNotFound {
                content_id: parent_id,
            })?;

        if parent.kind == ContentKind::Blog {
            return Ok(Vec::new());
        }

        self.content.list_sections(parent_id).await
    }
}
