//! Payment request repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::{
    AdminPaymentRow, PaymentFilter, PaymentRequest, PaymentStatus, ReviewFields,
    SubmitPaymentRequest,
};
use crate::models::user::Tier;
use crate::services::stores::PaymentStore;
use crate::utils::errors::Result;

const PAYMENT_COLUMNS: &str = "id, user_id, tier_requested, transaction_id, screenshot_url, notes, status, rejection_reason, reviewed_at, reviewed_by, created_at";

#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn create(&self, request: SubmitPaymentRequest) -> Result<PaymentRequest> {
        let payment = sqlx::query_as::<_, PaymentRequest>(&format!(
            r#"
            INSERT INTO payment_requests (user_id, tier_requested, transaction_id, screenshot_url, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.tier_requested)
        .bind(request.transaction_id)
        .bind(request.screenshot_url)
        .bind(request.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn get_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentRequest>> {
        let payment = sqlx::query_as::<_, PaymentRequest>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_requests WHERE id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn update_status(
        &self,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        review: ReviewFields,
    ) -> Result<bool> {
        // The WHERE clause on the current status is the concurrency guard:
        // of two racing reviewers, only one update matches a row.
        let result = sqlx::query(
            r#"
            UPDATE payment_requests
            SET status = $3, reviewed_at = $4, reviewed_by = $5, rejection_reason = $6
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(payment_id)
        .bind(from)
        .bind(to)
        .bind(review.reviewed_at)
        .bind(review.reviewed_by)
        .bind(review.rejection_reason)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentRequest>> {
        let payments = sqlx::query_as::<_, PaymentRequest>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_requests WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    async fn list_for_admin(&self, filter: PaymentFilter) -> Result<Vec<AdminPaymentRow>> {
        let search = filter
            .search
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));

        let rows = sqlx::query_as::<_, AdminPaymentRow>(
            r#"
            SELECT p.id, p.user_id, u.email AS user_email, u.display_name AS user_display_name,
                   p.tier_requested, p.transaction_id, p.screenshot_url, p.notes, p.status,
                   p.rejection_reason, p.reviewed_at, p.reviewed_by, p.created_at
            FROM payment_requests p
            JOIN users u ON u.id = p.user_id
            WHERE ($1::payment_status IS NULL OR p.status = $1)
              AND ($2::text IS NULL OR p.transaction_id ILIKE $2)
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(filter.status)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn approved_tier_floors(&self) -> Result<Vec<(Uuid, Tier)>> {
        // Postgres enum comparison follows declaration order, which matches
        // the tier order, so MAX picks the highest approved tier.
        let floors: Vec<(Uuid, Tier)> = sqlx::query_as(
            r#"
            SELECT user_id, MAX(tier_requested) AS tier
            FROM payment_requests
            WHERE status = 'approved'
            GROUP BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(floors)
    }
}
