//! User repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{CreateUserRequest, Tier, UserAccount};
use crate::services::stores::UserDirectory;
use crate::utils::errors::{Result, TholviError};

const USER_COLUMNS: &str = "id, email, display_name, tier, role, telegram_username, telegram_access, is_banned, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List accounts for the admin console with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserAccount>> {
        let users = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn create_account(&self, request: CreateUserRequest) -> Result<UserAccount> {
        let user = sqlx::query_as::<_, UserAccount>(&format!(
            r#"
            INSERT INTO users (email, display_name, telegram_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(request.email)
        .bind(request.display_name)
        .bind(request.telegram_username)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_account(&self, user_id: Uuid) -> Result<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_tier(&self, user_id: Uuid) -> Result<Tier> {
        let tier: Option<(Tier,)> = sqlx::query_as("SELECT tier FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        tier.map(|(t,)| t)
            .ok_or(TholviError::UserNotFound { user_id })
    }

    async fn set_tier(&self, user_id: Uuid, tier: Tier) -> Result<()> {
        let result = sqlx::query("UPDATE users SET tier = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(tier)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TholviError::UserNotFound { user_id });
        }

        Ok(())
    }

    async fn set_telegram_access(&self, user_id: Uuid, enabled: bool) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET telegram_access = $2, updated_at = $3 WHERE id = $1")
                .bind(user_id)
                .bind(enabled)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(TholviError::UserNotFound { user_id });
        }

        Ok(())
    }

    async fn set_banned(&self, user_id: Uuid, banned: bool) -> Result<()> {
        let result = sqlx::query("UPDATE users SET is_banned = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(banned)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TholviError::UserNotFound { user_id });
        }

        Ok(())
    }
}
