//! Account service
//!
//! User registration and the admin-only account levers: tier edits, the
//! Telegram access flag, and banning. Tier and Telegram access are
//! deliberately independent levers — approving a payment raises the tier
//! but never touches Telegram access.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::models::{CreateUserRequest, Tier, UserAccount, UserRole};
use crate::services::stores::UserDirectory;
use crate::utils::errors::{Result, TholviError};
use crate::utils::logging::log_tier_change;

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserDirectory>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Register a new account or return the existing one for the e-mail.
    /// New accounts start on the free tier with the user role, not banned.
    pub async fn register_or_get(&self, request: CreateUserRequest) -> Result<UserAccount> {
        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(TholviError::Validation(
                "A valid e-mail address is required".to_string(),
            ));
        }

        if let Some(existing) = self.users.find_by_email(&request.email).await? {
            return Ok(existing);
        }

        let account = self.users.create_account(request).await?;
        info!(user_id = %account.id, "New account registered");
        Ok(account)
    }

    pub async fn get_account(&self, user_id: Uuid) -> Result<Option<UserAccount>> {
        self.users.find_account(user_id).await
    }

    /// Admin tier edit, independent of the payment flow
    pub async fn admin_set_tier(&self, admin_id: Uuid, user_id: Uuid, tier: Tier) -> Result<()> {
        self.require_admin(admin_id).await?;

        let previous = self.users.get_tier(user_id).await?;
        self.users.set_tier(user_id, tier).await?;
        log_tier_change(user_id, previous, tier, "admin_edit");
        Ok(())
    }

    pub async fn admin_set_telegram_access(
        &self,
        admin_id: Uuid,
        user_id: Uuid,
        enabled: bool,
    ) -> Result<()> {
        self.require_admin(admin_id).await?;
        self.users.set_telegram_access(user_id, enabled).await?;
        info!(user_id = %user_id, enabled = enabled, "Telegram access changed");
        Ok(())
    }

    pub async fn admin_set_banned(&self, admin_id: Uuid, user_id: Uuid, banned: bool) -> Result<()> {
        self.require_admin(admin_id).await?;
        self.users.set_banned(user_id, banned).await?;
        info!(user_id = %user_id, banned = banned, "Ban status changed");
        Ok(())
    }

    async fn require_admin(&self, user_id: Uuid) -> Result<UserAccount> {
        let account = self
            .users
            .find_account(user_id)
            .await?
            .ok_or(TholviError::UserNotFound { user_id })?;

        if account.role != UserRole::Admin {
            return Err(TholviError::Forbidden(
                "Account administration requires the admin role".to_string(),
            ));
        }

        Ok(account)
    }
}
