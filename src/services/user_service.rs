//! User service for business logic operations.
//!
//! Provides a higher-level API for user operations, encapsulating
//! authorization rules and coordinating with the repository layer.

use crate::config::ApiKeyConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiKeyRow, EducationInfoRow, MailingAddressRow, MlhTermsRow, Role, User, UserPatch,
};
use crate::repositories::{UserPage, UserReader, UserWriter};
use crate::services::Actor;
use crate::utils::api_key::generate_api_key;

/// Largest page size a caller may request.
const MAX_PAGE_SIZE: i64 = 100;

/// User service for handling user-related business logic.
///
/// Mutating operations apply the self-or-admin rule: a caller may act on
/// their own account, and admins may act on anyone's.
#[derive(Clone)]
pub struct UserService {
    reader: UserReader,
    writer: UserWriter,
    api_key: ApiKeyConfig,
}

impl UserService {
    pub fn new(reader: UserReader, writer: UserWriter, api_key: ApiKeyConfig) -> Self {
        Self {
            reader,
            writer,
            api_key,
        }
    }

    /// Gets a user by their ID.
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.reader.get_by_id(id).await
    }

    /// The caller's own profile.
    pub async fn me(&self, actor: &Actor) -> AppResult<User> {
        self.reader.get_by_id(actor.user_id).await
    }

    /// Lists users with keyset pagination. Admin only.
    ///
    /// # Arguments
    /// * `first` - Page size, between 1 and 100
    /// * `after` - Cursor of the last user the caller saw, if any
    pub async fn list_users(
        &self,
        actor: &Actor,
        first: i64,
        after: Option<i32>,
    ) -> AppResult<UserPage> {
        ensure_admin(actor)?;
        if !(1..=MAX_PAGE_SIZE).contains(&first) {
            return Err(AppError::validation(
                "first",
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        self.reader.list_page(first, after).await
    }

    /// Full-text search over user names. The query feeds a tsquery built
    /// with string concatenation on the SQL side, so only ASCII is accepted.
    pub async fn search_users(&self, query: &str) -> AppResult<Vec<User>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("name", "must not be empty"));
        }
        if !query.is_ascii() {
            return Err(AppError::validation("name", "must be ASCII"));
        }
        self.reader.search_by_name(query).await
    }

    /// Updates a user's profile from a partial patch.
    pub async fn update_user(&self, actor: &Actor, id: i32, patch: UserPatch) -> AppResult<User> {
        ensure_self_or_admin(actor, id)?;
        self.writer.update(id, patch).await
    }

    /// Deletes a user and everything attached to them.
    pub async fn delete_user(&self, actor: &Actor, id: i32) -> AppResult<()> {
        ensure_self_or_admin(actor, id)?;
        self.writer.delete(id).await
    }

    /// Issues a fresh API key for a user, replacing any previous one.
    pub async fn add_api_key(&self, actor: &Actor, id: i32) -> AppResult<ApiKeyRow> {
        ensure_self_or_admin(actor, id)?;
        let key = generate_api_key(self.api_key.length);
        self.writer.set_api_key(id, key).await
    }

    /// Revokes a user's API key.
    pub async fn delete_api_key(&self, actor: &Actor, id: i32) -> AppResult<()> {
        ensure_self_or_admin(actor, id)?;
        self.writer.delete_api_key(id).await
    }

    pub async fn mailing_address(&self, user_id: i32) -> AppResult<Option<MailingAddressRow>> {
        self.reader.mailing_address(user_id).await
    }

    pub async fn mlh_terms(&self, user_id: i32) -> AppResult<Option<MlhTermsRow>> {
        self.reader.mlh_terms(user_id).await
    }

    pub async fn education_info(&self, user_id: i32) -> AppResult<Option<EducationInfoRow>> {
        self.reader.education_info(user_id).await
    }

    pub async fn api_key(&self, user_id: i32) -> AppResult<Option<ApiKeyRow>> {
        self.reader.api_key(user_id).await
    }
}

/// The self-or-admin rule shared by every mutating operation.
fn ensure_self_or_admin(actor: &Actor, target_id: i32) -> AppResult<()> {
    if actor.user_id == target_id || actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "only the account owner or an admin may do this",
        ))
    }
}

fn ensure_admin(actor: &Actor) -> AppResult<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden("admin only"))
    }
}
