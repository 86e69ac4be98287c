//! Write-side user repository.
//!
//! Each public operation has two entry points: a pool-level method that
//! opens its own transaction, and an `_on` method that runs on the caller's
//! connection so it can join a larger transaction. Mutations touching more
//! than one table always go through a transaction; the unique indexes are
//! the final word on duplicates when concurrent writers race past the
//! application-level checks.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiKeyRow, NewApiKeyRow, NewUserProfile, NewUserRow, OAuthIdentity, Role, User, UserPatch,
};
use crate::repositories::{PronounStore, UserReader, get_conn};

/// Write-side repository holding the pool and the shared pronoun store.
#[derive(Clone)]
pub struct UserWriter {
    pool: AsyncDbPool,
    pronouns: PronounStore,
    reader: UserReader,
}

impl UserWriter {
    pub fn new(pool: AsyncDbPool, pronouns: PronounStore, reader: UserReader) -> Self {
        Self {
            pool,
            pronouns,
            reader,
        }
    }

    /// Registers a new user with their satellites in one transaction.
    pub async fn create(&self, profile: NewUserProfile, oauth: OAuthIdentity) -> AppResult<User> {
        let mut conn = get_conn(&self.pool).await?;
        let writer = self.clone();
        conn.transaction::<User, AppError, _>(|conn| {
            async move { writer.create_on(conn, profile, oauth).await }.scope_boxed()
        })
        .await
    }

    /// Transaction body of [`create`](Self::create).
    ///
    /// The returned user is assembled from the inputs rather than re-read;
    /// the insert either succeeded with exactly these values or the
    /// transaction rolled back.
    pub async fn create_on(
        &self,
        conn: &mut AsyncPgConnection,
        profile: NewUserProfile,
        oauth: OAuthIdentity,
    ) -> AppResult<User> {
        use crate::schema::users::dsl::*;

        // Fast-path duplicate check; the unique index still guards the race.
        let existing: Option<i32> = users
            .filter(oauth_provider.eq(oauth.provider))
            .filter(oauth_uid.eq(&oauth.uid))
            .select(id)
            .first(conn)
            .await
            .optional()
            .map_err(AppError::from)?;
        if existing.is_some() {
            return Err(AppError::duplicate(
                "users",
                "oauth_provider_oauth_uid",
                &oauth.uid,
            ));
        }

        let resolved_pronoun_id = match &profile.pronouns {
            Some(pair) => Some(self.pronouns.resolve_or_create(conn, pair).await?),
            None => None,
        };

        let new_row = NewUserRow {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone_number: profile.phone_number.clone(),
            age: profile.age,
            role: Role::Normal,
            gender: profile.gender.clone(),
            race: profile.race.clone(),
            years_of_experience: profile.years_of_experience,
            shirt_size: profile.shirt_size,
            pronoun_id: resolved_pronoun_id,
            oauth_provider: oauth.provider,
            oauth_uid: oauth.uid.clone(),
        };

        let new_id: i32 = diesel::insert_into(users)
            .values(&new_row)
            .returning(id)
            .get_result(conn)
            .await
            .map_err(AppError::from)?;

        if let Some(address) = profile.mailing_address.clone() {
            diesel::insert_into(crate::schema::mailing_addresses::table)
                .values(address.into_row(new_id))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        if let Some(terms) = profile.mlh_terms {
            diesel::insert_into(crate::schema::mlh_terms::table)
                .values(terms.into_row(new_id))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        if let Some(education) = profile.education_info.clone() {
            diesel::insert_into(crate::schema::education_info::table)
                .values(education.into_row(new_id))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }

        Ok(User {
            id: new_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            phone_number: profile.phone_number,
            age: profile.age,
            role: Role::Normal,
            gender: profile.gender,
            race: profile.race,
            years_of_experience: profile.years_of_experience,
            shirt_size: profile.shirt_size,
            pronouns: profile.pronouns,
            oauth,
        })
    }

    /// Applies a partial update across the user row and its satellites in
    /// one transaction, then re-reads the assembled user inside that same
    /// transaction.
    pub async fn update(&self, user_id: i32, patch: UserPatch) -> AppResult<User> {
        let mut conn = get_conn(&self.pool).await?;
        let writer = self.clone();
        conn.transaction::<User, AppError, _>(|conn| {
            async move { writer.update_on(conn, user_id, patch).await }.scope_boxed()
        })
        .await
    }

    /// Transaction body of [`update`](Self::update).
    ///
    /// Empty patches are rejected before any statement runs. Every UPDATE
    /// must affect exactly one row; zero rows means the user (or the
    /// satellite being patched) does not exist, and the transaction rolls
    /// back without partial effects.
    pub async fn update_on(
        &self,
        conn: &mut AsyncPgConnection,
        user_id: i32,
        patch: UserPatch,
    ) -> AppResult<User> {
        if patch.is_empty() {
            return Err(AppError::validation(
                "update",
                "at least one field must be provided",
            ));
        }

        let mut changeset = patch.base_changeset();
        if let Some(pair) = &patch.pronouns {
            changeset.pronoun_id = Some(self.pronouns.resolve_or_create(conn, pair).await?);
        }

        use crate::schema::users::dsl as u;

        if changeset.is_empty() {
            // Satellite-only patch; still fail fast for a missing user.
            let exists: Option<i32> = u::users
                .filter(u::id.eq(user_id))
                .select(u::id)
                .first(conn)
                .await
                .optional()
                .map_err(AppError::from)?;
            if exists.is_none() {
                return Err(AppError::not_found("users", "id", user_id));
            }
        } else {
            let affected = diesel::update(u::users.filter(u::id.eq(user_id)))
                .set(&changeset)
                .execute(conn)
                .await
                .map_err(AppError::from)?;
            if affected != 1 {
                return Err(AppError::not_found("users", "id", user_id));
            }
        }

        if let Some(address_patch) = &patch.mailing_address
            && !address_patch.is_empty()
        {
            use crate::schema::mailing_addresses::dsl as ma;
            let affected = diesel::update(ma::mailing_addresses.filter(ma::user_id.eq(user_id)))
                .set(address_patch)
                .execute(conn)
                .await
                .map_err(AppError::from)?;
            if affected != 1 {
                return Err(AppError::not_found("mailing_addresses", "user_id", user_id));
            }
        }

        if let Some(terms_patch) = &patch.mlh_terms
            && !terms_patch.is_empty()
        {
            use crate::schema::mlh_terms::dsl as mt;
            let affected = diesel::update(mt::mlh_terms.filter(mt::user_id.eq(user_id)))
                .set(terms_patch)
                .execute(conn)
                .await
                .map_err(AppError::from)?;
            if affected != 1 {
                return Err(AppError::not_found("mlh_terms", "user_id", user_id));
            }
        }

        if let Some(education_patch) = &patch.education_info
            && !education_patch.is_empty()
        {
            use crate::schema::education_info::dsl as ed;
            let affected = diesel::update(ed::education_info.filter(ed::user_id.eq(user_id)))
                .set(education_patch)
                .execute(conn)
                .await
                .map_err(AppError::from)?;
            if affected != 1 {
                return Err(AppError::not_found("education_info", "user_id", user_id));
            }
        }

        self.reader.get_by_id_on(conn, user_id).await
    }

    /// Deletes a user and every satellite row in one transaction.
    pub async fn delete(&self, user_id: i32) -> AppResult<()> {
        let mut conn = get_conn(&self.pool).await?;
        let writer = self.clone();
        conn.transaction::<(), AppError, _>(|conn| {
            async move { writer.delete_on(conn, user_id).await }.scope_boxed()
        })
        .await
    }

    /// Transaction body of [`delete`](Self::delete). Satellites are cleared
    /// first so the user row can be removed last without violating foreign
    /// keys.
    pub async fn delete_on(&self, conn: &mut AsyncPgConnection, user_id: i32) -> AppResult<()> {
        {
            use crate::schema::api_keys::dsl as ak;
            diesel::delete(ak::api_keys.filter(ak::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::education_info::dsl as ed;
            diesel::delete(ed::education_info.filter(ed::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::mlh_terms::dsl as mt;
            diesel::delete(mt::mlh_terms.filter(mt::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::mailing_addresses::dsl as ma;
            diesel::delete(ma::mailing_addresses.filter(ma::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::hackathon_applications::dsl as ha;
            diesel::delete(ha::hackathon_applications.filter(ha::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::meals::dsl as ml;
            diesel::delete(ml::meals.filter(ml::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::hackathon_checkin::dsl as hc;
            diesel::delete(hc::hackathon_checkin.filter(hc::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }
        {
            use crate::schema::event_attendance::dsl as ea;
            diesel::delete(ea::event_attendance.filter(ea::user_id.eq(user_id)))
                .execute(conn)
                .await
                .map_err(AppError::from)?;
        }

        use crate::schema::users::dsl as u;
        let affected = diesel::delete(u::users.filter(u::id.eq(user_id)))
            .execute(conn)
            .await
            .map_err(AppError::from)?;
        if affected != 1 {
            return Err(AppError::not_found("users", "id", user_id));
        }
        Ok(())
    }

    /// Stores the user's API key, replacing any previous one.
    pub async fn set_api_key(&self, for_user: i32, new_key: String) -> AppResult<ApiKeyRow> {
        let mut conn = get_conn(&self.pool).await?;

        use crate::schema::api_keys::dsl::*;

        let row = NewApiKeyRow {
            user_id: for_user,
            key: new_key,
            created: Utc::now().naive_utc(),
        };

        diesel::insert_into(api_keys)
            .values(&row)
            .on_conflict(user_id)
            .do_update()
            .set((key.eq(&row.key), created.eq(row.created)))
            .returning(ApiKeyRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Removes the user's API key. Missing keys are reported as NotFound.
    pub async fn delete_api_key(&self, for_user: i32) -> AppResult<()> {
        let mut conn = get_conn(&self.pool).await?;

        use crate::schema::api_keys::dsl::*;

        let affected = diesel::delete(api_keys.filter(user_id.eq(for_user)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;
        if affected != 1 {
            return Err(AppError::not_found("api_keys", "user_id", for_user));
        }
        Ok(())
    }
}
