//! Read-side user repository.
//!
//! Every user leaving this module is fully assembled: the pronoun surrogate
//! id is resolved to its pair through the shared cache before callers see
//! the value.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiKeyRow, EducationInfoRow, MailingAddressRow, MlhTermsRow, Provider, User, UserRow,
};
use crate::repositories::{PronounStore, get_conn};

/// Maximum number of rows returned by name search.
const SEARCH_LIMIT: i64 = 10;

/// One page of users plus the total row count.
#[derive(Debug)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
}

/// Read-side repository holding the pool and the shared pronoun store.
#[derive(Clone)]
pub struct UserReader {
    pool: AsyncDbPool,
    pronouns: PronounStore,
}

impl UserReader {
    pub fn new(pool: AsyncDbPool, pronouns: PronounStore) -> Self {
        Self { pool, pronouns }
    }

    /// Fetches a user by id, or `AppError::NotFound`.
    pub async fn get_by_id(&self, user_id: i32) -> AppResult<User> {
        let mut conn = get_conn(&self.pool).await?;
        self.get_by_id_on(&mut conn, user_id).await
    }

    /// Same as [`get_by_id`](Self::get_by_id) but on the caller's
    /// connection, so it can run inside a caller-owned transaction.
    pub async fn get_by_id_on(
        &self,
        conn: &mut AsyncPgConnection,
        user_id: i32,
    ) -> AppResult<User> {
        use crate::schema::users::dsl::*;

        let row: Option<UserRow> = users
            .filter(id.eq(user_id))
            .select(UserRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(AppError::from)?;

        match row {
            Some(row) => self.assemble(conn, row).await,
            None => Err(AppError::not_found("users", "id", user_id)),
        }
    }

    /// Looks up a user by external identity. `None` means unregistered.
    pub async fn find_by_oauth(&self, provider: Provider, uid: &str) -> AppResult<Option<User>> {
        let mut conn = get_conn(&self.pool).await?;
        self.find_by_oauth_on(&mut conn, provider, uid).await
    }

    pub async fn find_by_oauth_on(
        &self,
        conn: &mut AsyncPgConnection,
        provider: Provider,
        uid: &str,
    ) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;

        let row: Option<UserRow> = users
            .filter(oauth_provider.eq(provider))
            .filter(oauth_uid.eq(uid))
            .select(UserRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(AppError::from)?;

        match row {
            Some(row) => Ok(Some(self.assemble(conn, row).await?)),
            None => Ok(None),
        }
    }

    /// Keyset-paginated listing, newest id first, with the total count taken
    /// in the same transaction. The cursor is the last id the caller saw.
    pub async fn list_page(&self, first: i64, after: Option<i32>) -> AppResult<UserPage> {
        let mut conn = get_conn(&self.pool).await?;
        let reader = self.clone();

        conn.transaction::<UserPage, AppError, _>(|conn| {
            async move {
                use crate::schema::users::dsl::*;

                let mut query = users.select(UserRow::as_select()).into_boxed();
                if let Some(cursor) = after {
                    query = query.filter(id.gt(cursor));
                }
                let rows: Vec<UserRow> = query
                    .order(id.desc())
                    .limit(first)
                    .load(conn)
                    .await
                    .map_err(AppError::from)?;

                let total: i64 = users.count().get_result(conn).await.map_err(AppError::from)?;

                let mut page = Vec::with_capacity(rows.len());
                for row in rows {
                    page.push(reader.assemble(conn, row).await?);
                }

                Ok(UserPage { users: page, total })
            }
            .scope_boxed()
        })
        .await
    }

    /// Full-text search over first and last name, capped at ten rows.
    pub async fn search_by_name(&self, query: &str) -> AppResult<Vec<User>> {
        let mut conn = get_conn(&self.pool).await?;

        use crate::schema::users::dsl::*;

        let rows: Vec<UserRow> = users
            .filter(
                sql::<Bool>("to_tsvector('simple', first_name || ' ' || last_name) @@ plainto_tsquery('simple', ")
                    .bind::<Text, _>(query)
                    .sql(")"),
            )
            .select(UserRow::as_select())
            .limit(SEARCH_LIMIT)
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            found.push(self.assemble(&mut conn, row).await?);
        }
        Ok(found)
    }

    /// Mailing address satellite, `None` when the user never provided one.
    pub async fn mailing_address(&self, user_id: i32) -> AppResult<Option<MailingAddressRow>> {
        let mut conn = get_conn(&self.pool).await?;
        use crate::schema::mailing_addresses::dsl as ma;

        ma::mailing_addresses
            .filter(ma::user_id.eq(user_id))
            .select(MailingAddressRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn mlh_terms(&self, user_id: i32) -> AppResult<Option<MlhTermsRow>> {
        let mut conn = get_conn(&self.pool).await?;
        use crate::schema::mlh_terms::dsl as mt;

        mt::mlh_terms
            .filter(mt::user_id.eq(user_id))
            .select(MlhTermsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn education_info(&self, user_id: i32) -> AppResult<Option<EducationInfoRow>> {
        let mut conn = get_conn(&self.pool).await?;
        use crate::schema::education_info::dsl as ed;

        ed::education_info
            .filter(ed::user_id.eq(user_id))
            .select(EducationInfoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn api_key(&self, user_id: i32) -> AppResult<Option<ApiKeyRow>> {
        let mut conn = get_conn(&self.pool).await?;
        use crate::schema::api_keys::dsl as ak;

        ak::api_keys
            .filter(ak::user_id.eq(user_id))
            .select(ApiKeyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Resolves the pronoun pair and produces the assembled user.
    ///
    /// A dangling pronoun_id is a data-integrity failure, not a user-facing
    /// NotFound; the pronouns table is append-only.
    pub(crate) async fn assemble(
        &self,
        conn: &mut AsyncPgConnection,
        row: UserRow,
    ) -> AppResult<User> {
        let pair = match row.pronoun_id {
            Some(pronoun_id) => match self.pronouns.resolve(conn, pronoun_id).await? {
                Some(pair) => Some(pair),
                None => {
                    return Err(AppError::Internal {
                        source: anyhow::anyhow!(
                            "user {} references missing pronoun row {}",
                            row.id,
                            pronoun_id
                        ),
                    });
                }
            },
            None => None,
        };
        Ok(User::from_row(row, pair))
    }
}
