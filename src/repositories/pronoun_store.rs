//! Pronoun persistence backed by the in-process cache.
//!
//! All functions take an explicit connection so callers can compose them
//! into larger transactions; the cache is only updated after the database
//! has accepted the row, so a rolled-back transaction never leaks a
//! phantom pair into memory.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewPronounRow, PronounRow, Pronouns};
use crate::repositories::PronounCache;

/// Pronoun store combining the pronouns table with the shared cache.
#[derive(Clone)]
pub struct PronounStore {
    cache: Arc<PronounCache>,
}

impl PronounStore {
    pub fn new(cache: Arc<PronounCache>) -> Self {
        Self { cache }
    }

    /// Mirrors the whole pronouns table into the cache. Called once at
    /// startup before the server starts accepting requests.
    pub async fn warm(&self, conn: &mut AsyncPgConnection) -> AppResult<usize> {
        use crate::schema::pronouns::dsl::*;

        let rows: Vec<PronounRow> = pronouns
            .select(PronounRow::as_select())
            .load(conn)
            .await
            .map_err(AppError::from)?;

        let count = rows.len();
        PronounCache::load(
            &self.cache,
            rows.into_iter().map(|row| (row.id, Pronouns::from(row))),
        );
        Ok(count)
    }

    /// Resolves a surrogate id to its pair, consulting the cache first and
    /// falling back to the table for ids inserted by other processes.
    pub async fn resolve(
        &self,
        conn: &mut AsyncPgConnection,
        pronoun_id: i32,
    ) -> AppResult<Option<Pronouns>> {
        if let Some(pair) = self.cache.get(pronoun_id) {
            return Ok(Some(pair));
        }

        use crate::schema::pronouns::dsl::*;

        let row: Option<PronounRow> = pronouns
            .filter(id.eq(pronoun_id))
            .select(PronounRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(AppError::from)?;

        Ok(row.map(|row| {
            let pair = Pronouns::from(row);
            self.cache.insert(pronoun_id, pair.clone());
            pair
        }))
    }

    /// Returns the id for a pair, inserting the row if the pair is new.
    ///
    /// Runs on the caller's connection so it participates in the caller's
    /// transaction. When two transactions race to insert the same pair the
    /// unique index rejects the loser, which then re-reads the winner's row.
    pub async fn resolve_or_create(
        &self,
        conn: &mut AsyncPgConnection,
        pair: &Pronouns,
    ) -> AppResult<i32> {
        if let Some(cached_id) = self.cache.get_id(pair) {
            return Ok(cached_id);
        }

        if let Some(existing_id) = self.find_id(conn, pair).await? {
            self.cache.insert(existing_id, pair.clone());
            return Ok(existing_id);
        }

        use crate::schema::pronouns::dsl::*;

        // ON CONFLICT DO NOTHING instead of a plain insert: a unique
        // violation would abort the caller's transaction, so the losing
        // side of a race re-reads the winner's row instead.
        let inserted: Option<PronounRow> = diesel::insert_into(pronouns)
            .values(NewPronounRow::from(pair.clone()))
            .on_conflict((subjective, objective))
            .do_nothing()
            .returning(PronounRow::as_returning())
            .get_result(conn)
            .await
            .optional()
            .map_err(AppError::from)?;

        match inserted {
            // Not cached yet: the caller's transaction may still roll back.
            // The pair lands in the cache on the first resolve after commit.
            Some(row) => Ok(row.id),
            // Lost the insert race; the row now exists.
            None => {
                let existing_id = self
                    .find_id(conn, pair)
                    .await?
                    .ok_or_else(|| AppError::not_found("pronouns", "pair", &pair.subjective))?;
                self.cache.insert(existing_id, pair.clone());
                Ok(existing_id)
            }
        }
    }

    async fn find_id(
        &self,
        conn: &mut AsyncPgConnection,
        pair: &Pronouns,
    ) -> AppResult<Option<i32>> {
        use crate::schema::pronouns::dsl::*;

        pronouns
            .filter(subjective.eq(&pair.subjective))
            .filter(objective.eq(&pair.objective))
            .select(id)
            .first(conn)
            .await
            .optional()
            .map_err(AppError::from)
    }
}
