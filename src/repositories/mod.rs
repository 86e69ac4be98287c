//! Repository layer for data access operations.
//!
//! Reads and writes are split into [`UserReader`] and [`UserWriter`], both
//! sharing one [`PronounStore`] so the pronoun cache stays consistent across
//! the two sides.

mod pronoun_cache;
mod pronoun_store;
mod user_reader;
mod user_writer;

pub use pronoun_cache::PronounCache;
pub use pronoun_store::PronounStore;
pub use user_reader::{UserPage, UserReader};
pub use user_writer::UserWriter;

use std::sync::Arc;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::PooledConnection;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};

/// Checks out a connection, mapping pool exhaustion and timeouts onto the
/// application error type.
pub(crate) async fn get_conn(
    pool: &AsyncDbPool,
) -> AppResult<PooledConnection<'_, AsyncPgConnection>> {
    pool.get().await.map_err(|e| AppError::ConnectionPool {
        source: anyhow::Error::msg(e.to_string()),
    })
}

/// Aggregates all repositories for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub pronouns: PronounStore,
    pub users: UserReader,
    pub user_writer: UserWriter,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn new(pool: AsyncDbPool) -> Self {
        let pronouns = PronounStore::new(Arc::new(PronounCache::new()));
        let users = UserReader::new(pool.clone(), pronouns.clone());
        let user_writer = UserWriter::new(pool, pronouns.clone(), users.clone());
        Self {
            pronouns,
            users,
            user_writer,
        }
    }
}
