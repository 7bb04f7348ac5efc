//! Snippets and their store.
//!
//! A snippet expires `N` days after creation, where `N` is chosen at insert
//! time. Expired snippets are invisible: [`SnippetStore::get`] reports them
//! as [`ModelError::NoRecord`] and [`SnippetStore::latest`] skips them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::fmt::Debug;
use tracing::instrument;

use crate::errors::ModelError;

/// Number of snippets shown on the home page.
pub const LATEST_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

#[async_trait]
pub trait SnippetStore: Debug + Send + Sync {
    /// Stores a snippet expiring `expires_in_days` after now and returns its id.
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_in_days: i32,
    ) -> Result<i64, ModelError>;

    async fn get(&self, id: i64) -> Result<Snippet, ModelError>;

    /// Non-expired snippets, newest first.
    async fn latest(&self, limit: i64) -> Result<Vec<Snippet>, ModelError>;
}

#[derive(Debug, Clone)]
pub struct PgSnippetStore {
    db: PgPool,
}

impl PgSnippetStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnippetStore for PgSnippetStore {
    #[instrument(skip(self, content))]
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_in_days: i32,
    ) -> Result<i64, ModelError> {
        // now() is fixed for the transaction, so expires is exactly created + N days.
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO snippets (title, content, created, expires)
             VALUES ($1, $2, now(), now() + make_interval(days => $3))
             RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(expires_in_days)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > now() AND id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NoRecord)
    }

    #[instrument(skip(self))]
    async fn latest(&self, limit: i64) -> Result<Vec<Snippet>, ModelError> {
        let snippets = sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > now() ORDER BY id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(snippets)
    }
}
