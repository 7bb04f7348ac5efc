//! User accounts and credential checks.
//!
//! Passwords are stored as bcrypt hashes only. Authentication failures are
//! always reported as [`ModelError::InvalidCredentials`], whether the email
//! is unknown or the password is wrong, and both paths run one bcrypt
//! verification so they take comparable time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use snipit_core::password::{hash_password, verify_password};
use sqlx::{FromRow, PgPool};
use std::fmt::Debug;
use std::sync::LazyLock;
use tracing::instrument;

use crate::errors::ModelError;

/// Unique constraint guarding `users.email`.
pub const EMAIL_CONSTRAINT: &str = "users_uc_email";

/// Verified against when an email is unknown, to keep response times even.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("snipit-timing-equaliser").unwrap_or_default());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Debug + Send + Sync {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError>;

    /// Returns the id of the user owning `email` when `password` matches.
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError>;

    async fn exists(&self, id: i64) -> Result<bool, ModelError>;

    async fn get(&self, id: i64) -> Result<User, ModelError>;

    /// Replaces the password after re-verifying the current one.
    async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ModelError>;
}

/// Runs a throwaway verification so unknown emails cost as much as wrong passwords.
fn equalise_timing(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, password))]
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        let hashed_password = hash_password(password)?;

        sqlx::query(
            "INSERT INTO users (name, email, hashed_password, created)
             VALUES ($1, $2, $3, now())",
        )
        .bind(name)
        .bind(email)
        .bind(&hashed_password)
        .execute(&self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT) =>
            {
                ModelError::DuplicateEmail
            }
            err => ModelError::Database(err),
        })?;

        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        let Some((id, hashed_password)) = row else {
            equalise_timing(password);
            return Err(ModelError::InvalidCredentials);
        };

        if verify_password(password, &hashed_password)? {
            Ok(id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: i64) -> Result<bool, ModelError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT true FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<User, ModelError> {
        if !self.exists(id).await? {
            return Err(ModelError::NoRecord);
        }

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, old_password, new_password))]
    async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ModelError> {
        let hashed_password =
            sqlx::query_scalar::<_, String>("SELECT hashed_password FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?
                .ok_or(ModelError::NoRecord)?;

        if !verify_password(old_password, &hashed_password)? {
            return Err(ModelError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password)?;

        sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
            .bind(&new_hash)
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
