//! In-memory stores for tests.
//!
//! Both stores honour the same contracts as the PostgreSQL adapters:
//! expiry filtering, duplicate-email detection and indistinguishable
//! authentication failures. Passwords are still bcrypt-hashed, with a low
//! work factor to keep test suites fast.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use snipit_core::password::{hash_password_with_cost, verify_password};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::errors::ModelError;
use crate::snippets::{Snippet, SnippetStore};
use crate::users::{User, UserStore};

const TEST_HASH_COST: u32 = 4;

static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password_with_cost("snipit-timing-equaliser", TEST_HASH_COST).unwrap_or_default()
});

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct MemorySnippetStore {
    snippets: Mutex<Vec<Snippet>>,
    unavailable: Mutex<bool>,
    panic_next: AtomicBool,
}

impl MemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a snippet that expired `days_ago` days ago and returns its id.
    pub fn insert_expired(&self, title: &str, content: &str, days_ago: i64) -> i64 {
        let mut snippets = lock(&self.snippets);
        let id = snippets.len() as i64 + 1;
        let expires = Utc::now() - Duration::days(days_ago);
        snippets.push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created: expires - Duration::days(1),
            expires,
        });
        id
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    /// Makes the next call panic. Calls after that behave normally.
    pub fn panic_on_next_call(&self) {
        self.panic_next.store(true, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        lock(&self.snippets).len()
    }

    fn check_available(&self) -> Result<(), ModelError> {
        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("snippet store blew up");
        }
        if *lock(&self.unavailable) {
            return Err(ModelError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetStore {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_in_days: i32,
    ) -> Result<i64, ModelError> {
        self.check_available()?;
        let mut snippets = lock(&self.snippets);
        let id = snippets.len() as i64 + 1;
        let created = Utc::now();
        snippets.push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created,
            expires: created + Duration::days(i64::from(expires_in_days)),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        self.check_available()?;
        let now = Utc::now();
        lock(&self.snippets)
            .iter()
            .find(|s| s.id == id && s.expires > now)
            .cloned()
            .ok_or(ModelError::NoRecord)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Snippet>, ModelError> {
        self.check_available()?;
        let now = Utc::now();
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(lock(&self.snippets)
            .iter()
            .rev()
            .filter(|s| s.expires > now)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    hashed_password: String,
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<StoredUser>>,
    next_id: Mutex<i64>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn hashed_password(&self, id: i64) -> Option<String> {
        lock(&self.users)
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.hashed_password.clone())
    }

    pub fn id_for_email(&self, email: &str) -> Option<i64> {
        lock(&self.users)
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| u.user.id)
    }

    /// Deletes a user, simulating an account removed while its session is live.
    pub fn delete(&self, id: i64) {
        lock(&self.users).retain(|u| u.user.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        let hashed_password = hash_password_with_cost(password, TEST_HASH_COST)?;
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.user.email == email) {
            return Err(ModelError::DuplicateEmail);
        }

        let mut next_id = lock(&self.next_id);
        *next_id += 1;
        users.push(StoredUser {
            user: User {
                id: *next_id,
                name: name.to_string(),
                email: email.to_string(),
                created: Utc::now(),
            },
            hashed_password,
        });
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError> {
        let found = lock(&self.users)
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| (u.user.id, u.hashed_password.clone()));

        let Some((id, hashed_password)) = found else {
            let _ = verify_password(password, &DUMMY_HASH);
            return Err(ModelError::InvalidCredentials);
        };

        if verify_password(password, &hashed_password)? {
            Ok(id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i64) -> Result<bool, ModelError> {
        Ok(lock(&self.users).iter().any(|u| u.user.id == id))
    }

    async fn get(&self, id: i64) -> Result<User, ModelError> {
        lock(&self.users)
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone())
            .ok_or(ModelError::NoRecord)
    }

    async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ModelError> {
        let current = self.hashed_password(id).ok_or(ModelError::NoRecord)?;
        if !verify_password(old_password, &current)? {
            return Err(ModelError::InvalidCredentials);
        }

        let new_hash = hash_password_with_cost(new_password, TEST_HASH_COST)?;
        if let Some(stored) = lock(&self.users).iter_mut().find(|u| u.user.id == id) {
            stored.hashed_password = new_hash;
        }
        Ok(())
    }
}
