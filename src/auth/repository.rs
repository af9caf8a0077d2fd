// Credential store: user persistence and email uniqueness

use crate::auth::{
    error::AuthError,
    models::{NewUser, User},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;

/// Persistence contract for user records.
///
/// `create` must enforce email uniqueness atomically at the storage layer.
/// A check-then-insert in the caller is racy under concurrent registrations;
/// the store's own constraint is the authoritative `DuplicateEmail` signal.
/// Email lookup is case-insensitive.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, AuthError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError>;
}

/// PostgreSQL-backed user store.
///
/// Uniqueness rides on the `users_email_unique` index over `LOWER(email)`;
/// concurrent inserts with the same email serialize inside the database and
/// exactly one wins. Pool acquire timeouts and driver failures surface as
/// `StoreUnavailable`.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, phone, password_hash, newsletter_opt_in)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, phone, password_hash, newsletter_opt_in, created_at
            "#,
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.password_hash)
        .bind(new_user.newsletter_opt_in)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::DuplicateEmail;
                }
            }
            AuthError::StoreUnavailable(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, phone, password_hash, newsletter_opt_in, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, phone, password_hash, newsletter_opt_in, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(user)
    }
}

/// In-memory user store for tests and local development.
///
/// All state lives behind one mutex, so check-and-insert in `create` is
/// atomic and the concurrent-registration race test is meaningful. Keys are
/// lowercased emails, matching the Postgres `LOWER(email)` index.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    by_email: HashMap<String, User>,
    next_id: i64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| AuthError::StoreUnavailable("store lock poisoned".to_string()))?;

        let key = new_user.email.to_lowercase();
        if state.by_email.contains_key(&key) {
            return Err(AuthError::DuplicateEmail);
        }

        state.next_id += 1;
        let user = User {
            id: state.next_id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone: new_user.phone,
            password_hash: new_user.password_hash,
            newsletter_opt_in: new_user.newsletter_opt_in,
            created_at: Utc::now(),
        };
        state.by_email.insert(key, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let state = self
            .inner
            .lock()
            .map_err(|_| AuthError::StoreUnavailable("store lock poisoned".to_string()))?;
        Ok(state.by_email.get(&email.to_lowercase()).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError> {
        let state = self
            .inner
            .lock()
            .map_err(|_| AuthError::StoreUnavailable("store lock poisoned".to_string()))?;
        Ok(state.by_email.values().find(|user| user.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            newsletter_opt_in: false,
        }
    }

    #[tokio::test]
    async fn create_then_find_by_email_and_id() {
        let store = InMemoryUserStore::new();
        let created = store.create(sample_user("a@example.com")).await.unwrap();

        let by_email = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let store = InMemoryUserStore::new();
        store.create(sample_user("dup@example.com")).await.unwrap();

        let err = store.create(sample_user("DUP@Example.COM")).await.unwrap_err();
        assert_eq!(err, AuthError::DuplicateEmail);
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let store = InMemoryUserStore::new();
        store.create(sample_user("Mixed@Example.com")).await.unwrap();
        assert!(store
            .find_by_email("mixed@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn missing_records_return_none() {
        let store = InMemoryUserStore::new();
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(999).await.unwrap().is_none());
    }
}
