//! # User & Session Repository
//!
//! The credential and session store. Users carry hashed passwords and a
//! role; sessions are opaque tokens with absolute expiry.
//!
//! ## Invariants
//! - `username` is unique; bootstrap inserts rely on the constraint
//!   (`ON CONFLICT DO NOTHING`) rather than locking, so concurrent
//!   provisioning is race-safe.
//! - A valid session always resolves to exactly one user (token is the
//!   primary key, user_id is a foreign key).
//! - Expiry is checked inside the lookup query itself: there is no window
//!   between "check expiry" and "use session".

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use almacen_core::{SessionUser, User, UserRole};

/// Repository for user and session database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Inserts a user, ignoring the insert if the username is taken.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - the created user
    /// * `Ok(None)` - a user with that username already existed
    ///
    /// The conflict-tolerant form makes bootstrap idempotent and safe to
    /// run concurrently.
    pub async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> DbResult<Option<User>> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(username = %username, role = %role.as_str(), "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
        }))
    }

    /// Finds a user by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Counts users holding a given role.
    pub async fn count_by_role(&self, role: UserRole) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Persists a session token with its absolute expiry.
    pub async fn create_session(
        &self,
        token: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a session. Idempotent: deleting a nonexistent token is not
    /// an error.
    pub async fn delete_session(&self, token: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes all sessions that expired before `now`.
    ///
    /// ## Returns
    /// The number of rows swept. Invoked opportunistically on session
    /// creation (lazy expiry).
    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Resolves a session token to its user, in one atomic lookup.
    ///
    /// The expiry filter is part of the query: an expired token never
    /// resolves, even while its row still awaits cleanup.
    pub async fn find_user_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<SessionUser>> {
        let user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT u.id, u.username, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ?1 AND s.expires_at > ?2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_is_conflict_tolerant() {
        let db = test_db().await;
        let repo = db.users();

        let first = repo.insert("admin", "hash-a", UserRole::Admin).await.unwrap();
        assert!(first.is_some());

        // Same username again: silently ignored, original row untouched.
        let second = repo.insert("admin", "hash-b", UserRole::Admin).await.unwrap();
        assert!(second.is_none());

        let stored = repo.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hash-a");
        assert_eq!(repo.count_by_role(UserRole::Admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_session_resolves_to_user() {
        let db = test_db().await;
        let repo = db.users();
        let user = repo.insert("ana", "h", UserRole::Seller).await.unwrap().unwrap();

        let expires = Utc::now() + Duration::hours(12);
        repo.create_session("tok-1", &user.id, expires).await.unwrap();

        let resolved = repo.find_user_by_token("tok-1", Utc::now()).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.username, "ana");
        assert_eq!(resolved.role, UserRole::Seller);

        assert!(repo.find_user_by_token("tok-x", Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_never_resolves() {
        let db = test_db().await;
        let repo = db.users();
        let user = repo.insert("ana", "h", UserRole::Seller).await.unwrap().unwrap();

        // Already expired at creation (ttl 0): the row exists, the lookup
        // must still say no.
        let expires = Utc::now() - Duration::seconds(1);
        repo.create_session("tok-old", &user.id, expires).await.unwrap();

        assert!(repo
            .find_user_by_token("tok-old", Utc::now())
            .await
            .unwrap()
            .is_none());

        // Sweep removes it.
        let swept = repo.delete_expired_sessions(Utc::now()).await.unwrap();
        assert_eq!(swept, 1);
    }

    #[tokio::test]
    async fn test_delete_session_idempotent() {
        let db = test_db().await;
        let repo = db.users();
        let user = repo.insert("ana", "h", UserRole::Seller).await.unwrap().unwrap();

        repo.create_session("tok-1", &user.id, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        repo.delete_session("tok-1").await.unwrap();
        // Second delete of the same (now missing) token is not an error.
        repo.delete_session("tok-1").await.unwrap();

        assert!(repo.find_user_by_token("tok-1", Utc::now()).await.unwrap().is_none());
    }
}
