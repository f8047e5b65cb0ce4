//! Authentication module.
//!
//! Credential verification, session issuance and resolution.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Lifecycle                                   │
//! │                                                                         │
//! │  POST /api/auth/login                                                  │
//! │       │  verify_password (constant time)                               │
//! │       ▼                                                                 │
//! │  create_session ── sweep expired rows, then persist                    │
//! │       │             {token: 256-bit random hex, expires_at: now+ttl}   │
//! │       ▼                                                                 │
//! │  Set-Cookie: session=…  (HttpOnly, SameSite=Lax)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  every request: resolve(token) ── single joined lookup with the        │
//! │       │                           expiry filter in the query           │
//! │       ▼                                                                 │
//! │  POST /api/auth/logout ── delete row (idempotent), clear cookie        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Passwords are stored as argon2 PHC strings: algorithm, parameters and
//! salt are embedded in the stored value, so verification is
//! self-describing and the parameters can change over time without
//! invalidating old hashes.

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::ApiError;
use almacen_core::{NewSession, SessionUser, UserRole};
use almacen_db::Database;

// =============================================================================
// Password hashing
// =============================================================================

/// Hashes a password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal()
    })?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string.
///
/// Fails closed: a malformed stored hash returns `false` rather than an
/// error, and the comparison itself is constant-time.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Generates an unguessable session token: 256 bits from the OS RNG,
/// hex-encoded.
fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// =============================================================================
// Authenticator
// =============================================================================

/// Verifies credentials, issues and destroys sessions, and resolves a
/// request's user from its token.
///
/// The authoritative session state lives solely in the database; nothing
/// is cached across requests.
#[derive(Debug, Clone)]
pub struct Authenticator {
    db: Database,
    ttl_hours: i64,
}

impl Authenticator {
    /// Creates a new Authenticator over the given database.
    pub fn new(db: Database, ttl_hours: i64) -> Self {
        Authenticator { db, ttl_hours }
    }

    /// Verifies a username/password pair and issues a session.
    ///
    /// Unknown usernames and wrong passwords produce the same generic
    /// failure.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(SessionUser, NewSession), ApiError> {
        let user = self
            .db
            .users()
            .find_by_username(username.trim())
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::unauthorized());
        }

        let session = self.create_session(&user.id).await?;
        info!(username = %user.username, "Login successful");

        Ok((
            SessionUser {
                id: user.id,
                username: user.username,
                role: user.role,
            },
            session,
        ))
    }

    /// Issues a session for a user id, sweeping globally expired rows
    /// first (lazy expiry cleanup).
    pub async fn create_session(&self, user_id: &str) -> Result<NewSession, ApiError> {
        let now = Utc::now();
        let swept = self.db.users().delete_expired_sessions(now).await?;
        if swept > 0 {
            debug!(swept, "Expired sessions removed");
        }

        let token = generate_session_token();
        let expires_at = now + Duration::hours(self.ttl_hours);
        self.db
            .users()
            .create_session(&token, user_id, expires_at)
            .await?;

        Ok(NewSession { token, expires_at })
    }

    /// Resolves a session token to its user, or `None` when the token is
    /// missing, unknown, or expired.
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionUser>, ApiError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.db.users().find_user_by_token(token, Utc::now()).await?)
    }

    /// Destroys a session. Idempotent.
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.db.users().delete_session(token).await?;
        Ok(())
    }

    /// Ensures at least one admin and one seller exist.
    ///
    /// Idempotent and race-safe: the insert is conflict-tolerant on the
    /// unique username, so concurrent invocations cannot double-provision.
    pub async fn ensure_default_users(&self, config: &ServerConfig) -> Result<(), ApiError> {
        let users = self.db.users();

        if users.count_by_role(UserRole::Admin).await? == 0 {
            let hash = hash_password(&config.default_admin_password)?;
            if users
                .insert(&config.default_admin_user, &hash, UserRole::Admin)
                .await?
                .is_some()
            {
                info!(username = %config.default_admin_user, "Default admin provisioned");
            }
        }

        if users.count_by_role(UserRole::Seller).await? == 0 {
            let hash = hash_password(&config.default_seller_password)?;
            if users
                .insert(&config.default_seller_user, &hash, UserRole::Seller)
                .await?
                .is_some()
            {
                info!(username = %config.default_seller_user, "Default seller provisioned");
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use almacen_db::DbConfig;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("secreto123").unwrap();

        assert!(verify_password("secreto123", &hash));
        assert!(!verify_password("incorrecto", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        // Corrupted stored hashes must never panic or error, only refuse.
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "not-a-phc-string"));
        assert!(!verify_password("x", "120000:abcd:ef01"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_shape() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    async fn test_auth() -> (Authenticator, ServerConfig) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ServerConfig::load().unwrap();
        (Authenticator::new(db, config.session_ttl_hours), config)
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let (auth, config) = test_auth().await;

        auth.ensure_default_users(&config).await.unwrap();
        auth.ensure_default_users(&config).await.unwrap();

        let users = auth.db.users();
        assert_eq!(users.count_by_role(UserRole::Admin).await.unwrap(), 1);
        assert_eq!(users.count_by_role(UserRole::Seller).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_and_resolve() {
        let (auth, config) = test_auth().await;
        auth.ensure_default_users(&config).await.unwrap();

        let (user, session) = auth.login("admin", "admin123").await.unwrap();
        assert_eq!(user.role, UserRole::Admin);

        let resolved = auth.resolve(&session.token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        auth.logout(&session.token).await.unwrap();
        assert!(auth.resolve(&session.token).await.unwrap().is_none());
        // Logging out again is not an error.
        auth.logout(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_failures_are_generic() {
        let (auth, config) = test_auth().await;
        auth.ensure_default_users(&config).await.unwrap();

        let unknown = auth.login("nadie", "x").await.unwrap_err();
        let wrong = auth.login("admin", "x").await.unwrap_err();

        // Same code, same message: no username enumeration.
        assert_eq!(unknown.code, wrong.code);
        assert_eq!(unknown.message, wrong.message);
    }
}
