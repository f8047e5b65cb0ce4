//! # Almacén Server
//!
//! HTTP API for the inventory system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Server Components                               │
//! │                                                                         │
//! │  Request ──► gate middleware ──► handler ──► repository/engine          │
//! │                   │                                                     │
//! │                   ├── resolve session cookie (per request)              │
//! │                   ├── evaluate(user, path)                              │
//! │                   └── allow / redirect / 401 / 403                      │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────────┐  │
//! │  │ Authenticator│  │     Gate     │  │  Routes                      │  │
//! │  │              │  │              │  │                              │  │
//! │  │ argon2 hash  │  │ pure         │  │ auth, products, entries,     │  │
//! │  │ sessions     │  │ decision fn  │  │ sales, prices, summary       │  │
//! │  └──────────────┘  └──────────────┘  └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 3000)
//! - `DATABASE_PATH` - SQLite file (default: almacen.db)
//! - `SESSION_TTL_HOURS` - session lifetime (default: 12)
//! - `DB_BUSY_TIMEOUT_SECS` - lock-wait budget (default: 5)
//! - `DEFAULT_ADMIN_USER` / `DEFAULT_ADMIN_PASSWORD` - bootstrap admin
//! - `DEFAULT_SELLER_USER` / `DEFAULT_SELLER_PASSWORD` - bootstrap seller

pub mod auth;
pub mod config;
pub mod cookies;
pub mod error;
pub mod gate;
pub mod routes;

// Re-exports
pub use auth::Authenticator;
pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::router;

use almacen_db::Database;

/// Shared application state, cloned into every handler.
///
/// Session state is NOT held here: the authenticator reads the store on
/// every request, so a logout or expiry takes effect immediately.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Authenticator,
}

impl AppState {
    /// Assembles the state over one database handle.
    pub fn new(db: Database, session_ttl_hours: i64) -> Self {
        let auth = Authenticator::new(db.clone(), session_ttl_hours);
        AppState { db, auth }
    }
}
