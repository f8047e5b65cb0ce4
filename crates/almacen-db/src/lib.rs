//! # almacen-db: Database Layer for Almacén
//!
//! This crate provides database access for the inventory system. It uses
//! SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacén Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    almacen-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  product.rs   │    │  (embedded)  │  │   │
//! │  │   │               │    │  entry.rs     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  sale.rs      │    │ 001_init.sql │  │   │
//! │  │   │ WAL, FKs,     │    │  user.rs      │    │              │  │   │
//! │  │   │ busy budget   │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The inventory ledger's derived columns (`current_stock`,
//! `total_invested`, `unit_cost`) are mutated only inside the entry and
//! sale engines' transactions. No other code path writes them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use almacen_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("almacen.db")).await?;
//! let receipt = db.sales().checkout(&items, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::entry::EntryRepository;
pub use repository::product::{ProductPatch, ProductRepository};
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
