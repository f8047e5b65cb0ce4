//! # almacen-core: Pure Domain Logic for Almacén
//!
//! This crate is the heart of the inventory system. It contains domain
//! types and business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacén Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Handlers (apps/server)                  │   │
//! │  │     /api/products  /api/entries  /api/sales  /api/auth/*       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ almacen-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │  ledger   │  │ validation│                  │   │
//! │  │   │  Product  │  │ weighted  │  │   rules   │                  │   │
//! │  │   │  SaleLine │  │  average  │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  almacen-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, the transaction engines      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Entry, SaleLine, users, sessions)
//! - [`ledger`] - Weighted-average-cost and revenue arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation of request payloads

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default session lifetime, in hours, when a login does not specify one.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Name of the session cookie carried by browsers.
pub const SESSION_COOKIE: &str = "session";
