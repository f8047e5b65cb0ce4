//! # Repository Module
//!
//! Database repository implementations for Almacén.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().checkout(&items, seller)                           │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── list(&self)                                                       │
//! │  ├── checkout(&self, items, seller_id)                                 │
//! │  └── summary(&self)                                                    │
//! │       │                                                                 │
//! │       │  SQL inside one transaction                                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and price adjustment
//! - [`entry::EntryRepository`] - Purchase entries + average cost
//! - [`sale::SaleRepository`] - The atomic checkout engine
//! - [`user::UserRepository`] - Users and sessions

pub mod entry;
pub mod product;
pub mod sale;
pub mod user;
