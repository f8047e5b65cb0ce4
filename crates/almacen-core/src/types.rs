//! # Domain Types
//!
//! Core domain types used throughout Almacén.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Entry       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code (business)│   │  product_id (FK)│   │  transaction_id │       │
//! │  │  unit_cost      │   │  quantity       │   │  quantity       │       │
//! │  │  sale_price     │   │  unit_cost      │   │  unit_price     │       │
//! │  │  current_stock  │   │  total_cost     │   │  total_revenue  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     User        │   │   UserRole      │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  username       │   │  Admin          │                             │
//! │  │  password_hash  │   │  Seller         │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `code`: business key - human-readable, unique, shown on receipts
//!
//! All wire-facing types serialize as camelCase to match the JSON contract
//! of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// User & Session
// =============================================================================

/// Role of an authenticated user.
///
/// Admins reach the whole application; sellers are confined to the
/// sales-entry surface by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Seller,
}

impl UserRole {
    /// Stable string form, matching the database CHECK constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Seller => "seller",
        }
    }
}

/// A stored user record. The password hash never leaves the server.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// The user as resolved from a session token; safe to serialize to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A freshly issued session: the opaque token plus its absolute expiry.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked by the inventory ledger.
///
/// `current_stock` and `total_invested` are derived fields maintained
/// exclusively by the entry and sale engines; no other code path writes
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business key, unique, shown to sellers.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Weighted average acquisition cost, recomputed on each entry.
    pub unit_cost: f64,

    /// Current selling price.
    pub sale_price: f64,

    /// Quantity on hand. Never negative at any committed state.
    pub current_stock: f64,

    /// Cumulative cost basis of the stock currently tracked.
    pub total_invested: f64,
}

// =============================================================================
// Entry (purchase event)
// =============================================================================

/// An immutable purchase event: stock in, cost basis up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub product_id: String,
    pub quantity: f64,
    pub unit_cost: f64,
    /// Derived: `quantity * unit_cost`, frozen at creation.
    pub total_cost: f64,
    pub date: DateTime<Utc>,
}

// =============================================================================
// Sale line & checkout
// =============================================================================

/// One line of a checkout as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: f64,
}

/// An immutable, persisted sale line joined with its product identity.
///
/// `unit_price` is a snapshot of the product's sale price at transaction
/// time; later price changes do not rewrite history. Lines created by one
/// checkout share `transaction_id` and `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    pub date: DateTime<Utc>,
}

/// One line of a checkout receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_revenue: f64,
}

/// The result of a committed checkout, sufficient to render a receipt
/// without a second query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    /// Shared by every line of this checkout.
    pub transaction_id: String,
    /// Shared "occurred at" instant for all lines.
    pub date: DateTime<Utc>,
    pub total_revenue: f64,
    pub lines: Vec<ReceiptLine>,
}

// =============================================================================
// Summary
// =============================================================================

/// Whole-ledger aggregates for the overview page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_invested: f64,
    pub total_sold: f64,
    pub gross_profit: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str_matches_serde() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Seller.as_str(), "seller");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&UserRole::Seller).unwrap(), "\"seller\"");
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: "p1".into(),
            code: "AZ-01".into(),
            name: "Azúcar 1kg".into(),
            unit_cost: 2.5,
            sale_price: 4.0,
            current_stock: 10.0,
            total_invested: 25.0,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["unitCost"], 2.5);
        assert_eq!(json["salePrice"], 4.0);
        assert_eq!(json["currentStock"], 10.0);
        assert_eq!(json["totalInvested"], 25.0);
    }

    #[test]
    fn test_sale_line_omits_empty_seller() {
        let line = SaleLine {
            id: "s1".into(),
            transaction_id: "t1".into(),
            product_id: "p1".into(),
            product_name: "Café".into(),
            product_code: "CF-01".into(),
            quantity: 1.0,
            unit_price: 8.0,
            total_revenue: 8.0,
            seller_id: None,
            seller_name: None,
            date: Utc::now(),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("sellerId").is_none());
        assert!(json.get("sellerName").is_none());
    }
}
