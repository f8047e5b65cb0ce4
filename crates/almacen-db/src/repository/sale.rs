//! # Sale Repository
//!
//! The checkout engine: applies one multi-item sale as a single atomic
//! unit against the inventory ledger.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 checkout() — one transaction                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │  for each line (caller order):                                          │
//! │     1. read product row                                                 │
//! │        └── missing        → ROLLBACK, "not found"                       │
//! │        └── price <= 0     → ROLLBACK, "misconfigured price"             │
//! │     2. guarded decrement:                                               │
//! │        UPDATE products SET current_stock = current_stock - q            │
//! │        WHERE id = ? AND current_stock >= q                              │
//! │        └── 0 rows         → ROLLBACK, "insufficient stock"              │
//! │     3. INSERT sale row (shared transaction_id + timestamp)              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Other transactions observe the checkout only at commit: either all     │
//! │  lines and all decrements, or none.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! SQLite serializes writers on one database write lock, so two checkouts
//! cannot interleave their decrements. The `current_stock >= q` guard is
//! the commit-time stock check: even if this checkout read the row before
//! a competing one committed, the decrement re-checks under the write
//! lock and fails cleanly instead of driving stock negative. A checkout
//! that cannot take the lock within the pool's busy budget surfaces as a
//! retryable busy error.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use almacen_core::ledger::line_revenue;
use almacen_core::{CoreError, ReceiptLine, SaleItemInput, SaleLine, SaleReceipt, Summary};

/// Product fields the engine reads under the transaction.
#[derive(Debug, sqlx::FromRow)]
struct ProductSnapshot {
    code: String,
    name: String,
    sale_price: f64,
    current_stock: f64,
}

/// Repository for sale lines and the checkout engine.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sale lines joined with product identity, newest first.
    pub async fn list(&self) -> LedgerResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT
                s.id,
                s.transaction_id,
                s.product_id,
                p.name AS product_name,
                p.code AS product_code,
                s.quantity,
                s.unit_price,
                s.total_revenue,
                s.seller_id,
                u.username AS seller_name,
                s.created_at AS date
            FROM sales s
            JOIN products p ON p.id = s.product_id
            LEFT JOIN users u ON u.id = s.seller_id
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Applies one checkout atomically.
    ///
    /// Every line is applied in submission order within one transaction;
    /// any failure rolls the whole unit back. Duplicate product ids apply
    /// cumulatively, each line re-checked against the stock remaining
    /// after the previous one.
    ///
    /// The legacy single-item path is this same engine with a one-element
    /// slice; there is no separate, weaker code path.
    ///
    /// ## Arguments
    /// * `items` - pre-validated line items (non-empty, positive quantities)
    /// * `seller_id` - best-effort attribution, recorded when known
    ///
    /// ## Returns
    /// A receipt carrying the shared transaction id and timestamp, the
    /// revenue total, and per-line detail - enough to render without a
    /// second query.
    pub async fn checkout(
        &self,
        items: &[SaleItemInput],
        seller_id: Option<&str>,
    ) -> LedgerResult<SaleReceipt> {
        let transaction_id = Uuid::new_v4().to_string();
        // One "occurred at" instant shared by every line of the checkout.
        let now = Utc::now();

        debug!(
            transaction_id = %transaction_id,
            lines = items.len(),
            "Starting checkout"
        );

        let mut tx = self.pool.begin().await?;
        let mut lines: Vec<ReceiptLine> = Vec::with_capacity(items.len());
        let mut total_revenue = 0.0;

        for item in items {
            let snapshot = sqlx::query_as::<_, ProductSnapshot>(
                r#"
                SELECT code, name, sale_price, current_stock
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(&item.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(product) = snapshot else {
                tx.rollback().await?;
                return Err(CoreError::ProductNotFound(item.product_id.clone()).into());
            };

            if product.sale_price <= 0.0 {
                tx.rollback().await?;
                return Err(CoreError::PriceNotPositive { code: product.code }.into());
            }

            // Commit-time stock check: the guard re-reads under the write
            // lock, so a stale snapshot cannot oversell.
            let result = sqlx::query(
                r#"
                UPDATE products SET current_stock = current_stock - ?2
                WHERE id = ?1 AND current_stock >= ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(CoreError::InsufficientStock {
                    code: product.code,
                    available: product.current_stock,
                    requested: item.quantity,
                }
                .into());
            }

            let revenue = line_revenue(item.quantity, product.sale_price);

            sqlx::query(
                r#"
                INSERT INTO sales
                    (id, transaction_id, product_id, quantity, unit_price, total_revenue,
                     seller_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&transaction_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(product.sale_price)
            .bind(revenue)
            .bind(seller_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            total_revenue += revenue;
            lines.push(ReceiptLine {
                product_id: item.product_id.clone(),
                product_name: product.name,
                product_code: product.code,
                quantity: item.quantity,
                unit_price: product.sale_price,
                line_revenue: revenue,
            });
        }

        tx.commit().await.map_err(LedgerError::from)?;

        info!(
            transaction_id = %transaction_id,
            lines = lines.len(),
            total = %total_revenue,
            "Checkout committed"
        );

        Ok(SaleReceipt {
            transaction_id,
            date: now,
            total_revenue,
            lines,
        })
    }

    /// Whole-ledger aggregates: purchases, revenue, and their difference.
    pub async fn summary(&self) -> LedgerResult<Summary> {
        let total_invested: Option<f64> =
            sqlx::query_scalar("SELECT SUM(total_cost) FROM entries")
                .fetch_one(&self.pool)
                .await?;

        let total_sold: Option<f64> =
            sqlx::query_scalar("SELECT SUM(total_revenue) FROM sales")
                .fetch_one(&self.pool)
                .await?;

        let total_invested = total_invested.unwrap_or(0.0);
        let total_sold = total_sold.unwrap_or(0.0);

        Ok(Summary {
            total_invested,
            total_sold,
            gross_profit: total_sold - total_invested,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
