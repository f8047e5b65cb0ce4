//! # Entry Repository
//!
//! Purchase events and the average-cost update.
//!
//! ## Entry Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 record() — one transaction                              │
//! │                                                                         │
//! │  1. INSERT entry row (append-only)                                     │
//! │  2. UPDATE products                                                    │
//! │        current_stock  += quantity                                      │
//! │        total_invested += quantity * unit_cost                          │
//! │     (one delta statement: concurrent entries for the same product      │
//! │      cannot lose an increment)                                         │
//! │  3. UPDATE products SET unit_cost = total_invested / current_stock     │
//! │     WHERE current_stock > 0                                            │
//! │     (zero stock keeps the last known average; no division by zero)     │
//! │                                                                         │
//! │  Any failure → the whole unit rolls back.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, LedgerResult};
use almacen_core::{CoreError, Entry};

/// Repository for purchase entries.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: SqlitePool,
}

impl EntryRepository {
    /// Creates a new EntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EntryRepository { pool }
    }

    /// Lists all entries, newest first.
    pub async fn list(&self) -> LedgerResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, product_id, quantity, unit_cost, total_cost, created_at AS date
            FROM entries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Records a purchase entry and applies it to the product aggregates.
    ///
    /// Inputs are pre-validated at the boundary (quantity > 0,
    /// unit_cost > 0). The compound update runs as delta statements inside
    /// one transaction, so two concurrent entries for the same product
    /// serialize on the store's write lock and neither increment is lost.
    pub async fn record(
        &self,
        product_id: &str,
        quantity: f64,
        unit_cost: f64,
    ) -> LedgerResult<Entry> {
        let id = Uuid::new_v4().to_string();
        let total_cost = quantity * unit_cost;
        let now = Utc::now();

        debug!(product_id = %product_id, quantity = %quantity, "Recording entry");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO entries (id, product_id, quantity, unit_cost, total_cost, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_cost)
        .bind(total_cost)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            // A missing product trips the FK constraint on insert.
            match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => {
                    CoreError::ProductNotFound(product_id.to_string()).into()
                }
                other => crate::error::LedgerError::Db(other),
            }
        })?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                current_stock = current_stock + ?2,
                total_invested = total_invested + ?3
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(total_cost)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(CoreError::ProductNotFound(product_id.to_string()).into());
        }

        // Weighted average recompute, skipped at zero stock so the product
        // retains its last known unit cost.
        sqlx::query(
            r#"
            UPDATE products SET unit_cost = total_invested / current_stock
            WHERE id = ?1 AND current_stock > 0
            "#,
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Entry {
            id,
            product_id: product_id.to_string(),
            quantity,
            unit_cost,
            total_cost,
            date: now,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_average_cost_round_trip() {
        let db = test_db().await;
        let product = db.products().insert("AZ-01", "Azúcar", 0.0, 5.0).await.unwrap();
        let repo = db.entries();

        repo.record(&product.id, 10.0, 2.0).await.unwrap();
        repo.record(&product.id, 10.0, 4.0).await.unwrap();

        let updated = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(updated.current_stock, 20.0);
        assert_eq!(updated.total_invested, 60.0);
        assert!((updated.unit_cost - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_entry_is_persisted() {
        let db = test_db().await;
        let product = db.products().insert("CF-01", "Café", 0.0, 9.0).await.unwrap();

        let entry = db.entries().record(&product.id, 5.0, 6.0).await.unwrap();
        assert_eq!(entry.total_cost, 30.0);

        let listed = db.entries().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, entry.id);
        assert_eq!(listed[0].product_id, product.id);
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_no_rows() {
        let db = test_db().await;

        let err = db.entries().record("missing", 1.0, 1.0).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::ProductNotFound(_))
        ));

        // The whole unit rolled back: no orphan entry row.
        assert!(db.entries().list().await.unwrap().is_empty());
    }
}
