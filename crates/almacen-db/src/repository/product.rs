//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD (delete cascades to entries and sales via foreign keys)
//! - Bulk sale-price adjustment
//!
//! Stock and cost-basis columns are NOT written here: `current_stock`,
//! `total_invested` and `unit_cost` are only mutated by the entry and
//! sale engines, inside their transactions.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use almacen_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

/// Partial update for a product: only present fields are written.
///
/// Mirrors the PUT contract — callers send any subset of the editable
/// columns. Derived columns are not editable through this path.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub unit_cost: Option<f64>,
    pub sale_price: Option<f64>,
}

impl ProductPatch {
    /// True when no field is set (the update would be a no-op).
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.name.is_none()
            && self.unit_cost.is_none()
            && self.sale_price.is_none()
    }
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, unit_cost, sale_price, current_stock, total_invested
            FROM products
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, unit_cost, sale_price, current_stock, total_invested
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its business code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, unit_cost, sale_price, current_stock, total_invested
            FROM products
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product with zero stock and zero cost basis.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the created product
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert(
        &self,
        code: &str,
        name: &str,
        unit_cost: f64,
        sale_price: f64,
    ) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();
        debug!(code = %code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, code, name, unit_cost, sale_price, current_stock, total_invested)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, 0)
            "#,
        )
        .bind(&id)
        .bind(code)
        .bind(name)
        .bind(unit_cost)
        .bind(sale_price)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id,
            code: code.to_string(),
            name: name.to_string(),
            unit_cost,
            sale_price,
            current_stock: 0.0,
            total_invested: 0.0,
        })
    }

    /// Applies a partial update to a product.
    ///
    /// Only the fields present in the patch are written; absent fields
    /// keep their current value (COALESCE).
    ///
    /// ## Returns
    /// * `Ok(())` - update applied (a no-op patch also succeeds)
    /// * `Err(DbError::NotFound)` - product doesn't exist
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<()> {
        if patch.is_empty() {
            // Nothing to write; still verify the target exists.
            return match self.get_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(DbError::not_found("Product", id)),
            };
        }

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                code = COALESCE(?2, code),
                name = COALESCE(?3, name),
                unit_cost = COALESCE(?4, unit_cost),
                sale_price = COALESCE(?5, sale_price)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(patch.code.as_deref())
        .bind(patch.name.as_deref())
        .bind(patch.unit_cost)
        .bind(patch.sale_price)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Entries and sale lines referencing it are removed by the
    /// `ON DELETE CASCADE` foreign keys.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Multiplies every product's sale price by `factor` in one statement.
    ///
    /// The caller has already validated the factor (finite, strictly
    /// positive); no row is touched otherwise.
    ///
    /// ## Returns
    /// The number of products adjusted.
    pub async fn adjust_prices(&self, factor: f64) -> DbResult<u64> {
        debug!(factor = %factor, "Adjusting all sale prices");

        let result = sqlx::query("UPDATE products SET sale_price = sale_price * ?1")
            .bind(factor)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert("AZ-01", "Azúcar 1kg", 2.5, 4.0).await.unwrap();
        assert_eq!(product.current_stock, 0.0);
        assert_eq!(product.total_invested, 0.0);

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.code, "AZ-01");
        assert_eq!(fetched.sale_price, 4.0);

        let by_code = repo.get_by_code("AZ-01").await.unwrap().unwrap();
        assert_eq!(by_code.id, product.id);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert("AZ-01", "Azúcar", 2.5, 4.0).await.unwrap();
        let err = repo.insert("AZ-01", "Otra", 1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert("CF-01", "Café", 6.0, 9.0).await.unwrap();

        let patch = ProductPatch {
            sale_price: Some(9.5),
            ..Default::default()
        };
        repo.update(&product.id, &patch).await.unwrap();

        let updated = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(updated.sale_price, 9.5);
        // Untouched fields keep their values.
        assert_eq!(updated.name, "Café");
        assert_eq!(updated.unit_cost, 6.0);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = test_db().await;
        let repo = db.products();

        let patch = ProductPatch {
            name: Some("x".into()),
            ..Default::default()
        };
        let err = repo.update("missing", &patch).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert("TE-01", "Té", 1.0, 2.0).await.unwrap();
        repo.delete(&product.id).await.unwrap();

        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&product.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_adjust_prices() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert("A", "Uno", 1.0, 10.0).await.unwrap();
        repo.insert("B", "Dos", 1.0, 20.0).await.unwrap();

        let adjusted = repo.adjust_prices(1.10).await.unwrap();
        assert_eq!(adjusted, 2);

        let a = repo.get_by_code("A").await.unwrap().unwrap();
        let b = repo.get_by_code("B").await.unwrap().unwrap();
        assert!((a.sale_price - 11.0).abs() < 1e-9);
        assert!((b.sale_price - 22.0).abs() < 1e-9);
    }
}
