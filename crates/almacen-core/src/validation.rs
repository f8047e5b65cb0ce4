//! # Validation Module
//!
//! Input validation for request payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (Rust)                                          │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: field/business rule validation                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engines (almacen-db)                                         │
//! │  └── Commit-time checks (stock, price snapshots)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── CHECK (current_stock >= 0)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator rejects before any store mutation happens, so a failed
//! request leaves no partial state.

use crate::error::ValidationError;
use crate::types::SaleItemInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code (business key).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 128 characters
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 256 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 256 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 256,
        });
    }

    Ok(())
}

/// Validates login credentials are present. No policy beyond presence:
/// credential quality is the administrator's concern, and detailed errors
/// here would leak which field was wrong.
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be finite (rejects NaN and infinities from JSON edge cases)
/// - Must be strictly positive; fractional quantities are legal
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "quantity".to_string(),
        });
    }

    if qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary amount that must be strictly positive
/// (unit cost of an entry, sale price of a product).
pub fn validate_positive_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if amount <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a price-adjustment percentage.
///
/// ## Rules
/// - Must be finite
/// - The resulting factor `1 + percent/100` must be strictly positive,
///   so `percent <= -100` is rejected before any row is touched
///
/// ## Returns
/// The multiplication factor to apply.
pub fn validate_percent(percent: f64) -> ValidationResult<f64> {
    if !percent.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "percent".to_string(),
        });
    }

    let factor = 1.0 + percent / 100.0;
    if factor <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "price factor".to_string(),
        });
    }

    Ok(factor)
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates a checkout submission before it reaches the engine.
///
/// ## Rules
/// - `items` must not be empty
/// - every product id must be present
/// - every quantity must be finite and strictly positive
///
/// Duplicate product ids are deliberately NOT rejected: each line is
/// applied independently within the same atomic unit, so duplicates apply
/// cumulatively and the per-line stock checks still hold.
pub fn validate_sale_items(items: &[SaleItemInput]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "productId".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("AZ-01").is_ok());
        assert!(validate_code("café molido 500g").is_ok());

        assert!(validate_code("").is_err());
        assert!(validate_code("   ").is_err());
        assert!(validate_code(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Azúcar 1kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0).is_ok());
        assert!(validate_quantity(0.5).is_ok());

        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!((validate_percent(10.0).unwrap() - 1.10).abs() < 1e-12);
        assert!((validate_percent(-50.0).unwrap() - 0.50).abs() < 1e-12);

        // -100% would zero every price; the factor must stay positive
        assert!(validate_percent(-100.0).is_err());
        assert!(validate_percent(-150.0).is_err());
        assert!(validate_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_sale_items() {
        let items = vec![SaleItemInput {
            product_id: "p1".into(),
            quantity: 2.0,
        }];
        assert!(validate_sale_items(&items).is_ok());

        assert!(validate_sale_items(&[]).is_err());

        let bad_qty = vec![SaleItemInput {
            product_id: "p1".into(),
            quantity: 0.0,
        }];
        assert!(validate_sale_items(&bad_qty).is_err());

        let blank_id = vec![SaleItemInput {
            product_id: "  ".into(),
            quantity: 1.0,
        }];
        assert!(validate_sale_items(&blank_id).is_err());
    }

    #[test]
    fn test_duplicate_product_ids_allowed() {
        let items = vec![
            SaleItemInput {
                product_id: "p1".into(),
                quantity: 1.0,
            },
            SaleItemInput {
                product_id: "p1".into(),
                quantity: 2.0,
            },
        ];
        assert!(validate_sale_items(&items).is_ok());
    }
}
