//! Purchase entry endpoints (admin-only; the gate keeps sellers out of
//! this prefix entirely).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;
use almacen_core::validation::{validate_positive_amount, validate_quantity};
use almacen_core::Entry;

/// GET /api/entries
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Entry>>, ApiError> {
    Ok(Json(state.db.entries().list().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntry {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

/// POST /api/entries (admin)
///
/// Records a purchase and applies the stock/cost-basis/average-cost
/// update atomically.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateEntry>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let product_id = body
        .product_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::validation("productId is required"))?;

    let quantity = body
        .quantity
        .ok_or_else(|| ApiError::validation("quantity is required"))?;
    validate_quantity(quantity)?;

    let unit_cost = body
        .unit_cost
        .ok_or_else(|| ApiError::validation("unitCost is required"))?;
    validate_positive_amount("unitCost", unit_cost)?;

    let entry = state
        .db
        .entries()
        .record(&product_id, quantity, unit_cost)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
