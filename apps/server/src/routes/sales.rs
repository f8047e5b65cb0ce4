//! Sale endpoints: the HTTP face of the checkout engine.
//!
//! POST accepts either the batch body `{items: [{productId, quantity}]}`
//! or the legacy single-item body `{productId, quantity}`. Both feed the
//! same engine; the legacy form is just a one-line cart, with identical
//! stock and atomicity guarantees.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;
use almacen_core::validation::validate_sale_items;
use almacen_core::{SaleItemInput, SaleLine, SaleReceipt, SessionUser, Summary};

/// GET /api/sales
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SaleLine>>, ApiError> {
    Ok(Json(state.db.sales().list().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSale {
    pub items: Vec<SaleItemInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleSale {
    pub product_id: String,
    pub quantity: f64,
    /// Legacy clients send the price they saw; the engine snapshots the
    /// product's current sale price regardless, so the field is accepted
    /// and ignored.
    #[serde(default)]
    #[allow(dead_code)]
    pub unit_price: Option<f64>,
}

/// Either checkout body shape, normalized to a line list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SalePayload {
    Batch(BatchSale),
    Single(SingleSale),
}

impl SalePayload {
    fn into_items(self) -> Vec<SaleItemInput> {
        match self {
            SalePayload::Batch(batch) => batch.items,
            SalePayload::Single(single) => vec![SaleItemInput {
                product_id: single.product_id,
                quantity: single.quantity,
            }],
        }
    }
}

/// POST /api/sales (admin, seller)
///
/// Applies the checkout atomically and returns the receipt. Seller
/// attribution is best-effort: recorded when the request carries an
/// authenticated user.
pub async fn create(
    State(state): State<AppState>,
    user: Option<Extension<SessionUser>>,
    Json(body): Json<SalePayload>,
) -> Result<(StatusCode, Json<SaleReceipt>), ApiError> {
    let items = body.into_items();
    validate_sale_items(&items)?;

    let seller_id = user.as_ref().map(|Extension(u)| u.id.as_str());
    let receipt = state.db.sales().checkout(&items, seller_id).await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/summary (admin)
pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, ApiError> {
    Ok(Json(state.db.sales().summary().await?))
}
