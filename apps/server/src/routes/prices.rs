//! Bulk price adjustment endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;
use almacen_core::validation::validate_percent;
use almacen_core::SessionUser;

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    #[serde(default)]
    pub percent: Option<f64>,
}

/// POST /api/prices/adjust (admin)
///
/// Multiplies every sale price by `1 + percent/100` in one bulk update.
/// Non-finite percentages and factors that are not strictly positive
/// (percent ≤ -100) are rejected before any row is touched.
pub async fn adjust(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<AdjustRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !user.is_admin() {
        return Err(ApiError::forbidden());
    }

    let percent = body
        .percent
        .ok_or_else(|| ApiError::validation("percent is required"))?;
    let factor = validate_percent(percent)?;

    let adjusted = state.db.products().adjust_prices(factor).await?;
    info!(percent = %percent, adjusted, "Sale prices adjusted");

    Ok(Json(json!({ "ok": true, "factor": factor })))
}
