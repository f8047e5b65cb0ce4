//! Product CRUD endpoints.
//!
//! Reads are open to every authenticated user (sellers need the catalog
//! to build a cart); writes are admin-only. The gate's path rules cannot
//! see the method, so the write handlers enforce the role themselves.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;
use almacen_core::validation::{validate_code, validate_positive_amount, validate_product_name};
use almacen_core::{Product, SessionUser};
use almacen_db::ProductPatch;

fn require_admin(user: &SessionUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

/// GET /api/products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.db.products().list().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
}

/// POST /api/products (admin)
///
/// Creates a product with zero stock; stock only enters through entries.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    require_admin(&user)?;

    let code = body.code.unwrap_or_default();
    let name = body.name.unwrap_or_default();
    validate_code(&code)?;
    validate_product_name(&name)?;

    let unit_cost = body
        .unit_cost
        .ok_or_else(|| ApiError::validation("unitCost is required"))?;
    let sale_price = body
        .sale_price
        .ok_or_else(|| ApiError::validation("salePrice is required"))?;
    validate_positive_amount("unitCost", unit_cost)?;
    validate_positive_amount("salePrice", sale_price)?;

    let product = state
        .db
        .products()
        .insert(code.trim(), name.trim(), unit_cost, sale_price)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
    #[serde(default)]
    pub sale_price: Option<f64>,
}

/// PUT /api/products (admin)
///
/// Partial update: only provided fields are written.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<UpdateProduct>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&user)?;

    let id = body
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::validation("id is required"))?;

    if let Some(ref code) = body.code {
        validate_code(code)?;
    }
    if let Some(ref name) = body.name {
        validate_product_name(name)?;
    }
    if let Some(unit_cost) = body.unit_cost {
        validate_positive_amount("unitCost", unit_cost)?;
    }
    if let Some(sale_price) = body.sale_price {
        validate_positive_amount("salePrice", sale_price)?;
    }

    let patch = ProductPatch {
        code: body.code,
        name: body.name,
        unit_cost: body.unit_cost,
        sale_price: body.sale_price,
    };
    state.db.products().update(&id, &patch).await?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub id: Option<String>,
}

/// DELETE /api/products?id=… (admin)
///
/// Cascades to the product's entries and sale lines.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&user)?;

    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("id is required"))?;

    state.db.products().delete(&id).await?;

    Ok(Json(json!({ "ok": true })))
}
