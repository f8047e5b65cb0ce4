//! # Route Modules
//!
//! One module per API group, assembled into the application router.
//!
//! ```text
//! /api/auth/login     POST   public
//! /api/auth/logout    POST   any
//! /api/auth/session   GET    any
//! /api/products       GET/POST/PUT/DELETE   admin (write), seller (read)
//! /api/entries        GET/POST              admin
//! /api/sales          GET/POST              admin, seller
//! /api/summary        GET                   admin
//! /api/prices/adjust  POST                  admin
//! /*                  page fallback through the gate
//! ```
//!
//! Every route sits behind the authorization gate middleware; the gate
//! resolves the session cookie and enforces the path rules before any
//! handler runs.

pub mod auth;
pub mod entries;
pub mod prices;
pub mod products;
pub mod sales;

use axum::http::{StatusCode, Uri};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::gate;
use crate::AppState;

/// Builds the application router with the gate and tracing layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route(
            "/api/products",
            get(products::list)
                .post(products::create)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/api/entries", get(entries::list).post(entries::create))
        .route("/api/sales", get(sales::list).post(sales::create))
        .route("/api/summary", get(sales::summary))
        .route("/api/prices/adjust", post(prices::adjust))
        .fallback(page_fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::authorize,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Fallback for everything that is not an API route.
///
/// Page rendering belongs to the front-end build; the server's part is
/// the gate in front of it (redirects, role confinement), which has
/// already run by the time this handler is reached. Unknown API paths
/// get a JSON 404 instead.
async fn page_fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        return ApiError::not_found("Route", uri.path()).into_response();
    }

    (
        StatusCode::OK,
        Html("<!doctype html><html><body><div id=\"app\"></div></body></html>"),
    )
        .into_response()
}
