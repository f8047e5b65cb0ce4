//! Authentication endpoints: login, logout, session check.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::cookies;
use crate::error::ApiError;
use crate::AppState;
use almacen_core::validation::validate_credentials;
use almacen_core::SessionUser;

/// Login request body. Fields are optional at the serde level so missing
/// fields produce the contract's 400 instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/auth/login
///
/// 400 on missing fields, 401 (generic) on bad credentials, 200 with the
/// session cookie and `{id, username, role}` on success.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();
    validate_credentials(&username, &password)?;

    let (user, session) = state.auth.login(&username, &password).await?;

    let mut response = Json(&user).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        cookies::session_cookie(&session.token, session.expires_at),
    );
    Ok(response)
}

/// POST /api/auth/logout
///
/// Invalidates the session from the cookie if present and clears the
/// cookie. Idempotent: logging out twice is fine.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = cookies::session_token(&headers) {
        state.auth.logout(&token).await?;
    }

    let mut response = Json(json!({ "ok": true })).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookies::clear_session_cookie());
    Ok(response)
}

/// GET /api/auth/session
///
/// Reports whether the request carries a valid session. The gate
/// middleware already resolved the cookie; the user (if any) arrives via
/// request extensions.
pub async fn session(user: Option<Extension<SessionUser>>) -> Json<serde_json::Value> {
    match user {
        Some(Extension(user)) => Json(json!({ "authenticated": true, "user": user })),
        None => Json(json!({ "authenticated": false })),
    }
}
