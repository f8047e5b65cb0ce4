//! Authorization gate.
//!
//! A pure decision function over (user-or-none, path), evaluated by the
//! middleware on every request. The decision is never cached: session
//! validity can change at any moment, so each request resolves its token
//! against the store and re-runs the rules.
//!
//! ## Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. static asset or public endpoint      → allow                       │
//! │  2. no user, API path                    → 401                         │
//! │     no user, page path                   → redirect /login?from=…      │
//! │  3. user on /login                       → redirect to role home       │
//! │  4. seller outside allow-lists, API      → 403                         │
//! │     seller outside allow-lists, page     → redirect /salidas?denied=1  │
//! │  5. anything else (admin)                → allow                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::cookies;
use crate::error::ApiError;
use crate::AppState;
use almacen_core::{SessionUser, UserRole};

/// Paths reachable without a session.
const PUBLIC_PATHS: &[&str] = &[
    "/login",
    "/api/auth/login",
    "/api/auth/logout",
    "/api/auth/session",
];

/// Static asset prefixes, always public.
const STATIC_PREFIXES: &[&str] = &["/assets", "/favicon", "/public"];

/// Application pages a seller may visit.
const SELLER_ALLOWED_APP_PATHS: &[&str] = &["/salidas"];

/// API prefixes forming a seller's operational surface: recording sales,
/// reading products, checking the session, logging out.
const SELLER_ALLOWED_API_PREFIXES: &[&str] = &[
    "/api/sales",
    "/api/products",
    "/api/auth/logout",
    "/api/auth/session",
];

/// Default landing page per role.
pub fn home_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/resumen",
        UserRole::Seller => "/salidas",
    }
}

/// The gate's verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Let the request through.
    Allow,
    /// Page request without a session: send to the login page, keeping
    /// the intended destination so the client can return after login.
    RedirectToLogin { from: Option<String> },
    /// Authenticated but the page is off-limits (or it's the login page):
    /// send to `to`, flagging the denial when one happened.
    Redirect { to: String },
    /// API request without a session.
    Unauthenticated,
    /// API request from a user lacking permission for the path.
    Forbidden,
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
}

fn is_static_asset(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

fn is_api(path: &str) -> bool {
    path.starts_with("/api")
}

/// Decides whether a request may proceed.
///
/// Pure: no I/O, no state, re-evaluated per request.
pub fn evaluate(user: Option<&SessionUser>, path: &str) -> Access {
    if is_static_asset(path) {
        return Access::Allow;
    }

    // The login page itself is handled below so an authenticated visitor
    // gets bounced to their home page; the auth endpoints stay open.
    if is_public(path) && path != "/login" {
        return Access::Allow;
    }

    let Some(user) = user else {
        if path == "/login" {
            return Access::Allow;
        }
        if is_api(path) {
            return Access::Unauthenticated;
        }
        let from = (path != "/").then(|| path.to_string());
        return Access::RedirectToLogin { from };
    };

    if path == "/login" {
        return Access::Redirect {
            to: home_path(user.role).to_string(),
        };
    }

    if user.role == UserRole::Seller {
        if path == "/" {
            return Access::Redirect {
                to: home_path(UserRole::Seller).to_string(),
            };
        }
        if SELLER_ALLOWED_APP_PATHS
            .iter()
            .any(|p| path == *p || path.starts_with(&format!("{p}/")))
        {
            return Access::Allow;
        }
        if is_api(path) {
            if SELLER_ALLOWED_API_PREFIXES.iter().any(|p| path.starts_with(p)) {
                return Access::Allow;
            }
            return Access::Forbidden;
        }
        // Any other page: back to the sales screen, flagging the denial.
        return Access::Redirect {
            to: format!("{}?denied=1", home_path(UserRole::Seller)),
        };
    }

    Access::Allow
}

/// Axum middleware applying the gate to every request.
///
/// Resolves the session cookie against the store, stashes the user in the
/// request extensions for handlers (role checks, seller attribution), and
/// turns the verdict into a response.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let user = match cookies::session_token(request.headers()) {
        Some(token) => match state.auth.resolve(&token).await {
            Ok(user) => user,
            Err(err) => return err.into_response(),
        },
        None => None,
    };

    let access = evaluate(user.as_ref(), &path);

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    match access {
        Access::Allow => next.run(request).await,
        Access::RedirectToLogin { from } => {
            let target = match from {
                Some(from) => format!("/login?from={from}"),
                None => "/login".to_string(),
            };
            Redirect::to(&target).into_response()
        }
        Access::Redirect { to } => Redirect::to(&to).into_response(),
        Access::Unauthenticated => ApiError::unauthenticated().into_response(),
        Access::Forbidden => ApiError::forbidden().into_response(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> SessionUser {
        SessionUser {
            id: "u-admin".into(),
            username: "admin".into(),
            role: UserRole::Admin,
        }
    }

    fn seller() -> SessionUser {
        SessionUser {
            id: "u-seller".into(),
            username: "seller".into(),
            role: UserRole::Seller,
        }
    }

    #[test]
    fn test_public_paths_allowed_without_session() {
        assert_eq!(evaluate(None, "/login"), Access::Allow);
        assert_eq!(evaluate(None, "/api/auth/login"), Access::Allow);
        assert_eq!(evaluate(None, "/api/auth/session"), Access::Allow);
        assert_eq!(evaluate(None, "/favicon.ico"), Access::Allow);
        assert_eq!(evaluate(None, "/assets/app.css"), Access::Allow);
    }

    #[test]
    fn test_anonymous_page_redirects_to_login() {
        assert_eq!(
            evaluate(None, "/productos"),
            Access::RedirectToLogin {
                from: Some("/productos".into())
            }
        );
        // The root path carries no `from`.
        assert_eq!(evaluate(None, "/"), Access::RedirectToLogin { from: None });
    }

    #[test]
    fn test_anonymous_api_rejected_without_redirect() {
        assert_eq!(evaluate(None, "/api/products"), Access::Unauthenticated);
        assert_eq!(evaluate(None, "/api/sales"), Access::Unauthenticated);
    }

    #[test]
    fn test_authenticated_login_page_bounces_home() {
        assert_eq!(
            evaluate(Some(&admin()), "/login"),
            Access::Redirect {
                to: "/resumen".into()
            }
        );
        assert_eq!(
            evaluate(Some(&seller()), "/login"),
            Access::Redirect {
                to: "/salidas".into()
            }
        );
    }

    #[test]
    fn test_seller_confinement() {
        let user = seller();

        // Operational surface is allowed.
        assert_eq!(evaluate(Some(&user), "/salidas"), Access::Allow);
        assert_eq!(evaluate(Some(&user), "/api/sales"), Access::Allow);
        assert_eq!(evaluate(Some(&user), "/api/products"), Access::Allow);
        assert_eq!(evaluate(Some(&user), "/api/auth/logout"), Access::Allow);

        // Admin pages bounce back to the sales screen, flagged.
        assert_eq!(
            evaluate(Some(&user), "/productos"),
            Access::Redirect {
                to: "/salidas?denied=1".into()
            }
        );
        assert_eq!(
            evaluate(Some(&user), "/"),
            Access::Redirect {
                to: "/salidas".into()
            }
        );

        // Admin APIs are a hard 403.
        assert_eq!(evaluate(Some(&user), "/api/entries"), Access::Forbidden);
        assert_eq!(
            evaluate(Some(&user), "/api/prices/adjust"),
            Access::Forbidden
        );
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        let user = admin();
        assert_eq!(evaluate(Some(&user), "/"), Access::Allow);
        assert_eq!(evaluate(Some(&user), "/productos"), Access::Allow);
        assert_eq!(evaluate(Some(&user), "/api/entries"), Access::Allow);
        assert_eq!(evaluate(Some(&user), "/api/prices/adjust"), Access::Allow);
    }
}
