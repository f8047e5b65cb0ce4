//! Session cookie handling.
//!
//! The session token travels in an HTTP-only cookie named `session`.
//! Parsing and building happen here so the shape is declared once:
//! HttpOnly, SameSite=Lax, Path=/, Expires matching the session's
//! absolute expiry; cleared with an empty value and Max-Age=0.

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};

use almacen_core::SESSION_COOKIE;

/// Extracts the session token from the request's Cookie header(s).
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some(token) = pair.strip_prefix("session=") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

/// Builds the Set-Cookie value carrying a fresh session token.
pub fn session_cookie(token: &str, expires_at: DateTime<Utc>) -> HeaderValue {
    // RFC 7231 IMF-fixdate, the format browsers expect in Expires.
    let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Expires={expires}"
    );
    HeaderValue::from_str(&cookie).expect("session cookie is always valid ASCII")
}

/// Builds the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_parses_session_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; session=abc123; lang=es");
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert_eq!(session_token(&HeaderMap::new()), None);

        let headers = headers_with_cookie("theme=dark");
        assert_eq!(session_token(&headers), None);

        // A cleared cookie ("session=") does not count as a token.
        let headers = headers_with_cookie("session=");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let expires = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = session_cookie("tok", expires);
        let s = value.to_str().unwrap();

        assert!(s.starts_with("session=tok; "));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Lax"));
        assert!(s.contains("Path=/"));
        assert!(s.contains("Expires=Fri, 02 Jan 2026 03:04:05 GMT"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let s = clear_session_cookie();
        let s = s.to_str().unwrap();
        assert!(s.starts_with("session=;"));
        assert!(s.contains("Max-Age=0"));
    }
}
