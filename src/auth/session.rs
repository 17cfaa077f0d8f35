//! Session transport adapter
//!
//! Carries the session token between client and server via an HttpOnly
//! cookie, with an Authorization bearer header accepted as a fallback for
//! non-browser clients. This is the only layer that touches HTTP framing
//! for session state; the rest of the auth stack deals in bare tokens.

use axum::http::{header, HeaderMap};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "auth_token";

/// Build the Set-Cookie value that attaches a session token
pub fn session_cookie(token: &str, ttl_secs: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, ttl_secs
    )
}

/// Build the Set-Cookie value that clears the session carrier
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Read the session token from a request's headers
///
/// Checks the session cookie first, then falls back to an
/// `Authorization: Bearer` header.
pub fn read_session(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| {
            raw.split(';')
                .map(str::trim)
                .find_map(|pair| {
                    pair.strip_prefix(SESSION_COOKIE)
                        .and_then(|rest| rest.strip_prefix('='))
                })
                .map(|token| token.to_string())
        });

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|token| token.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok123", 3600);
        assert!(cookie.starts_with("auth_token=tok123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.starts_with("auth_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_read_session_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=tok123; lang=en"),
        );
        assert_eq!(read_session(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_read_session_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok456"),
        );
        assert_eq!(read_session(&headers).as_deref(), Some("tok456"));
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("auth_token=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(read_session(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_read_session_absent() {
        let headers = HeaderMap::new();
        assert_eq!(read_session(&headers), None);

        // A cookie with a similar prefix must not match
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("auth_token_old=stale"),
        );
        assert_eq!(read_session(&headers), None);
    }
}
