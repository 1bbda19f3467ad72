//! Credential extraction and cookie helpers

use axum::http::{header, HeaderMap, HeaderValue};

use crate::error::Result;

/// Extract the presented token from a request's headers.
///
/// An `Authorization: Bearer` header wins over the session cookie.
pub fn token_from_headers<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    // Try to get token from Authorization header
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.trim());
            }
        }
    }

    // Try to get token from cookie
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_str) = cookie_header.to_str() else {
            continue;
        };
        for cookie in cookie_str.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                if name == cookie_name && !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }

    None
}

/// `Set-Cookie` value carrying a freshly issued token
pub fn session_cookie(cookie_name: &str, token: &str) -> Result<HeaderValue> {
    let cookie = format!("{}={}; HttpOnly; Path=/; SameSite=Lax", cookie_name, token);
    Ok(HeaderValue::from_str(&cookie)?)
}

/// `Set-Cookie` value telling the client to discard its token
pub fn clear_cookie(cookie_name: &str) -> Result<HeaderValue> {
    let cookie = format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        cookie_name
    );
    Ok(HeaderValue::from_str(&cookie)?)
}
