//! Session cookie integrity and header plumbing.
//!
//! The cookie carries `<session id>.<base64url(HMAC-SHA256)>`; the MAC
//! is keyed by the configured session secret, so a bare session id
//! lifted from the store is not enough to forge a cookie.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Cookie name for the signed session id.
pub const SESSION_COOKIE: &str = "sid";

pub fn sign_session_id(id: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(id.as_bytes());
    let tag = mac.finalize().into_bytes();
    format!("{}.{}", id, URL_SAFE_NO_PAD.encode(tag))
}

/// Returns the inner session id if the MAC checks out. The comparison
/// is constant-time (`Mac::verify_slice`).
pub fn verify_session_cookie<'a>(value: &'a str, secret: &str) -> Option<&'a str> {
    let (id, tag_b64) = value.rsplit_once('.')?;
    let tag = URL_SAFE_NO_PAD.decode(tag_b64).ok()?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(id.as_bytes());
    mac.verify_slice(&tag).ok()?;
    Some(id)
}

pub fn session_cookie(value: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pulls the session cookie value out of the `Cookie` request header.
pub fn session_cookie_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
