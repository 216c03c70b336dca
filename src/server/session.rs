//! Per-request namespace and token, read from cookies.
//!
//! A browser without a namespace cookie gets a fresh UUID v7 namespace. When a
//! namespace has a `namespace.token` setting, the token cookie must match it.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use rusqlite::Connection;

use super::error::AppError;
use crate::handler::setting;
use crate::storage::row::Setting;

pub const NAMESPACE_COOKIE: &str = "things-namespace";
pub const TOKEN_COOKIE: &str = "things-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub namespace: String,
    pub token: Option<String>,
    /// The namespace was just created and must be sent back as a cookie.
    pub fresh: bool,
}

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let namespace = cookie(headers, NAMESPACE_COOKIE).filter(|ns| is_valid_namespace(ns));
        let token = cookie(headers, TOKEN_COOKIE);
        match namespace {
            Some(namespace) => Self {
                namespace,
                token,
                fresh: false,
            },
            None => Self {
                namespace: uuid::Uuid::now_v7().to_string(),
                token,
                fresh: true,
            },
        }
    }

    /// Check the token cookie against the namespace's `namespace.token` setting.
    pub fn authorize(&self, conn: &Connection) -> Result<(), AppError> {
        match setting::lookup(conn, &self.namespace, Setting::NAMESPACE_TOKEN)? {
            Some(expected) if self.token.as_deref() != Some(expected.as_str()) => {
                tracing::warn!(namespace = %self.namespace, "namespace token mismatch");
                Err(AppError::Unauthorized)
            }
            _ => Ok(()),
        }
    }

    /// `Set-Cookie` header for a freshly created namespace.
    pub fn set_cookie(&self) -> Option<(axum::http::HeaderName, HeaderValue)> {
        if !self.fresh {
            return None;
        }
        let value = format!(
            "{NAMESPACE_COOKIE}={}; Path=/; Max-Age=31536000; HttpOnly; SameSite=Lax",
            self.namespace
        );
        HeaderValue::from_str(&value).ok().map(|v| (SET_COOKIE, v))
    }
}

/// Namespaces appear in URLs and cookies; keep them to a safe alphabet.
pub fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace.len() <= 64
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Value of cookie `name` from any `Cookie` header.
fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_namespace_and_token() {
        let session = Session::from_headers(&headers("a=b; things-namespace=alice; things-token=s3cret"));
        assert_eq!(session.namespace, "alice");
        assert_eq!(session.token.as_deref(), Some("s3cret"));
        assert!(!session.fresh);
        assert!(session.set_cookie().is_none());
    }

    #[test]
    fn missing_namespace_creates_one() {
        let session = Session::from_headers(&HeaderMap::new());
        assert!(session.fresh);
        assert!(is_valid_namespace(&session.namespace));
        let (name, value) = session.set_cookie().unwrap();
        assert_eq!(name, SET_COOKIE);
        assert!(value.to_str().unwrap().starts_with("things-namespace="));
    }

    #[test]
    fn invalid_namespace_is_replaced() {
        let session = Session::from_headers(&headers("things-namespace=../etc"));
        assert!(session.fresh);
        assert_ne!(session.namespace, "../etc");
    }
}
