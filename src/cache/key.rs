//! Cache key derivation.

use std::{borrow::Borrow, fmt};

use crate::http::Request;

/// Canonical identity of a request for caching purposes.
///
/// The key is the request URL with its query parameters resolved in send
/// order. Method and headers are not part of the key; only GET requests are
/// ever looked up, and header variants intentionally share one entry.
///
/// # Examples
///
/// ```
/// use rcache::{Request, cache::CacheKey};
///
/// let key = CacheKey::for_request(&Request::get("/api/data").query("x", "1"));
/// assert_eq!(key.as_str(), "/api/data?x=1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_request(request: &Request) -> Self {
        Self(request.url_with_params())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
