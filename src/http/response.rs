//! Completed HTTP response as delivered by a transport or replayed from cache.

use std::str;

use bytes::Bytes;

use super::{Headers, StatusCode};

/// A completed HTTP response.
///
/// Responses are cheap to clone: the body is a reference-counted [`Bytes`]
/// buffer, so the cache can hand out copies of a stored value without
/// sharing ownership of the entry itself.
///
/// # Examples
///
/// ```
/// use rcache::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(r#"{"status":"ok"}"#);
///
/// assert_eq!(response.status(), StatusCode::Ok);
/// assert_eq!(response.text().unwrap(), r#"{"status":"ok"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a response header. Multiple calls with the same name are additive.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Bytes::from(body.into());
        self
    }

    /// Sets the response body from raw bytes.
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text.
    pub fn text(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(&self.body)
    }

    /// Deserializes the body as JSON.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let r = Response::new(StatusCode::Created)
            .header("X-Request-Id", "abc-123")
            .body("ok");
        assert_eq!(r.status(), StatusCode::Created);
        assert_eq!(r.headers().get("x-request-id"), Some("abc-123"));
        assert_eq!(r.text().unwrap(), "ok");
    }

    #[test]
    fn clone_shares_body_buffer() {
        let r = Response::new(StatusCode::Ok).body_bytes(Bytes::from_static(b"payload"));
        let copy = r.clone();
        assert_eq!(copy, r);
        assert_eq!(copy.bytes().as_ptr(), r.bytes().as_ptr());
    }

    #[test]
    fn json_body() {
        #[derive(serde::Deserialize)]
        struct Payload {
            count: u32,
        }

        let r = Response::new(StatusCode::Ok).body(r#"{"count":3}"#);
        let payload: Payload = r.json().unwrap();
        assert_eq!(payload.count, 3);
        assert!(Response::default().json::<Payload>().is_err());
    }

    #[test]
    fn invalid_utf8_body() {
        let r = Response::new(StatusCode::Ok).body_bytes(vec![0xff, 0xfe]);
        assert!(r.text().is_err());
    }
}
