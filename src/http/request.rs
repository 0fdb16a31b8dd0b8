//! Outgoing HTTP request builder.

use bytes::Bytes;

use super::{Headers, Method};
use crate::context::Extensions;

/// An outgoing HTTP request, built by the caller and handed to the pipeline.
///
/// Query parameters are kept separately from the URL and resolved by
/// [`url_with_params`](Self::url_with_params) in insertion order, exactly as a
/// transport would put them on the wire.
///
/// # Examples
///
/// ```
/// use rcache::http::{Method, Request};
///
/// let request = Request::get("/api/search")
///     .query("q", "rust lang")
///     .query("page", "2")
///     .header("Accept", "application/json");
///
/// assert_eq!(request.method(), &Method::Get);
/// assert_eq!(request.url_with_params(), "/api/search?q=rust%20lang&page=2");
/// assert_eq!(request.headers().get("accept"), Some("application/json"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    headers: Headers,
    body: Bytes,
    extensions: Extensions,
}

impl Request {
    /// Creates a request with no query parameters, headers, or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Headers::new(),
            body: Bytes::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Appends a query parameter. Repeated names are sent repeatedly.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Attaches a typed value to the request context, e.g. a
    /// [`CacheIntent`](crate::cache::CacheIntent).
    #[must_use]
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target URL as given, without the builder's query parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Returns the URL with all query parameters resolved.
    ///
    /// Names and values are percent-encoded. Parameters are joined with `&`
    /// onto a URL that already carries a query string, otherwise after a `?`.
    /// A URL ending in `?` or `&` is extended without an extra separator.
    pub fn url_with_params(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }

        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = match self.url.find('?') {
            None => "?",
            Some(pos) if pos + 1 == self.url.len() || self.url.ends_with('&') => "",
            Some(_) => "&",
        };

        format!("{}{}{}", self.url, separator, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_params_is_unchanged() {
        let req = Request::get("/api/data");
        assert_eq!(req.url_with_params(), "/api/data");
    }

    #[test]
    fn params_keep_insertion_order() {
        let req = Request::get("/api/data").query("x", "1").query("a", "2");
        assert_eq!(req.url_with_params(), "/api/data?x=1&a=2");
    }

    #[test]
    fn params_extend_existing_query_string() {
        let req = Request::get("/api/data?fixed=yes").query("x", "1");
        assert_eq!(req.url_with_params(), "/api/data?fixed=yes&x=1");

        let req = Request::get("/api/data?").query("x", "1");
        assert_eq!(req.url_with_params(), "/api/data?x=1");
    }

    #[test]
    fn params_are_percent_encoded() {
        let req = Request::get("/find").query("name", "a&b=c");
        assert_eq!(req.url_with_params(), "/find?name=a%26b%3Dc");
    }

    #[test]
    fn extension_is_readable_by_type() {
        #[derive(Debug, PartialEq)]
        struct Marker(u8);

        let req = Request::post("/submit").body("payload").extension(Marker(3));
        assert_eq!(req.method(), &Method::Post);
        assert_eq!(req.body_bytes().as_ref(), b"payload");
        assert_eq!(req.extensions().get::<Marker>(), Some(&Marker(3)));
    }
}
