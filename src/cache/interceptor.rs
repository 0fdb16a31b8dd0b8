//! Cache-aware request middleware.

use std::sync::Arc;

use futures::StreamExt;
use tracing::debug;

use super::{CacheEntry, CacheIntent, CacheKey, CacheStore};
use crate::{
    http::{Method, Request},
    middleware::{Middleware, Next},
    transport::{self, EventStream, HttpEvent},
};

/// Middleware that answers GET requests from a [`CacheStore`] and fills the
/// store from forwarded responses.
///
/// For each request:
///
/// - Non-GET requests are forwarded without a lookup or a store.
/// - A fresh stored response is replayed as a single
///   [`HttpEvent::Response`]; the rest of the pipeline is not called.
/// - Otherwise the request's [`CacheIntent`] decides. When it is cached, the
///   forwarded stream is observed and the first successful final response is
///   stored under the request's [`CacheKey`]. Every event, including errors,
///   reaches the caller unchanged.
///
/// The lookup happens before the intent is read, so a fresh entry is served
/// even to a request that did not ask for caching.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rcache::cache::{CacheInterceptor, CacheStore};
///
/// let store = Arc::new(CacheStore::new());
/// let interceptor = CacheInterceptor::new(Arc::clone(&store));
/// ```
#[derive(Debug)]
pub struct CacheInterceptor {
    store: Arc<CacheStore>,
    default_intent: CacheIntent,
}

impl CacheInterceptor {
    /// Creates an interceptor backed by `store`, applying
    /// [`CacheIntent::default`] to requests that carry no intent.
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            default_intent: CacheIntent::default(),
        }
    }

    /// Sets the intent applied to requests that carry none.
    #[must_use]
    pub fn default_intent(mut self, intent: CacheIntent) -> Self {
        self.default_intent = intent;
        self
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    fn intent_for(&self, request: &Request) -> CacheIntent {
        request
            .extensions()
            .get::<CacheIntent>()
            .copied()
            .unwrap_or(self.default_intent)
    }
}

impl Middleware for CacheInterceptor {
    fn handle(&self, request: Request, next: Next) -> EventStream {
        if *request.method() != Method::Get {
            return next.run(request);
        }

        let key = CacheKey::for_request(&request);

        if let Some(cached) = self.store.get(key.as_str()) {
            debug!(key = %key, "cache hit");
            return transport::completed(cached);
        }

        let intent = self.intent_for(&request);
        if !intent.cached {
            debug!(key = %key, "cache miss; request not cacheable");
            return next.run(request);
        }

        debug!(key = %key, ttl = ?intent.ttl, "cache miss; forwarding");
        let store = Arc::clone(&self.store);

        Box::pin(next.run(request).inspect(move |event| {
            let Ok(HttpEvent::Response(response)) = event else {
                return;
            };
            if !response.status().is_success() {
                debug!(key = %key, status = %response.status(), "unsuccessful response not cached");
                return;
            }
            store.set(key.clone(), CacheEntry::new(response.clone(), intent.ttl));
        }))
    }
}
