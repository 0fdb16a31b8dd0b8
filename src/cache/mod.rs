//! Response caching layer, an in-memory TTL store and the middleware that
//! consults it.
//!
//! - [`CacheStore`] owns every cached response. `set` never replaces an
//!   existing key; `get` evicts stale entries lazily.
//! - [`CacheInterceptor`] sits in the request pipeline, replays fresh entries
//!   for GET requests, and fills the store from successful responses when the
//!   request's [`CacheIntent`] asks for it.
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//! use rcache::{Client, Request, cache::{CacheIntent, CacheInterceptor, CacheStore}};
//! # fn transport() -> Arc<dyn rcache::transport::Transport> { unimplemented!() }
//!
//! # async fn run() -> Result<(), rcache::ClientError> {
//! let store = Arc::new(CacheStore::new());
//! let client = Client::new(transport()).with(CacheInterceptor::new(Arc::clone(&store)));
//!
//! let request = Request::get("/api/data")
//!     .query("x", "1")
//!     .extension(CacheIntent::cached().ttl(Duration::from_secs(600)));
//! let response = client.execute(request).await?;
//! # Ok(())
//! # }
//! ```

mod intent;
mod interceptor;
mod key;
mod store;

pub use intent::{CacheIntent, DEFAULT_TTL};
pub use interceptor::CacheInterceptor;
pub use key::CacheKey;
pub use store::{CacheEntry, CacheStore};
