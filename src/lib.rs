//! # rcache
//!
//! A TTL response cache layered over an async HTTP client pipeline.
//!
//! Requests flow through an ordered stack of [`middleware`] and end at a
//! caller-supplied [`transport::Transport`]. The [`cache::CacheInterceptor`]
//! middleware answers GET requests from a [`cache::CacheStore`] while their
//! entries are fresh, and fills the store from successful responses of requests
//! that opt in with a [`cache::CacheIntent`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//! use rcache::{Client, Request};
//! use rcache::cache::{CacheIntent, CacheInterceptor, CacheStore};
//! use rcache::middleware::LoggerMiddleware;
//! # fn transport() -> Arc<dyn rcache::transport::Transport> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(CacheStore::new());
//!     let client = Client::new(transport())
//!         .with(LoggerMiddleware)
//!         .with(CacheInterceptor::new(Arc::clone(&store)));
//!
//!     let request = Request::get("/api/data")
//!         .query("x", "1")
//!         .extension(CacheIntent::cached().ttl(Duration::from_secs(600)));
//!     let response = client.execute(request).await?;
//!     println!("{}", response.text()?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod context;
pub mod http;
pub mod middleware;
pub mod transport;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use client::{Client, ClientError};
pub use http::{Headers, Method, Request, Response, StatusCode};
