//! Middleware pipeline: composable logic wrapped around outgoing requests.
//!
//! Each middleware receives a [`Request`] and a [`Next`] cursor and returns an
//! [`EventStream`]. It may:
//!
//! - **Pass through**: return `next.run(request)` unchanged.
//! - **Short-circuit**: return its own stream without calling `next`; the
//!   transport is never reached.
//! - **Observe**: call `next.run(request)` and wrap the resulting stream to
//!   react to individual events as they flow back to the caller.
//!
//! When the chain is exhausted, [`Next::run`] hands the request to the
//! [`Transport`].
//!
//! ## Core types
//!
//! - [`Middleware`]: trait implemented by all middleware.
//! - [`Next`]: cursor into the remaining chain.
//! - [`MiddlewareHandler`]: type-erased, cheaply-cloneable middleware function.
//! - [`from_middleware`]: converts a [`Middleware`] into a [`MiddlewareHandler`].
//! - [`LoggerMiddleware`]: built-in request/response logger.

use std::sync::Arc;

use futures::StreamExt;
use tokio::time::Instant;

use crate::{
    http::Request,
    transport::{EventStream, HttpEvent, Transport},
};

/// A type-erased, reference-counted middleware function.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rcache::{Request, middleware::{MiddlewareHandler, Next}};
///
/// let handler: MiddlewareHandler = Arc::new(|request: Request, next: Next| next.run(request));
/// ```
pub type MiddlewareHandler = Arc<dyn Fn(Request, Next) -> EventStream + Send + Sync + 'static>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |request: Request, next: Next| middleware.handle(request, next))
}

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is consumed by [`run`](Self::run), so a middleware forwards a
/// request at most once.
pub struct Next {
    middlewares: Arc<[MiddlewareHandler]>,
    index: usize,
    transport: Arc<dyn Transport>,
}

impl Next {
    /// Creates a cursor positioned at the start of `middlewares`, ending at
    /// `transport`.
    pub fn new(middlewares: Arc<[MiddlewareHandler]>, transport: Arc<dyn Transport>) -> Self {
        Self {
            middlewares,
            index: 0,
            transport,
        }
    }

    /// Invokes the next middleware, or the transport once the chain is exhausted.
    pub fn run(mut self, request: Request) -> EventStream {
        match self.middlewares.get(self.index).cloned() {
            Some(handler) => {
                self.index += 1;
                handler(request, self)
            }
            None => self.transport.send(request),
        }
    }
}

/// The core trait for all pipeline middleware.
///
/// # Contract
///
/// - Implementations **must** be `Send + Sync`; one instance serves every
///   request issued through a [`Client`](crate::Client).
/// - Work done inside `handle` itself runs when the request is issued; work
///   attached to the returned stream runs as the caller polls it.
pub trait Middleware: Send + Sync {
    fn handle(&self, request: Request, next: Next) -> EventStream;
}

/// Built-in middleware that logs each request's method, URL, status, and duration.
///
/// Emits one `tracing::info!` line when the final response arrives:
///
/// ```text
/// METHOD /url?query - STATUS (duration)
/// ```
///
/// Transport failures are logged at `warn`. Events pass through unmodified.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, request: Request, next: Next) -> EventStream {
        let start = Instant::now();
        let method = request.method().to_string();
        let url = request.url_with_params();

        Box::pin(next.run(request).inspect(move |event| match event {
            Ok(HttpEvent::Response(response)) => {
                tracing::info!(
                    "{} {} - {} ({:?})",
                    method,
                    url,
                    response.status().as_u16(),
                    start.elapsed()
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(method = %method, url = %url, error = %e, "request failed");
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::stream;

    use super::*;
    use crate::{
        Response, StatusCode,
        transport::{TransportError, completed},
    };

    fn echo_transport() -> Arc<dyn Transport> {
        Arc::new(|request: Request| -> EventStream {
            completed(Response::new(StatusCode::Ok).body(request.url_with_params()))
        })
    }

    async fn collect(events: EventStream) -> Vec<Result<HttpEvent, TransportError>> {
        events.collect().await
    }

    #[tokio::test]
    async fn empty_chain_reaches_transport() {
        let next = Next::new(Arc::from(Vec::new()), echo_transport());
        let events = collect(next.run(Request::get("/a"))).await;
        assert_eq!(events.len(), 1);
        let event = events[0].as_ref().unwrap();
        assert_eq!(event.as_response().unwrap().text().unwrap(), "/a");
    }

    #[tokio::test]
    async fn handlers_run_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));

        let first_calls = Arc::clone(&calls);
        let first: MiddlewareHandler = Arc::new(move |request: Request, next: Next| {
            assert_eq!(first_calls.fetch_add(1, Ordering::SeqCst), 0);
            next.run(request.query("via", "first"))
        });
        let second_calls = Arc::clone(&calls);
        let second: MiddlewareHandler = Arc::new(move |request: Request, next: Next| {
            assert_eq!(second_calls.fetch_add(1, Ordering::SeqCst), 1);
            next.run(request)
        });

        let next = Next::new(Arc::from(vec![first, second]), echo_transport());
        let events = collect(next.run(Request::get("/a"))).await;
        let response = events[0].as_ref().unwrap().as_response().unwrap().clone();
        assert_eq!(response.text().unwrap(), "/a?via=first");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn short_circuit_skips_transport() {
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&sent);
        let transport: Arc<dyn Transport> = Arc::new(move |_request: Request| -> EventStream {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(stream::empty())
        });
        let stop: MiddlewareHandler = Arc::new(|_request: Request, _next: Next| {
            completed(Response::new(StatusCode::NoContent))
        });

        let next = Next::new(Arc::from(vec![stop]), transport);
        let events = collect(next.run(Request::get("/a"))).await;
        assert_eq!(events.len(), 1);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn logger_passes_events_through() {
        let transport: Arc<dyn Transport> = Arc::new(|_request: Request| -> EventStream {
            Box::pin(stream::iter(vec![
                Ok(HttpEvent::Sent),
                Err(TransportError::Aborted {
                    reason: "gone".into(),
                }),
            ]))
        });
        let logger = from_middleware(Arc::new(LoggerMiddleware));

        let next = Next::new(Arc::from(vec![logger]), transport);
        let events = collect(next.run(Request::delete("/a"))).await;
        assert!(matches!(events[0], Ok(HttpEvent::Sent)));
        assert!(matches!(events[1], Err(TransportError::Aborted { .. })));
    }
}
