//! Request-issuing client: a transport plus an ordered middleware stack.

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tracing::debug;

use crate::{
    http::{Request, Response},
    middleware::{Middleware, MiddlewareHandler, Next, from_middleware},
    transport::{EventStream, HttpEvent, Transport, TransportError},
};

/// Errors returned by [`Client::execute`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("event stream ended without a final response")]
    Incomplete,
}

/// Issues requests through a middleware pipeline that ends at a [`Transport`].
///
/// Middleware run in registration order: the first one added sees the request
/// first and the response last.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rcache::{Client, middleware::LoggerMiddleware, transport::Transport};
/// # fn transport() -> Arc<dyn Transport> { unimplemented!() }
///
/// let client = Client::new(transport()).with(LoggerMiddleware);
/// ```
#[derive(Clone)]
pub struct Client {
    middlewares: Arc<[MiddlewareHandler]>,
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            middlewares: Arc::from(Vec::new()),
            transport,
        }
    }

    /// Appends a middleware to the end of the stack.
    #[must_use]
    pub fn with<M>(self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.with_handler(from_middleware(Arc::new(middleware)))
    }

    /// Appends an already type-erased handler to the end of the stack.
    #[must_use]
    pub fn with_handler(mut self, handler: MiddlewareHandler) -> Self {
        let mut stack = self.middlewares.to_vec();
        stack.push(handler);
        self.middlewares = Arc::from(stack);
        self
    }

    /// Number of registered middleware.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Sends `request` through the pipeline and returns every event it produces.
    pub fn send(&self, request: Request) -> EventStream {
        Next::new(Arc::clone(&self.middlewares), Arc::clone(&self.transport)).run(request)
    }

    /// Sends `request` and waits for its final response.
    ///
    /// Intermediate events are discarded. The first transport error ends the
    /// request and is returned as-is.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Transport`]: the transport reported a failure.
    /// - [`ClientError::Incomplete`]: the stream ended without a final response.
    pub async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        let mut events = self.send(request);

        while let Some(event) = events.next().await {
            match event? {
                HttpEvent::Response(response) => return Ok(response),
                other => debug!(event = ?other, "intermediate event"),
            }
        }

        Err(ClientError::Incomplete)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use futures::stream;

    use super::*;
    use crate::{
        StatusCode,
        cache::{CacheIntent, CacheInterceptor, CacheStore},
        middleware::LoggerMiddleware,
    };

    // Answers `{200, "foo"}` after a 50 ms round trip and counts sends.
    #[derive(Default)]
    struct SlowTransport {
        calls: AtomicUsize,
    }

    impl Transport for SlowTransport {
        fn send(&self, _request: Request) -> EventStream {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = Response::new(StatusCode::Ok).body("foo");
            Box::pin(
                stream::iter(vec![Ok(HttpEvent::Sent)]).chain(stream::once(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(HttpEvent::Response(response))
                })),
            )
        }
    }

    fn data_request() -> Request {
        Request::get("/api/data")
            .query("x", "1")
            .extension(CacheIntent::cached().ttl(Duration::from_millis(600_000)))
    }

    #[tokio::test(start_paused = true)]
    async fn cached_get_lifecycle() {
        let transport = Arc::new(SlowTransport::default());
        let store = Arc::new(CacheStore::new());
        let client = Client::new(transport.clone())
            .with(LoggerMiddleware)
            .with(CacheInterceptor::new(Arc::clone(&store)));

        let response = client.execute(data_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.text().unwrap(), "foo");
        assert_eq!(store.len(), 1);
        assert!(store.contains_key("/api/data?x=1"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let replay = client.execute(data_request()).await.unwrap();
        assert_eq!(replay, response);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(601_000)).await;
        let refetched = client.execute(data_request()).await.unwrap();
        assert_eq!(refetched.text().unwrap(), "foo");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn transport_error_is_returned_unchanged() {
        let transport: Arc<dyn Transport> = Arc::new(|_request: Request| -> EventStream {
            Box::pin(stream::iter(vec![Err(TransportError::Status {
                response: Response::new(StatusCode::BadGateway),
            })]))
        });
        let store = Arc::new(CacheStore::new());
        let client = Client::new(transport).with(CacheInterceptor::new(Arc::clone(&store)));

        let err = client.execute(data_request()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::Status { ref response })
                if response.status() == StatusCode::BadGateway
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn stream_without_response_is_incomplete() {
        let transport: Arc<dyn Transport> = Arc::new(|_request: Request| -> EventStream {
            Box::pin(stream::iter(vec![Ok(HttpEvent::Sent)]))
        });
        let client = Client::new(transport);

        let err = client.execute(Request::get("/")).await.unwrap_err();
        assert!(matches!(err, ClientError::Incomplete));
    }

    #[test]
    fn with_appends_middleware() {
        let transport: Arc<dyn Transport> =
            Arc::new(|_request: Request| -> EventStream { Box::pin(stream::empty()) });
        let base = Client::new(transport);
        let logged = base.clone().with(LoggerMiddleware);

        assert!(base.is_empty());
        assert_eq!(logged.len(), 1);
    }
}
