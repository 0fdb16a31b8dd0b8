//! Transport boundary, the collaborator that actually talks to the network.
//!
//! A [`Transport`] turns a [`Request`] into an [`EventStream`]: an async
//! sequence of [`HttpEvent`]s ending in at most one [`HttpEvent::Response`].
//! Connection handling, wire encoding, and response parsing all live behind
//! this trait; the pipeline only ever sees typed events.

use std::pin::Pin;

use futures::{Stream, stream};
use thiserror::Error;

use crate::http::{Headers, Request, Response, StatusCode};

/// Type alias for a pinned, boxed stream of transport events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<HttpEvent, TransportError>> + Send>>;

/// One observable step of a request's round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpEvent {
    /// The request has been handed to the network.
    Sent,
    /// Request body upload progress.
    UploadProgress { loaded: u64, total: Option<u64> },
    /// Status line and headers arrived; the body is still in flight.
    ResponseHeader { status: StatusCode, headers: Headers },
    /// Response body download progress.
    DownloadProgress { loaded: u64, total: Option<u64> },
    /// The final, complete response.
    Response(Response),
}

impl HttpEvent {
    /// Returns the payload if this is the final response event.
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}

/// Failures surfaced by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("request failed with status {}", .response.status())]
    Status { response: Response },

    #[error("request aborted: {reason}")]
    Aborted { reason: String },
}

/// Sends requests and reports their progress as an [`EventStream`].
///
/// Implementations should report non-2xx outcomes as
/// [`TransportError::Status`] rather than as a [`HttpEvent::Response`].
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> EventStream;
}

impl<F> Transport for F
where
    F: Fn(Request) -> EventStream + Send + Sync,
{
    fn send(&self, request: Request) -> EventStream {
        (self)(request)
    }
}

/// Builds a single-event stream carrying a completed response.
///
/// Used to answer a request without a network round trip.
pub fn completed(response: Response) -> EventStream {
    Box::pin(stream::once(async move { Ok(HttpEvent::Response(response)) }))
}
