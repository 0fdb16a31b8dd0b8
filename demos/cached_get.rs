//! Issues the same cached GET three times against an in-process transport.
//!
//! Run with `RUST_LOG=rcache=debug cargo run --example cached_get` to see the
//! cache decisions.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::{StreamExt, stream};
use rcache::{
    Client, Request, Response, StatusCode,
    cache::{CacheIntent, CacheInterceptor, CacheStore},
    middleware::LoggerMiddleware,
    transport::{EventStream, HttpEvent, Transport},
};
use tracing_subscriber::EnvFilter;

// Pretends to be a remote API that takes 50 ms per round trip.
#[derive(Default)]
struct LoopbackTransport {
    round_trips: AtomicUsize,
}

impl Transport for LoopbackTransport {
    fn send(&self, request: Request) -> EventStream {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        let body = format!("payload for {}", request.url_with_params());

        Box::pin(
            stream::iter(vec![Ok(HttpEvent::Sent)]).chain(stream::once(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(HttpEvent::Response(
                    Response::new(StatusCode::Ok)
                        .header("Content-Type", "text/plain")
                        .body(body),
                ))
            })),
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let transport = Arc::new(LoopbackTransport::default());
    let store = Arc::new(CacheStore::new());
    let client = Client::new(transport.clone())
        .with(LoggerMiddleware)
        .with(CacheInterceptor::new(Arc::clone(&store)));

    for _ in 0..3 {
        let request = Request::get("/api/data")
            .query("x", "1")
            .extension(CacheIntent::cached().ttl(Duration::from_secs(600)));
        let response = client.execute(request).await?;
        println!("{} {}", response.status(), response.text()?);
    }

    println!(
        "round trips: {}, cached entries: {}",
        transport.round_trips.load(Ordering::SeqCst),
        store.len()
    );
    Ok(())
}
