//! Per-request tracing span.
//!
//! Every HTTP request runs inside an `rpc_http_request` span carrying a
//! process-unique request id, so dispatcher and handler events can be
//! correlated in the logs.

use axum::{body::Body, http::Request, response::Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{debug, info_span, Instrument, Span};

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer {
    next_id: Arc<AtomicU64>,
}

impl TracingLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService {
            inner,
            next_id: Arc::clone(&self.next_id),
        }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
    next_id: Arc<AtomicU64>,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let span = info_span!(
            "rpc_http_request",
            request_id,
            http.method = %req.method(),
            http.target = %req.uri().path(),
            http.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(req).await;

                if let Ok(response) = &result {
                    Span::current().record("http.status_code", response.status().as_u16());
                }
                debug!(
                    elapsed_us = started.elapsed().as_micros() as u64,
                    ok = result.is_ok(),
                    "Request finished"
                );

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::{service_fn, ServiceExt};

    #[tokio::test]
    async fn test_passes_response_through() {
        let inner = service_fn(|_req: Request<Body>| async {
            let mut response = Response::new(Body::from("ok"));
            *response.status_mut() = StatusCode::ACCEPTED;
            Ok::<_, std::convert::Infallible>(response)
        });
        let service = TracingLayer::new().layer(inner);

        let response = service
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_request_ids_are_shared_across_clones() {
        let layer = TracingLayer::new();
        let a = layer.layer(());
        let b = layer.clone().layer(());
        a.next_id.fetch_add(1, Ordering::Relaxed);
        assert_eq!(b.next_id.load(Ordering::Relaxed), 1);
    }
}
