//! HTTP middleware for JSONP responses

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    response::Response,
};
use std::time::Instant;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Header carrying the handler duration in milliseconds
pub const DURATION_HEADER: &str = "x-jsonp-duration-ms";

/// Header stripped from every response
///
/// axum never sets it; this catches handlers, nested services or layers
/// further in that do.
pub const POWERED_BY_HEADER: &str = "x-powered-by";

/// Response middleware: strips `x-powered-by` and optionally reports timing
///
/// The header removal only matters for responses whose producer added the
/// header, such as a handler or a proxied upstream response.
#[derive(Clone)]
pub struct JsonpMiddleware {
    enable_timing: bool,
}

impl JsonpMiddleware {
    pub fn new() -> Self {
        Self {
            enable_timing: true,
        }
    }

    pub fn with_timing(mut self, enabled: bool) -> Self {
        self.enable_timing = enabled;
        self
    }
}

impl Default for JsonpMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for JsonpMiddleware {
    type Service = JsonpMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonpMiddlewareService {
            inner,
            config: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct JsonpMiddlewareService<S> {
    inner: S,
    config: JsonpMiddleware,
}

impl<S> Service<Request> for JsonpMiddlewareService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Take the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let config = self.config.clone();

        Box::pin(async move {
            let start_time = Instant::now();

            let mut response = inner.call(request).await?;

            let headers = response.headers_mut();
            headers.remove(HeaderName::from_static(POWERED_BY_HEADER));

            if config.enable_timing {
                let elapsed = start_time.elapsed().as_millis().to_string();
                if let Ok(value) = HeaderValue::from_str(&elapsed) {
                    headers.insert(HeaderName::from_static(DURATION_HEADER), value);
                }
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn powered() -> impl axum::response::IntoResponse {
        ([(POWERED_BY_HEADER, "PHP/8.3")], "ok")
    }

    #[tokio::test]
    async fn test_strips_powered_by_and_adds_timing() {
        let app = Router::new()
            .route("/", get(powered))
            .layer(JsonpMiddleware::new());

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(POWERED_BY_HEADER).is_none());
        assert!(response.headers().get(DURATION_HEADER).is_some());
    }

    #[tokio::test]
    async fn test_timing_can_be_disabled() {
        let app = Router::new()
            .route("/", get(powered))
            .layer(JsonpMiddleware::new().with_timing(false));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(DURATION_HEADER).is_none());
    }
}
