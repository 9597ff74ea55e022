//! HTTPS server setup.
//!
//! # Responsibilities
//! - Create the Axum Router with the `/rpc` and `/metrics` handlers
//! - Wire up middleware (tracing, request ID, body limit)
//! - Serve over TLS with connect info for client addresses
//! - Drain in-flight requests on shutdown

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::metrics::metrics_handler;
use crate::http::request::MakeRequestUuidV4;
use crate::http::rpc::rpc_handler;
use crate::observability::MethodRegistry;
use crate::upstream::UpstreamForwarder;

/// How long in-flight requests may run after shutdown is triggered.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MethodRegistry>,
    pub forwarder: UpstreamForwarder,
}

/// HTTPS server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    registry: Arc<MethodRegistry>,
}

impl HttpServer {
    /// Create a server with a fresh method registry.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        Self::with_registry(config, Arc::new(MethodRegistry::new()))
    }

    /// Create a server around an existing method registry.
    pub fn with_registry(
        config: GatewayConfig,
        registry: Arc<MethodRegistry>,
    ) -> Result<Self, reqwest::Error> {
        let forwarder = UpstreamForwarder::new(&config.upstream)?;

        let state = AppState {
            registry: registry.clone(),
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            registry,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Unknown paths, and unsupported methods on known paths, answer 404.
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/rpc", post(rpc_handler).fallback(not_found))
            .route("/metrics", get(metrics_handler).fallback(not_found))
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_size))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The registry shared with the handlers.
    pub fn registry(&self) -> Arc<MethodRegistry> {
        self.registry.clone()
    }

    /// Serve TLS on `listener` until `shutdown` fires (or its sender is
    /// dropped), then drain.
    pub async fn run(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTPS server starting"
        );

        let handle = Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!(
                drain_secs = DRAIN_TIMEOUT.as_secs(),
                "Shutdown signal received, draining connections"
            );
            drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UPSTREAM_RESULT: &str = r#"{"jsonrpc":"2.0","id":1,"result":"0x1234"}"#;

    async fn mock_upstream() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(UPSTREAM_RESULT, "application/json"))
            .mount(&server)
            .await;
        server
    }

    fn server_for(upstream: &str) -> HttpServer {
        let mut config = GatewayConfig::default();
        config.upstream.url = upstream.to_string();
        config.upstream.connect_timeout_secs = 1;
        HttpServer::new(config).unwrap()
    }

    fn post_rpc(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/rpc")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_single_request_passthrough() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        let response = server
            .router()
            .oneshot(post_rpc(r#"{"jsonrpc":"2.0","method":"eth_blockNumber","params":[],"id":1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_string(response).await, UPSTREAM_RESULT);
        assert_eq!(server.registry().get("eth_blockNumber"), 1);
    }

    #[tokio::test]
    async fn test_batch_tracks_each_call() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        let response = server
            .router()
            .oneshot(post_rpc(
                r#"[{"method":"eth_blockNumber","id":1},{"method":"web3_clientVersion","id":2},{"method":"eth_blockNumber","id":3}]"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let registry = server.registry();
        assert_eq!(registry.get("eth_blockNumber"), 2);
        assert_eq!(registry.get("web3_clientVersion"), 1);
    }

    #[tokio::test]
    async fn test_invalid_json_is_not_counted() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        let response = server.router().oneshot(post_rpc("{oops")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["message"], "Parse error");
        assert_eq!(body["error"]["data"], "Could not parse JSON.");

        assert!(server.registry().is_empty());
        assert!(upstream.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scalar_body() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        let response = server.router().oneshot(post_rpc("12")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["data"], "Invalid JSON received.");
    }

    #[tokio::test]
    async fn test_missing_method() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        let response = server
            .router()
            .oneshot(post_rpc(r#"{"invalid":"data"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            body,
            json!({"jsonrpc": "2.0", "error": {"message": "Invalid request", "data": "Missing method field."}})
        );
        assert!(server.registry().is_empty());
    }

    #[tokio::test]
    async fn test_batch_with_invalid_element_counts_nothing() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        let response = server
            .router()
            .oneshot(post_rpc(r#"[{"method":"eth_blockNumber"},{"id":2}]"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(server.registry().get("eth_blockNumber"), 0);
        assert!(upstream.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_unreachable() {
        let server = server_for("http://127.0.0.1:1");

        let response = server
            .router()
            .oneshot(post_rpc(r#"{"method":"eth_blockNumber","id":1}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["message"], "Proxy error");
        assert_eq!(body["error"]["data"], "Could not connect to Ethereum node.");

        // Tracking happens before forwarding.
        assert_eq!(server.registry().get("eth_blockNumber"), 1);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());
        server.registry().increment("eth_call");
        server.registry().increment("eth_call");

        let request = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body, json!({"eth_call": 2}));
    }

    #[tokio::test]
    async fn test_unknown_routes_are_404() {
        let upstream = mock_upstream().await;
        let server = server_for(&upstream.uri());

        for (method, uri) in [
            (Method::GET, "/nonexistent"),
            (Method::GET, "/rpc"),
            (Method::POST, "/metrics"),
            (Method::DELETE, "/"),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = server.router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let upstream = mock_upstream().await;
        let mut config = GatewayConfig::default();
        config.upstream.url = upstream.uri();
        config.listener.max_body_size = 64;
        let server = HttpServer::new(config).unwrap();

        let big = format!(r#"{{"method":"eth_call","params":["{}"]}}"#, "a".repeat(256));
        let response = server.router().oneshot(post_rpc(&big)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(server.registry().is_empty());
    }
}
