//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use rpc_gateway::config::GatewayConfig;
use rpc_gateway::http::HttpServer;
use rpc_gateway::lifecycle::Shutdown;
use rpc_gateway::net::{listener, load_tls_config};
use rpc_gateway::observability::MethodRegistry;

/// Canned upstream answer for `eth_blockNumber`.
#[allow(dead_code)]
pub const BLOCK_NUMBER_RESPONSE: &str = r#"{"jsonrpc":"2.0","id":1,"result":"0x1b4"}"#;

/// A gateway serving TLS on an ephemeral localhost port.
#[allow(dead_code)]
pub struct TestGateway {
    pub addr: SocketAddr,
    pub registry: Arc<MethodRegistry>,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("https://127.0.0.1:{}{}", self.addr.port(), path)
    }
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Config pointing at `upstream_url` with short timeouts for tests.
#[allow(dead_code)]
pub fn test_config(upstream_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.url = upstream_url.to_string();
    config.upstream.connect_timeout_secs = 1;
    config.upstream.request_timeout_secs = 5;
    config.tls.cert_path = fixture("cert.pem");
    config.tls.key_path = fixture("key.pem");
    config
}

/// Start a gateway for `upstream_url` with test defaults.
#[allow(dead_code)]
pub async fn start_gateway(upstream_url: &str) -> TestGateway {
    start_gateway_with(test_config(upstream_url)).await
}

/// Start a gateway with an explicit config.
#[allow(dead_code)]
pub async fn start_gateway_with(config: GatewayConfig) -> TestGateway {
    let tls = load_tls_config(&config.tls.cert_path, &config.tls.key_path)
        .await
        .expect("fixture TLS credential should load");
    let listener = listener::bind(&config.listener).expect("ephemeral bind");
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("upstream client");
    let registry = server.registry();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move { server.run(listener, tls, server_shutdown).await });

    TestGateway {
        addr,
        registry,
        shutdown,
        task,
    }
}

/// HTTPS client that trusts the self-signed fixture.
#[allow(dead_code)]
pub fn https_client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .no_proxy()
        .build()
        .unwrap()
}

/// Mock upstream answering every POST with `body`.
#[allow(dead_code)]
pub async fn start_mock_upstream(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .mount(&server)
        .await;
    server
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_upstream_url() -> String {
    let scratch = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = scratch.local_addr().unwrap();
    drop(scratch);
    format!("http://{}", addr)
}
