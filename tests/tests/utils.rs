use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

use wsload_core::RoundConfig;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter("wsload=debug,mock_service=debug")
            .init();
    });
}

/// Serves a fresh mock on an ephemeral port, owned by this test's runtime.
#[allow(unused)]
pub async fn spawn_mock() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, mock_service::router()).await.unwrap();
    });

    addr
}

#[allow(unused)]
pub fn round_config(
    addr: SocketAddr,
    route: &str,
    clients: usize,
    duration: Duration,
) -> RoundConfig {
    RoundConfig {
        endpoint: Url::parse(&format!("ws://{addr}{route}")).unwrap(),
        symbol: "CLX5".to_string(),
        push_ms: 25,
        duration,
        ramp: Duration::ZERO,
        clients,
    }
}
