//! reqstat gateway
//!
//! - Loads `reqstat.yaml` (or the path given as the first argument)
//! - Registers the tracking allocator so memory metrics have a peak to report
//! - Serves the demo routes with per-request StatsD metrics

use tracing_subscriber::{fmt, EnvFilter};

use reqstat_core::memory::TrackingAllocator;
use reqstat_gateway::{app_state, config, router};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "reqstat.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen = cfg
        .gateway
        .listen_addr()
        .expect("gateway.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("app state init failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "reqstat-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
