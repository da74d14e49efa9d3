//! Exporter binary: starts the poll loop and serves the scrape endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hotspot_exporter::constants::LISTEN_PORT;
use hotspot_exporter::{ApiClient, Config, ExporterMetrics, Poller};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("hotspot exporter v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let api = match ApiClient::new(&config.api_base_url) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!(%err, "could not build the API client");
            std::process::exit(1);
        }
    };
    let metrics = Arc::new(ExporterMetrics::new());

    let poller = Poller::new(api, metrics.clone(), config);
    tokio::spawn(poller.run());

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(metrics);

    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    info!("metrics endpoint: http://{}/metrics", addr);

    let listener = TcpListener::bind(addr).await.expect("bind scrape port");
    axum::serve(listener, app).await.expect("serve scrape endpoint");
}

async fn root_handler() -> Html<&'static str> {
    Html(
        "<html><body><h1>Hotspot Exporter</h1>\
         <p><a href=\"/metrics\">/metrics</a> - Prometheus metrics</p>\
         <p><a href=\"/health\">/health</a> - Health check</p>\
         </body></html>",
    )
}

async fn metrics_handler(
    State(metrics): State<Arc<ExporterMetrics>>,
) -> Result<String, StatusCode> {
    metrics.encode().map_err(|err| {
        error!(%err, "failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn health_handler() -> &'static str {
    "ok"
}
