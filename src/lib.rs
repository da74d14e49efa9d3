//! # Helium Hotspot Exporter
//!
//! Polls the read-only Helium chain API for a configured set of hotspots and
//! their owning accounts, and exposes the derived facts as Prometheus gauges.
//!
//! The tracked set is configured by hotspot name, explicit address, or owner
//! address, and resolved once per process lifetime (retried wholesale on
//! failure). Live status facts refresh every cycle; the expensive
//! nearby-hotspot count and the token prices refresh on their own, much
//! slower TTLs. Throughout, a failed fetch keeps the previously published
//! value rather than dropping or zeroing the metric: stale data beats
//! missing data.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hotspot_exporter::{ApiClient, Config, ExporterMetrics, Poller};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let api = Arc::new(ApiClient::new(&config.api_base_url)?);
//! let metrics = Arc::new(ExporterMetrics::new());
//!
//! let poller = Poller::new(api, metrics.clone(), config);
//! tokio::spawn(poller.run());
//!
//! // Serve `metrics.encode()?` from your scrape endpoint.
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod price;
pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use api::HeliumApi;
pub use client::ApiClient;
pub use config::Config;
pub use error::{ClientError, ResolveError};
pub use metrics::ExporterMetrics;
pub use poller::Poller;
pub use types::ResolvedSet;
