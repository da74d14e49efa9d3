//! Prometheus gauge families written by the poll loop.
//!
//! Each `(family, label values)` cell is an independent last-write-wins
//! register: the poll loop sets values, the scrape handler reads them
//! concurrently, and nothing is ever removed — a cell keeps exposing its
//! last value until a later successful cycle overwrites it.

use prometheus::{Encoder, Gauge, GaugeVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

/// All gauge families exposed by the exporter, plus their registry.
pub struct ExporterMetrics {
    registry: Registry,

    /// Census of hotspots in existence.
    pub hotspot_up: IntGaugeVec,
    /// Hotspot is listed as online.
    pub hotspot_online: IntGaugeVec,
    /// Hotspot shows at least one listen address.
    pub hotspot_has_listen_address: IntGaugeVec,
    /// Seconds the hotspot has been in existence.
    pub hotspot_existence_seconds: GaugeVec,
    /// Chain heights of various hotspot states, labeled by `state_type`.
    pub hotspot_heights: IntGaugeVec,
    /// Activity counts per transaction kind, labeled by `activity_type`.
    pub hotspot_activity: IntGaugeVec,
    /// Number of other hotspots nearby, labeled by `distance_m`.
    pub hotspot_nearby: IntGaugeVec,
    /// Seconds since the slow-cadence facts were last refreshed.
    pub hotspot_slow_update_seconds: GaugeVec,

    /// Account balance, labeled by `unit` (`hnt` or `data_credits`).
    pub account_balance: GaugeVec,
    /// Height at which the account was last updated.
    pub account_block_height: IntGaugeVec,
    /// Account activity counts per transaction kind.
    pub account_activity: IntGaugeVec,

    /// Token price in USD, labeled by `source`.
    pub token_price_usd: GaugeVec,
    /// Height at which the oracle last updated its price.
    pub oracle_price_block: IntGauge,
    /// Seconds since the oracle's on-chain price update.
    pub oracle_price_age_seconds: Gauge,

    /// Wall-clock duration of the last full poll cycle.
    pub cycle_seconds: Gauge,
}

const HOTSPOT_LABELS: &[&str] = &["hotspot_address", "hotspot_name"];
const ACCOUNT_LABELS: &[&str] = &["account_address"];

impl ExporterMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let hotspot_up = IntGaugeVec::new(
            Opts::new("helium_hotspot_up", "Census of hotspots in existence"),
            HOTSPOT_LABELS,
        )
        .expect("hotspot up gauge");
        let hotspot_online = IntGaugeVec::new(
            Opts::new("helium_hotspot_online", "Hotspot is listed as online"),
            HOTSPOT_LABELS,
        )
        .expect("hotspot online gauge");
        let hotspot_has_listen_address = IntGaugeVec::new(
            Opts::new(
                "helium_hotspot_has_listen_address",
                "Hotspot shows a listen address",
            ),
            HOTSPOT_LABELS,
        )
        .expect("listen address gauge");
        let hotspot_existence_seconds = GaugeVec::new(
            Opts::new(
                "helium_hotspot_existence_epoch_seconds",
                "Time that hotspot has been in existence",
            ),
            HOTSPOT_LABELS,
        )
        .expect("existence gauge");
        let hotspot_heights = IntGaugeVec::new(
            Opts::new(
                "helium_hotspot_heights",
                "Blockchain height of various states",
            ),
            &["hotspot_address", "hotspot_name", "state_type"],
        )
        .expect("heights gauge");
        let hotspot_activity = IntGaugeVec::new(
            Opts::new(
                "helium_hotspot_activity_count",
                "Hotspot activity counts per transaction kind",
            ),
            &["hotspot_address", "hotspot_name", "activity_type"],
        )
        .expect("hotspot activity gauge");
        let hotspot_nearby = IntGaugeVec::new(
            Opts::new(
                "helium_hotspot_nearby_count",
                "Number of hotspots nearby. Updated infrequently.",
            ),
            &["hotspot_address", "hotspot_name", "distance_m"],
        )
        .expect("nearby gauge");
        let hotspot_slow_update_seconds = GaugeVec::new(
            Opts::new(
                "helium_hotspot_slow_update_epoch_seconds",
                "Time since slow updates were last run",
            ),
            HOTSPOT_LABELS,
        )
        .expect("slow update gauge");

        let account_balance = GaugeVec::new(
            Opts::new("helium_account_balance", "Account balance per unit"),
            &["account_address", "unit"],
        )
        .expect("account balance gauge");
        let account_block_height = IntGaugeVec::new(
            Opts::new(
                "helium_account_block_height",
                "Height at which the account was last updated",
            ),
            ACCOUNT_LABELS,
        )
        .expect("account height gauge");
        let account_activity = IntGaugeVec::new(
            Opts::new(
                "helium_account_activity_count",
                "Account activity counts per transaction kind",
            ),
            &["account_address", "activity_type"],
        )
        .expect("account activity gauge");

        let token_price_usd = GaugeVec::new(
            Opts::new("helium_token_price_usd", "Token price in USD per source"),
            &["source"],
        )
        .expect("price gauge");
        let oracle_price_block = IntGauge::with_opts(Opts::new(
            "helium_oracle_price_block",
            "Height at which the oracle last updated its price",
        ))
        .expect("oracle block gauge");
        let oracle_price_age_seconds = Gauge::with_opts(Opts::new(
            "helium_oracle_price_age_seconds",
            "Seconds since the oracle's on-chain price update",
        ))
        .expect("oracle age gauge");

        let cycle_seconds = Gauge::with_opts(Opts::new(
            "helium_exporter_cycle_seconds",
            "Wall-clock duration of the last poll cycle",
        ))
        .expect("cycle gauge");

        for collector in [
            Box::new(hotspot_up.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(hotspot_online.clone()),
            Box::new(hotspot_has_listen_address.clone()),
            Box::new(hotspot_existence_seconds.clone()),
            Box::new(hotspot_heights.clone()),
            Box::new(hotspot_activity.clone()),
            Box::new(hotspot_nearby.clone()),
            Box::new(hotspot_slow_update_seconds.clone()),
            Box::new(account_balance.clone()),
            Box::new(account_block_height.clone()),
            Box::new(account_activity.clone()),
            Box::new(token_price_usd.clone()),
            Box::new(oracle_price_block.clone()),
            Box::new(oracle_price_age_seconds.clone()),
            Box::new(cycle_seconds.clone()),
        ] {
            registry.register(collector).expect("register gauge");
        }

        Self {
            registry,
            hotspot_up,
            hotspot_online,
            hotspot_has_listen_address,
            hotspot_existence_seconds,
            hotspot_heights,
            hotspot_activity,
            hotspot_nearby,
            hotspot_slow_update_seconds,
            account_balance,
            account_block_height,
            account_activity,
            token_price_usd,
            oracle_price_block,
            oracle_price_age_seconds,
            cycle_seconds,
        }
    }

    /// Renders the current samples in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new()
    }
}
