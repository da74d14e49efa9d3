//! Oracle and market price refresh.
//!
//! One shared TTL gate covers the whole price step: either both sources are
//! attempted in a cycle or neither is, and only a successful oracle fetch
//! advances the gate.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::api::HeliumApi;
use crate::cache::TtlSlot;
use crate::constants::{ORACLE_PRICE_SCALE, PRICE_REFRESH_SECS};
use crate::metrics::ExporterMetrics;

/// Source label values for `helium_token_price_usd`.
const ORACLE_SOURCE: &str = "oracle";
const SECONDARY_SOURCE: &str = "coingecko";

/// Price refresh state shared by both sources.
#[derive(Debug, Default)]
pub struct PriceTracker {
    gate: TtlSlot<()>,
}

impl PriceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the price metrics if the gate has expired.
    ///
    /// The oracle is authoritative: its failure abandons the refresh — the
    /// secondary source is not queried and the gate does not advance, so
    /// both sources are retried together on the next cycle. A secondary
    /// failure only loses the secondary sample.
    pub async fn refresh(
        &mut self,
        api: &dyn HeliumApi,
        metrics: &ExporterMetrics,
        now: DateTime<Utc>,
    ) {
        if !self.gate.is_due(PRICE_REFRESH_SECS, now) {
            return;
        }

        let oracle = match api.oracle_price().await {
            Ok(Some(price)) => price,
            Ok(None) => {
                warn!("oracle price carried no payload, skipping price refresh");
                return;
            }
            Err(err) => {
                warn!(%err, "oracle price fetch failed, skipping price refresh");
                return;
            }
        };

        metrics
            .token_price_usd
            .with_label_values(&[ORACLE_SOURCE])
            .set(oracle.price as f64 / ORACLE_PRICE_SCALE);
        metrics.oracle_price_block.set(oracle.block);
        match oracle.timestamp {
            Some(updated_at) => metrics
                .oracle_price_age_seconds
                .set((now - updated_at).num_seconds() as f64),
            None => warn!("oracle price payload carries no timestamp"),
        }
        self.gate.store((), now);

        match api.secondary_price_usd().await {
            Ok(Some(usd)) => metrics
                .token_price_usd
                .with_label_values(&[SECONDARY_SOURCE])
                .set(usd),
            Ok(None) => warn!("secondary price source carried no quote"),
            Err(err) => warn!(%err, "secondary price fetch failed, keeping last value"),
        }
    }
}
