//! The poll loop.
//!
//! A single task owns every piece of mutable state and drives one strictly
//! sequential cycle at a time: resolve the tracked set if needed, fast-poll
//! every hotspot and account, run the slow-cadence nearby check per hotspot,
//! then the price check, and sleep. Per-entity failures are logged and
//! skipped; whatever was published before stays published.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::api::HeliumApi;
use crate::cache::TtlCache;
use crate::config::Config;
use crate::constants::{
    ACCOUNT_ACTIVITY_PREFIXES, BONES_PER_HNT, HOTSPOT_ACTIVITY_PREFIXES, NEARBY_REFRESH_SECS,
};
use crate::metrics::ExporterMetrics;
use crate::price::PriceTracker;
use crate::resolver::{self, Resolution};
use crate::types::{ActivityCounts, Hotspot, HotspotRef, ResolvedSet};

/// Owns the tracked set and every cache, and drives the poll cycles.
pub struct Poller {
    api: Arc<dyn HeliumApi>,
    metrics: Arc<ExporterMetrics>,
    config: Config,
    resolution: Resolution,
    nearby: TtlCache<Vec<HotspotRef>>,
    prices: PriceTracker,
    /// Last-known coordinates per hotspot, recorded by the fast pass and
    /// consumed by the nearby refresh.
    coords: HashMap<String, (f64, f64)>,
}

impl Poller {
    pub fn new(api: Arc<dyn HeliumApi>, metrics: Arc<ExporterMetrics>, config: Config) -> Self {
        Self {
            api,
            metrics,
            config,
            resolution: Resolution::Unresolved,
            nearby: TtlCache::new(NEARBY_REFRESH_SECS),
            prices: PriceTracker::new(),
            coords: HashMap::new(),
        }
    }

    /// Runs cycles forever, sleeping the configured period in between.
    pub async fn run(mut self) {
        info!(
            period_secs = self.config.update_period.as_secs(),
            "starting poll loop"
        );

        loop {
            let started = Instant::now();
            self.run_cycle(Utc::now()).await;
            self.metrics
                .cycle_seconds
                .set(started.elapsed().as_secs_f64());
            sleep(self.config.update_period).await;
        }
    }

    /// Drives one full cycle at the given instant.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) {
        if matches!(self.resolution, Resolution::Unresolved) {
            match resolver::resolve(self.api.as_ref(), &self.config).await {
                Ok(set) => {
                    info!(
                        hotspots = set.hotspots.len(),
                        accounts = set.accounts.len(),
                        "resolved tracked set"
                    );
                    self.resolution = Resolution::Resolved(set);
                }
                Err(err) => error!(%err, "resolving tracked set failed, retrying next cycle"),
            }
        }

        let set = match &self.resolution {
            Resolution::Resolved(set) => set.clone(),
            Resolution::Unresolved => ResolvedSet::default(),
        };

        for (address, name) in &set.hotspots {
            self.poll_hotspot(address, name, now).await;
        }
        for address in set.accounts.keys() {
            self.poll_account(address).await;
        }
        for (address, name) in &set.hotspots {
            self.refresh_nearby(address, name, now).await;
        }
        self.prices
            .refresh(self.api.as_ref(), &self.metrics, now)
            .await;
    }

    /// Per-cycle facts for one hotspot: one document fetch reused for every
    /// facet, plus the activity counts. A failed fetch skips the hotspot
    /// entirely, leaving the previous cycle's samples in place.
    async fn poll_hotspot(&mut self, address: &str, name: &str, now: DateTime<Utc>) {
        let doc = match self.api.hotspot(address).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                warn!(%address, "hotspot fetch carried no document, keeping previous samples");
                return;
            }
            Err(err) => {
                warn!(%address, %err, "hotspot fetch failed, keeping previous samples");
                return;
            }
        };

        self.emit_hotspot_status(address, name, &doc, now);

        if let (Some(lat), Some(lng)) = (doc.lat, doc.lng) {
            self.coords.insert(address.to_string(), (lat, lng));
        }

        match self.api.hotspot_activity_counts(address).await {
            Ok(Some(counts)) => {
                for (kind, count) in allowed_activity(&counts, HOTSPOT_ACTIVITY_PREFIXES) {
                    self.metrics
                        .hotspot_activity
                        .with_label_values(&[address, name, kind])
                        .set(count);
                }
            }
            Ok(None) => debug!(%address, "no activity counts for hotspot"),
            Err(err) => warn!(%address, %err, "hotspot activity fetch failed"),
        }
    }

    fn emit_hotspot_status(&self, address: &str, name: &str, doc: &Hotspot, now: DateTime<Utc>) {
        let metrics = &self.metrics;
        let labels = &[address, name];

        metrics.hotspot_up.with_label_values(labels).set(1);

        let heights = &metrics.hotspot_heights;
        heights
            .with_label_values(&[address, name, "system"])
            .set(doc.block);
        let current = match doc.status.height {
            Some(height) => height,
            None => {
                warn!(%address, "hotspot has not reported a height yet, emitting 0");
                0
            }
        };
        heights
            .with_label_values(&[address, name, "hotspot_current"])
            .set(current);
        heights
            .with_label_values(&[address, name, "hotspot_added"])
            .set(doc.block_added);
        if let Some(challenge) = doc.last_poc_challenge {
            heights
                .with_label_values(&[address, name, "last_poc_challenge"])
                .set(challenge);
        }
        heights
            .with_label_values(&[address, name, "hotspot_last_changed"])
            .set(doc.last_change_block);

        metrics
            .hotspot_existence_seconds
            .with_label_values(labels)
            .set((now - doc.timestamp_added).num_seconds() as f64);

        let online = doc.status.online.as_deref() == Some("online");
        metrics
            .hotspot_online
            .with_label_values(labels)
            .set(online as i64);

        let has_listen_addr = doc
            .status
            .listen_addrs
            .as_ref()
            .is_some_and(|addrs| !addrs.is_empty());
        if !has_listen_addr {
            warn!(%address, "hotspot reports no listen address, status may be incomplete");
        }
        metrics
            .hotspot_has_listen_address
            .with_label_values(labels)
            .set(has_listen_addr as i64);
    }

    /// Per-cycle facts for one owning account: balances and activity counts.
    async fn poll_account(&self, address: &str) {
        match self.api.account(address).await {
            Ok(Some(account)) => {
                self.metrics
                    .account_balance
                    .with_label_values(&[address, "hnt"])
                    .set(account.balance as f64 / BONES_PER_HNT);
                self.metrics
                    .account_balance
                    .with_label_values(&[address, "data_credits"])
                    .set(account.dc_balance as f64);
                self.metrics
                    .account_block_height
                    .with_label_values(&[address])
                    .set(account.block);
            }
            Ok(None) => {
                warn!(%address, "account fetch carried no document, keeping previous samples")
            }
            Err(err) => warn!(%address, %err, "account fetch failed, keeping previous samples"),
        }

        match self.api.account_activity_counts(address).await {
            Ok(Some(counts)) => {
                for (kind, count) in allowed_activity(&counts, ACCOUNT_ACTIVITY_PREFIXES) {
                    self.metrics
                        .account_activity
                        .with_label_values(&[address, kind])
                        .set(count);
                }
            }
            Ok(None) => debug!(%address, "no activity counts for account"),
            Err(err) => warn!(%address, %err, "account activity fetch failed"),
        }
    }

    /// Hourly-cadence facts for one hotspot: refresh the nearby count if
    /// due, then emit from whatever the cache holds, stale or fresh.
    async fn refresh_nearby(&mut self, address: &str, name: &str, now: DateTime<Utc>) {
        let distance_m = self.config.nearby_distance_m;
        let coords = self.coords.get(address).copied();
        let api = Arc::clone(&self.api);

        let slot = self
            .nearby
            .refresh_due(address, now, || async move {
                match coords {
                    Some((lat, lng)) => api.hotspots_near(lat, lng, distance_m).await,
                    // No coordinates observed yet; the slot stays stale and
                    // the next cycle retries.
                    None => Ok(None),
                }
            })
            .await;

        if let Some(nearby) = slot.payload() {
            // The hotspot appears in its own result set.
            let others = nearby.len().saturating_sub(1);
            self.metrics
                .hotspot_nearby
                .with_label_values(&[address, name, &distance_m.to_string()])
                .set(others as i64);
        }
        self.metrics
            .hotspot_slow_update_seconds
            .with_label_values(&[address, name])
            .set(slot.age_secs(now));
    }
}

/// Filters an activity-count document down to the republished kinds, sorted
/// for deterministic emission.
fn allowed_activity<'a>(counts: &'a ActivityCounts, prefixes: &[&str]) -> Vec<(&'a str, i64)> {
    let mut allowed: Vec<(&str, i64)> = counts
        .iter()
        .filter(|(kind, _)| prefixes.iter().any(|prefix| kind.starts_with(prefix)))
        .map(|(kind, count)| (kind.as_str(), *count))
        .collect();
    allowed.sort_unstable();
    allowed
}
