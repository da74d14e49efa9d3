//! Get-or-refresh caching with a fixed TTL.
//!
//! The refresh contract is shared by the nearby-hotspot cache and the price
//! gate: a refresh that fails (or yields no payload) leaves both the cached
//! payload and the refresh timestamp untouched, so the immediately following
//! cycle retries instead of waiting out the TTL.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::ClientError;

/// One cached value and the time it was last refreshed successfully.
#[derive(Debug, Clone)]
pub struct TtlSlot<T> {
    payload: Option<T>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<T> Default for TtlSlot<T> {
    fn default() -> Self {
        Self {
            payload: None,
            refreshed_at: None,
        }
    }
}

impl<T> TtlSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the slot should be refreshed: never filled, or older than
    /// `ttl_secs`.
    pub fn is_due(&self, ttl_secs: i64, now: DateTime<Utc>) -> bool {
        match self.refreshed_at {
            Some(at) => (now - at).num_seconds() > ttl_secs,
            None => true,
        }
    }

    /// Records a successful refresh. This is the only way either field moves.
    pub fn store(&mut self, payload: T, now: DateTime<Utc>) {
        self.payload = Some(payload);
        self.refreshed_at = Some(now);
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Seconds since the last successful refresh, measured from the Unix
    /// epoch when the slot has never been filled — the resulting huge value
    /// reads as "never refreshed" on a dashboard.
    pub fn age_secs(&self, now: DateTime<Utc>) -> f64 {
        let at = self.refreshed_at.unwrap_or(DateTime::UNIX_EPOCH);
        (now - at).num_seconds() as f64
    }
}

/// Keyed TTL slots with a shared refresh cadence.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl_secs: i64,
    slots: HashMap<String, TtlSlot<T>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            slots: HashMap::new(),
        }
    }

    /// Runs `fetch` for `key` if its slot is due, then returns the slot.
    ///
    /// `Ok(Some(_))` stores the new payload and timestamp; `Ok(None)` and
    /// `Err(_)` leave the slot exactly as it was.
    pub async fn refresh_due<F, Fut>(
        &mut self,
        key: &str,
        now: DateTime<Utc>,
        fetch: F,
    ) -> &TtlSlot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, ClientError>>,
    {
        let slot = self.slots.entry(key.to_string()).or_default();
        if slot.is_due(self.ttl_secs, now) {
            match fetch().await {
                Ok(Some(payload)) => slot.store(payload, now),
                Ok(None) => debug!(key, "refresh yielded no payload, keeping cached value"),
                Err(err) => warn!(key, %err, "refresh failed, keeping cached value"),
            }
        }
        slot
    }

    pub fn slot(&self, key: &str) -> Option<&TtlSlot<T>> {
        self.slots.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn slot_is_due_until_first_store() {
        let mut slot: TtlSlot<u32> = TtlSlot::new();
        let now = at(0);
        assert!(slot.is_due(3600, now));

        slot.store(7, now);
        assert!(!slot.is_due(3600, now + Duration::seconds(3600)));
        assert!(slot.is_due(3600, now + Duration::seconds(3601)));
    }

    #[test]
    fn age_uses_epoch_sentinel_when_never_refreshed() {
        let slot: TtlSlot<u32> = TtlSlot::new();
        let age = slot.age_secs(at(0));
        assert!(age > 1_000_000_000.0);

        let mut slot = slot;
        slot.store(1, at(0));
        assert_eq!(slot.age_secs(at(90)), 90.0);
    }

    #[tokio::test]
    async fn successful_refresh_updates_payload_and_timestamp() {
        let mut cache: TtlCache<u32> = TtlCache::new(3600);
        let slot = cache.refresh_due("k", at(0), || async { Ok(Some(5)) }).await;
        assert_eq!(slot.payload(), Some(&5));
        assert_eq!(slot.refreshed_at(), Some(at(0)));
    }

    #[tokio::test]
    async fn failed_refresh_changes_nothing_and_retries_next_cycle() {
        let mut cache: TtlCache<u32> = TtlCache::new(3600);
        cache.refresh_due("k", at(0), || async { Ok(Some(5)) }).await;

        // Past the TTL: a failing refresh leaves payload and timestamp alone.
        let mut fetches = 0;
        let slot = cache
            .refresh_due("k", at(4000), || {
                fetches += 1;
                async { Err(ClientError::InvalidResponse("boom".to_string())) }
            })
            .await;
        assert_eq!(slot.payload(), Some(&5));
        assert_eq!(slot.refreshed_at(), Some(at(0)));
        assert_eq!(fetches, 1);

        // The very next cycle retries instead of waiting out the TTL again.
        let mut fetches = 0;
        let slot = cache
            .refresh_due("k", at(4030), || {
                fetches += 1;
                async { Ok(Some(9)) }
            })
            .await;
        assert_eq!(fetches, 1);
        assert_eq!(slot.payload(), Some(&9));
        assert_eq!(slot.refreshed_at(), Some(at(4030)));
    }

    #[tokio::test]
    async fn empty_refresh_preserves_old_value() {
        let mut cache: TtlCache<u32> = TtlCache::new(3600);
        cache.refresh_due("k", at(0), || async { Ok(Some(5)) }).await;

        let slot = cache
            .refresh_due("k", at(4000), || async { Ok(None) })
            .await;
        assert_eq!(slot.payload(), Some(&5));
        assert_eq!(slot.refreshed_at(), Some(at(0)));
    }

    #[tokio::test]
    async fn fresh_slot_is_not_refetched() {
        let mut cache: TtlCache<u32> = TtlCache::new(3600);
        cache.refresh_due("k", at(0), || async { Ok(Some(5)) }).await;

        let mut fetches = 0;
        cache
            .refresh_due("k", at(1800), || {
                fetches += 1;
                async { Ok(Some(6)) }
            })
            .await;
        assert_eq!(fetches, 0);
        assert_eq!(cache.slot("k").unwrap().payload(), Some(&5));
    }
}
