//! Upstream API abstraction.
//!
//! [`HeliumApi`] is the seam between the collection engine and the network.
//! The engine only ever sees this trait; the reqwest implementation lives in
//! [`crate::client`], and tests substitute the mock below.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{Account, ActivityCounts, Hotspot, HotspotRef, OraclePrice};

/// Read-only view of the upstream chain API.
///
/// Every operation distinguishes three outcomes, and callers match all of
/// them explicitly:
///
/// * `Ok(Some(_))` — the upstream answered with a usable payload;
/// * `Ok(None)` — the upstream answered, but carries no such document;
/// * `Err(_)` — transport failure, non-success status, or undecodable body.
#[async_trait]
pub trait HeliumApi: Send + Sync {
    /// Looks up hotspots carrying the given (already normalized) name.
    async fn hotspots_by_name(&self, name: &str) -> Result<Option<Vec<HotspotRef>>, ClientError>;

    /// Fetches the full hotspot document for an address.
    async fn hotspot(&self, address: &str) -> Result<Option<Hotspot>, ClientError>;

    /// Fetches per-transaction-kind activity counts for a hotspot.
    async fn hotspot_activity_counts(
        &self,
        address: &str,
    ) -> Result<Option<ActivityCounts>, ClientError>;

    /// Fetches the account document for an address.
    async fn account(&self, address: &str) -> Result<Option<Account>, ClientError>;

    /// Fetches per-transaction-kind activity counts for an account.
    async fn account_activity_counts(
        &self,
        address: &str,
    ) -> Result<Option<ActivityCounts>, ClientError>;

    /// Lists the hotspots owned by an account.
    async fn hotspots_for_owner(
        &self,
        owner: &str,
    ) -> Result<Option<Vec<HotspotRef>>, ClientError>;

    /// Lists hotspots within `distance_m` meters of the given coordinates.
    async fn hotspots_near(
        &self,
        lat: f64,
        lon: f64,
        distance_m: u64,
    ) -> Result<Option<Vec<HotspotRef>>, ClientError>;

    /// Fetches the current oracle price.
    async fn oracle_price(&self) -> Result<Option<OraclePrice>, ClientError>;

    /// Fetches the current market price in USD from the secondary source.
    async fn secondary_price_usd(&self) -> Result<Option<f64>, ClientError>;
}
