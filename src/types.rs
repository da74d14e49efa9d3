//! Typed schemas for upstream responses and the resolved tracked set.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Wrapper carried by every upstream response: the payload sits under `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Minimal hotspot reference, used where only the address matters
/// (name search, owner listings, nearby results).
#[derive(Debug, Clone, Deserialize)]
pub struct HotspotRef {
    pub address: String,
}

/// Live status section of a hotspot document.
///
/// Freshly asserted hotspots routinely report `height: null` and an empty
/// `listen_addrs` until they first come online, so all of this is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotspotStatus {
    #[serde(default)]
    pub online: Option<String>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub listen_addrs: Option<Vec<String>>,
}

/// Full hotspot document as returned by `hotspots/{address}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Hotspot {
    pub address: String,
    pub name: String,
    pub owner: String,
    /// Chain height the API had indexed when it answered.
    pub block: i64,
    /// Height at which the hotspot was added to the chain.
    pub block_added: i64,
    /// Height of the last proof-of-coverage challenge, absent until the
    /// hotspot has participated in one.
    #[serde(default)]
    pub last_poc_challenge: Option<i64>,
    /// Height of the last transaction that touched this hotspot.
    pub last_change_block: i64,
    pub timestamp_added: DateTime<Utc>,
    #[serde(default)]
    pub lat: Option<f64>,
    /// The document calls longitude `lng`; the distance search endpoint
    /// takes it as `lon`.
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub status: HotspotStatus,
}

/// Account document as returned by `accounts/{address}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub address: String,
    /// HNT balance in bones.
    pub balance: u64,
    /// Data-credit balance, already in its final unit.
    #[serde(default)]
    pub dc_balance: u64,
    /// Height at which the account was last updated.
    pub block: i64,
}

/// Current oracle price as returned by `oracle/prices/current`.
#[derive(Debug, Clone, Deserialize)]
pub struct OraclePrice {
    /// USD price scaled by 10^8.
    pub price: u64,
    /// Height at which the oracle last updated the price.
    pub block: i64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Activity-count document: transaction kind to count, shape shared by the
/// hotspot and account variants.
pub type ActivityCounts = HashMap<String, i64>;

/// The canonical tracked set built once by the resolver.
///
/// Immutable once built; `BTreeMap` keeps per-cycle iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    /// Tracked hotspot address to display name.
    pub hotspots: BTreeMap<String, String>,
    /// Owning account address to the number of tracked hotspots it owns.
    pub accounts: BTreeMap<String, usize>,
}
