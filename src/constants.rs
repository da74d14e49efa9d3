//! Constants for the hotspot exporter.
//!
//! Tuning that is not expected to change per deployment lives here as
//! compile-time constants; everything deployment-specific is read from the
//! environment in the `config` module.

/// Default base URL of the upstream chain API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.helium.io/v1/";

/// How long to sleep between poll cycles (in seconds) unless overridden.
pub const DEFAULT_UPDATE_PERIOD_SECS: u64 = 30;

/// Default radius for the nearby-hotspot search (in meters).
pub const DEFAULT_NEARBY_DISTANCE_M: u64 = 20_000;

/// Minimum age before the per-hotspot nearby count is refreshed (in seconds).
pub const NEARBY_REFRESH_SECS: i64 = 3600;

/// Minimum age before the oracle/market prices are refreshed (in seconds).
pub const PRICE_REFRESH_SECS: i64 = 600;

/// HTTP request timeout for upstream fetches (in seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests.
pub const USER_AGENT: &str = "hotspot-exporter/0.1.0";

/// Port the Prometheus scrape endpoint listens on.
pub const LISTEN_PORT: u16 = 9826;

/// Account balances arrive as integer bones; one HNT is 10^8 bones.
pub const BONES_PER_HNT: f64 = 100_000_000.0;

/// The oracle reports its price as an integer USD amount scaled by 10^8.
pub const ORACLE_PRICE_SCALE: f64 = 100_000_000.0;

/// CoinGecko simple-price endpoint used as the secondary price source.
pub const COINGECKO_PRICE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=helium&vs_currencies=usd";

/// Key under which CoinGecko reports the quoted token.
pub const COINGECKO_TOKEN_ID: &str = "helium";

/// Activity-count keys republished for hotspots. The upstream document also
/// carries undocumented transaction kinds that come and go between chain
/// releases; only keys matching one of these prefixes become metrics.
pub const HOTSPOT_ACTIVITY_PREFIXES: &[&str] = &[
    "poc_receipts",
    "poc_request",
    "rewards",
    "assert_location",
    "add_gateway",
    "transfer_hotspot",
    "state_channel_close",
];

/// Activity-count keys republished for accounts.
pub const ACCOUNT_ACTIVITY_PREFIXES: &[&str] = &[
    "payment",
    "rewards",
    "token_burn",
    "stake_validator",
    "unstake_validator",
    "transfer_hotspot",
    "add_gateway",
    "assert_location",
];
