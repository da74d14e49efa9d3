//! Error types for the hotspot exporter.

use thiserror::Error;

/// Errors that can occur when fetching from an upstream API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network request failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Response body did not decode into the expected schema
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that abort a whole tracked-set resolution.
///
/// Anything softer (an ambiguous name, an owner lookup that came back empty)
/// is logged and dropped inside the resolver without surfacing here.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A tracked address could not be loaded at all
    #[error("failed to load hotspot {address}: {source}")]
    HotspotLookup {
        address: String,
        #[source]
        source: ClientError,
    },

    /// A tracked address answered without a usable document
    #[error("hotspot {address} returned no document")]
    MissingDocument { address: String },
}
