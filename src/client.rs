//! Reqwest implementation of [`HeliumApi`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::api::HeliumApi;
use crate::constants::{COINGECKO_PRICE_URL, COINGECKO_TOKEN_ID, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::ClientError;
use crate::types::{Account, ActivityCounts, Envelope, Hotspot, HotspotRef, OraclePrice};

/// CoinGecko simple-price response: token id to quoted currencies.
#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    #[serde(flatten)]
    prices: HashMap<String, CoinGeckoPrice>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoPrice {
    usd: f64,
}

/// HTTP client for the chain API plus the secondary price source.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Creates a client against the given API base URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches `path` and unwraps the `data` envelope.
    ///
    /// A 404 means "no such document" and maps to `Ok(None)`; every other
    /// non-success status and any decode failure is an error.
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ClientError> {
        let url = self.url(path);
        debug!(%url, "fetching");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let body = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|err| {
            ClientError::InvalidResponse(format!("failed to decode {path}: {err}"))
        })?;

        Ok(Some(envelope.data))
    }
}

#[async_trait]
impl HeliumApi for ApiClient {
    async fn hotspots_by_name(&self, name: &str) -> Result<Option<Vec<HotspotRef>>, ClientError> {
        self.get_data(&format!("hotspots/name/{name}")).await
    }

    async fn hotspot(&self, address: &str) -> Result<Option<Hotspot>, ClientError> {
        self.get_data(&format!("hotspots/{address}")).await
    }

    async fn hotspot_activity_counts(
        &self,
        address: &str,
    ) -> Result<Option<ActivityCounts>, ClientError> {
        self.get_data(&format!("hotspots/{address}/activity/count"))
            .await
    }

    async fn account(&self, address: &str) -> Result<Option<Account>, ClientError> {
        self.get_data(&format!("accounts/{address}")).await
    }

    async fn account_activity_counts(
        &self,
        address: &str,
    ) -> Result<Option<ActivityCounts>, ClientError> {
        self.get_data(&format!("accounts/{address}/activity/count"))
            .await
    }

    async fn hotspots_for_owner(
        &self,
        owner: &str,
    ) -> Result<Option<Vec<HotspotRef>>, ClientError> {
        self.get_data(&format!("accounts/{owner}/hotspots")).await
    }

    async fn hotspots_near(
        &self,
        lat: f64,
        lon: f64,
        distance_m: u64,
    ) -> Result<Option<Vec<HotspotRef>>, ClientError> {
        // The search endpoint takes `lon`; hotspot documents call it `lng`.
        self.get_data(&format!(
            "hotspots/location/distance?lat={lat}&lon={lon}&distance={distance_m}"
        ))
        .await
    }

    async fn oracle_price(&self) -> Result<Option<OraclePrice>, ClientError> {
        self.get_data("oracle/prices/current").await
    }

    async fn secondary_price_usd(&self) -> Result<Option<f64>, ClientError> {
        debug!(url = COINGECKO_PRICE_URL, "fetching");

        let response = self.client.get(COINGECKO_PRICE_URL).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let body = response.text().await?;
        let decoded: CoinGeckoResponse = serde_json::from_str(&body).map_err(|err| {
            ClientError::InvalidResponse(format!("failed to decode secondary price: {err}"))
        })?;

        Ok(decoded.prices.get(COINGECKO_TOKEN_ID).map(|price| price.usd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_always_ends_with_slash() {
        let with = ApiClient::new("https://api.example.com/v1/").unwrap();
        let without = ApiClient::new("https://api.example.com/v1").unwrap();
        assert_eq!(with.url("hotspots/abc"), without.url("hotspots/abc"));
    }

    #[test]
    fn coingecko_response_decodes() {
        let body = r#"{"helium": {"usd": 2.61}}"#;
        let decoded: CoinGeckoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.prices.get("helium").map(|p| p.usd), Some(2.61));
    }
}
