//! Reverse geocoding via the OpenStreetMap Nominatim API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, warn};

use super::LocationLabeler;
use crate::config::GeocodeConfig;

#[derive(Clone)]
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(cfg: &GeocodeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent).context("invalid geocode user agent")?,
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        let url = format!("{}/reverse", self.base_url);
        debug!(%url, latitude, longitude, "reverse geocoding");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", format!("{latitude:.6}")),
                ("lon", format!("{longitude:.6}")),
            ])
            .send()
            .await
            .context("reverse geocode GET failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("reverse geocode HTTP {}", resp.status());
        }

        let body: ReverseResponse = resp
            .json()
            .await
            .context("reverse geocode JSON parse failed")?;
        Ok(body.address.label())
    }
}

#[async_trait]
impl LocationLabeler for NominatimClient {
    async fn reverse_label(&self, latitude: f64, longitude: f64) -> Option<String> {
        match self.fetch_reverse(latitude, longitude).await {
            Ok(label) => label,
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed, using coordinate label");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl Address {
    /// "<place>, <country>" with the most specific populated place first;
    /// degrades to country alone, then nothing.
    fn label(self) -> Option<String> {
        let place = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
            .or(self.state);
        match (place, self.country) {
            (Some(place), Some(country)) => Some(format!("{place}, {country}")),
            (Some(place), None) => Some(place),
            (None, country) => country,
        }
    }
}
