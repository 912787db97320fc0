//! NASA POWER climatology client.
//!
//! Fetches the long-term (default 2001-2020) monthly average daily GHI for
//! a point. The provider has shipped the monthly block under several
//! different envelope shapes over time, so the adapter searches the JSON
//! tree for it; only an already-validated fixed-shape 12-entry mapping ever
//! leaves this module.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{IrradianceSource, SourceError};
use crate::config::DataConfig;
use crate::domain::{Month, MonthlyIrradiance};

/// GHI parameter in the POWER climatology dataset, kWh/m²/day.
const PARAMETER: &str = "ALLSKY_SFC_SW_DWN";

#[derive(Clone)]
pub struct NasaPowerClient {
    base_url: String,
    start_year: u16,
    end_year: u16,
    client: ClientWithMiddleware,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    ttl: Duration,
}

struct CacheEntry {
    fetched_at: Instant,
    key: (i64, i64),
    data: MonthlyIrradiance,
}

impl NasaPowerClient {
    pub fn new(cfg: &DataConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("solar-feasibility/0.1"));
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()?;
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(cfg.max_retries);
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            start_year: cfg.start_year,
            end_year: cfg.end_year,
            client,
            cache: Arc::new(RwLock::new(None)),
            ttl: Duration::from_secs(cfg.cache_ttl_seconds),
        })
    }

    fn cache_key(latitude: f64, longitude: f64) -> (i64, i64) {
        // 1e-4 degrees is far below the provider's 0.5-degree grid
        (
            (latitude * 10_000.0).round() as i64,
            (longitude * 10_000.0).round() as i64,
        )
    }

    async fn fetch_remote(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MonthlyIrradiance, SourceError> {
        let url = format!("{}/api/temporal/climatology/point", self.base_url);
        debug!(%url, latitude, longitude, "fetching GHI climatology");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("start", self.start_year.to_string()),
                ("end", self.end_year.to_string()),
                ("latitude", format!("{latitude:.6}")),
                ("longitude", format!("{longitude:.6}")),
                ("community", "re".to_string()),
                ("parameters", PARAMETER.to_string()),
                ("format", "json".to_string()),
                ("header", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status { status });
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let data = parse_monthly_ghi(&payload)?;
        info!(latitude, longitude, "fetched GHI climatology");
        Ok(data)
    }
}

#[async_trait]
impl IrradianceSource for NasaPowerClient {
    async fn fetch_climatology(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MonthlyIrradiance, SourceError> {
        let key = Self::cache_key(latitude, longitude);
        {
            let c = self.cache.read().await;
            if let Some(entry) = &*c {
                if entry.key == key && entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.data.clone());
                }
            }
        }

        let data = self.fetch_remote(latitude, longitude).await?;

        let mut c = self.cache.write().await;
        *c = Some(CacheEntry {
            fetched_at: Instant::now(),
            key,
            data: data.clone(),
        });
        Ok(data)
    }
}

/// Extract the validated 12-month GHI mapping from a POWER response.
fn parse_monthly_ghi(payload: &Value) -> Result<MonthlyIrradiance, SourceError> {
    let block = find_monthly_block(payload, PARAMETER).ok_or(SourceError::DataNotFound {
        parameter: PARAMETER,
    })?;

    let mut data = MonthlyIrradiance::new();
    for month in Month::ALL {
        let raw = block.get(month.key());
        let value = raw
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| SourceError::InvalidValue {
                month,
                raw: raw.cloned().unwrap_or(Value::Null).to_string(),
            })?;
        data.insert(month, value);
    }
    Ok(data)
}

/// Locate the monthly parameter block in an arbitrarily shaped response.
///
/// Tries the shapes the provider has used: the parameter dict directly
/// under a node, under `parameters`, under `properties.parameter`, then a
/// depth-first search of the remaining tree. A candidate only matches when
/// it carries all 12 month keys.
fn find_monthly_block<'a>(
    node: &'a Value,
    parameter: &str,
) -> Option<&'a serde_json::Map<String, Value>> {
    match node {
        Value::Object(map) => {
            if let Some(Value::Object(block)) = map.get(parameter) {
                if has_all_months(block) {
                    return Some(block);
                }
            }
            if let Some(Value::Object(params)) = map.get("parameters") {
                if let Some(Value::Object(block)) = params.get(parameter) {
                    if has_all_months(block) {
                        return Some(block);
                    }
                }
            }
            if let Some(Value::Object(props)) = map.get("properties") {
                if let Some(Value::Object(param)) = props.get("parameter") {
                    if let Some(Value::Object(block)) = param.get(parameter) {
                        if has_all_months(block) {
                            return Some(block);
                        }
                    }
                }
            }
            map.values()
                .find_map(|child| find_monthly_block(child, parameter))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|child| find_monthly_block(child, parameter)),
        _ => None,
    }
}

fn has_all_months(block: &serde_json::Map<String, Value>) -> bool {
    Month::ALL.iter().all(|m| block.contains_key(m.key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_config;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn month_block() -> Value {
        json!({
            "JAN": 5.0, "FEB": 5.2, "MAR": 5.5, "APR": 5.8,
            "MAY": 5.5, "JUN": 5.0, "JUL": 4.8, "AUG": 4.9,
            "SEP": 5.3, "OCT": 5.4, "NOV": 5.1, "DEC": 4.9,
            "ANN": 5.2
        })
    }

    #[test]
    fn test_finds_block_under_properties_parameter() {
        let payload = json!({
            "type": "Feature",
            "properties": { "parameter": { "ALLSKY_SFC_SW_DWN": month_block() } }
        });
        assert!(find_monthly_block(&payload, PARAMETER).is_some());
    }

    #[test]
    fn test_finds_block_under_parameters_and_direct() {
        let nested = json!({ "parameters": { "ALLSKY_SFC_SW_DWN": month_block() } });
        assert!(find_monthly_block(&nested, PARAMETER).is_some());

        let direct = json!({ "ALLSKY_SFC_SW_DWN": month_block() });
        assert!(find_monthly_block(&direct, PARAMETER).is_some());
    }

    #[test]
    fn test_finds_block_by_recursion() {
        let payload = json!({
            "messages": [],
            "outputs": { "wrapped": [ { "ALLSKY_SFC_SW_DWN": month_block() } ] }
        });
        assert!(find_monthly_block(&payload, PARAMETER).is_some());
    }

    #[test]
    fn test_incomplete_block_is_not_a_match() {
        let payload = json!({
            "ALLSKY_SFC_SW_DWN": { "JAN": 5.0, "FEB": 5.2 }
        });
        assert!(find_monthly_block(&payload, PARAMETER).is_none());
    }

    #[test]
    fn test_parse_rejects_fill_values() {
        // POWER marks missing data with -999
        let mut block = month_block();
        block["AUG"] = json!(-999.0);
        let payload = json!({ "properties": { "parameter": { "ALLSKY_SFC_SW_DWN": block } } });
        assert!(matches!(
            parse_monthly_ghi(&payload),
            Err(SourceError::InvalidValue {
                month: Month::Aug,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_climatology_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temporal/climatology/point"))
            .and(query_param("parameters", PARAMETER))
            .and(query_param("community", "re"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "parameter": { "ALLSKY_SFC_SW_DWN": month_block() } }
            })))
            .mount(&server)
            .await;

        let client = NasaPowerClient::new(&test_config(&server.uri()).data).unwrap();
        let data = client.fetch_climatology(9.0, 7.0).await.unwrap();
        assert_eq!(data.len(), 12);
        assert_eq!(data.get(Month::Apr), Some(5.8));
    }

    #[tokio::test]
    async fn test_fetch_climatology_uses_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temporal/climatology/point"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "parameter": { "ALLSKY_SFC_SW_DWN": month_block() } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NasaPowerClient::new(&test_config(&server.uri()).data).unwrap();
        let first = client.fetch_climatology(9.0, 7.0).await.unwrap();
        let second = client.fetch_climatology(9.0, 7.0).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_climatology_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = NasaPowerClient::new(&test_config(&server.uri()).data).unwrap();
        match client.fetch_climatology(9.0, 7.0).await {
            Err(SourceError::Status { status }) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_climatology_missing_block() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "parameter": { "T2M": { "JAN": 21.0 } } }
            })))
            .mount(&server)
            .await;

        let client = NasaPowerClient::new(&test_config(&server.uri()).data).unwrap();
        assert!(matches!(
            client.fetch_climatology(9.0, 7.0).await,
            Err(SourceError::DataNotFound { .. })
        ));
    }
}
