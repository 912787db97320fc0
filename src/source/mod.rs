pub mod geocode;
pub mod nasa_power;

pub use geocode::*;
pub use nasa_power::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Month, MonthlyIrradiance};

/// Failures at the irradiance-data boundary. A failed fetch aborts the
/// evaluation before the engine runs; the engine never sees partial data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("irradiance request failed: {0}")]
    Network(String),

    #[error("irradiance API returned HTTP {status}")]
    Status { status: reqwest::StatusCode },

    #[error("no monthly {parameter} block in irradiance response")]
    DataNotFound { parameter: &'static str },

    #[error("invalid {month} value in irradiance response: {raw}")]
    InvalidValue { month: Month, raw: String },
}

/// Supplier of long-term monthly average daily horizontal irradiance
/// (kWh/m²/day) for a point.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IrradianceSource: Send + Sync {
    async fn fetch_climatology(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MonthlyIrradiance, SourceError>;
}

/// Best-effort reverse geocoding. Failures are swallowed at this boundary
/// and surface as `None`; callers fall back to a coordinate label.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationLabeler: Send + Sync {
    async fn reverse_label(&self, latitude: f64, longitude: f64) -> Option<String>;
}
