use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::domain::{DisplacementMode, FeasibilityAssumptions};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub geocode: GeocodeConfig,
    pub assumptions: AssumptionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Irradiance data source (NASA POWER climatology).
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub provider: String,
    pub base_url: String,
    /// First year of the climatology averaging window.
    pub start_year: u16,
    /// Last year of the climatology averaging window.
    pub end_year: u16,
    pub http_timeout_seconds: u64,
    pub max_retries: u32,
    pub cache_ttl_seconds: u64,
}

/// Reverse geocoding (Nominatim).
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub http_timeout_seconds: u64,
}

/// Default evaluation assumptions; any of these can be overridden per
/// request.
#[derive(Debug, Clone, Deserialize)]
pub struct AssumptionsConfig {
    /// POA vs horizontal gain at optimum tilt, uniform across months.
    pub tilt_gain_factor: f64,
    pub system_size_kwp: f64,
    pub performance_ratio: f64,
    pub capex_per_kwp: f64,
    pub tariff_per_kwh: f64,
    pub om_percent_of_capex: f64,
    pub project_life_years: u32,
    pub discount_rate_percent: f64,
    pub capex_subsidy_percent: f64,
    pub grid_emission_factor_kg_per_kwh: f64,
    pub diesel_emission_factor_kg_per_kwh: f64,
}

impl AssumptionsConfig {
    /// Emission factor for a displacement scenario.
    pub fn emission_factor_for(&self, mode: DisplacementMode) -> f64 {
        match mode {
            DisplacementMode::Grid => self.grid_emission_factor_kg_per_kwh,
            DisplacementMode::Diesel => self.diesel_emission_factor_kg_per_kwh,
        }
    }

    /// Default assumptions bundle for a displacement scenario.
    pub fn to_assumptions(&self, mode: DisplacementMode) -> FeasibilityAssumptions {
        FeasibilityAssumptions {
            system_size_kwp: self.system_size_kwp,
            performance_ratio: self.performance_ratio,
            capex_per_kwp: self.capex_per_kwp,
            tariff_per_kwh: self.tariff_per_kwh,
            om_percent_of_capex: self.om_percent_of_capex,
            project_life_years: self.project_life_years,
            discount_rate_percent: self.discount_rate_percent,
            capex_subsidy_percent: self.capex_subsidy_percent,
            emission_factor_kg_per_kwh: self.emission_factor_for(mode),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SOLAR__").split("__"));
        Ok(figment.extract()?)
    }
}
