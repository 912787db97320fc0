use serde::{Deserialize, Serialize};
use validator::Validate;

/// What the solar generation is displacing. Selects which configured
/// emission factor feeds the feasibility assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplacementMode {
    #[default]
    Grid,
    Diesel,
}

impl std::fmt::Display for DisplacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Grid => "grid",
            Self::Diesel => "diesel",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for DisplacementMode {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "diesel" => Ok(Self::Diesel),
            _ => Err("invalid displacement; expected grid or diesel"),
        }
    }
}

/// Economic and system assumptions for a feasibility evaluation.
///
/// Validated before the engine runs; contract violations are rejected,
/// never silently defaulted. The engine's arithmetic itself tolerates
/// zeros and represents non-computable metrics as explicit `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FeasibilityAssumptions {
    /// Nameplate DC capacity in kWp.
    #[validate(range(exclusive_min = 0.0, message = "system size must be positive"))]
    pub system_size_kwp: f64,
    /// Fraction of theoretical DC yield delivered as usable energy.
    #[validate(range(
        exclusive_min = 0.0,
        max = 1.0,
        message = "performance ratio must be in (0, 1]"
    ))]
    pub performance_ratio: f64,
    /// Capital cost per kWp, in the user's currency.
    #[validate(range(min = 0.0, message = "capex must be non-negative"))]
    pub capex_per_kwp: f64,
    /// Electricity value per kWh generated.
    #[validate(range(min = 0.0, message = "tariff must be non-negative"))]
    pub tariff_per_kwh: f64,
    /// Annual O&M as a percentage of gross capex.
    #[validate(range(min = 0.0, message = "O&M percentage must be non-negative"))]
    pub om_percent_of_capex: f64,
    #[validate(range(min = 1, message = "project life must be at least one year"))]
    pub project_life_years: u32,
    /// Real discount rate, percent.
    #[validate(range(min = 0.0, message = "discount rate must be non-negative"))]
    pub discount_rate_percent: f64,
    /// Capex subsidy or grant, percent of gross capex.
    #[validate(range(min = 0.0, max = 100.0, message = "subsidy must be in [0, 100] percent"))]
    pub capex_subsidy_percent: f64,
    /// Emissions avoided per kWh displaced, kg CO2/kWh.
    #[validate(range(min = 0.0, message = "emission factor must be non-negative"))]
    pub emission_factor_kg_per_kwh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FeasibilityAssumptions {
        FeasibilityAssumptions {
            system_size_kwp: 1000.0,
            performance_ratio: 0.8,
            capex_per_kwp: 800.0,
            tariff_per_kwh: 0.15,
            om_percent_of_capex: 1.5,
            project_life_years: 25,
            discount_rate_percent: 8.0,
            capex_subsidy_percent: 0.0,
            emission_factor_kg_per_kwh: 0.6,
        }
    }

    #[test]
    fn test_valid_assumptions_pass() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_zero_system_size_rejected() {
        let mut a = valid();
        a.system_size_kwp = 0.0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_performance_ratio_bounds() {
        let mut a = valid();
        a.performance_ratio = 1.0;
        assert!(a.validate().is_ok());
        a.performance_ratio = 1.01;
        assert!(a.validate().is_err());
        a.performance_ratio = 0.0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_zero_project_life_rejected() {
        let mut a = valid();
        a.project_life_years = 0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_subsidy_capped_at_100() {
        let mut a = valid();
        a.capex_subsidy_percent = 100.0;
        assert!(a.validate().is_ok());
        a.capex_subsidy_percent = 101.0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_displacement_mode_parsing() {
        use std::str::FromStr;
        assert_eq!(
            DisplacementMode::from_str("diesel").unwrap(),
            DisplacementMode::Diesel
        );
        assert_eq!(
            DisplacementMode::from_str("GRID").unwrap(),
            DisplacementMode::Grid
        );
        assert!(DisplacementMode::from_str("coal").is_err());
        assert_eq!(DisplacementMode::default(), DisplacementMode::Grid);
    }
}
