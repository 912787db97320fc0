//! Qualitative scoring of the annual plane-of-array resource.

use serde::{Deserialize, Serialize};

/// Resource-quality tier for an annual POA irradiation figure.
///
/// Tiers are contiguous and non-overlapping; any finite input, including
/// zero or negative, maps to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceClass {
    Lower,
    Moderate,
    Good,
    Excellent,
}

impl std::fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Lower => "Lower",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        };
        write!(f, "{s}")
    }
}

impl ResourceClass {
    pub const EXCELLENT_MIN_KWH_M2: f64 = 2200.0;
    pub const GOOD_MIN_KWH_M2: f64 = 1800.0;
    pub const MODERATE_MIN_KWH_M2: f64 = 1400.0;

    /// Classify an annual POA irradiation (kWh/m²/year), highest tier first.
    pub fn from_annual_poa(annual_poa_kwh_m2: f64) -> Self {
        if annual_poa_kwh_m2 >= Self::EXCELLENT_MIN_KWH_M2 {
            ResourceClass::Excellent
        } else if annual_poa_kwh_m2 >= Self::GOOD_MIN_KWH_M2 {
            ResourceClass::Good
        } else if annual_poa_kwh_m2 >= Self::MODERATE_MIN_KWH_M2 {
            ResourceClass::Moderate
        } else {
            ResourceClass::Lower
        }
    }

    /// Reporting sentence for this tier.
    pub fn description(&self) -> &'static str {
        match self {
            ResourceClass::Excellent => {
                "Excellent solar resource (top tier for utility-scale PV)."
            }
            ResourceClass::Good => "Good solar resource suitable for most PV projects.",
            ResourceClass::Moderate => {
                "Moderate solar resource; economics more sensitive to capex and tariff."
            }
            ResourceClass::Lower => {
                "Lower solar resource; PV may still work with strong incentives or high tariffs."
            }
        }
    }
}
