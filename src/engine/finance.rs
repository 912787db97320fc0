//! Energy yield, financial and GHG model for a screened PV site.
//!
//! Everything here is a deterministic pure function of its inputs. Metrics
//! that are not computable for the given inputs (payback on non-positive
//! cashflow, LCOE at zero energy, capacity factor at zero size) come back
//! as `None`, never as zero or NaN.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EngineError;
use crate::domain::FeasibilityAssumptions;

/// Hours in the 8760-hour reference year used for the capacity factor.
const HOURS_PER_YEAR: f64 = 8760.0;
/// Average passenger-vehicle emissions, tCO2/year.
const CAR_TCO2_PER_YEAR: f64 = 4.6;
/// Forest CO2 uptake, tCO2 per hectare per year.
const FOREST_TCO2_PER_HA_PER_YEAR: f64 = 7.0;

/// Computed feasibility metrics for one (profile, assumptions) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    /// Specific yield, kWh per kWp per year.
    pub annual_yield_kwh_per_kwp: f64,
    /// System energy, kWh per year.
    pub annual_energy_kwh: f64,
    /// Gross capital cost.
    pub total_capex: f64,
    /// Capital cost after subsidy.
    pub effective_capex: f64,
    /// Annual O&M cost, always computed on the gross capex.
    pub annual_om: f64,
    pub annual_revenue: f64,
    pub annual_net_cashflow: f64,
    /// Years to recover the effective capex; `None` when the net cashflow
    /// is not positive.
    pub simple_payback_years: Option<f64>,
    pub capital_recovery_factor: f64,
    /// Levelized cost of energy; `None` when annual energy is zero.
    pub lcoe_no_subsidy: Option<f64>,
    pub lcoe_with_subsidy: Option<f64>,
    /// Fraction of the theoretical continuous-nameplate output; `None` for
    /// a zero-size system.
    pub capacity_factor: Option<f64>,
    /// Avoided emissions, tCO2/year. Always a number; zero when there is
    /// no generation.
    pub annual_ghg_savings_tco2: f64,
    /// Equivalent passenger vehicles removed per year.
    pub cars_equiv: f64,
    /// Equivalent hectares of forest CO2 uptake per year.
    pub forest_ha_equiv: f64,
    /// Emission factor the GHG figures were computed with, kg CO2/kWh.
    pub emission_factor_kg_per_kwh: f64,
}

/// Capital recovery factor for a discount rate (percent) and project life.
///
/// The zero-rate case reduces to straight-line recovery over the life,
/// avoiding the division by zero in the compound formula.
pub fn capital_recovery_factor(discount_rate_percent: f64, project_life_years: u32) -> f64 {
    let r = discount_rate_percent / 100.0;
    let n = project_life_years;
    if r > 0.0 {
        let growth = (1.0 + r).powi(n as i32);
        r * growth / (growth - 1.0)
    } else {
        1.0 / n as f64
    }
}

impl FeasibilityResult {
    /// Compute all metrics from the annual POA irradiation (kWh/m²/year)
    /// and an assumptions bundle.
    ///
    /// Never fails: zero or degenerate economic inputs produce `None`
    /// metrics rather than errors. Callers that accept untrusted
    /// assumptions should go through [`evaluate`] instead.
    pub fn compute(annual_poa_kwh_m2: f64, assumptions: &FeasibilityAssumptions) -> Self {
        let annual_yield_kwh_per_kwp = annual_poa_kwh_m2 * assumptions.performance_ratio;
        let annual_energy_kwh = annual_yield_kwh_per_kwp * assumptions.system_size_kwp;

        let total_capex = assumptions.capex_per_kwp * assumptions.system_size_kwp;
        let subsidy_fraction = assumptions.capex_subsidy_percent / 100.0;
        let effective_capex = total_capex * (1.0 - subsidy_fraction);

        // O&M is charged on the gross capex even when a subsidy applies
        let annual_om = total_capex * (assumptions.om_percent_of_capex / 100.0);
        let annual_revenue = annual_energy_kwh * assumptions.tariff_per_kwh;
        let annual_net_cashflow = annual_revenue - annual_om;

        let simple_payback_years = if annual_net_cashflow > 0.0 {
            Some(effective_capex / annual_net_cashflow)
        } else {
            None
        };

        let crf = capital_recovery_factor(
            assumptions.discount_rate_percent,
            assumptions.project_life_years,
        );
        let annualized_cost_no_subsidy = total_capex * crf + annual_om;
        let annualized_cost_with_subsidy = effective_capex * crf + annual_om;

        let (lcoe_no_subsidy, lcoe_with_subsidy) = if annual_energy_kwh > 0.0 {
            (
                Some(annualized_cost_no_subsidy / annual_energy_kwh),
                Some(annualized_cost_with_subsidy / annual_energy_kwh),
            )
        } else {
            (None, None)
        };

        let capacity_factor = if assumptions.system_size_kwp > 0.0 {
            Some(annual_energy_kwh / (assumptions.system_size_kwp * HOURS_PER_YEAR))
        } else {
            None
        };

        let annual_ghg_savings_tco2 = if annual_energy_kwh > 0.0 {
            annual_energy_kwh * assumptions.emission_factor_kg_per_kwh / 1000.0
        } else {
            0.0
        };
        let cars_equiv = annual_ghg_savings_tco2 / CAR_TCO2_PER_YEAR;
        let forest_ha_equiv = annual_ghg_savings_tco2 / FOREST_TCO2_PER_HA_PER_YEAR;

        Self {
            annual_yield_kwh_per_kwp,
            annual_energy_kwh,
            total_capex,
            effective_capex,
            annual_om,
            annual_revenue,
            annual_net_cashflow,
            simple_payback_years,
            capital_recovery_factor: crf,
            lcoe_no_subsidy,
            lcoe_with_subsidy,
            capacity_factor,
            annual_ghg_savings_tco2,
            cars_equiv,
            forest_ha_equiv,
            emission_factor_kg_per_kwh: assumptions.emission_factor_kg_per_kwh,
        }
    }
}

/// Validate the assumptions and compute the result.
pub fn evaluate(
    annual_poa_kwh_m2: f64,
    assumptions: &FeasibilityAssumptions,
) -> Result<FeasibilityResult, EngineError> {
    assumptions.validate()?;
    Ok(FeasibilityResult::compute(annual_poa_kwh_m2, assumptions))
}
