//! Plain-text feasibility report.
//!
//! Pure formatting over already-computed numbers. Metrics the engine left
//! undefined are printed as "n/a", never as a numeric placeholder.

use itertools::Itertools;

use crate::domain::{DisplacementMode, FeasibilityAssumptions, GeoLocation};
use crate::engine::{FeasibilityResult, ResourceClass, SolarProfile};

pub struct ReportContext<'a> {
    pub location: &'a GeoLocation,
    pub displacement: DisplacementMode,
    pub profile: &'a SolarProfile,
    pub assumptions: &'a FeasibilityAssumptions,
    pub result: &'a FeasibilityResult,
    pub classification: ResourceClass,
}

/// Render the report document.
pub fn render(ctx: &ReportContext<'_>) -> String {
    let a = ctx.assumptions;
    let r = ctx.result;
    let p = ctx.profile;

    let monthly_table = p
        .months
        .iter()
        .map(|m| {
            format!(
                "{:<5} {:>4} {:>15.2} {:>17.1} {:>17.1}",
                m.month.to_string(),
                m.days,
                m.daily_horizontal_kwh_m2,
                m.monthly_horizontal_kwh_m2,
                m.monthly_poa_kwh_m2
            )
        })
        .join("\n");

    let payback_line = match r.simple_payback_years {
        Some(years) => format!("Simple payback (with subsidy): {years:.1} years"),
        None => "Simple payback: n/a (non-positive net cashflow)".to_string(),
    };
    let capacity_line = match r.capacity_factor {
        Some(cf) => format!("Capacity factor: {:.1}%", cf * 100.0),
        None => "Capacity factor: n/a".to_string(),
    };

    format!(
        "\
SOLAR PV FEASIBILITY REPORT
===========================
Location: {location}
Coordinates: lat {lat:.4}, lon {lon:.4}

1. Site & Solar Resource
------------------------
Annual GHI (horizontal): {horiz} kWh/m2/year
Annual POA irradiation (tilted): {poa} kWh/m2/year
Tilt gain factor: {tilt:.2}
Resource quality: {class_desc}

2. System & Economic Assumptions
--------------------------------
System size: {size} kWp
Performance ratio: {pr:.2}
CAPEX: {capex} per kWp
Electricity value / tariff: {tariff:.3} per kWh
Annual O&M: {om:.2}% of CAPEX
Project life: {life} years
Discount rate: {discount:.1}%
Capex subsidy / grant: {subsidy:.1}% of CAPEX
Displacement: {displacement} (emission factor: {ef:.3} kg CO2/kWh)

3. Energy Yield, Financial & GHG KPIs
-------------------------------------
Annual yield: {yield_kwh} kWh/kWp/year
Annual energy (system): {energy} kWh/year
{capacity_line}
Total CAPEX (gross): {total_capex}
Effective CAPEX (after subsidy): {effective_capex}
Annual O&M cost: {annual_om}
Annual revenue (energy value): {revenue}
Annual net cashflow (before debt): {cashflow}
{payback_line}
Annual GHG savings: {ghg} tCO2/year
Equivalent to removing ~{cars} passenger vehicles/year
Or ~{forest} hectares of forest CO2 uptake (approximate)

4. Levelized Cost of Energy (LCOE)
----------------------------------
LCOE (no subsidy): {lcoe_no_sub} per kWh
LCOE (with subsidy): {lcoe_with_sub} per kWh
Note: LCOE is based on capital recovery over the project life, constant
annual energy, and constant O&M. Debt structure and taxes are not included.

5. Monthly Solar Profile
------------------------
Month Days  GHI kWh/m2/day  GHI kWh/m2/month  POA kWh/m2/month
{monthly_table}

6. Incentives & Grants (conceptual)
-----------------------------------
This tool applies a generic capex subsidy / grant percentage entered by the
user. For a live project, confirm actual incentives available at national
and local levels (for example: renewable energy funds, investment tax
credits, import duty waivers, feed-in tariffs or Contracts-for-Difference,
concessional loans, or carbon finance).

This is a high-level desktop feasibility view only. Detailed engineering
design, grid studies, land and permitting checks, and full financial
modelling are required before making an investment decision.
",
        location = ctx.location.label(),
        lat = ctx.location.latitude,
        lon = ctx.location.longitude,
        horiz = fmt_thousands(p.annual_horizontal_kwh_m2),
        poa = fmt_thousands(p.annual_poa_kwh_m2),
        tilt = p.tilt_gain_factor,
        class_desc = ctx.classification.description(),
        size = fmt_thousands(a.system_size_kwp),
        pr = a.performance_ratio,
        capex = fmt_thousands(a.capex_per_kwp),
        tariff = a.tariff_per_kwh,
        om = a.om_percent_of_capex,
        life = a.project_life_years,
        discount = a.discount_rate_percent,
        subsidy = a.capex_subsidy_percent,
        displacement = ctx.displacement,
        ef = r.emission_factor_kg_per_kwh,
        yield_kwh = fmt_thousands(r.annual_yield_kwh_per_kwp),
        energy = fmt_thousands(r.annual_energy_kwh),
        capacity_line = capacity_line,
        total_capex = fmt_thousands(r.total_capex),
        effective_capex = fmt_thousands(r.effective_capex),
        annual_om = fmt_thousands(r.annual_om),
        revenue = fmt_thousands(r.annual_revenue),
        cashflow = fmt_thousands(r.annual_net_cashflow),
        payback_line = payback_line,
        ghg = fmt_thousands(r.annual_ghg_savings_tco2),
        cars = fmt_thousands(r.cars_equiv),
        forest = fmt_thousands(r.forest_ha_equiv),
        lcoe_no_sub = fmt_lcoe(r.lcoe_no_subsidy),
        lcoe_with_sub = fmt_lcoe(r.lcoe_with_subsidy),
        monthly_table = monthly_table,
    )
}

fn fmt_lcoe(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

/// Round to the nearest integer and group the digits with commas.
fn fmt_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",");
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
