//! Expands monthly daily-average horizontal irradiance into a monthly and
//! annual horizontal / plane-of-array irradiation profile.

use serde::{Deserialize, Serialize};

use super::EngineError;
use crate::domain::{Month, MonthlyIrradiance};

/// One month of the solar profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProfile {
    pub month: Month,
    pub days: u32,
    /// Average daily horizontal irradiance, kWh/m²/day.
    pub daily_horizontal_kwh_m2: f64,
    /// Monthly horizontal irradiation, kWh/m²/month.
    pub monthly_horizontal_kwh_m2: f64,
    /// Monthly plane-of-array irradiation, kWh/m²/month.
    pub monthly_poa_kwh_m2: f64,
}

/// Monthly and annual irradiation profile, immutable once built.
///
/// The same tilt gain factor applies to every month; seasonal tilt effects
/// are deliberately outside this model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarProfile {
    pub tilt_gain_factor: f64,
    pub months: Vec<MonthProfile>,
    /// Annual horizontal irradiation, kWh/m²/year.
    pub annual_horizontal_kwh_m2: f64,
    /// Annual plane-of-array irradiation, kWh/m²/year.
    pub annual_poa_kwh_m2: f64,
}

impl SolarProfile {
    /// Build the profile from a complete 12-month irradiance mapping.
    ///
    /// Fails if a month is missing or a value is non-finite or negative;
    /// otherwise this is a pure function of its inputs. The expected range
    /// for `tilt_gain_factor` is roughly 1.0-1.3 but no bound is enforced.
    pub fn build(
        irradiance: &MonthlyIrradiance,
        tilt_gain_factor: f64,
    ) -> Result<Self, EngineError> {
        let mut months = Vec::with_capacity(12);
        let mut annual_horizontal = 0.0;
        let mut annual_poa = 0.0;

        for month in Month::ALL {
            let daily = irradiance
                .get(month)
                .ok_or(EngineError::MissingMonth(month))?;
            if !daily.is_finite() || daily < 0.0 {
                return Err(EngineError::InvalidIrradiance {
                    month,
                    value: daily,
                });
            }

            let days = month.days();
            let monthly_horizontal = daily * days as f64;
            let monthly_poa = monthly_horizontal * tilt_gain_factor;

            annual_horizontal += monthly_horizontal;
            annual_poa += monthly_poa;

            months.push(MonthProfile {
                month,
                days,
                daily_horizontal_kwh_m2: daily,
                monthly_horizontal_kwh_m2: monthly_horizontal,
                monthly_poa_kwh_m2: monthly_poa,
            });
        }

        Ok(Self {
            tilt_gain_factor,
            months,
            annual_horizontal_kwh_m2: annual_horizontal,
            annual_poa_kwh_m2: annual_poa,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn uniform(value: f64) -> MonthlyIrradiance {
        Month::ALL.into_iter().map(|m| (m, value)).collect()
    }

    /// A site with monthly daily GHI between 4.8 and 5.8 kWh/m²/day.
    fn example_site() -> MonthlyIrradiance {
        [
            (Month::Jan, 5.0),
            (Month::Feb, 5.2),
            (Month::Mar, 5.5),
            (Month::Apr, 5.8),
            (Month::May, 5.5),
            (Month::Jun, 5.0),
            (Month::Jul, 4.8),
            (Month::Aug, 4.9),
            (Month::Sep, 5.3),
            (Month::Oct, 5.4),
            (Month::Nov, 5.1),
            (Month::Dec, 4.9),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_monthly_totals_use_day_counts() {
        let profile = SolarProfile::build(&uniform(4.0), 1.0).unwrap();
        let feb = &profile.months[1];
        assert_eq!(feb.month, Month::Feb);
        assert_eq!(feb.monthly_horizontal_kwh_m2, 4.0 * 28.0);
        let jul = &profile.months[6];
        assert_eq!(jul.monthly_horizontal_kwh_m2, 4.0 * 31.0);
    }

    #[test]
    fn test_annual_totals_for_uniform_input() {
        // 365-day year, no leap adjustment
        let profile = SolarProfile::build(&uniform(5.0), 1.1).unwrap();
        assert!((profile.annual_horizontal_kwh_m2 - 5.0 * 365.0).abs() < 1e-9);
        assert!((profile.annual_poa_kwh_m2 - 5.0 * 365.0 * 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_example_site_totals() {
        let profile = SolarProfile::build(&example_site(), 1.1).unwrap();
        assert!((profile.annual_horizontal_kwh_m2 - 1897.6).abs() < 1e-6);
        assert!((profile.annual_poa_kwh_m2 - 1897.6 * 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_poa_is_horizontal_times_tilt_gain() {
        let profile = SolarProfile::build(&example_site(), 1.25).unwrap();
        assert!(
            (profile.annual_poa_kwh_m2 - profile.annual_horizontal_kwh_m2 * 1.25).abs() < 1e-6
        );
        for m in &profile.months {
            assert!((m.monthly_poa_kwh_m2 - m.monthly_horizontal_kwh_m2 * 1.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_all_zero_input_gives_zero_totals() {
        let profile = SolarProfile::build(&uniform(0.0), 1.1).unwrap();
        assert_eq!(profile.annual_horizontal_kwh_m2, 0.0);
        assert_eq!(profile.annual_poa_kwh_m2, 0.0);
    }

    #[test]
    fn test_missing_month_is_rejected() {
        let partial: MonthlyIrradiance = Month::ALL
            .into_iter()
            .filter(|m| *m != Month::Jun)
            .map(|m| (m, 5.0))
            .collect();
        match SolarProfile::build(&partial, 1.1) {
            Err(EngineError::MissingMonth(Month::Jun)) => {}
            other => panic!("expected MissingMonth(Jun), got {other:?}"),
        }
    }

    #[test]
    fn test_negative_and_nan_values_are_rejected() {
        let mut bad = uniform(5.0);
        bad.insert(Month::Mar, -0.1);
        assert!(matches!(
            SolarProfile::build(&bad, 1.1),
            Err(EngineError::InvalidIrradiance {
                month: Month::Mar,
                ..
            })
        ));

        let mut nan = uniform(5.0);
        nan.insert(Month::Oct, f64::NAN);
        assert!(matches!(
            SolarProfile::build(&nan, 1.1),
            Err(EngineError::InvalidIrradiance {
                month: Month::Oct,
                ..
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_raising_one_month_raises_annual_totals(
            base in 0.1f64..10.0,
            bump in 0.01f64..5.0,
            idx in 0usize..12,
        ) {
            let month = Month::ALL[idx];
            let before = SolarProfile::build(&uniform(base), 1.1).unwrap();

            let mut bumped = uniform(base);
            bumped.insert(month, base + bump);
            let after = SolarProfile::build(&bumped, 1.1).unwrap();

            prop_assert!(after.annual_horizontal_kwh_m2 > before.annual_horizontal_kwh_m2);
            prop_assert!(after.annual_poa_kwh_m2 > before.annual_poa_kwh_m2);
        }

        #[test]
        fn prop_build_is_deterministic(value in 0.0f64..12.0, tilt in 0.8f64..1.5) {
            let input = uniform(value);
            let a = SolarProfile::build(&input, tilt).unwrap();
            let b = SolarProfile::build(&input, tilt).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
