use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Month;

/// Geographic location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    /// Human-readable label, falling back to coordinates when no place name
    /// could be resolved.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("lat {:.4}, lon {:.4}", self.latitude, self.longitude),
        }
    }
}

/// Monthly average daily horizontal irradiance (kWh/m²/day), keyed by month.
///
/// A complete mapping carries exactly 12 entries with finite, non-negative
/// values. Construction is permissive so that adapters can assemble the map
/// incrementally; the profile builder enforces the invariant before any
/// computation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyIrradiance(BTreeMap<Month, f64>);

impl MonthlyIrradiance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, month: Month, kwh_per_m2_per_day: f64) {
        self.0.insert(month, kwh_per_m2_per_day);
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.0.get(&month).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }
}

impl FromIterator<(Month, f64)> for MonthlyIrradiance {
    fn from_iter<I: IntoIterator<Item = (Month, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_label_prefers_name() {
        let mut loc = GeoLocation::new(9.0, 7.0);
        assert_eq!(loc.label(), "lat 9.0000, lon 7.0000");

        loc.name = Some("Abuja, Nigeria".to_string());
        assert_eq!(loc.label(), "Abuja, Nigeria");
    }

    #[test]
    fn test_irradiance_map_roundtrip() {
        let irr: MonthlyIrradiance = Month::ALL.into_iter().map(|m| (m, 5.0)).collect();
        assert_eq!(irr.len(), 12);
        assert_eq!(irr.get(Month::Jul), Some(5.0));

        let json = serde_json::to_string(&irr).unwrap();
        assert!(json.contains("\"JAN\""));
        let back: MonthlyIrradiance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, irr);
    }

    #[test]
    fn test_partial_map_reports_missing() {
        let mut irr = MonthlyIrradiance::new();
        irr.insert(Month::Jan, 4.2);
        assert_eq!(irr.len(), 1);
        assert_eq!(irr.get(Month::Feb), None);
    }
}
