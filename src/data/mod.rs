//! # Reference Tables
//!
//! Vehicle catalog and national mobility statistics used to build a
//! [`VehicleProfile`](crate::domain::VehicleProfile).
//!
//! The simulation only sees the [`StatisticsProvider`] trait, so the tables can
//! come from somewhere other than the compiled-in [`BuiltinTables`].

pub mod builtin;

pub use builtin::BuiltinTables;

use serde::{Deserialize, Serialize};

use crate::domain::{CountryCode, DayTypeTable, PowerCurve, VehicleSize};

/// Catalog entry for one vehicle size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub battery_capacity_kwh: f64,
    pub power_curve: PowerCurve,
}

/// Average travel statistics for one day type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayMobility {
    /// Total daily distance (km)
    pub daily_distance_km: f64,
    /// Distance per trip (km)
    pub trip_distance_km: f64,
    /// Driving time per trip (min)
    pub trip_duration_min: f64,
}

pub type NationalMobility = DayTypeTable<DayMobility>;

/// Variability ratios applied to every day type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Variability {
    pub distance: f64,
    pub velocity: f64,
}

impl Default for Variability {
    fn default() -> Self {
        Self {
            distance: 0.3,
            velocity: 0.3,
        }
    }
}

pub trait StatisticsProvider {
    fn vehicle(&self, size: VehicleSize) -> VehicleSpec;

    /// Statistics surveyed for this country itself, if any
    fn mobility(&self, country: CountryCode) -> Option<NationalMobility>;

    /// Neighbouring country whose statistics stand in for `country`
    fn equivalent_country(&self, country: CountryCode) -> Option<CountryCode>;

    fn variability(&self) -> Variability {
        Variability::default()
    }

    /// Direct statistics, or those of the equivalent country
    fn resolve_mobility(&self, country: CountryCode) -> Option<(CountryCode, NationalMobility)> {
        if let Some(stats) = self.mobility(country) {
            return Some((country, stats));
        }
        let substitute = self.equivalent_country(country)?;
        self.mobility(substitute).map(|stats| (substitute, stats))
    }
}
