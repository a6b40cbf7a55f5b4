//! # Driver/Vehicle Configuration Builder
//!
//! Turns a vehicle size, a driving intensity and a country into per-day-type
//! travel targets.
//!
//! - **Usage category**: national averages scaled by 0.5 (short), 1 (normal)
//!   or 2 (long).
//! - **Annual distance**: national averages rescaled so that the
//!   week-weighted daily distance equals `km_per_year / 365`. Trip distance
//!   and trip duration scale by the same factor.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::StatisticsProvider;
use crate::domain::{
    ConfigError, CountryCode, DayType, DayTypeTable, DayTypeTarget, Usage, VehicleProfile,
    VehicleSize,
};

const DAYS_PER_YEAR: f64 = 365.0;

/// Weekday/Saturday/Sunday share of a week
const WEEK_WEIGHTS: [(DayType, f64); 3] = [
    (DayType::Weekday, 5.0 / 7.0),
    (DayType::Saturday, 1.0 / 7.0),
    (DayType::Sunday, 1.0 / 7.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub size: VehicleSize,
    pub usage: Usage,
    pub country: CountryCode,
}

/// Build the immutable vehicle profile for a driver
pub fn build_vehicle_profile(
    config: &DriverConfig,
    provider: &dyn StatisticsProvider,
) -> Result<VehicleProfile, ConfigError> {
    let (source, stats) = provider
        .resolve_mobility(config.country)
        .ok_or_else(|| ConfigError::UnsupportedCountry(config.country.to_string()))?;
    if source != config.country {
        warn!(country = %config.country, %source, "no mobility survey data, using equivalent country");
    }

    let scale = match config.usage {
        Usage::Category(category) => category.scale(),
        Usage::AnnualDistance(km_per_year) => {
            if !km_per_year.is_finite() || km_per_year <= 0.0 {
                return Err(ConfigError::Invalid {
                    name: "km_per_year",
                    reason: format!("must be positive, got {km_per_year}"),
                });
            }
            let weekly_mean: f64 = WEEK_WEIGHTS
                .iter()
                .map(|(day_type, weight)| stats.get(*day_type).daily_distance_km * weight)
                .sum();
            if weekly_mean <= 0.0 {
                return Err(ConfigError::Invalid {
                    name: "daily_distance_km",
                    reason: format!("no positive travel statistics for {source}"),
                });
            }
            km_per_year / DAYS_PER_YEAR / weekly_mean
        }
    };

    let variability = provider.variability();
    let records = stats.iter().map(|(day_type, mobility)| {
        (
            day_type,
            DayTypeTarget {
                distance_km: mobility.daily_distance_km * scale,
                trip_distance_km: mobility.trip_distance_km * scale,
                trip_duration_min: mobility.trip_duration_min * scale,
                distance_variability: variability.distance,
                velocity_variability: variability.velocity,
            },
        )
    });
    let targets = DayTypeTable::from_records(records)?;

    let vehicle = provider.vehicle(config.size);
    debug!(
        size = %config.size,
        battery_kwh = vehicle.battery_capacity_kwh,
        scale,
        "vehicle profile built"
    );

    Ok(VehicleProfile {
        size: config.size,
        battery_capacity_kwh: vehicle.battery_capacity_kwh,
        power_curve: vehicle.power_curve,
        targets,
    })
}
