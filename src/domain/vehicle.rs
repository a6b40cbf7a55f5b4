use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{ConfigError, DayTypeTable};

/// Converts the velocity-power calibration (W-scale coefficients) to kW
pub const POWER_CURVE_SCALE: f64 = 12.0 / 1000.0;

/// Sampled trip velocities are floored here; the calibration curve is
/// unrealistic below it.
pub const MIN_TRIP_VELOCITY_KMH: f64 = 20.0;

/// ISO-like country codes used by the mobility survey and holiday tables.
///
/// Greece is `EL` and the United Kingdom `UK`, following the survey naming.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CountryCode {
    At,
    Be,
    Bg,
    Ch,
    Cy,
    Cz,
    De,
    Dk,
    Ee,
    El,
    Es,
    Fi,
    Fr,
    Hr,
    Hu,
    Ie,
    It,
    Lt,
    Lu,
    Lv,
    Mt,
    Nl,
    No,
    Pl,
    Pt,
    Ro,
    Se,
    Si,
    Sk,
    Uk,
}

impl CountryCode {
    pub fn parse(code: &str) -> Result<Self, ConfigError> {
        code.trim()
            .parse()
            .map_err(|_| ConfigError::UnsupportedCountry(code.to_string()))
    }
}

/// Vehicle size class in the built-in catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VehicleSize {
    Small,
    Medium,
    Large,
}

/// Driving intensity relative to the national average
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UsageCategory {
    Short,
    Normal,
    Long,
}

impl UsageCategory {
    /// Multiplier applied to national distance and duration statistics
    pub fn scale(self) -> f64 {
        match self {
            UsageCategory::Short => 0.5,
            UsageCategory::Normal => 1.0,
            UsageCategory::Long => 2.0,
        }
    }
}

/// How much the driver drives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    Category(UsageCategory),
    /// Absolute annual distance target (km per year)
    AnnualDistance(f64),
}

/// Quadratic velocity-power calibration: `P = (a·v² + b·v + c)·k`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl PowerCurve {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Average traction power (kW) at a velocity in km/h
    pub fn power_kw(&self, velocity_kmh: f64) -> f64 {
        (self.a * velocity_kmh * velocity_kmh + self.b * velocity_kmh + self.c) * POWER_CURVE_SCALE
    }
}

/// Travel targets for one day type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTypeTarget {
    /// Total distance driven per day (km)
    pub distance_km: f64,
    /// Minimum distance per trip (km)
    pub trip_distance_km: f64,
    /// Driving time per trip (min)
    pub trip_duration_min: f64,
    /// Distance variability ratio
    pub distance_variability: f64,
    /// Velocity variability ratio
    pub velocity_variability: f64,
}

impl DayTypeTarget {
    /// Nominal trip velocity (km/h) implied by the trip distance and duration
    pub fn nominal_velocity_kmh(&self) -> f64 {
        if self.trip_duration_min <= 0.0 {
            return MIN_TRIP_VELOCITY_KMH;
        }
        self.trip_distance_km / self.trip_duration_min * 60.0
    }
}

/// Everything the demand generator and the charge simulator need to know about
/// one vehicle and its driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub size: VehicleSize,
    pub battery_capacity_kwh: f64,
    pub power_curve: PowerCurve,
    pub targets: DayTypeTable<DayTypeTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BE", CountryCode::Be)]
    #[case("el", CountryCode::El)]
    #[case(" uk ", CountryCode::Uk)]
    fn test_country_parse(#[case] raw: &str, #[case] expected: CountryCode) {
        assert_eq!(CountryCode::parse(raw).unwrap(), expected);
    }

    #[test]
    fn test_country_unsupported() {
        assert_eq!(
            CountryCode::parse("XX"),
            Err(ConfigError::UnsupportedCountry("XX".to_string()))
        );
    }

    #[test]
    fn test_country_display() {
        assert_eq!(CountryCode::Nl.to_string(), "NL");
    }

    #[rstest]
    #[case(UsageCategory::Short, 0.5)]
    #[case(UsageCategory::Normal, 1.0)]
    #[case(UsageCategory::Long, 2.0)]
    fn test_usage_scale(#[case] usage: UsageCategory, #[case] scale: f64) {
        assert_eq!(usage.scale(), scale);
    }

    #[test]
    fn test_power_curve() {
        // medium car at 40 km/h: (0.3*1600 - 14*40 + 600) * 12 / 1000
        let curve = PowerCurve::new(0.3, -14.0, 600.0);
        assert!((curve.power_kw(40.0) - 6.24).abs() < 1e-9);
    }

    #[test]
    fn test_nominal_velocity() {
        let target = DayTypeTarget {
            distance_km: 40.0,
            trip_distance_km: 15.0,
            trip_duration_min: 20.0,
            distance_variability: 0.3,
            velocity_variability: 0.3,
        };
        assert!((target.nominal_velocity_kmh() - 45.0).abs() < 1e-9);
    }
}
