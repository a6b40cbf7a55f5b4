use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use validator::Validate;

use crate::domain::{ConfigError, CountryCode, Usage, UsageCategory, VehicleSize};
use crate::simulation::{
    AwayChargePolicy, BatteryLimits, DriverConfig, OwnershipConfig, OwnershipSampler,
    VehicleRunConfig,
};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub simulation: SimulationConfig,
    #[validate(nested)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    #[validate(nested)]
    pub battery: BatteryConfig,
    #[serde(default)]
    #[validate(nested)]
    pub occupancy: OccupancyConfig,
    #[serde(default)]
    pub ownership: OwnershipSection,
    #[serde(default)]
    #[validate(nested)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SimulationConfig {
    #[validate(range(min = 1583, max = 9999))]
    pub year: i32,
    pub country: String,
    #[serde(default)]
    pub start_day: usize,
    #[validate(range(min = 1, max = 366))]
    pub nb_days: usize,
    pub seed: Option<u64>,
    #[serde(default = "default_fallback_country")]
    pub holiday_fallback_country: String,
}

fn default_fallback_country() -> String {
    "BE".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleConfig {
    pub size: String,
    pub usage: String,
    /// Overrides `usage` when above 1 km
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub km_per_year: f64,
    #[validate(range(min = 0.0, max = 350.0))]
    pub charger_power_kw: f64,
    #[serde(default = "default_initial_soc")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub initial_soc: f64,
}

fn default_initial_soc() -> f64 {
    0.9
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct BatteryConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    pub soc_min: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub soc_max: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub efficiency: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub tolerance: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        let limits = BatteryLimits::default();
        Self {
            soc_min: limits.soc_min,
            soc_max: limits.soc_max,
            efficiency: limits.efficiency,
            tolerance: limits.tolerance,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct OccupancyConfig {
    /// JSON array of activity codes; always at home when unset
    pub path: Option<PathBuf>,
    #[validate(range(min = 1))]
    pub resolution_minutes: usize,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            path: None,
            resolution_minutes: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OwnershipSection {
    pub enabled: bool,
    pub presence: f64,
    pub size: [f64; 3],
    pub usage: [f64; 3],
    pub charger_power: [f64; 4],
}

impl Default for OwnershipSection {
    fn default() -> Self {
        let probabilities = OwnershipConfig::default();
        Self {
            enabled: false,
            presence: probabilities.presence,
            size: probabilities.size,
            usage: probabilities.usage,
            charger_power: probabilities.charger_power,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Written to stdout when unset
    pub path: Option<PathBuf>,
    #[validate(range(min = 1, max = 1440))]
    pub resample_minutes: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            resample_minutes: 1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("EVLP__").split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate().map_err(ConfigError::from)?;
        Ok(config)
    }

    pub fn run_config(&self) -> Result<VehicleRunConfig, ConfigError> {
        let sim = &self.simulation;
        let vehicle = &self.vehicle;

        let usage = if vehicle.km_per_year > 1.0 {
            Usage::AnnualDistance(vehicle.km_per_year)
        } else {
            Usage::Category(parse_enum::<UsageCategory>("vehicle.usage", &vehicle.usage)?)
        };
        let driver = DriverConfig {
            size: parse_enum::<VehicleSize>("vehicle.size", &vehicle.size)?,
            usage,
            country: CountryCode::parse(&sim.country)?,
        };

        Ok(VehicleRunConfig {
            holiday_fallback: CountryCode::parse(&sim.holiday_fallback_country)?,
            charger_power_kw: vehicle.charger_power_kw,
            initial_soc: vehicle.initial_soc,
            limits: BatteryLimits {
                soc_min: self.battery.soc_min,
                soc_max: self.battery.soc_max,
                efficiency: self.battery.efficiency,
                tolerance: self.battery.tolerance,
            },
            policy: AwayChargePolicy::default(),
            ..VehicleRunConfig::new(sim.year, sim.start_day, sim.nb_days, driver)
        })
    }

    /// Household EV sampler, when ownership sampling is enabled
    pub fn ownership_sampler(&self) -> Result<Option<OwnershipSampler>, ConfigError> {
        let section = &self.ownership;
        if !section.enabled {
            return Ok(None);
        }
        OwnershipSampler::new(&OwnershipConfig {
            presence: section.presence,
            size: section.size,
            usage: section.usage,
            charger_power: section.charger_power,
        })
        .map(Some)
    }
}

fn parse_enum<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("unknown value `{raw}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Serialized;

    fn shipped() -> Figment {
        Figment::new().merge(Toml::string(include_str!("../config/default.toml")))
    }

    #[test]
    fn test_shipped_defaults_parse() {
        let config = Config::from_figment(shipped()).unwrap();
        let run = config.run_config().unwrap();
        assert_eq!(run.driver.country, CountryCode::Be);
        assert_eq!(run.driver.size, VehicleSize::Medium);
        assert_eq!(run.limits, BatteryLimits::default());
        assert!(config.ownership_sampler().unwrap().is_none());
    }

    #[test]
    fn test_annual_distance_overrides_usage() {
        let figment = shipped().merge(Serialized::default("vehicle.km_per_year", 15_000.0));
        let run = Config::from_figment(figment).unwrap().run_config().unwrap();
        assert_eq!(run.driver.usage, Usage::AnnualDistance(15_000.0));
    }

    #[test]
    fn test_enum_fields_case_insensitive() {
        let figment = shipped()
            .merge(Serialized::default("vehicle.size", "Large"))
            .merge(Serialized::default("simulation.country", "de"));
        let run = Config::from_figment(figment).unwrap().run_config().unwrap();
        assert_eq!(run.driver.size, VehicleSize::Large);
        assert_eq!(run.driver.country, CountryCode::De);
    }

    #[test]
    fn test_unknown_size_rejected() {
        let figment = shipped().merge(Serialized::default("vehicle.size", "huge"));
        let err = Config::from_figment(figment).unwrap().run_config().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "vehicle.size", .. }));
    }

    #[test]
    fn test_out_of_range_soc_rejected() {
        let figment = shipped().merge(Serialized::default("battery.soc_max", 1.5));
        assert!(Config::from_figment(figment).is_err());
    }

    #[test]
    fn test_ownership_vectors_checked() {
        let figment = shipped()
            .merge(Serialized::default("ownership.enabled", true))
            .merge(Serialized::default("ownership.size", [0.5, 0.5, 0.5]));
        let config = Config::from_figment(figment).unwrap();
        assert!(matches!(
            config.ownership_sampler(),
            Err(ConfigError::Probabilities { name: "ownership.size", .. })
        ));
    }
}
