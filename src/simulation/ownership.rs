//! # EV Ownership Sampler
//!
//! Decides whether a household owns an electric vehicle and, if so, draws its
//! size class, driving intensity and home charger power.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ConfigError, UsageCategory, VehicleSize};

/// Home charger ratings (kW) the sampler chooses from
pub const CHARGER_POWERS_KW: [f64; 4] = [3.7, 7.4, 11.0, 22.0];

const SIZES: [VehicleSize; 3] = [VehicleSize::Small, VehicleSize::Medium, VehicleSize::Large];
const USAGES: [UsageCategory; 3] = [
    UsageCategory::Short,
    UsageCategory::Normal,
    UsageCategory::Long,
];

const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipConfig {
    /// Probability that a household owns an EV
    pub presence: f64,
    /// Small, medium, large
    pub size: [f64; 3],
    /// Short, normal, long
    pub usage: [f64; 3],
    /// 3.7, 7.4, 11 and 22 kW
    pub charger_power: [f64; 4],
}

impl Default for OwnershipConfig {
    fn default() -> Self {
        Self {
            presence: 1.0,
            size: [0.3, 0.5, 0.2],
            usage: [0.25, 0.5, 0.25],
            charger_power: [0.3, 0.5, 0.15, 0.05],
        }
    }
}

/// Vehicle drawn for one household
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvOwnership {
    pub size: VehicleSize,
    pub usage: UsageCategory,
    pub charger_power_kw: f64,
}

#[derive(Debug, Clone)]
pub struct OwnershipSampler {
    presence: f64,
    size: WeightedIndex<f64>,
    usage: WeightedIndex<f64>,
    charger_power: WeightedIndex<f64>,
}

impl OwnershipSampler {
    pub fn new(config: &OwnershipConfig) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&config.presence) {
            return Err(ConfigError::Invalid {
                name: "ownership.presence",
                reason: format!("must be in [0, 1], got {}", config.presence),
            });
        }
        Ok(Self {
            presence: config.presence,
            size: weights("ownership.size", &config.size)?,
            usage: weights("ownership.usage", &config.usage)?,
            charger_power: weights("ownership.charger_power", &config.charger_power)?,
        })
    }

    /// `None` when the household has no EV
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EvOwnership> {
        if rng.gen::<f64>() > self.presence {
            debug!("household without EV");
            return None;
        }
        let ownership = EvOwnership {
            size: SIZES[self.size.sample(rng)],
            usage: USAGES[self.usage.sample(rng)],
            charger_power_kw: CHARGER_POWERS_KW[self.charger_power.sample(rng)],
        };
        debug!(
            size = %ownership.size,
            usage = %ownership.usage,
            charger_kw = ownership.charger_power_kw,
            "EV drawn"
        );
        Some(ownership)
    }
}

fn weights(name: &'static str, probabilities: &[f64]) -> Result<WeightedIndex<f64>, ConfigError> {
    let sum: f64 = probabilities.iter().sum();
    let in_range = probabilities.iter().all(|p| (0.0..=1.0).contains(p));
    if !in_range || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ConfigError::Probabilities { name, sum });
    }
    WeightedIndex::new(probabilities).map_err(|_| ConfigError::Probabilities { name, sum })
}
