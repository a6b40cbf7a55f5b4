use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use super::{ConfigError, MINUTES_PER_DAY};

/// Travel demand sampled for one simulated day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyDemand {
    /// Energy consumed by travel (kWh)
    pub energy_kwh: f64,
    /// Distance driven (km)
    pub distance_km: f64,
    /// Driving time (min)
    pub duration_min: u32,
}

/// Per-minute output of the charge/discharge simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvProfile {
    /// State of charge, 0 while the vehicle is away
    pub soc: Vec<f64>,
    /// Home charger drawing power
    pub charging: Vec<bool>,
    /// Away-charge events, as a fraction of battery capacity, at the trip midpoint
    pub away_charge: Vec<f64>,
    /// Home charging power (kW)
    pub load_kw: Vec<f64>,
}

impl EvProfile {
    pub fn with_days(nb_days: usize) -> Self {
        let minutes = nb_days * MINUTES_PER_DAY;
        Self {
            soc: Vec::with_capacity(minutes),
            charging: Vec::with_capacity(minutes),
            away_charge: Vec::with_capacity(minutes),
            load_kw: Vec::with_capacity(minutes),
        }
    }

    pub fn len(&self) -> usize {
        self.soc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soc.is_empty()
    }

    /// Energy drawn from the home charger over the horizon (kWh)
    pub fn home_energy_kwh(&self) -> f64 {
        self.load_kw.iter().sum::<f64>() / 60.0
    }

    pub fn away_charge_events(&self) -> usize {
        self.away_charge.iter().filter(|e| **e > 0.0).count()
    }

    /// Smallest and largest SOC observed while the vehicle was present
    pub fn soc_range(&self) -> Option<(f64, f64)> {
        match self.soc.iter().copied().filter(|s| *s > 0.0).minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(s) => Some((s, s)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }

    /// Mean load over consecutive `step_minutes` buckets (kW)
    pub fn resample_load(&self, step_minutes: usize) -> Result<Vec<f64>, ConfigError> {
        if step_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "output.resample_minutes",
                reason: "must be positive".to_string(),
            });
        }
        Ok(self
            .load_kw
            .chunks(step_minutes)
            .map(|bucket| bucket.iter().sum::<f64>() / bucket.len() as f64)
            .collect())
    }
}

/// Headline figures of one vehicle run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub nb_days: usize,
    pub travel_energy_kwh: f64,
    pub travel_distance_km: f64,
    pub home_energy_kwh: f64,
    pub away_charge_events: usize,
    pub min_soc: Option<f64>,
    pub max_soc: Option<f64>,
}

impl RunSummary {
    pub fn new(demand: &[DailyDemand], profile: &EvProfile) -> Self {
        let range = profile.soc_range();
        Self {
            nb_days: demand.len(),
            travel_energy_kwh: demand.iter().map(|d| d.energy_kwh).sum(),
            travel_distance_km: demand.iter().map(|d| d.distance_km).sum(),
            home_energy_kwh: profile.home_energy_kwh(),
            away_charge_events: profile.away_charge_events(),
            min_soc: range.map(|(lo, _)| lo),
            max_soc: range.map(|(_, hi)| hi),
        }
    }
}
