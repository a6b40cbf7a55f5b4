//! # Daily Travel Demand Generator
//!
//! Samples the distance, duration and traction energy of each simulated day from
//! the day-type targets of a [`VehicleProfile`].

use rand::Rng;
use tracing::debug;

use super::calendar::YearCalendar;
use super::sampling::uniform_between;
use crate::domain::{
    ConfigError, DailyDemand, DayType, DayTypeTarget, VehicleProfile, MIN_TRIP_VELOCITY_KMH,
};

pub struct TravelDemandGenerator<'a> {
    profile: &'a VehicleProfile,
}

impl<'a> TravelDemandGenerator<'a> {
    pub fn new(profile: &'a VehicleProfile) -> Self {
        Self { profile }
    }

    /// Demand for `nb_days` days starting at `start_day` of the calendar year
    pub fn generate<R: Rng + ?Sized>(
        &self,
        calendar: &YearCalendar,
        start_day: usize,
        nb_days: usize,
        rng: &mut R,
    ) -> Result<Vec<DailyDemand>, ConfigError> {
        let day_types = calendar.window(start_day, nb_days)?;
        Ok(self.generate_for(&day_types, rng))
    }

    /// Demand for an explicit day-type sequence
    pub fn generate_for<R: Rng + ?Sized>(&self, day_types: &[DayType], rng: &mut R) -> Vec<DailyDemand> {
        day_types
            .iter()
            .enumerate()
            .map(|(day, day_type)| {
                let demand = self.sample_day(self.profile.targets.get(*day_type), rng);
                debug!(
                    day,
                    %day_type,
                    energy_kwh = demand.energy_kwh,
                    distance_km = demand.distance_km,
                    duration_min = demand.duration_min,
                    "travel demand sampled"
                );
                demand
            })
            .collect()
    }

    fn sample_day<R: Rng + ?Sized>(&self, target: &DayTypeTarget, rng: &mut R) -> DailyDemand {
        let velocity_scale = uniform_between(rng, 1.0, 1.0 + target.velocity_variability);
        let distance_scale = uniform_between(rng, 1.0, 1.0 + target.distance_variability);

        let distance_km = (target.distance_km * distance_scale).round();

        let nominal_velocity = target.nominal_velocity_kmh();
        let velocity_kmh = (nominal_velocity * velocity_scale)
            .round()
            .max(MIN_TRIP_VELOCITY_KMH);

        let duration_min = (distance_km / velocity_kmh * 60.0).round().max(0.0) as u32;
        let power_kw = self.profile.power_curve.power_kw(velocity_kmh);
        let energy_kwh = power_kw * f64::from(duration_min) / 60.0;

        DailyDemand {
            energy_kwh,
            distance_km,
            duration_min,
        }
    }
}
