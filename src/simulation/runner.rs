//! # Vehicle Run
//!
//! Chains the calendar, the vehicle profile, the travel demand and the charge
//! simulation for one vehicle.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::calendar::YearCalendar;
use super::charging::{AwayChargePolicy, BatteryLimits, ChargeSimulator, ChargingParams};
use super::driver::{build_vehicle_profile, DriverConfig};
use super::ownership::EvOwnership;
use super::travel::TravelDemandGenerator;
use crate::data::StatisticsProvider;
use crate::domain::{
    CountryCode, DailyDemand, DayType, EvProfile, OccupancySeries, RunSummary, SimulationError,
    Usage, VehicleProfile,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRunConfig {
    pub year: i32,
    /// First simulated day of the year (0-based)
    pub start_day: usize,
    pub nb_days: usize,
    /// Holiday calendar used when the driver's country has none
    pub holiday_fallback: CountryCode,
    pub driver: DriverConfig,
    pub charger_power_kw: f64,
    pub initial_soc: f64,
    pub limits: BatteryLimits,
    pub policy: AwayChargePolicy,
}

impl VehicleRunConfig {
    pub fn new(year: i32, start_day: usize, nb_days: usize, driver: DriverConfig) -> Self {
        Self {
            year,
            start_day,
            nb_days,
            holiday_fallback: CountryCode::Be,
            driver,
            charger_power_kw: 7.4,
            initial_soc: 0.9,
            limits: BatteryLimits::default(),
            policy: AwayChargePolicy::default(),
        }
    }

    /// Replace vehicle, usage and charger with a sampled household EV. An
    /// annual distance target stays in force.
    pub fn with_ownership(mut self, ev: &EvOwnership) -> Self {
        self.driver.size = ev.size;
        if let Usage::Category(_) = self.driver.usage {
            self.driver.usage = Usage::Category(ev.usage);
        }
        self.charger_power_kw = ev.charger_power_kw;
        self
    }
}

/// Everything produced for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvRun {
    pub vehicle: VehicleProfile,
    pub day_types: Vec<DayType>,
    pub demand: Vec<DailyDemand>,
    pub profile: EvProfile,
    pub summary: RunSummary,
}

pub fn run_vehicle<R: Rng + ?Sized>(
    config: &VehicleRunConfig,
    provider: &dyn StatisticsProvider,
    occupancy: &OccupancySeries,
    rng: &mut R,
) -> Result<EvRun, SimulationError> {
    occupancy.ensure_covers(config.nb_days)?;

    let country = config.driver.country;
    let calendar = YearCalendar::classify(config.year, country, config.holiday_fallback)?;
    let day_types = calendar.window(config.start_day, config.nb_days)?;

    let vehicle = build_vehicle_profile(&config.driver, provider)?;
    let simulator = ChargeSimulator::new(ChargingParams {
        battery_capacity_kwh: vehicle.battery_capacity_kwh,
        charger_power_kw: config.charger_power_kw,
        initial_soc: config.initial_soc,
        limits: config.limits,
        policy: config.policy,
    })?;

    info!(
        year = config.year,
        %country,
        holiday_country = %calendar.holiday_country,
        start_day = config.start_day,
        nb_days = config.nb_days,
        size = %vehicle.size,
        charger_kw = config.charger_power_kw,
        "simulating EV"
    );

    let demand = TravelDemandGenerator::new(&vehicle).generate_for(&day_types, rng);
    let profile = simulator.simulate(&demand, occupancy, rng)?;
    let summary = RunSummary::new(&demand, &profile);

    info!(
        travel_kwh = summary.travel_energy_kwh,
        home_kwh = summary.home_energy_kwh,
        away_charges = summary.away_charge_events,
        "EV simulation complete"
    );

    Ok(EvRun {
        vehicle,
        day_types,
        demand,
        profile,
        summary,
    })
}
