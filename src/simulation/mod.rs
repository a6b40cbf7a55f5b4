//! # EV Load-Profile Simulation
//!
//! Turns a household occupancy series into the charging load of its electric
//! vehicle.
//!
//! ## Components
//!
//! - **Calendar**: weekday / Saturday / Sunday-or-holiday labels for a year
//! - **Driver**: per-day-type travel targets for a vehicle size, usage and country
//! - **Travel**: stochastic daily distance, driving time and traction energy
//! - **Charging**: minute-by-minute SOC, home charging flag and away charges
//! - **Ownership**: whether a household has an EV, and which one
//!
//! ## Usage
//!
//! ```rust
//! use ev_load_profile::data::BuiltinTables;
//! use ev_load_profile::domain::{CountryCode, OccupancySeries, Usage, UsageCategory, VehicleSize};
//! use ev_load_profile::simulation::{run_vehicle, seeded_rng, DriverConfig, VehicleRunConfig};
//!
//! let driver = DriverConfig {
//!     size: VehicleSize::Medium,
//!     usage: Usage::Category(UsageCategory::Normal),
//!     country: CountryCode::Be,
//! };
//! let config = VehicleRunConfig::new(2025, 0, 2, driver);
//! let occupancy = OccupancySeries::always_home(2).with_away(480, 540);
//!
//! let mut rng = seeded_rng(Some(42));
//! let run = run_vehicle(&config, &BuiltinTables, &occupancy, &mut rng)?;
//! assert_eq!(run.profile.load_kw.len(), 2 * 1440);
//! # Ok::<(), ev_load_profile::domain::SimulationError>(())
//! ```

pub mod calendar;
pub mod charging;
pub mod driver;
pub mod holidays;
pub mod ownership;
pub mod runner;
pub mod sampling;
pub mod travel;

pub use calendar::YearCalendar;
pub use charging::{
    charge_probability, detect_departures, AwayChargePolicy, BatteryLimits, ChargeSimulator,
    ChargingParams, DaySchedule, Departure,
};
pub use driver::{build_vehicle_profile, DriverConfig};
pub use ownership::{EvOwnership, OwnershipConfig, OwnershipSampler, CHARGER_POWERS_KW};
pub use runner::{run_vehicle, EvRun, VehicleRunConfig};
pub use sampling::{seeded_rng, uniform_between};
pub use travel::TravelDemandGenerator;
