//! # Occupancy-Driven Charge/Discharge Simulator
//!
//! Minute-by-minute state of charge of one vehicle over a multi-day horizon.
//!
//! ## States
//!
//! - **Home idle / charging / full**: the vehicle sits on the home charger and
//!   tops up at nominal power until `soc_max`, then stops for the rest of the
//!   stay (no trickle charging).
//! - **Away travelling / charging**: the day's travel energy is split across
//!   departures. A departure may include an opportunistic charge, decided when
//!   it opens and accounted at its midpoint.
//!
//! The closing SOC of a day is the opening SOC of the next.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sampling::uniform_between;
use crate::domain::{
    ConfigError, DailyDemand, EvProfile, InvariantViolation, OccupancySeries, SimulationError,
    MINUTES_PER_DAY,
};

/// Usable SOC window and charging efficiency of the battery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryLimits {
    pub soc_min: f64,
    pub soc_max: f64,
    /// Share of charger energy that reaches the battery
    pub efficiency: f64,
    /// Relative margin below `soc_min` tolerated at arrival
    pub tolerance: f64,
}

impl Default for BatteryLimits {
    fn default() -> Self {
        Self {
            soc_min: 0.1,
            soc_max: 0.9,
            efficiency: 0.9,
            tolerance: 0.5,
        }
    }
}

impl BatteryLimits {
    /// Lowest acceptable arrival SOC
    pub fn arrival_floor(&self) -> f64 {
        self.soc_min * (1.0 - self.tolerance)
    }
}

/// Opportunistic charging behaviour during departures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AwayChargePolicy {
    /// Share of the departure spent charging
    pub time_ratio: f64,
    /// Relative variability of the charging time
    pub time_variability: f64,
    /// Relative variability of the energy split between departures
    pub split_variability: f64,
    /// Shorter absences do not use the vehicle
    pub min_departure_minutes: usize,
}

impl Default for AwayChargePolicy {
    fn default() -> Self {
        Self {
            time_ratio: 0.30,
            time_variability: 0.05,
            split_variability: 0.25,
            min_departure_minutes: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargingParams {
    pub battery_capacity_kwh: f64,
    pub charger_power_kw: f64,
    /// SOC at the first minute of the horizon
    pub initial_soc: f64,
    pub limits: BatteryLimits,
    pub policy: AwayChargePolicy,
}

impl ChargingParams {
    pub fn new(battery_capacity_kwh: f64, charger_power_kw: f64) -> Self {
        Self {
            battery_capacity_kwh,
            charger_power_kw,
            initial_soc: 0.9,
            limits: BatteryLimits::default(),
            policy: AwayChargePolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        let policy = &self.policy;
        check(
            "battery_capacity_kwh",
            self.battery_capacity_kwh.is_finite() && self.battery_capacity_kwh > 0.0,
            "must be positive",
        )?;
        check(
            "charger_power_kw",
            self.charger_power_kw.is_finite() && self.charger_power_kw > 0.0,
            "must be positive",
        )?;
        check(
            "battery.soc_min",
            limits.soc_min >= 0.0 && limits.soc_min < limits.soc_max,
            "must be in [0, soc_max)",
        )?;
        check(
            "battery.soc_max",
            limits.soc_max <= 1.0,
            "must not exceed 1",
        )?;
        check(
            "battery.efficiency",
            limits.efficiency > 0.0 && limits.efficiency <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "battery.tolerance",
            (0.0..=1.0).contains(&limits.tolerance),
            "must be in [0, 1]",
        )?;
        check(
            "vehicle.initial_soc",
            self.initial_soc >= limits.arrival_floor() && self.initial_soc <= limits.soc_max,
            "must be in [soc_min * (1 - tolerance), soc_max]",
        )?;
        check(
            "away_charge.time_ratio",
            (0.0..=1.0).contains(&policy.time_ratio),
            "must be in [0, 1]",
        )?;
        check(
            "away_charge.variability",
            (0.0..1.0).contains(&policy.time_variability)
                && (0.0..1.0).contains(&policy.split_variability),
            "must be in [0, 1)",
        )?;
        check(
            "away_charge.min_departure_minutes",
            policy.min_departure_minutes > 0,
            "must be positive",
        )
    }

    /// SOC gained per minute on the home charger
    fn home_step(&self) -> f64 {
        self.charger_power_kw / 60.0 * self.limits.efficiency / self.battery_capacity_kwh
    }
}

fn check(name: &'static str, ok: bool, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            reason: reason.to_string(),
        })
    }
}

/// A closed absence long enough to use the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// First away minute of the day
    pub start: usize,
    pub duration: usize,
}

impl Departure {
    /// First minute back home
    pub fn arrival(&self) -> usize {
        self.start + self.duration
    }

    /// Minute at which an away charge is accounted
    pub fn midpoint(&self) -> usize {
        (self.start as f64 + self.duration as f64 / 2.0).round() as usize
    }
}

/// Away intervals of one day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    pub departures: Vec<Departure>,
    /// Absences too short to use the vehicle
    pub short_absences: Vec<Range<usize>>,
    /// Start of an absence still running at the end of the day
    pub open_from: Option<usize>,
}

impl DaySchedule {
    pub fn total_away_minutes(&self) -> usize {
        self.departures.iter().map(|d| d.duration).sum()
    }

    /// Away minutes carried into the next day, counting those carried in when
    /// the whole day was away.
    fn away_at_midnight(&self, day_len: usize, carried_away_minutes: usize) -> usize {
        match self.open_from {
            Some(0) => carried_away_minutes + day_len,
            Some(start) => day_len - start,
            None => 0,
        }
    }
}

/// Split one day of home/away flags into departures.
///
/// An absence running at minute 0 opens there and continues the
/// `carried_away_minutes` already spent away before midnight, which count
/// towards the minimum departure length.
pub fn detect_departures(
    day: &[bool],
    min_departure_minutes: usize,
    carried_away_minutes: usize,
) -> DaySchedule {
    let mut schedule = DaySchedule::default();
    let mut leave: Option<usize> = None;

    for (minute, home) in day.iter().enumerate() {
        match (leave, *home) {
            (None, false) => leave = Some(minute),
            (Some(start), true) => {
                let duration = minute - start;
                let elapsed = if start == 0 { carried_away_minutes } else { 0 };
                if duration + elapsed >= min_departure_minutes {
                    schedule.departures.push(Departure { start, duration });
                } else {
                    schedule.short_absences.push(start..minute);
                }
                leave = None;
            }
            _ => {}
        }
    }
    schedule.open_from = leave;
    schedule
}

/// Probability of charging away from home, as a function of the energy a
/// departure needs and the energy on board when it starts.
pub fn charge_probability(required_kwh: f64, available_kwh: f64) -> f64 {
    if available_kwh <= 0.0 {
        return if required_kwh > 0.0 { 1.0 } else { 0.0 };
    }
    let ratio = required_kwh / available_kwh;
    if ratio > 1.0 {
        1.0
    } else if ratio < 0.1 {
        0.0
    } else {
        ratio
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// State handed from one day to the next
#[derive(Debug, Clone, Copy)]
struct Carry {
    soc: f64,
    /// Away minutes of a departure still open at midnight
    away_minutes: usize,
}

/// Departure currently in progress
#[derive(Debug, Clone, Copy)]
struct Trip {
    arrival: usize,
    soc_at_departure: f64,
    remaining_kwh: f64,
}

pub struct ChargeSimulator {
    params: ChargingParams,
}

impl ChargeSimulator {
    pub fn new(params: ChargingParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ChargingParams {
        &self.params
    }

    /// Simulate one day per demand record over the matching occupancy days
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        demand: &[DailyDemand],
        occupancy: &OccupancySeries,
        rng: &mut R,
    ) -> Result<EvProfile, SimulationError> {
        let nb_days = demand.len();
        occupancy.ensure_covers(nb_days)?;

        let mut profile = EvProfile::with_days(nb_days);
        let mut carry = Carry {
            soc: self.params.initial_soc,
            away_minutes: 0,
        };

        for (day, daily) in demand.iter().enumerate() {
            let minutes = occupancy.day(day).ok_or(ConfigError::OccupancyTooShort {
                required: nb_days * MINUTES_PER_DAY,
                actual: occupancy.len(),
            })?;
            carry = self.simulate_day(day, daily, minutes, carry, &mut profile, rng)?;
        }

        Ok(profile)
    }

    fn simulate_day<R: Rng + ?Sized>(
        &self,
        day: usize,
        demand: &DailyDemand,
        minutes: &[bool],
        opening: Carry,
        profile: &mut EvProfile,
        rng: &mut R,
    ) -> Result<Carry, SimulationError> {
        let params = &self.params;
        let limits = &params.limits;
        let schedule = detect_departures(
            minutes,
            params.policy.min_departure_minutes,
            opening.away_minutes,
        );
        let total_away = schedule.total_away_minutes() as f64;
        let home_step = params.home_step();

        let offset = profile.len();
        profile.soc.resize(offset + MINUTES_PER_DAY, 0.0);
        profile.charging.resize(offset + MINUTES_PER_DAY, false);
        profile.away_charge.resize(offset + MINUTES_PER_DAY, 0.0);

        let mut soc = opening.soc;
        let mut fully_charged = false;
        let mut trip: Option<Trip> = None;
        let mut departures = schedule.departures.iter().peekable();

        for (minute, home) in minutes.iter().enumerate() {
            let idx = offset + minute;

            if !*home {
                if let Some(departure) = departures.next_if(|d| d.start == minute) {
                    fully_charged = false;
                    let (remaining_kwh, away_charge) =
                        self.plan_trip(day, departure, demand.energy_kwh, total_away, soc, rng)?;
                    if let Some(fraction) = away_charge {
                        profile.away_charge[offset + departure.midpoint()] = fraction;
                    }
                    trip = Some(Trip {
                        arrival: departure.arrival(),
                        soc_at_departure: soc,
                        remaining_kwh,
                    });
                }

                let travelling =
                    trip.is_some() || schedule.open_from.is_some_and(|start| minute >= start);
                // short absences leave the vehicle parked
                profile.soc[idx] = if travelling { 0.0 } else { soc };
                continue;
            }

            if let Some(active) = trip.filter(|t| t.arrival == minute) {
                trip = None;
                soc = active.soc_at_departure
                    - active.remaining_kwh / params.battery_capacity_kwh;
                if soc < limits.arrival_floor() {
                    return Err(InvariantViolation::ArrivalBelowFloor {
                        day,
                        minute,
                        soc,
                        floor: limits.arrival_floor(),
                    }
                    .into());
                }
                fully_charged = soc >= limits.soc_max;
                profile.charging[idx] = !fully_charged;
            } else if minute > 0 && !fully_charged {
                let next = soc + home_step;
                if next > limits.soc_max {
                    soc = limits.soc_max;
                    fully_charged = true;
                } else {
                    soc = next;
                    profile.charging[idx] = true;
                }
            }
            profile.soc[idx] = soc;
        }

        let charger = params.charger_power_kw;
        profile.load_kw.extend(
            profile.charging[offset..]
                .iter()
                .map(|on| if *on { charger } else { 0.0 }),
        );

        debug!(
            day,
            departures = schedule.departures.len(),
            short_absences = schedule.short_absences.len(),
            open_at_end = schedule.open_from.is_some(),
            closing_soc = soc,
            "day simulated"
        );
        Ok(Carry {
            soc,
            away_minutes: schedule.away_at_midnight(minutes.len(), opening.away_minutes),
        })
    }

    /// Energy share of a departure and its optional away charge.
    ///
    /// Returns the energy still drawn from the battery and the charged energy
    /// as a fraction of capacity.
    fn plan_trip<R: Rng + ?Sized>(
        &self,
        day: usize,
        departure: &Departure,
        day_energy_kwh: f64,
        total_away_minutes: f64,
        soc: f64,
        rng: &mut R,
    ) -> Result<(f64, Option<f64>), InvariantViolation> {
        let params = &self.params;
        let policy = &params.policy;
        let limits = &params.limits;
        let capacity = params.battery_capacity_kwh;

        let share = departure.duration as f64 / total_away_minutes;
        let split = uniform_between(
            rng,
            1.0 - policy.split_variability,
            1.0 + policy.split_variability,
        );
        let spent_kwh = day_energy_kwh * round2(share * split);

        let leaving_kwh = soc * capacity;
        let probability = charge_probability(spent_kwh, leaving_kwh);
        if rng.gen::<f64>() >= probability {
            return Ok((spent_kwh, None));
        }

        let time_factor = uniform_between(
            rng,
            1.0 - policy.time_variability,
            1.0 + policy.time_variability,
        );
        let charge_minutes = (policy.time_ratio * departure.duration as f64 * time_factor).round();
        let mut charged_kwh = params.charger_power_kw / 60.0 * charge_minutes * limits.efficiency;

        let arriving_kwh = leaving_kwh - spent_kwh + charged_kwh;
        if arriving_kwh < limits.soc_min * capacity {
            charged_kwh = limits.soc_min * capacity + spent_kwh - leaving_kwh;
        } else if arriving_kwh > limits.soc_max * capacity {
            // charged at mid-journey, so half the trip still drains the battery
            charged_kwh = limits.soc_max * capacity - leaving_kwh + spent_kwh / 2.0;
        }

        let remaining_kwh = spent_kwh - charged_kwh;
        if remaining_kwh < 0.0 {
            return Err(InvariantViolation::NegativeTripEnergy {
                day,
                minute: departure.start,
                remaining_kwh,
            });
        }

        debug!(
            day,
            start = departure.start,
            end = departure.arrival(),
            charged_kwh,
            charged_pct = 100.0 * charged_kwh / capacity,
            "away charge"
        );
        Ok((remaining_kwh, Some(charged_kwh / capacity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    const STEP_7_4: f64 = 7.4 / 60.0 * 0.9 / 60.0;

    fn params(initial_soc: f64) -> ChargingParams {
        ChargingParams {
            initial_soc,
            ..ChargingParams::new(60.0, 7.4)
        }
    }

    fn demand(energy_kwh: f64) -> DailyDemand {
        DailyDemand {
            energy_kwh,
            distance_km: 0.0,
            duration_min: 0,
        }
    }

    fn run(
        params: ChargingParams,
        demand: &[DailyDemand],
        occupancy: &OccupancySeries,
        seed: u64,
    ) -> Result<EvProfile, SimulationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        ChargeSimulator::new(params)?.simulate(demand, occupancy, &mut rng)
    }

    #[rstest]
    #[case(0.5, 10.0, 0.0)]
    #[case(1.0, 10.0, 0.1)]
    #[case(5.0, 10.0, 0.5)]
    #[case(10.0, 10.0, 1.0)]
    #[case(15.0, 10.0, 1.0)]
    #[case(1.0, 0.0, 1.0)]
    fn test_charge_probability(#[case] required: f64, #[case] available: f64, #[case] p: f64) {
        assert!((charge_probability(required, available) - p).abs() < 1e-12);
    }

    #[test]
    fn test_nine_minute_absence_discarded() {
        let mut day = vec![true; MINUTES_PER_DAY];
        day[100..109].fill(false);
        day[500..510].fill(false);
        let schedule = detect_departures(&day, 10, 0);
        assert_eq!(
            schedule.departures,
            vec![Departure {
                start: 500,
                duration: 10
            }]
        );
        assert_eq!(schedule.short_absences, vec![100..109]);
        assert_eq!(schedule.total_away_minutes(), 10);
        assert_eq!(schedule.open_from, None);
    }

    #[test]
    fn test_absence_at_day_start_and_end() {
        let mut day = vec![true; MINUTES_PER_DAY];
        day[..30].fill(false);
        day[1400..].fill(false);
        let schedule = detect_departures(&day, 10, 0);
        assert_eq!(schedule.departures[0], Departure { start: 0, duration: 30 });
        assert_eq!(schedule.open_from, Some(1400));
    }

    #[test]
    fn test_minutes_before_midnight_count_towards_departure() {
        let mut day = vec![true; MINUTES_PER_DAY];
        day[..5].fill(false);

        let continued = detect_departures(&day, 10, 40);
        assert_eq!(continued.departures, vec![Departure { start: 0, duration: 5 }]);
        assert!(continued.short_absences.is_empty());

        let fresh = detect_departures(&day, 10, 0);
        assert!(fresh.departures.is_empty());
        assert_eq!(fresh.short_absences, vec![0..5]);

        let too_short = detect_departures(&day, 10, 4);
        assert_eq!(too_short.short_absences, vec![0..5]);
    }

    #[test]
    fn test_home_all_day_charges_to_ceiling() {
        let occ = OccupancySeries::always_home(1);
        let profile = run(params(0.5), &[demand(0.0)], &occ, 1).unwrap();

        assert_eq!(profile.soc[0], 0.5);
        assert!(!profile.charging[0]);
        for t in 1..=216 {
            assert!((profile.soc[t] - profile.soc[t - 1] - STEP_7_4).abs() < 1e-12);
            assert!(profile.charging[t]);
            assert_eq!(profile.load_kw[t], 7.4);
        }
        assert!(profile.soc[217..].iter().all(|s| *s == 0.9));
        assert!(profile.charging[217..].iter().all(|c| !*c));
        assert_eq!(profile.away_charge_events(), 0);
    }

    #[test]
    fn test_short_departure_never_charges_away() {
        let occ = OccupancySeries::always_home(1).with_away(60, 60);
        let profile = run(params(0.9), &[demand(2.0)], &occ, 3).unwrap();

        assert!(profile.away_charge.iter().all(|e| *e == 0.0));
        assert!(profile.soc[60..120].iter().all(|s| *s == 0.0));
        let arrival = profile.soc[120];
        assert!(arrival < 0.9 && arrival >= 0.9 - 2.5 / 60.0 - 1e-12);
        assert!(profile.charging[120]);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(42)]
    fn test_long_departure_forces_away_charge(#[case] seed: u64) {
        let occ = OccupancySeries::always_home(1).with_away(60, 600);
        let profile = run(params(0.5), &[demand(60.0)], &occ, seed).unwrap();

        assert!(profile.away_charge[360] > 0.0);
        assert_eq!(profile.away_charge_events(), 1);
        assert!(profile.soc[660] >= 0.1 - 1e-12);
    }

    #[test]
    fn test_closing_soc_opens_next_day() {
        let p = ChargingParams {
            limits: BatteryLimits {
                soc_max: 0.62,
                ..BatteryLimits::default()
            },
            ..params(0.5)
        };
        let occ = OccupancySeries::always_home(2);
        let profile = run(p, &[demand(0.0), demand(0.0)], &occ, 9).unwrap();

        assert_eq!(profile.soc[MINUTES_PER_DAY - 1], 0.62);
        assert_eq!(profile.soc[MINUTES_PER_DAY], 0.62);
        assert!(!profile.charging[MINUTES_PER_DAY]);
    }

    #[test]
    fn test_short_absence_holds_soc() {
        let occ = OccupancySeries::always_home(1).with_away(10, 9);
        let profile = run(params(0.5), &[demand(5.0)], &occ, 4).unwrap();

        assert!(profile.soc[10..19].iter().all(|s| *s == profile.soc[9]));
        assert!(profile.charging[10..19].iter().all(|c| !*c));
        assert!((profile.soc[19] - profile.soc[9] - STEP_7_4).abs() < 1e-12);
    }

    #[test]
    fn test_departure_open_across_midnight() {
        let occ = OccupancySeries::always_home(2).with_away(1400, 100);
        let profile = run(params(0.9), &[demand(3.0), demand(3.0)], &occ, 5).unwrap();

        let parked = profile.soc[1399];
        assert!(profile.soc[1400..1500].iter().all(|s| *s == 0.0));
        let arrival = profile.soc[1500];
        assert!(arrival < parked);
        assert!(arrival >= parked - 3.75 / 60.0 - 1e-12);
    }

    #[test]
    fn test_short_tail_after_midnight_still_travels() {
        // 40 minutes before midnight, 5 after
        let occ = OccupancySeries::always_home(2).with_away(1400, 45);
        let profile = run(params(0.9), &[demand(3.0), demand(3.0)], &occ, 1).unwrap();

        assert!(profile.soc[1400..1445].iter().all(|s| *s == 0.0));
        let arrival = profile.soc[1445];
        assert!(arrival < 0.9);
        assert!(arrival >= 0.9 - 3.75 / 60.0 - 1e-12);
        assert!(profile.charging[1445]);
    }

    #[test]
    fn test_open_departure_home_next_day_arrives_unchanged() {
        let occ = OccupancySeries::always_home(2).with_away(1400, 40);
        let profile = run(params(0.9), &[demand(3.0), demand(3.0)], &occ, 6).unwrap();

        assert_eq!(profile.soc[MINUTES_PER_DAY], profile.soc[1399]);
    }

    #[test]
    fn test_whole_day_away() {
        let occ = OccupancySeries::always_home(1).with_away(0, MINUTES_PER_DAY);
        let profile = run(params(0.7), &[demand(10.0)], &occ, 7).unwrap();
        assert!(profile.soc.iter().all(|s| *s == 0.0));
        assert_eq!(profile.home_energy_kwh(), 0.0);
    }

    #[test]
    fn test_negative_trip_energy_is_invariant_violation() {
        // departing below soc_min: the floor correction overshoots the trip
        let occ = OccupancySeries::always_home(1).with_away(0, 600);
        let err = run(params(0.08), &[demand(60.0)], &occ, 11).unwrap_err();
        assert!(err.is_invariant());
        assert!(matches!(
            err,
            SimulationError::Invariant(InvariantViolation::NegativeTripEnergy { minute: 0, .. })
        ));
    }

    #[test]
    fn test_arrival_below_floor_is_invariant_violation() {
        let occ = OccupancySeries::always_home(1).with_away(0, 20);
        let err = run(params(0.052), &[demand(0.2)], &occ, 12).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Invariant(InvariantViolation::ArrivalBelowFloor { minute: 20, .. })
        ));
    }

    #[test]
    fn test_occupancy_must_cover_horizon() {
        let occ = OccupancySeries::always_home(1);
        let err = run(params(0.9), &[demand(1.0), demand(1.0)], &occ, 1).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let p = ChargingParams {
            initial_soc: 0.95,
            ..params(0.9)
        };
        assert!(ChargeSimulator::new(p).is_err());
        assert!(ChargeSimulator::new(ChargingParams::new(0.0, 7.4)).is_err());
    }

    #[rstest]
    #[case(0.04, false)]
    #[case(0.05, true)]
    #[case(0.9, true)]
    fn test_initial_soc_within_arrival_window(#[case] initial_soc: f64, #[case] ok: bool) {
        let result = ChargeSimulator::new(params(initial_soc));
        assert_eq!(result.is_ok(), ok);
        if !ok {
            assert!(matches!(
                result,
                Err(ConfigError::Invalid { name: "vehicle.initial_soc", .. })
            ));
        }
    }

    /// 22 kW charger with deterministic split and charge time: a single
    /// 600-minute departure from midnight charges 180 minutes (59.4 kWh raw).
    fn fast_charger(initial_soc: f64) -> ChargingParams {
        ChargingParams {
            initial_soc,
            policy: AwayChargePolicy {
                split_variability: 0.0,
                time_variability: 0.0,
                ..AwayChargePolicy::default()
            },
            ..ChargingParams::new(60.0, 22.0)
        }
    }

    #[test]
    fn test_away_charge_capped_at_ceiling() {
        // leaves with 54 kWh for a 55 kWh trip, so the charge is certain
        let occ = OccupancySeries::always_home(1).with_away(0, 600);
        let profile = run(fast_charger(0.9), &[demand(55.0)], &occ, 13).unwrap();

        // topped up to the ceiling at mid-journey, the second half still drains
        let charged_kwh = 0.9 * 60.0 - 0.9 * 60.0 + 55.0 / 2.0;
        assert!((profile.away_charge[300] - charged_kwh / 60.0).abs() < 1e-12);
        assert_eq!(profile.away_charge_events(), 1);
        assert!((profile.soc[600] - (0.9 - 55.0 / (2.0 * 60.0))).abs() < 1e-12);
        assert!(profile.charging[600]);
    }

    #[test]
    fn test_ceiling_correction_beyond_trip_is_invariant_violation() {
        // 30 kWh on board for a 30 kWh trip: ceiling - leaving + spent/2 = 39 kWh > 30
        let occ = OccupancySeries::always_home(1).with_away(0, 600);
        let err = run(fast_charger(0.5), &[demand(30.0)], &occ, 14).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Invariant(InvariantViolation::NegativeTripEnergy { minute: 0, .. })
        ));
    }

    /// Day made of home gaps of at least two hours and departures of at most
    /// 100 minutes, ending at home.
    fn day_strategy() -> impl Strategy<Value = (Vec<bool>, f64)> {
        (
            prop::collection::vec((120usize..300, 10usize..=100), 0..=3),
            0.0f64..10.0,
        )
            .prop_map(|(trips, energy)| {
                let mut day = Vec::with_capacity(MINUTES_PER_DAY);
                for (gap, away) in trips {
                    day.extend(std::iter::repeat(true).take(gap));
                    day.extend(std::iter::repeat(false).take(away));
                }
                day.resize(MINUTES_PER_DAY, true);
                (day, energy)
            })
    }

    proptest! {
        #[test]
        fn prop_soc_stays_in_window(
            days in prop::collection::vec(day_strategy(), 1..4),
            seed in any::<u64>(),
        ) {
            let flags: Vec<bool> = days.iter().flat_map(|(d, _)| d.iter().copied()).collect();
            let series: Vec<DailyDemand> = days.iter().map(|(_, e)| demand(*e)).collect();
            let occ = OccupancySeries::from_home_flags(flags);

            let profile = run(params(0.9), &series, &occ, seed).unwrap();
            prop_assert_eq!(profile.len(), series.len() * MINUTES_PER_DAY);

            let floor = BatteryLimits::default().arrival_floor();
            for (t, soc) in profile.soc.iter().enumerate() {
                if occ.is_home(t) {
                    prop_assert!(*soc >= floor && *soc <= 0.9, "soc {} at {}", soc, t);
                } else {
                    prop_assert_eq!(*soc, 0.0);
                    prop_assert!(!profile.charging[t]);
                }
            }

            let again = run(params(0.9), &series, &occ, seed).unwrap();
            prop_assert_eq!(profile, again);
        }
    }
}
