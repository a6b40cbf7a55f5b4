use thiserror::Error;

use super::DayType;

/// Parameter, table or calendar problems. Nothing was simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Unsupported country: {0}")]
    UnsupportedCountry(String),
    #[error("No holiday calendar for {country} and fallback {fallback} has none either")]
    NoHolidayCalendar { country: String, fallback: String },
    #[error("Invalid year: {0}")]
    InvalidYear(i32),
    #[error("Horizon exceeds year {year}: start day {start_day} + {nb_days} day(s) > {year_len} days")]
    HorizonExceedsYear {
        year: i32,
        start_day: usize,
        nb_days: usize,
        year_len: usize,
    },
    #[error("Expected exactly one {day_type} record, found {count}")]
    DayTypeRecords { day_type: DayType, count: usize },
    #[error("Occupancy series has {actual} samples, {required} required")]
    OccupancyTooShort { required: usize, actual: usize },
    #[error("Daily demand has {actual} record(s), {required} required")]
    DemandTooShort { required: usize, actual: usize },
    #[error("Probabilities for {name} sum to {sum}, expected 1")]
    Probabilities { name: &'static str, sum: f64 },
    #[error("Invalid parameter {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// The simulation contradicted its own physics. Either the sampled trips do not
/// fit the battery or the model has a bug.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("Remaining trip energy {remaining_kwh:.3} kWh is negative after away charge (day {day}, minute {minute})")]
    NegativeTripEnergy {
        day: usize,
        minute: usize,
        remaining_kwh: f64,
    },
    #[error("Arrival SOC {soc:.4} below floor {floor:.4} (day {day}, minute {minute})")]
    ArrivalBelowFloor {
        day: usize,
        minute: usize,
        soc: f64,
        floor: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Physical invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl SimulationError {
    pub fn is_config(&self) -> bool {
        matches!(self, SimulationError::Config(_))
    }

    pub fn is_invariant(&self) -> bool {
        matches!(self, SimulationError::Invariant(_))
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ConfigError::Invalid {
            name: "config",
            reason: errors.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_are_distinguishable() {
        let cfg: SimulationError = ConfigError::UnsupportedCountry("XX".into()).into();
        assert!(cfg.is_config());
        assert!(!cfg.is_invariant());

        let inv: SimulationError = InvariantViolation::ArrivalBelowFloor {
            day: 0,
            minute: 600,
            soc: 0.01,
            floor: 0.05,
        }
        .into();
        assert!(inv.is_invariant());
        assert!(inv.to_string().starts_with("Physical invariant violated"));
    }

    #[test]
    fn test_day_type_records_message() {
        let err = ConfigError::DayTypeRecords {
            day_type: DayType::Saturday,
            count: 2,
        };
        assert_eq!(err.to_string(), "Expected exactly one saturday record, found 2");
    }
}
