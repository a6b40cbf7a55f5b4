use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConfigError;

/// Demand-relevant classification of a calendar day.
///
/// Public holidays are classified as [`DayType::Sunday`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DayType {
    Weekday,
    Saturday,
    Sunday,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Weekday, DayType::Saturday, DayType::Sunday];

    /// Numeric label (0 = weekday, 1 = Saturday, 2 = Sunday or holiday)
    pub fn label(self) -> u8 {
        match self {
            DayType::Weekday => 0,
            DayType::Saturday => 1,
            DayType::Sunday => 2,
        }
    }

    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(DayType::Weekday),
            1 => Some(DayType::Saturday),
            2 => Some(DayType::Sunday),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self.label() as usize
    }
}

/// One value per day type, indexed by [`DayType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTypeTable<T> {
    entries: [T; 3],
}

impl<T> DayTypeTable<T> {
    pub fn new(weekday: T, saturday: T, sunday: T) -> Self {
        Self {
            entries: [weekday, saturday, sunday],
        }
    }

    /// Build a table from `(day type, value)` records.
    ///
    /// Every day type must appear exactly once.
    pub fn from_records<I>(records: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (DayType, T)>,
    {
        let mut slots: [Vec<T>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for (day_type, value) in records {
            slots[day_type.index()].push(value);
        }

        let [weekday, saturday, sunday] = slots;
        Ok(Self::new(
            single(DayType::Weekday, weekday)?,
            single(DayType::Saturday, saturday)?,
            single(DayType::Sunday, sunday)?,
        ))
    }

    pub fn get(&self, day_type: DayType) -> &T {
        &self.entries[day_type.index()]
    }

    pub fn map<U, F: FnMut(DayType, &T) -> U>(&self, mut f: F) -> DayTypeTable<U> {
        DayTypeTable::new(
            f(DayType::Weekday, self.get(DayType::Weekday)),
            f(DayType::Saturday, self.get(DayType::Saturday)),
            f(DayType::Sunday, self.get(DayType::Sunday)),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayType, &T)> {
        DayType::ALL.into_iter().zip(self.entries.iter())
    }
}

fn single<T>(day_type: DayType, mut values: Vec<T>) -> Result<T, ConfigError> {
    let count = values.len();
    match values.pop() {
        Some(value) if count == 1 => Ok(value),
        _ => Err(ConfigError::DayTypeRecords { day_type, count }),
    }
}
