//! # Calendar Classifier
//!
//! Labels every day of a year as weekday, Saturday or Sunday-or-holiday. The
//! label sequence carries one padding day on each side (31 December of the
//! previous year, 1 January of the next).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::holidays;
use crate::domain::{ConfigError, CountryCode, DayType};

/// Label pattern for a week starting on Monday
const WEEK_PATTERN: [DayType; 7] = [
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekday,
    DayType::Saturday,
    DayType::Sunday,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCalendar {
    pub year: i32,
    /// Country whose holidays were applied
    pub holiday_country: CountryCode,
    /// Padded labels: index 0 and the last index are the neighbouring years' days
    labels: Vec<DayType>,
}

impl YearCalendar {
    /// Classify `year` for `country`, using `fallback`'s holidays when the
    /// country has no calendar of its own.
    pub fn classify(
        year: i32,
        country: CountryCode,
        fallback: CountryCode,
    ) -> Result<Self, ConfigError> {
        let holiday_country = if holidays::has_calendar(country) {
            country
        } else if holidays::has_calendar(fallback) {
            warn!(%country, %fallback, "no holiday calendar, using fallback country");
            fallback
        } else {
            return Err(ConfigError::NoHolidayCalendar {
                country: country.to_string(),
                fallback: fallback.to_string(),
            });
        };

        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ConfigError::InvalidYear(year))?;
        let next_jan1 =
            NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or(ConfigError::InvalidYear(year))?;
        let year_len = (next_jan1 - jan1).num_days() as usize;

        // Tile the weekly pattern from the weekday of 1 January
        let offset = jan1.weekday().num_days_from_monday() as usize;
        let mut year_labels: Vec<DayType> = (0..year_len)
            .map(|d| WEEK_PATTERN[(offset + d) % 7])
            .collect();

        let year_holidays = holidays::public_holidays(holiday_country, year)
            .ok_or(ConfigError::InvalidYear(year))?;
        for date in year_holidays {
            if let Some(label) = year_labels.get_mut(date.ordinal0() as usize) {
                *label = DayType::Sunday;
            }
        }

        let before = jan1 - Duration::days(1);
        let mut labels = Vec::with_capacity(year_len + 2);
        labels.push(classify_date(before, holiday_country));
        labels.extend(year_labels);
        labels.push(classify_date(next_jan1, holiday_country));

        Ok(Self {
            year,
            holiday_country,
            labels,
        })
    }

    /// Number of days in the calendar year
    pub fn year_len(&self) -> usize {
        self.labels.len() - 2
    }

    /// Padded label sequence
    pub fn padded_labels(&self) -> &[DayType] {
        &self.labels
    }

    /// Label of day `day_of_year` (0-based)
    pub fn day_type(&self, day_of_year: usize) -> Option<DayType> {
        if day_of_year >= self.year_len() {
            return None;
        }
        self.labels.get(day_of_year + 1).copied()
    }

    /// Labels of `nb_days` consecutive days starting at `start_day` (0-based)
    pub fn window(&self, start_day: usize, nb_days: usize) -> Result<Vec<DayType>, ConfigError> {
        let year_len = self.year_len();
        if start_day + nb_days > year_len {
            return Err(ConfigError::HorizonExceedsYear {
                year: self.year,
                start_day,
                nb_days,
                year_len,
            });
        }
        Ok(self.labels[start_day + 1..start_day + 1 + nb_days].to_vec())
    }
}

/// Label of a single date, with that date's year holidays
fn classify_date(date: NaiveDate, holiday_country: CountryCode) -> DayType {
    let is_holiday = holidays::public_holidays(holiday_country, date.year())
        .is_some_and(|days| days.contains(&date));
    if is_holiday {
        return DayType::Sunday;
    }
    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}
