//! # Public Holiday Rules
//!
//! National public holidays for the countries with a built-in calendar:
//! fixed dates plus the Easter-relative movable feasts. Regional holidays are
//! not modelled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::CountryCode;

/// Gregorian Easter Sunday (anonymous Gregorian algorithm)
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Countries with their own holiday rules
pub fn has_calendar(country: CountryCode) -> bool {
    use CountryCode::*;
    matches!(country, At | Be | De | Es | Fr | It | Lu | Nl | Pl | Uk)
}

/// Public holidays of `country` in `year`, or `None` without built-in rules
pub fn public_holidays(country: CountryCode, year: i32) -> Option<Vec<NaiveDate>> {
    use CountryCode::*;

    if !has_calendar(country) {
        return None;
    }

    let easter = easter_sunday(year)?;
    let rel = |days: i64| easter + Duration::days(days);
    let fixed = |month: u32, day: u32| NaiveDate::from_ymd_opt(year, month, day);

    let good_friday = rel(-2);
    let easter_monday = rel(1);
    let ascension = rel(39);
    let whit_sunday = rel(49);
    let whit_monday = rel(50);
    let corpus_christi = rel(60);

    let days: Vec<Option<NaiveDate>> = match country {
        Be => vec![
            fixed(1, 1),
            Some(easter_monday),
            fixed(5, 1),
            Some(ascension),
            Some(whit_monday),
            fixed(7, 21),
            fixed(8, 15),
            fixed(11, 1),
            fixed(11, 11),
            fixed(12, 25),
        ],
        Fr => vec![
            fixed(1, 1),
            Some(easter_monday),
            fixed(5, 1),
            fixed(5, 8),
            Some(ascension),
            Some(whit_monday),
            fixed(7, 14),
            fixed(8, 15),
            fixed(11, 1),
            fixed(11, 11),
            fixed(12, 25),
        ],
        De => vec![
            fixed(1, 1),
            Some(good_friday),
            Some(easter_monday),
            fixed(5, 1),
            Some(ascension),
            Some(whit_monday),
            fixed(10, 3),
            fixed(12, 25),
            fixed(12, 26),
        ],
        Nl => {
            let kings_day = fixed(4, 27).map(|d| {
                if d.weekday() == Weekday::Sun {
                    d - Duration::days(1)
                } else {
                    d
                }
            });
            let mut days = vec![
                fixed(1, 1),
                Some(easter),
                Some(easter_monday),
                kings_day,
                Some(ascension),
                Some(whit_sunday),
                Some(whit_monday),
                fixed(12, 25),
                fixed(12, 26),
            ];
            if year % 5 == 0 {
                days.push(fixed(5, 5));
            }
            days
        }
        Lu => {
            let mut days = vec![
                fixed(1, 1),
                Some(easter_monday),
                fixed(5, 1),
                Some(ascension),
                Some(whit_monday),
                fixed(6, 23),
                fixed(8, 15),
                fixed(11, 1),
                fixed(12, 25),
                fixed(12, 26),
            ];
            if year >= 2019 {
                days.push(fixed(5, 9));
            }
            days
        }
        At => vec![
            fixed(1, 1),
            fixed(1, 6),
            Some(easter_monday),
            fixed(5, 1),
            Some(ascension),
            Some(whit_monday),
            Some(corpus_christi),
            fixed(8, 15),
            fixed(10, 26),
            fixed(11, 1),
            fixed(12, 8),
            fixed(12, 25),
            fixed(12, 26),
        ],
        It => vec![
            fixed(1, 1),
            fixed(1, 6),
            Some(easter),
            Some(easter_monday),
            fixed(4, 25),
            fixed(5, 1),
            fixed(6, 2),
            fixed(8, 15),
            fixed(11, 1),
            fixed(12, 8),
            fixed(12, 25),
            fixed(12, 26),
        ],
        Es => vec![
            fixed(1, 1),
            fixed(1, 6),
            Some(good_friday),
            fixed(5, 1),
            fixed(8, 15),
            fixed(10, 12),
            fixed(11, 1),
            fixed(12, 6),
            fixed(12, 8),
            fixed(12, 25),
        ],
        Pl => {
            let mut days = vec![
                fixed(1, 1),
                fixed(1, 6),
                Some(easter),
                Some(easter_monday),
                fixed(5, 1),
                fixed(5, 3),
                Some(whit_sunday),
                Some(corpus_christi),
                fixed(8, 15),
                fixed(11, 1),
                fixed(11, 11),
                fixed(12, 25),
                fixed(12, 26),
            ];
            if year >= 2025 {
                days.push(fixed(12, 24));
            }
            days
        }
        Uk => uk_bank_holidays(year, good_friday, easter_monday),
        _ => return None,
    };

    let mut holidays: Vec<NaiveDate> = days.into_iter().flatten().collect();
    holidays.sort();
    holidays.dedup();
    Some(holidays)
}

/// England and Wales bank holidays, with weekend substitution
fn uk_bank_holidays(
    year: i32,
    good_friday: NaiveDate,
    easter_monday: NaiveDate,
) -> Vec<Option<NaiveDate>> {
    let new_year = NaiveDate::from_ymd_opt(year, 1, 1).map(next_weekday);
    let christmas = NaiveDate::from_ymd_opt(year, 12, 25);
    let boxing_day = NaiveDate::from_ymd_opt(year, 12, 26);

    // Christmas and Boxing Day substitute into the following free weekdays
    let (christmas, boxing_day) = match (christmas, boxing_day) {
        (Some(c), Some(b)) => {
            let c_sub = next_weekday(c);
            let mut b_sub = next_weekday(b);
            if b_sub == c_sub {
                b_sub = next_weekday(b_sub + Duration::days(1));
            }
            (Some(c_sub), Some(b_sub))
        }
        other => other,
    };

    vec![
        new_year,
        Some(good_friday),
        Some(easter_monday),
        nth_weekday(year, 5, Weekday::Mon, 1),
        last_weekday(year, 5, Weekday::Mon),
        last_weekday(year, 8, Weekday::Mon),
        christmas,
        boxing_day,
    ]
}

fn next_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = first_of_next - Duration::days(1);
    while date.weekday() != weekday {
        date -= Duration::days(1);
    }
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(2024, date(2024, 3, 31))]
    #[case(2025, date(2025, 4, 20))]
    #[case(2019, date(2019, 4, 21))]
    #[case(2000, date(2000, 4, 23))]
    fn test_easter(#[case] year: i32, #[case] expected: NaiveDate) {
        assert_eq!(easter_sunday(year), Some(expected));
    }

    #[test]
    fn test_belgian_holidays_2024() {
        let days = public_holidays(CountryCode::Be, 2024).unwrap();
        assert_eq!(days.len(), 10);
        assert!(days.contains(&date(2024, 4, 1))); // Easter Monday
        assert!(days.contains(&date(2024, 5, 9))); // Ascension
        assert!(days.contains(&date(2024, 5, 20))); // Whit Monday
        assert!(days.contains(&date(2024, 7, 21)));
    }

    #[test]
    fn test_uk_substitute_days_2021() {
        // Christmas 2021 fell on a Saturday, Boxing Day on a Sunday
        let days = public_holidays(CountryCode::Uk, 2021).unwrap();
        assert!(days.contains(&date(2021, 12, 27)));
        assert!(days.contains(&date(2021, 12, 28)));
        assert!(days.contains(&date(2021, 5, 31))); // spring bank holiday
        assert!(days.contains(&date(2021, 8, 30)));
    }

    #[test]
    fn test_no_rules_for_unlisted_country() {
        assert!(public_holidays(CountryCode::Se, 2024).is_none());
        assert!(!has_calendar(CountryCode::Se));
    }

    #[test]
    fn test_dutch_kings_day_moves_off_sunday() {
        // 27 April 2025 is a Sunday
        let days = public_holidays(CountryCode::Nl, 2025).unwrap();
        assert!(days.contains(&date(2025, 4, 26)));
        assert!(days.contains(&date(2025, 5, 5)));
    }
}
