//! User-stated date references.
//!
//! Callers name dates by weekday ("el sábado"), relative term ("mañana"),
//! day/month ("el 12/09"), or full date. A `DateRef` keeps the statement as
//! made, so extraction stays pure; resolution to a concrete calendar date
//! happens only where a clock is available (availability checks).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::booking::weekday_name_es;

/// A relative day term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeDay {
    Today,
    Tomorrow,
    DayAfterTomorrow,
}

/// A date as the caller stated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRef {
    /// A weekday name; resolves to its next occurrence (today counts).
    Weekday { weekday: Weekday },

    /// "hoy" / "mañana" / "pasado mañana".
    Relative { day: RelativeDay },

    /// Day and month without a year; resolves to the next occurrence.
    DayMonth { day: u32, month: u32 },

    /// A fully-specified date.
    Explicit { date: NaiveDate },
}

impl DateRef {
    /// Resolves the reference to a concrete date, given today's date.
    ///
    /// Returns `None` when the stated day/month is not a real calendar date
    /// (e.g. 31/02).
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRef::Weekday { weekday } => {
                let ahead = (weekday.num_days_from_monday() + 7
                    - today.weekday().num_days_from_monday())
                    % 7;
                Some(today + chrono::Duration::days(ahead as i64))
            }
            DateRef::Relative { day } => {
                let offset = match day {
                    RelativeDay::Today => 0,
                    RelativeDay::Tomorrow => 1,
                    RelativeDay::DayAfterTomorrow => 2,
                };
                Some(today + chrono::Duration::days(offset))
            }
            DateRef::DayMonth { day, month } => {
                let this_year = NaiveDate::from_ymd_opt(today.year(), *month, *day);
                match this_year {
                    Some(date) if date >= today => Some(date),
                    _ => NaiveDate::from_ymd_opt(today.year() + 1, *month, *day),
                }
            }
            DateRef::Explicit { date } => Some(*date),
        }
    }

    /// User-facing description of the reference as stated.
    pub fn describe(&self) -> String {
        match self {
            DateRef::Weekday { weekday } => {
                // weekday_name_es works off a date; pick any date with that weekday
                let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
                let date = monday
                    + chrono::Duration::days(weekday.num_days_from_monday() as i64);
                format!("el {}", weekday_name_es(date))
            }
            DateRef::Relative { day } => match day {
                RelativeDay::Today => "hoy".to_string(),
                RelativeDay::Tomorrow => "mañana".to_string(),
                RelativeDay::DayAfterTomorrow => "pasado mañana".to_string(),
            },
            DateRef::DayMonth { day, month } => format!("el {day:02}/{month:02}"),
            DateRef::Explicit { date } => format!("el {}", date.format("%d/%m/%Y")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-02-11 is a Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 11).unwrap()
    }

    #[test]
    fn weekday_resolves_to_next_occurrence() {
        let saturday = DateRef::Weekday { weekday: Weekday::Sat };
        let resolved = saturday.resolve(today()).unwrap();
        assert_eq!(resolved, NaiveDate::from_ymd_opt(2026, 2, 14).unwrap());
        assert_eq!(resolved.weekday(), Weekday::Sat);
    }

    #[test]
    fn same_weekday_resolves_to_today() {
        let wednesday = DateRef::Weekday { weekday: Weekday::Wed };
        assert_eq!(wednesday.resolve(today()).unwrap(), today());
    }

    #[test]
    fn relative_days_offset_from_today() {
        let tomorrow = DateRef::Relative { day: RelativeDay::Tomorrow };
        assert_eq!(
            tomorrow.resolve(today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 12).unwrap()
        );

        let after = DateRef::Relative { day: RelativeDay::DayAfterTomorrow };
        assert_eq!(
            after.resolve(today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 13).unwrap()
        );
    }

    #[test]
    fn day_month_in_the_past_rolls_to_next_year() {
        let january = DateRef::DayMonth { day: 5, month: 1 };
        assert_eq!(
            january.resolve(today()).unwrap(),
            NaiveDate::from_ymd_opt(2027, 1, 5).unwrap()
        );
    }

    #[test]
    fn day_month_ahead_stays_in_current_year() {
        let september = DateRef::DayMonth { day: 12, month: 9 };
        assert_eq!(
            september.resolve(today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
        );
    }

    #[test]
    fn impossible_day_month_resolves_to_none() {
        let bad = DateRef::DayMonth { day: 31, month: 2 };
        assert_eq!(bad.resolve(today()), None);
    }

    #[test]
    fn describe_weekday_uses_spanish_name() {
        let saturday = DateRef::Weekday { weekday: Weekday::Sat };
        assert_eq!(saturday.describe(), "el sábado");
    }
}
