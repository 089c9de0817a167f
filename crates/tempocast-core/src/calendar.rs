// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of TempoCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Calendar gate: which colors are legal on a given date.
//!
//! ## Rules
//!
//! - **Red**: weekdays only, never on a public holiday, only from November
//!   through March (the red season)
//! - **White**: any day but Sunday
//! - **Blue**: always
//!
//! ## Periods
//!
//! - Red season: Nov 1 of year Y to Mar 31 of year Y+1
//! - Tempo year: Sep 1 to Aug 31, over which the whole quota is spent

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tempocast_types::TempoColor;

use crate::traits::HolidayOracle;

/// Fixed-date French public holidays as (month, day)
const FIXED_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1),   // New Year
    (5, 1),   // Labour Day
    (5, 8),   // Victory in Europe
    (7, 14),  // Bastille Day
    (8, 15),  // Assumption
    (11, 1),  // All Saints
    (11, 11), // Armistice
    (12, 25), // Christmas
];

pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixed month/day is a valid date")
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm)
#[must_use]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;

    NaiveDate::from_ymd_opt(
        year,
        u32::try_from(n.div_euclid(31)).ok()?,
        u32::try_from(n.rem_euclid(31) + 1).ok()?,
    )
}

/// French public holidays: fixed dates plus Easter Monday, Ascension and
/// Whit Monday
#[derive(Debug, Clone, Copy, Default)]
pub struct FrenchPublicHolidays;

impl HolidayOracle for FrenchPublicHolidays {
    fn is_public_holiday(&self, date: NaiveDate) -> bool {
        if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
            return true;
        }

        easter_sunday(date.year()).is_some_and(|easter| {
            [1, 39, 50]
                .iter()
                .any(|&offset| easter + Duration::days(offset) == date)
        })
    }
}

/// November through March
#[must_use]
pub fn is_red_season_month(date: NaiveDate) -> bool {
    matches!(date.month(), 11 | 12 | 1..=3)
}

/// Calendar legality of `color` on `date`, ignoring remaining stock
pub fn allowed(color: TempoColor, date: NaiveDate, holidays: &dyn HolidayOracle) -> bool {
    let weekday = date.weekday();
    match color {
        TempoColor::Red => {
            !matches!(weekday, Weekday::Sat | Weekday::Sun)
                && is_red_season_month(date)
                && !holidays.is_public_holiday(date)
        }
        TempoColor::White => weekday != Weekday::Sun,
        TempoColor::Blue => true,
    }
}

/// Red season containing `date`.
///
/// Dates from April to October map to the season that ended on the
/// preceding March 31.
#[must_use]
pub fn red_season_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start_year = if date.month() >= 11 {
        date.year()
    } else {
        date.year() - 1
    };
    (ymd(start_year, 11, 1), ymd(start_year + 1, 3, 31))
}

/// First day (Sep 1) of the Tempo year containing `date`
#[must_use]
pub fn tempo_year_start(date: NaiveDate) -> NaiveDate {
    let start = ymd(date.year(), 9, 1);
    if date >= start {
        start
    } else {
        ymd(date.year() - 1, 9, 1)
    }
}

/// Last day (Aug 31, inclusive) of the Tempo year containing `date`
#[must_use]
pub fn tempo_year_end(date: NaiveDate) -> NaiveDate {
    ymd(tempo_year_start(date).year() + 1, 8, 31)
}

/// Number of days in the Tempo year containing `date` (365 or 366)
#[must_use]
pub fn tempo_year_length(date: NaiveDate) -> i64 {
    (tempo_year_end(date) - tempo_year_start(date)).num_days() + 1
}

/// 1-based position of `date` within its Tempo year
#[must_use]
pub fn tempo_day_index(date: NaiveDate) -> i64 {
    (date - tempo_year_start(date)).num_days() + 1
}

/// Red-legal days in `start..=end`
pub fn count_red_eligible_days_left(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &dyn HolidayOracle,
) -> u32 {
    if end < start {
        return 0;
    }
    let count = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| allowed(TempoColor::Red, *d, holidays))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// A date with the calendar facts the engine keeps asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_public_holiday: bool,
    pub in_red_season: bool,
    /// 1-based index within the Tempo year
    pub tempo_day_index: i64,
}

impl CalendarDate {
    pub fn new(date: NaiveDate, holidays: &dyn HolidayOracle) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            is_public_holiday: holidays.is_public_holiday(date),
            in_red_season: is_red_season_month(date),
            tempo_day_index: tempo_day_index(date),
        }
    }

    #[must_use]
    pub fn allows(&self, color: TempoColor) -> bool {
        match color {
            TempoColor::Red => self.is_weekday() && self.in_red_season && !self.is_public_holiday,
            TempoColor::White => !self.is_sunday(),
            TempoColor::Blue => true,
        }
    }

    #[must_use]
    pub fn is_sunday(&self) -> bool {
        self.weekday == Weekday::Sun
    }

    #[must_use]
    pub fn is_saturday(&self) -> bool {
        self.weekday == Weekday::Sat
    }

    /// Monday to Friday
    #[must_use]
    pub fn is_weekday(&self) -> bool {
        !matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}
