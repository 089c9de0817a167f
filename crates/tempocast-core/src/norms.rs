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

//! 1991-2020 national daily temperature norms (°C) for the red season.
//!
//! One value per calendar day from November 1 to March 31. February 29 reuses
//! February 28. Days outside the season have no norm.

use chrono::{Datelike, NaiveDate};

const NOVEMBER: [f64; 30] = [
    11.14, 10.08, 10.92, 10.26, 9.69, 9.16, 9.16, 9.63,
    9.71, 9.51, 9.59, 9.43, 9.33, 8.63, 7.74, 7.92,
    7.61, 7.57, 7.44, 7.30, 7.18, 7.01, 6.89, 6.84,
    7.16, 6.93, 6.60, 6.36, 6.53, 6.73,
];

const DECEMBER: [f64; 31] = [
    6.53, 6.41, 6.42, 6.63, 6.79, 6.20, 5.84, 5.96,
    5.72, 5.35, 5.26, 5.37, 5.28, 4.72, 4.62, 5.27,
    5.48, 5.59, 5.75, 5.45, 5.51, 5.61, 5.41, 5.49,
    5.39, 4.85, 4.71, 4.58, 4.61, 4.96, 4.81,
];

const JANUARY: [f64; 31] = [
    4.73, 5.10, 4.88, 4.57, 4.79, 5.12, 4.35, 4.31,
    4.85, 4.92, 4.83, 4.30, 4.54, 4.71, 4.59, 4.85,
    5.31, 5.23, 5.70, 5.64, 5.55, 5.73, 5.38, 5.00,
    4.80, 4.49, 4.49, 4.91, 4.87, 4.68, 4.57,
];

const FEBRUARY: [f64; 28] = [
    5.01, 5.13, 5.57, 5.80, 6.17, 6.34, 5.96, 6.11,
    5.77, 5.19, 5.27, 5.54, 4.76, 4.76, 4.90, 4.73,
    5.04, 5.31, 5.24, 5.40, 5.30, 5.46, 6.00, 6.16,
    6.27, 6.39, 6.52, 7.03,
];

const MARCH: [f64; 31] = [
    6.90, 6.85, 6.78, 6.65, 6.61, 6.97, 7.46, 7.83,
    7.96, 8.03, 8.45, 8.47, 8.30, 8.65, 9.04, 9.32,
    9.24, 9.32, 9.12, 9.34, 9.39, 9.23, 9.38, 9.63,
    9.51, 9.23, 9.26, 9.23, 9.37, 9.35, 9.90,
];

/// Climate norm for the calendar day of `date`, if it falls in November to March
#[must_use]
pub fn temperature_norm(date: NaiveDate) -> Option<f64> {
    let table: &[f64] = match date.month() {
        11 => &NOVEMBER,
        12 => &DECEMBER,
        1 => &JANUARY,
        2 => &FEBRUARY,
        3 => &MARCH,
        _ => return None,
    };
    let day = if date.month() == 2 && date.day() == 29 { 28 } else { date.day() };
    table.get(usize::try_from(day).ok()? - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_bounds() {
        assert_eq!(temperature_norm(date(2025, 11, 1)), Some(11.14));
        assert_eq!(temperature_norm(date(2026, 3, 31)), Some(9.90));
        assert_eq!(temperature_norm(date(2025, 10, 31)), None);
        assert_eq!(temperature_norm(date(2026, 4, 1)), None);
    }

    #[test]
    fn test_every_season_day_has_a_norm() {
        let days = date(2027, 11, 1).iter_days().take_while(|d| *d <= date(2028, 3, 31));
        for d in days {
            assert!(temperature_norm(d).is_some(), "{d}");
        }
    }

    #[test]
    fn test_leap_day_uses_february_28() {
        assert_eq!(temperature_norm(date(2028, 2, 29)), temperature_norm(date(2028, 2, 28)));
    }
}
