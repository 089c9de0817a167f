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

//! Quota pressure model.
//!
//! Compares the remaining quota to where it "should" be on a given date and
//! turns the gap into multiplicative nudges for the color scorer.
//!
//! ## Red target curve
//!
//! Fraction of the red quota expected to be used, piecewise linear:
//!
//! ```text
//! Nov 1 ── 0% ──> Dec 10 ── 5% ──> Jan 31 ── 65% ──> Feb 20 ── 95% ──> Mar 31 ── 100%
//! ```
//!
//! The pressure delta is `(red_remaining - expected_remaining) / eligible_days_left`:
//! positive means behind schedule.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tempocast_types::{BLUE_TOTAL, RED_TOTAL, WHITE_TOTAL};

use crate::calendar::{
    count_red_eligible_days_left, red_season_bounds, tempo_year_length, tempo_year_start, ymd,
};
use crate::traits::HolidayOracle;

/// Minimum delta once more reds remain than legal days to place them
pub const DEADLINE_DELTA: f64 = 0.20;

/// Blue stock deviation (days) beyond which the blue score is nudged
const BLUE_PACING_DAYS: f64 = 20.0;

/// Sub-period of the red season, each with its own pressure multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPeriod {
    /// November and early December
    SeasonStart,
    /// Dec 10 to mid-February
    CoreWinter,
    /// From Feb 20 through March
    SeasonEnd,
    /// Everything else, including the Feb 16-19 gap
    Other,
}

impl SeasonPeriod {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let (month, day) = (date.month(), date.day());
        if month == 11 || (month == 12 && day < 10) {
            Self::SeasonStart
        } else if (month == 12 && day >= 10) || (matches!(month, 1 | 2) && day <= 15) {
            Self::CoreWinter
        } else if (month == 2 && day >= 20) || month == 3 {
            Self::SeasonEnd
        } else {
            Self::Other
        }
    }

    /// (behind threshold, behind multiplier, ahead threshold, ahead multiplier)
    fn multiplier_table(self) -> (f64, f64, f64, f64) {
        match self {
            Self::SeasonStart => (0.03, 0.70, -0.03, 0.85),
            Self::CoreWinter => (0.03, 1.25, -0.03, 0.80),
            Self::SeasonEnd => (0.02, 1.35, -0.03, 0.85),
            Self::Other => (0.04, 1.08, -0.04, 0.92),
        }
    }
}

fn lerp_dates(date: NaiveDate, from: NaiveDate, to: NaiveDate, from_val: f64, to_val: f64) -> f64 {
    if date <= from {
        return from_val;
    }
    if date >= to {
        return to_val;
    }
    #[expect(clippy::cast_precision_loss, reason = "day counts are small")]
    let t = (date - from).num_days() as f64 / (to - from).num_days().max(1) as f64;
    from_val + t * (to_val - from_val)
}

/// Fraction of the red quota expected to be used by `date`
#[must_use]
pub fn red_target_used_fraction(date: NaiveDate) -> f64 {
    let (start, end) = red_season_bounds(date);
    let year = start.year();
    let early = ymd(year, 12, 10);
    let core = ymd(year + 1, 1, 31);
    let late = ymd(year + 1, 2, 20);

    if date <= early {
        lerp_dates(date, start, early, 0.00, 0.05)
    } else if date <= core {
        lerp_dates(date, early, core, 0.05, 0.65)
    } else if date <= late {
        lerp_dates(date, core, late, 0.65, 0.95)
    } else {
        lerp_dates(date, late, end, 0.95, 1.00)
    }
}

/// Red days that should still be left on `date` according to the target curve
#[must_use]
pub fn expected_red_remaining(date: NaiveDate) -> f64 {
    (f64::from(RED_TOTAL) * (1.0 - red_target_used_fraction(date))).max(0.0)
}

/// Red stock expected on `date` if reds were spread evenly over the season
#[must_use]
pub fn linear_expected_red_remaining(date: NaiveDate) -> f64 {
    let (start, end) = red_season_bounds(date);
    let progress = lerp_dates(date, start, end, 0.0, 1.0);
    f64::from(RED_TOTAL) * (1.0 - progress)
}

/// White stock expected on `date` if whites were spread evenly from
/// Nov 1 to Apr 30
#[must_use]
pub fn linear_expected_white_remaining(date: NaiveDate) -> f64 {
    let (start, _) = red_season_bounds(date);
    let end = ymd(start.year() + 1, 4, 30);
    let progress = lerp_dates(date, start, end, 0.0, 1.0);
    f64::from(WHITE_TOTAL) * (1.0 - progress)
}

/// Red quota pressure on a given day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedPressure {
    pub expected_remaining: f64,
    /// Red-legal days from the date to season end, floored at 1
    pub eligible_days_left: u32,
    pub delta: f64,
    /// More reds left than legal days to place them
    pub deadline: bool,
    pub period: SeasonPeriod,
}

impl RedPressure {
    pub fn assess(date: NaiveDate, red_remaining: u32, holidays: &dyn HolidayOracle) -> Self {
        let expected_remaining = expected_red_remaining(date);
        let (_, season_end) = red_season_bounds(date);
        let eligible_days_left = count_red_eligible_days_left(date, season_end, holidays).max(1);

        let eligible = f64::from(eligible_days_left);
        let mut delta = f64::from(red_remaining) / eligible - expected_remaining / eligible;

        let deadline = red_remaining > eligible_days_left;
        if deadline {
            delta = delta.max(DEADLINE_DELTA);
        }

        Self {
            expected_remaining,
            eligible_days_left,
            delta,
            deadline,
            period: SeasonPeriod::from_date(date),
        }
    }

    /// Multiplier applied to the red score for this pressure
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        let (behind, behind_factor, ahead, ahead_factor) = self.period.multiplier_table();
        if self.delta > behind {
            behind_factor
        } else if self.delta < ahead {
            ahead_factor
        } else {
            1.0
        }
    }
}

/// Halves the red score with fewer than 4 reds left, except in January and
/// February
#[must_use]
pub fn near_exhaustion_factor(date: NaiveDate, red_remaining: u32) -> f64 {
    if red_remaining < 4 && !matches!(date.month(), 1 | 2) {
        0.5
    } else {
        1.0
    }
}

/// Blue days expected to remain on `date` under even pacing across the
/// Tempo year
#[must_use]
pub fn expected_blue_remaining(date: NaiveDate) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "day counts are small")]
    let progress = (date - tempo_year_start(date)).num_days() as f64 / tempo_year_length(date) as f64;
    f64::from(BLUE_TOTAL) * (1.0 - progress)
}

/// Blue score multiplier from the blue stock deviation
#[must_use]
pub fn blue_pacing_factor(date: NaiveDate, blue_remaining: u32) -> f64 {
    let deviation = f64::from(blue_remaining) - expected_blue_remaining(date);
    if deviation > BLUE_PACING_DAYS {
        1.08
    } else if deviation < -BLUE_PACING_DAYS {
        0.88
    } else {
        1.0
    }
}
