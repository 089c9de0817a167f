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

//! # Color Scorer
//!
//! Turns a day's tension score, calendar facts and remaining quota into a
//! blue/white/red probability triple and the model's color.
//!
//! ## Algorithm
//!
//! ### Phase 1: Raw scores
//!
//! - Two Z thresholds derived from the day index and the stock:
//!   blue/white (`s_br`, lowered by [`WHITE_ZONE_EXPANSION`]) and white/red (`s_r`)
//! - Blue-heavy priors, flattened on core-winter working days
//! - Three Z regimes (clearly blue, medium, tense) add linear terms per color
//! - Illegal colors zeroed
//!
//! ### Phase 2: Red and blue multipliers
//!
//! - Seasonal red profile, quota pressure ([`crate::pressure`]) and
//!   near-exhaustion caution on the red score
//! - Blue pacing across the Tempo year on the blue score
//! - Score-level white/red wake-up patches close to the thresholds
//!
//! ### Phase 3: Probability adjustments
//!
//! An ordered list of pure transforms over the normalized triple, see
//! [`adjustments`]. The order matters and is kept fixed.
//!
//! ### Phase 4: Decision
//!
//! Argmax with blue as the tie default.

mod adjustments;

pub use adjustments::{ADJUSTMENTS, Adjustment, red_floor_from_z};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tempocast_types::{ColorProbability, QuotaState, TempoColor};
use tracing::{debug, trace, warn};

use crate::calendar::{CalendarDate, tempo_year_length};
use crate::pressure::{RedPressure, blue_pacing_factor, near_exhaustion_factor};
use crate::traits::HolidayOracle;

/// Downward shift of the blue/white threshold, widening the white zone
pub const WHITE_ZONE_EXPANSION: f64 = 0.30;
const WHITE_MIDZONE_BOOST: f64 = 1.2;
const BLUE_MIDZONE_PENALTY: f64 = 0.85;

/// Triple used when every score ended at zero
const DEGENERATE_SCORES: ColorProbability = ColorProbability::new(0.7, 0.2, 0.1);

/// Z boundaries between the color zones for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Blue/white boundary before the white-zone expansion
    pub blue_white: f64,
    /// White/red boundary
    pub white_red: f64,
}

impl Thresholds {
    #[must_use]
    pub fn new(day_index: i64, quota: &QuotaState) -> Self {
        #[expect(clippy::cast_precision_loss, reason = "day index is at most 366")]
        let j = day_index as f64;
        Self {
            blue_white: 4.00 - 0.015 * j - 0.026 * f64::from(quota.tension_stock()),
            white_red: 3.15 - 0.010 * j - 0.031 * f64::from(quota.red),
        }
    }

    /// Blue/white boundary actually used by the scorer
    #[must_use]
    pub fn blue_white_adjusted(&self) -> f64 {
        self.blue_white - WHITE_ZONE_EXPANSION
    }
}

/// Everything the scorer and its adjustment stages know about one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    pub day: CalendarDate,
    pub z: Option<f64>,
    pub quota: QuotaState,
    pub thresholds: Thresholds,
    /// Red is calendar-legal and still in stock
    pub red_allowed: bool,
    /// White is calendar-legal and still in stock
    pub white_allowed: bool,
    /// Dec 10 to Feb 20, any weekday
    pub core_winter: bool,
    /// Days left in the Tempo year, counting this one
    pub days_left: f64,
    pub pressure: RedPressure,
}

impl ScoringContext {
    pub fn new(
        date: NaiveDate,
        z: Option<f64>,
        quota: QuotaState,
        holidays: &dyn HolidayOracle,
    ) -> Self {
        let day = CalendarDate::new(date, holidays);
        let (month, dom) = (date.month(), date.day());
        let year_length = tempo_year_length(date);

        #[expect(clippy::cast_precision_loss, reason = "day counts are small")]
        let days_left = (year_length - day.tempo_day_index + 1).max(1) as f64;

        Self {
            day,
            z,
            quota,
            thresholds: Thresholds::new(day.tempo_day_index, &quota),
            red_allowed: day.allows(TempoColor::Red) && quota.red > 0,
            white_allowed: day.allows(TempoColor::White) && quota.white > 0,
            core_winter: (month == 12 && dom >= 10) || month == 1 || (month == 2 && dom <= 20),
            days_left,
            pressure: RedPressure::assess(date, quota.red, holidays),
        }
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.day.month()
    }

    /// December, January or February
    #[must_use]
    pub fn in_deep_winter_months(&self) -> bool {
        matches!(self.month(), 12 | 1 | 2)
    }

    /// Safe triple when an adjustment leaves no mass
    #[must_use]
    pub fn fallback(&self) -> ColorProbability {
        if self.day.is_saturday() {
            ColorProbability::new(0.65, 0.35, 0.0)
        } else {
            ColorProbability::new(0.8, 0.2, 0.0)
        }
    }
}

/// Output of the scorer for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    pub probabilities: ColorProbability,
    pub color: TempoColor,
}

impl DayScore {
    fn certain_blue() -> Self {
        Self {
            probabilities: ColorProbability::CERTAIN_BLUE,
            color: TempoColor::Blue,
        }
    }
}

/// Unnormalized per-color scores
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scores {
    blue: f64,
    white: f64,
    red: f64,
}

impl Scores {
    fn priors(ctx: &ScoringContext) -> Self {
        if ctx.core_winter && ctx.day.is_weekday() && !ctx.day.is_public_holiday {
            Self { blue: 0.6, white: 0.25, red: 0.15 }
        } else {
            Self { blue: 0.9, white: 0.1, red: 0.0 }
        }
    }

    fn into_probabilities(self) -> ColorProbability {
        let total = self.blue + self.white + self.red;
        if total <= 0.0 {
            return DEGENERATE_SCORES;
        }
        ColorProbability::new(self.blue, self.white, self.red).normalized_or(DEGENERATE_SCORES)
    }
}

fn z_regime_scores(ctx: &ScoringContext, z: f64, mut s: Scores) -> Scores {
    let s_br = ctx.thresholds.blue_white_adjusted();
    let s_r = ctx.thresholds.white_red;

    if z < s_br {
        s.blue += (s_br - z) * 0.8;
        if ctx.white_allowed {
            s.white += (z - (s_br - 1.5)).max(0.0) * 0.4;
        }
    } else if z < s_r {
        s.blue += (s_r - z).max(0.0) * 0.25;
        if ctx.white_allowed {
            s.white += 0.45 + (z - s_br) * 0.85;
        }
        if ctx.red_allowed {
            s.red += (z - (s_r - 0.5)).max(0.0) * 0.5;
        }
    } else {
        if ctx.white_allowed {
            s.white += 0.4 + (z - s_br).max(0.0) * 0.55;
        }
        if ctx.red_allowed {
            s.red += 0.35 + (z - s_r).max(0.0);
        }
        s.blue += (s_r + 1.0 - z).max(0.0) * 0.25;
    }

    if (s_br..s_r).contains(&z) && ctx.white_allowed {
        s.white *= WHITE_MIDZONE_BOOST;
        s.blue *= BLUE_MIDZONE_PENALTY;
    }

    // Moderate tension outside core winter leans white
    if !ctx.core_winter
        && (0.3..=1.0).contains(&z)
        && s.red < 0.15
        && ctx.white_allowed
        && s.white < s.blue
    {
        s.white += (s.blue - s.white) * 0.35;
    }
    s
}

/// Month/day profile of how readily red is placed, independent of Z
#[must_use]
pub fn seasonal_red_factor(date: NaiveDate) -> f64 {
    match (date.month(), date.day()) {
        (11, _) => 0.7,
        (12, d) if d < 10 => 0.5,
        (12, d) if d < 20 => 0.7,
        (1 | 2, _) => 1.05,
        (3, d) if d <= 15 => 0.7,
        (3, _) => 0.4,
        _ => 1.0,
    }
}

/// Patches on the raw scores close to the thresholds
fn threshold_patches(ctx: &ScoringContext, z: f64, mut s: Scores) -> Scores {
    let s_br = ctx.thresholds.blue_white_adjusted();
    let s_r = ctx.thresholds.white_red;

    if ctx.white_allowed && z >= s_br + 0.3 && z < s_r && s.white < s.blue {
        let lead = ((s_r - z).max(0.0) * 0.05).min(0.08);
        s.white = s.white.max(s.blue + lead);
    }

    if ctx.red_allowed {
        let start = s_r - 0.12;
        if (start..s_r).contains(&z) && s.red < s.white {
            let t = (z - start) / (s_r - start).max(1e-6);
            s.red = s.red.max(s.white * (0.45 + 0.55 * t));
        }
    }
    s
}

fn raw_scores(ctx: &ScoringContext) -> Scores {
    let mut s = Scores::priors(ctx);

    if let Some(z) = ctx.z {
        s = z_regime_scores(ctx, z, s);
    }

    if !ctx.red_allowed {
        s.red = 0.0;
    }
    if !ctx.white_allowed {
        s.white = 0.0;
    }

    let red_factor = seasonal_red_factor(ctx.day.date)
        * ctx.pressure.multiplier()
        * near_exhaustion_factor(ctx.day.date, ctx.quota.red);
    s.red *= red_factor;

    if ctx.day.is_saturday() {
        s.red = 0.0;
    }

    s.blue *= blue_pacing_factor(ctx.day.date, ctx.quota.blue);

    if let Some(z) = ctx.z {
        s = threshold_patches(ctx, z, s);
    }

    debug!(
        date = %ctx.day.date,
        z = ?ctx.z,
        s_br = ctx.thresholds.blue_white_adjusted(),
        s_r = ctx.thresholds.white_red,
        pressure_delta = ctx.pressure.delta,
        red_factor,
        "Raw color scores: blue={:.3} white={:.3} red={:.3}",
        s.blue,
        s.white,
        s.red
    );
    s
}

/// Runs the adjustment stages in order, renormalizing after each one
fn run_adjustments(ctx: &ScoringContext, mut probs: ColorProbability) -> ColorProbability {
    for stage in ADJUSTMENTS {
        let next = (stage.apply)(probs, ctx);
        let total = next.sum();
        if !(total.is_finite() && total > 0.0) {
            warn!(
                date = %ctx.day.date,
                stage = stage.name,
                "Adjustment left no probability mass, using fallback triple"
            );
        }
        probs = next.normalized_or(ctx.fallback());
        trace!(
            stage = stage.name,
            blue = probs.blue,
            white = probs.white,
            red = probs.red,
            "Adjustment applied"
        );
    }
    probs
}

/// Scores a day from its context
#[must_use]
pub fn score_context(ctx: &ScoringContext) -> DayScore {
    if ctx.day.is_sunday() {
        return DayScore::certain_blue();
    }

    let probabilities = run_adjustments(ctx, raw_scores(ctx).into_probabilities());
    DayScore {
        probabilities,
        color: probabilities.argmax(),
    }
}

/// Scores a day given its Z (if known) and the quota before the decision
pub fn score_day(
    date: NaiveDate,
    z: Option<f64>,
    quota: QuotaState,
    holidays: &dyn HolidayOracle,
) -> DayScore {
    score_context(&ScoringContext::new(date, z, quota, holidays))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FrenchPublicHolidays;

    const TOL: f64 = 1e-4;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn score(d: NaiveDate, z: Option<f64>, red: u32, white: u32, blue: u32) -> DayScore {
        score_day(d, z, QuotaState::new(red, white, blue), &FrenchPublicHolidays)
    }

    fn assert_probs(actual: ColorProbability, blue: f64, white: f64, red: f64) {
        assert!(
            (actual.blue - blue).abs() < TOL
                && (actual.white - white).abs() < TOL
                && (actual.red - red).abs() < TOL,
            "got {actual:?}, expected ({blue}, {white}, {red})"
        );
    }

    #[test]
    fn test_thresholds() {
        let t = Thresholds::new(136, &QuotaState::new(22, 43, 250));
        assert!((t.blue_white - (4.0 - 0.015 * 136.0 - 0.026 * 65.0)).abs() < 1e-12);
        assert!((t.white_red - (3.15 - 1.36 - 0.031 * 22.0)).abs() < 1e-12);
        assert!((t.blue_white_adjusted() - (t.blue_white - 0.30)).abs() < 1e-12);
    }

    #[test]
    fn test_sunday_is_certain_blue() {
        for z in [None, Some(-2.0), Some(0.0), Some(5.0)] {
            let s = score(date(2026, 1, 18), z, 22, 43, 300);
            assert_eq!(s.probabilities, ColorProbability::CERTAIN_BLUE);
            assert_eq!(s.color, TempoColor::Blue);
        }
    }

    #[test]
    fn test_low_tension_january_weekday() {
        let s = score(date(2026, 1, 14), Some(-1.0), 22, 43, 250);
        assert_eq!(s.color, TempoColor::Blue);
        let p = s.probabilities;
        assert!(p.blue > p.white && p.white > p.red && p.red > 0.0);
        assert_probs(p, 0.72778, 0.17338, 0.09884);
    }

    #[test]
    fn test_medium_tension_january_weekday() {
        let s = score(date(2026, 1, 14), Some(0.5), 22, 43, 250);
        assert_eq!(s.color, TempoColor::White);
        assert_probs(s.probabilities, 0.35144, 0.55345, 0.09511);
    }

    #[test]
    fn test_high_tension_january_weekday() {
        let s = score(date(2026, 1, 14), Some(1.5), 15, 30, 200);
        assert_eq!(s.color, TempoColor::Red);
        assert_probs(s.probabilities, 0.18640, 0.20786, 0.60574);

        let s = score(date(2026, 1, 14), Some(2.5), 15, 30, 200);
        assert_eq!(s.color, TempoColor::Red);
        assert_probs(s.probabilities, 0.09088, 0.16775, 0.74138);
    }

    #[test]
    fn test_saturday_never_red() {
        let s = score(date(2026, 1, 17), Some(2.5), 15, 30, 200);
        assert_eq!(s.probabilities.red, 0.0);
        assert_eq!(s.color, TempoColor::White);
        assert_probs(s.probabilities, 0.40570, 0.59430, 0.0);
    }

    #[test]
    fn test_summer_day_without_stock() {
        let s = score(date(2026, 7, 15), Some(0.0), 0, 0, 120);
        assert_probs(s.probabilities, 1.0, 0.0, 0.0);
        assert_eq!(s.color, TempoColor::Blue);
    }

    #[test]
    fn test_november_floors() {
        let s = score(date(2025, 11, 12), Some(0.8), 22, 43, 280);
        assert_eq!(s.color, TempoColor::Blue);
        assert_probs(s.probabilities, 0.55, 0.35, 0.10);

        let s = score(date(2025, 11, 15), Some(0.8), 22, 43, 280);
        assert_probs(s.probabilities, 0.62237, 0.37763, 0.0);
    }

    #[test]
    fn test_march_late_season() {
        let s = score(date(2026, 3, 16), Some(0.9), 10, 12, 150);
        assert_eq!(s.color, TempoColor::Blue);
        assert_probs(s.probabilities, 0.42440, 0.24398, 0.33162);

        let s = score(date(2026, 3, 31), Some(1.0), 1, 5, 120);
        assert_eq!(s.color, TempoColor::White);
        assert_probs(s.probabilities, 0.33898, 0.49576, 0.16525);
    }

    #[test]
    fn test_unknown_z_uses_priors_only() {
        let s = score(date(2026, 1, 14), None, 22, 43, 250);
        assert_eq!(s.color, TempoColor::Blue);
        assert_probs(s.probabilities, 0.64185, 0.17834, 0.17982);
    }

    #[test]
    fn test_holiday_never_red() {
        // Christmas on a Thursday, high tension
        let s = score(date(2025, 12, 25), Some(2.5), 22, 43, 200);
        assert_eq!(s.probabilities.red, 0.0);
        assert!(s.probabilities.is_valid());
    }

    #[test]
    fn test_exhausted_red_stock_never_red() {
        let s = score(date(2026, 2, 3), Some(3.0), 0, 10, 150);
        assert_eq!(s.probabilities.red, 0.0);
        assert_ne!(s.color, TempoColor::Red);
    }

    #[test]
    fn test_probabilities_valid_over_grid() {
        let start = date(2025, 9, 1);
        for d in start.iter_days().step_by(5).take(73) {
            for z in [None, Some(-2.5), Some(0.0), Some(0.7), Some(1.2), Some(1.8), Some(4.0)] {
                for (red, white, blue) in [(22, 43, 300), (3, 8, 120), (0, 0, 40), (12, 39, 200)] {
                    let s = score(d, z, red, white, blue);
                    assert!(s.probabilities.is_valid(), "{d} {z:?} {red}/{white}/{blue}");
                    for c in TempoColor::ALL {
                        if !crate::calendar::allowed(c, d, &FrenchPublicHolidays) {
                            assert_eq!(s.probabilities.get(c), 0.0, "{d} {c}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_seasonal_red_factor() {
        assert_eq!(seasonal_red_factor(date(2025, 11, 3)), 0.7);
        assert_eq!(seasonal_red_factor(date(2025, 12, 5)), 0.5);
        assert_eq!(seasonal_red_factor(date(2025, 12, 15)), 0.7);
        assert_eq!(seasonal_red_factor(date(2025, 12, 22)), 1.0);
        assert_eq!(seasonal_red_factor(date(2026, 2, 10)), 1.05);
        assert_eq!(seasonal_red_factor(date(2026, 3, 15)), 0.7);
        assert_eq!(seasonal_red_factor(date(2026, 3, 16)), 0.4);
        assert_eq!(seasonal_red_factor(date(2026, 6, 1)), 1.0);
    }
}
