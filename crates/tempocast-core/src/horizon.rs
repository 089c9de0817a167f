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

//! Horizon shrinkage and calendar masking.
//!
//! Forecast skill decays with lead time, so probabilities for distant days are
//! blended towards uniform before the calendar mask re-zeroes illegal colors.

use chrono::NaiveDate;
use tempocast_types::{ColorProbability, GenerationSource, TempoColor};

use crate::calendar::CalendarDate;
use crate::traits::HolidayOracle;

/// Extra shrinkage when the day's generation figure is an estimate
pub const LOW_CONFIDENCE_LAMBDA_BONUS: f64 = 0.10;
/// Upper bound on λ after the low-confidence bonus
pub const MAX_LAMBDA: f64 = 0.75;

/// Blend towards the uniform distribution by `lambda` (0 keeps the input,
/// 1 gives exactly one third each)
#[must_use]
pub fn shrink(probs: ColorProbability, lambda: f64) -> ColorProbability {
    let lambda = lambda.clamp(0.0, 1.0);
    if lambda <= 0.0 {
        return probs;
    }
    let third = 1.0 / 3.0;
    let blend = |p: f64| (1.0 - lambda) * p + lambda * third;
    ColorProbability::new(blend(probs.blue), blend(probs.white), blend(probs.red))
        .normalized_or(ColorProbability::uniform())
}

/// Shrinkage factor for a forecast offset.
///
/// Offsets 4 to 6 get [`LOW_CONFIDENCE_LAMBDA_BONUS`] more when generation
/// was estimated or carried over.
#[must_use]
pub fn horizon_lambda(offset: u32, generation: Option<GenerationSource>) -> f64 {
    let base = match offset {
        0 | 1 => 0.0,
        2 => 0.20,
        3 => 0.35,
        4 => 0.40,
        5 => 0.50,
        _ => 0.60,
    };
    let low_confidence = generation.is_some_and(GenerationSource::is_low_confidence);
    if offset >= 4 && low_confidence {
        (base + LOW_CONFIDENCE_LAMBDA_BONUS).min(MAX_LAMBDA)
    } else {
        base
    }
}

/// Zeroes calendar-illegal colors and renormalizes.
///
/// Sunday is certain blue. When no mass survives, Saturday falls back to
/// (0.65, 0.35, 0) and other days to (0.8, 0.2, 0).
#[must_use]
pub fn mask_day(day: &CalendarDate, mut probs: ColorProbability) -> ColorProbability {
    if day.is_sunday() {
        return ColorProbability::CERTAIN_BLUE;
    }
    for color in [TempoColor::White, TempoColor::Red] {
        if !day.allows(color) {
            probs.set(color, 0.0);
        }
    }
    let fallback = if day.is_saturday() {
        ColorProbability::new(0.65, 0.35, 0.0)
    } else {
        ColorProbability::new(0.8, 0.2, 0.0)
    };
    probs.normalized_or(fallback)
}

pub fn mask(date: NaiveDate, probs: ColorProbability, holidays: &dyn HolidayOracle) -> ColorProbability {
    mask_day(&CalendarDate::new(date, holidays), probs)
}
