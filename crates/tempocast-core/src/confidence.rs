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

//! Confidence scoring for a finished forecast day.
//!
//! Two rule tables read the same signals: an additive raw score bucketed into
//! 1..=5, and a rationale ladder. They are tuned separately on overlapping
//! conditions (duel, red risk, distance) and must stay independent.

use chrono::{Datelike, NaiveDate, Weekday};
use tempocast_types::{ColorProbability, Confidence, GenerationSource, TempoColor};

use crate::pressure::{linear_expected_red_remaining, linear_expected_white_remaining};

/// Rationale of a day whose color was published by the grid operator
pub const CONFIRMED_RATIONALE: &str = "Day-ahead color confirmed by the grid operator.";

/// Signals the confidence tables read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInput {
    pub date: NaiveDate,
    pub offset: u32,
    pub color: TempoColor,
    pub probabilities: ColorProbability,
    /// Red stock after this day's decision
    pub red_remaining: u32,
    /// White stock after this day's decision
    pub white_remaining: u32,
    pub generation: Option<GenerationSource>,
}

impl ConfidenceInput {
    fn is_sunday_blue(&self) -> bool {
        self.color == TempoColor::Blue && self.date.weekday() == Weekday::Sun
    }

    /// Red negligible and blue/white within 0.15 of each other
    fn is_blue_white_duel(&self) -> bool {
        let p = &self.probabilities;
        p.red < 0.15 && p.blue.max(p.white) >= 0.45 && (p.blue - p.white).abs() < 0.15
    }

    /// (leader, leader share, runner-up, gap)
    fn leaders(&self) -> (TempoColor, f64, TempoColor, f64) {
        let [(c1, p1), (c2, p2), _] = self.probabilities.ranked();
        (c1, p1, c2, p1 - p2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Distance {
    Near,
    Medium,
    Far,
}

impl Distance {
    fn from_offset(offset: u32) -> Self {
        match offset {
            0..=2 => Self::Near,
            3 => Self::Medium,
            _ => Self::Far,
        }
    }
}

fn leader_strength(p1: f64) -> f64 {
    if p1 >= 0.75 {
        3.0
    } else if p1 >= 0.65 {
        2.5
    } else if p1 >= 0.55 {
        2.0
    } else if p1 >= 0.48 {
        1.5
    } else if p1 >= 0.45 {
        1.2
    } else {
        0.7
    }
}

fn gap_term(gap: f64) -> f64 {
    if gap >= 0.25 {
        1.0
    } else if gap >= 0.15 {
        0.5
    } else if gap >= 0.08 {
        0.0
    } else if gap >= 0.04 {
        -0.5
    } else {
        -1.0
    }
}

fn lead_time_term(offset: u32) -> f64 {
    match offset {
        1 => 1.5,
        2 => 1.0,
        3 => 0.5,
        5 => -0.5,
        o if o >= 6 => -0.8,
        _ => 0.0,
    }
}

fn seasonal_fit(color: TempoColor, month: u32) -> f64 {
    match (color, month) {
        (TempoColor::Red, 1 | 2) => 0.3,
        (TempoColor::Red, 12 | 3) => 0.0,
        (TempoColor::Red, 11) => -0.45,
        (TempoColor::Red, _) => -1.0,
        (TempoColor::White, 11 | 12 | 1 | 2 | 3) => 0.1,
        (TempoColor::White, 4 | 10) => 0.0,
        (TempoColor::White, _) => -0.6,
        (TempoColor::Blue, 5..=9) => 0.4,
        (TempoColor::Blue, 4 | 10 | 11) => 0.1,
        (TempoColor::Blue, _) => -0.1,
    }
}

/// Red placed at awkward points of the season, keyed on the red stock left
fn red_refinement(date: NaiveDate, red_remaining: u32) -> f64 {
    let few = red_remaining <= 8;
    match (date.month(), date.day()) {
        (11, _) => -0.4,
        (12, d) if d < 10 => -0.3,
        (12, d) if d > 28 => {
            if red_remaining <= 6 {
                -0.4
            } else {
                -0.1
            }
        }
        (2, d) if d > 25 && few => -0.5,
        (2, d) if d > 20 && few => -0.3,
        (3, d) if d > 20 && few => -0.8,
        (3, d) if d > 15 && few => -0.5,
        _ => 0.0,
    }
}

/// Stock far from an even spread while the model picks the "wrong" color
fn stock_deviation(input: &ConfidenceInput) -> f64 {
    let red_delta = f64::from(input.red_remaining) - linear_expected_red_remaining(input.date);
    let white_delta =
        f64::from(input.white_remaining) - linear_expected_white_remaining(input.date);
    let is_red = input.color == TempoColor::Red;

    let mut term = 0.0;
    if (red_delta > 4.0 && !is_red) || (red_delta < -4.0 && is_red) {
        term -= 0.4;
    }
    if white_delta > 6.0 && input.color == TempoColor::Blue {
        term -= 0.3;
    }
    if white_delta < -6.0 && input.color != TempoColor::Blue {
        term -= 0.3;
    }
    term
}

fn provenance_penalty(offset: u32, generation: Option<GenerationSource>) -> f64 {
    if !generation.is_some_and(GenerationSource::is_low_confidence) {
        return 0.0;
    }
    match offset {
        o if o >= 4 => -1.0,
        3 => -0.6,
        _ => -0.3,
    }
}

/// Additive raw score before bucketing
#[must_use]
pub fn raw_confidence(input: &ConfidenceInput) -> f64 {
    let (_, p1, _, gap) = input.leaders();

    let mut raw = leader_strength(p1) + gap_term(gap) + lead_time_term(input.offset);
    raw += seasonal_fit(input.color, input.date.month());
    if input.color == TempoColor::Red {
        raw += red_refinement(input.date, input.red_remaining);
    }
    raw += stock_deviation(input);
    if input.is_blue_white_duel() {
        raw -= 0.4;
    }
    raw += provenance_penalty(input.offset, input.generation);

    if matches!(input.offset, 1 | 2) && p1 >= 0.46 && gap >= 0.03 && raw < 3.0 {
        raw += 0.5;
    }
    raw
}

/// Buckets a raw score at 0.5 / 1.5 / 2.5 / 3.5
#[must_use]
pub fn bucket(raw: f64) -> u8 {
    if raw <= 0.5 {
        1
    } else if raw <= 1.5 {
        2
    } else if raw <= 2.5 {
        3
    } else if raw <= 3.5 {
        4
    } else {
        5
    }
}

/// Confidence score from 1 to 5. A blue Sunday is always 5.
#[must_use]
pub fn confidence_score(input: &ConfidenceInput) -> u8 {
    if input.is_sunday_blue() {
        return 5;
    }
    bucket(raw_confidence(input))
}

fn capitalized(color: TempoColor) -> String {
    let name = color.as_str();
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Short explanation of a day's confidence
#[must_use]
pub fn confidence_rationale(input: &ConfidenceInput, score: u8) -> String {
    if input.is_sunday_blue() {
        return "Sunday, blue is certain.".to_owned();
    }

    let (c1, _, c2, gap) = input.leaders();
    let distance = Distance::from_offset(input.offset);

    if input.is_blue_white_duel() {
        return if score >= 3 {
            format!("Blue/white duel: {c1} ahead.")
        } else {
            "Very tight blue/white duel, forecast is sensitive.".to_owned()
        };
    }

    if input.color != TempoColor::Red && input.probabilities.red >= 0.25 {
        return if score >= 3 {
            format!("{} ahead, but red lurking.", capitalized(c1))
        } else {
            "Marked red risk, several scenarios remain open.".to_owned()
        };
    }

    match (score, distance) {
        (5.., Distance::Near) => format!("Near day, {c1} very likely."),
        (5.., Distance::Medium) => "Color clearly ahead, worth watching.".to_owned(),
        (5.., Distance::Far) => "Color ahead. Distant forecast.".to_owned(),
        (4, Distance::Near) => format!("Near day: {c1} clear favourite."),
        (4, Distance::Medium) => "Color ahead, worth watching.".to_owned(),
        (4, Distance::Far) => "Distant forecast, another color remains credible.".to_owned(),
        (3, _) if gap.abs() <= 0.15 => {
            format!("{}/{c2} duel, forecast is sensitive.", capitalized(c1))
        }
        (3, Distance::Far) => format!("Distant day, {c1} likely, a switch is possible."),
        (3, _) => format!("{} likely, but a switch is possible.", capitalized(c1)),
        (2, Distance::Far) => "Distant day, lots of uncertainty.".to_owned(),
        (2, _) if gap.abs() <= 0.08 => format!("Narrow gap: {c2} remains a real option."),
        (2, _) => "Several scenarios remain open.".to_owned(),
        (_, Distance::Far) => "Very distant forecast, very low reliability.".to_owned(),
        _ => "Colors very close, model hesitant.".to_owned(),
    }
}

/// Score, label and rationale for a model-decided day
#[must_use]
pub fn assess(input: &ConfidenceInput) -> Confidence {
    let score = confidence_score(input);
    Confidence::new(Some(score), confidence_rationale(input, score))
}

/// Confidence of a day whose color is already published
#[must_use]
pub fn confirmed() -> Confidence {
    Confidence::new(Some(5), CONFIRMED_RATIONALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempocast_types::ConfidenceLabel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(d: NaiveDate, offset: u32, probs: ColorProbability) -> ConfidenceInput {
        ConfidenceInput {
            date: d,
            offset,
            color: probs.argmax(),
            probabilities: probs,
            red_remaining: 12,
            white_remaining: 30,
            generation: Some(GenerationSource::Observed),
        }
    }

    #[test]
    fn test_bucket_breakpoints() {
        assert_eq!(bucket(-2.0), 1);
        assert_eq!(bucket(0.5), 1);
        assert_eq!(bucket(0.51), 2);
        assert_eq!(bucket(1.5), 2);
        assert_eq!(bucket(2.5), 3);
        assert_eq!(bucket(3.5), 4);
        assert_eq!(bucket(3.51), 5);
    }

    #[test]
    fn test_sunday_blue_is_certain() {
        let i = input(date(2026, 1, 18), 6, ColorProbability::CERTAIN_BLUE);
        assert_eq!(confidence_score(&i), 5);
        assert_eq!(confidence_rationale(&i, 5), "Sunday, blue is certain.");
    }

    #[test]
    fn test_clear_summer_blue_next_day() {
        let mut i = input(date(2026, 7, 15), 1, ColorProbability::new(0.9, 0.1, 0.0));
        i.red_remaining = 0;
        i.white_remaining = 0;
        // 3 + 1 + 1.5 + 0.4
        assert!((raw_confidence(&i) - 5.9).abs() < 1e-9);
        let c = assess(&i);
        assert_eq!(c.score, Some(5));
        assert_eq!(c.label, ConfidenceLabel::VeryHigh);
        assert_eq!(c.rationale, "Near day, blue very likely.");
    }

    #[test]
    fn test_blue_white_duel() {
        // 1.2 - 1 + 1 - 0.1 - 0.4, then the near-day nudge is skipped (gap < 0.03)
        let i = input(date(2026, 1, 14), 2, ColorProbability::new(0.46, 0.44, 0.10));
        assert!(i.is_blue_white_duel());
        assert_eq!(confidence_score(&i), 2);
        assert_eq!(
            confidence_rationale(&i, 2),
            "Very tight blue/white duel, forecast is sensitive."
        );
        assert_eq!(confidence_rationale(&i, 4), "Blue/white duel: blue ahead.");
    }

    #[test]
    fn test_red_lurking() {
        let i = input(date(2026, 1, 14), 1, ColorProbability::new(0.15, 0.55, 0.30));
        assert_eq!(confidence_rationale(&i, 4), "White ahead, but red lurking.");
        assert_eq!(
            confidence_rationale(&i, 2),
            "Marked red risk, several scenarios remain open."
        );
    }

    #[test]
    fn test_provenance_penalty_grows_with_offset() {
        let mut i = input(date(2026, 1, 14), 4, ColorProbability::new(0.7, 0.2, 0.1));
        let observed = raw_confidence(&i);
        i.generation = Some(GenerationSource::CarriedOver);
        assert!((observed - raw_confidence(&i) - 1.0).abs() < 1e-9);
        i.offset = 3;
        i.generation = Some(GenerationSource::Observed);
        let observed = raw_confidence(&i);
        i.generation = Some(GenerationSource::RatioEstimated);
        assert!((observed - raw_confidence(&i) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_late_march_red_is_doubted() {
        let mut i = input(date(2026, 3, 25), 2, ColorProbability::new(0.2, 0.2, 0.6));
        i.red_remaining = 3;
        let late = raw_confidence(&i);
        i.date = date(2026, 3, 12);
        let early = raw_confidence(&i);
        assert!(late < early);
    }

    #[test]
    fn test_distance_ladder() {
        let probs = ColorProbability::new(0.6, 0.3, 0.1);
        let near = input(date(2026, 7, 15), 1, probs);
        let far = input(date(2026, 7, 15), 5, probs);
        assert_eq!(confidence_rationale(&near, 3), "Blue likely, but a switch is possible.");
        assert_eq!(
            confidence_rationale(&far, 3),
            "Distant day, blue likely, a switch is possible."
        );
        assert_eq!(confidence_rationale(&far, 1), "Very distant forecast, very low reliability.");
        assert_eq!(confidence_rationale(&near, 1), "Colors very close, model hesitant.");
    }

    #[test]
    fn test_confirmed() {
        let c = confirmed();
        assert_eq!(c.score, Some(5));
        assert_eq!(c.rationale, CONFIRMED_RATIONALE);
    }
}
