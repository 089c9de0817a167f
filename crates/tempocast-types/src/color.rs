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

//! Tempo day colors and the three-way probability triple attached to a day.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tolerance used when checking that a triple sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Daily price tier of the Tempo tariff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempoColor {
    /// Default, cheapest tier
    #[serde(alias = "bleu")]
    Blue,
    /// Intermediate tier
    #[serde(alias = "blanc")]
    White,
    /// Scarcest, most expensive tier
    #[serde(alias = "rouge")]
    Red,
}

impl TempoColor {
    /// Tie-break order used everywhere a ranking is needed
    pub const ALL: [TempoColor; 3] = [TempoColor::Blue, TempoColor::White, TempoColor::Red];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::White => "white",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for TempoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown Tempo color '{0}' (expected blue, white or red)")]
pub struct UnknownColorError(pub String);

impl FromStr for TempoColor {
    type Err = UnknownColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blue" | "bleu" => Ok(Self::Blue),
            "white" | "blanc" => Ok(Self::White),
            "red" | "rouge" => Ok(Self::Red),
            other => Err(UnknownColorError(other.to_owned())),
        }
    }
}

/// Belief about the color a day will eventually receive.
///
/// Every stage of the engine hands over a triple whose components lie in
/// `[0, 1]` and sum to one. Stages that move mass around go through
/// [`ColorProbability::normalized_or`], which also absorbs negative or NaN
/// components produced by aggressive transfers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorProbability {
    pub blue: f64,
    pub white: f64,
    pub red: f64,
}

impl ColorProbability {
    pub const CERTAIN_BLUE: Self = Self::new(1.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(blue: f64, white: f64, red: f64) -> Self {
        Self { blue, white, red }
    }

    #[must_use]
    pub fn uniform() -> Self {
        let third = 1.0 / 3.0;
        Self::new(third, third, third)
    }

    /// All mass on a single color
    #[must_use]
    pub fn one_hot(color: TempoColor) -> Self {
        match color {
            TempoColor::Blue => Self::new(1.0, 0.0, 0.0),
            TempoColor::White => Self::new(0.0, 1.0, 0.0),
            TempoColor::Red => Self::new(0.0, 0.0, 1.0),
        }
    }

    #[must_use]
    pub fn get(&self, color: TempoColor) -> f64 {
        match color {
            TempoColor::Blue => self.blue,
            TempoColor::White => self.white,
            TempoColor::Red => self.red,
        }
    }

    pub fn set(&mut self, color: TempoColor, value: f64) {
        match color {
            TempoColor::Blue => self.blue = value,
            TempoColor::White => self.white = value,
            TempoColor::Red => self.red = value,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.blue + self.white + self.red
    }

    /// Rescale to a unit sum.
    ///
    /// Negative and non-finite components are clamped to zero first. When
    /// nothing positive is left, `fallback` is returned instead.
    #[must_use]
    pub fn normalized_or(self, fallback: Self) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let (b, w, r) = (clamp(self.blue), clamp(self.white), clamp(self.red));
        let total = b + w + r;
        if total <= 0.0 {
            return fallback;
        }
        Self::new(b / total, w / total, r / total)
    }

    /// Color with the largest share. Blue wins any tie it is part of;
    /// between white and red alone, red wins the tie.
    #[must_use]
    pub fn argmax(&self) -> TempoColor {
        if self.blue >= self.white && self.blue >= self.red {
            TempoColor::Blue
        } else if self.red >= self.white {
            TempoColor::Red
        } else {
            TempoColor::White
        }
    }

    /// Colors sorted by decreasing probability, ties kept in blue/white/red order.
    #[must_use]
    pub fn ranked(&self) -> [(TempoColor, f64); 3] {
        let mut ranked = TempoColor::ALL.map(|c| (c, self.get(c)));
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Components in `[0, 1]` and summing to one within [`PROBABILITY_TOLERANCE`]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let in_range = |v: f64| (0.0..=1.0 + PROBABILITY_TOLERANCE).contains(&v);
        in_range(self.blue)
            && in_range(self.white)
            && in_range(self.red)
            && (self.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }
}
