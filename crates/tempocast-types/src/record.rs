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

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::color::{ColorProbability, TempoColor};
use crate::quota::QuotaState;

/// How the tension score of a day was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZSource {
    /// Position within the trailing-year q40..q80 band
    #[serde(rename = "rte_like_quantiles")]
    Quantile,
    /// Mean/std estimate on fewer than three history points
    #[serde(rename = "fallback_std_small_sample")]
    SmallSample,
    /// No history at all, static national mean/std
    #[serde(rename = "fallback_std")]
    StaticFallback,
}

/// Provenance of the renewable generation estimate for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    /// Published by the data provider
    Observed,
    /// Scaled from the day-ahead generation/consumption ratio
    RatioEstimated,
    /// Last known value reused
    CarriedOver,
}

impl GenerationSource {
    /// Estimated or recycled data, which lowers forecast skill
    #[must_use]
    pub fn is_low_confidence(self) -> bool {
        matches!(self, Self::RatioEstimated | Self::CarriedOver)
    }
}

/// Who fixed the color of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Model,
    /// Published by the grid operator and supplied by the caller
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
    Unavailable,
}

impl ConfidenceLabel {
    #[must_use]
    pub fn from_score(score: Option<u8>) -> Self {
        match score {
            None => Self::Unavailable,
            Some(5..) => Self::VeryHigh,
            Some(4) => Self::High,
            Some(3) => Self::Medium,
            Some(2) => Self::Low,
            Some(_) => Self::VeryLow,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryHigh => "very high",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very low",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Confidence attached to a forecast day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
    /// 1 (very low) to 5 (very high), `None` when it cannot be computed
    pub score: Option<u8>,
    pub label: ConfidenceLabel,
    pub rationale: String,
}

impl Confidence {
    #[must_use]
    pub fn new(score: Option<u8>, rationale: impl Into<String>) -> Self {
        Self {
            score,
            label: ConfidenceLabel::from_score(score),
            rationale: rationale.into(),
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(None, "Confidence unavailable (missing data).")
    }
}

/// Outcome for one forecast day. Built once by the simulator, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub date: NaiveDate,
    /// Days ahead of today (1..=6)
    pub offset: u32,

    /// Forecast consumption (MW)
    pub consumption_mw: Option<f64>,
    /// Renewable generation estimate (MW)
    pub generation_mw: Option<f64>,
    pub generation_source: Option<GenerationSource>,
    /// Consumption minus generation (MW)
    pub net_demand_mw: Option<f64>,

    pub z: Option<f64>,
    pub z_source: Option<ZSource>,

    /// National temperature forecast (°C)
    pub temperature_c: Option<f64>,
    /// 30-year norm for the calendar day (°C)
    pub temperature_norm_c: Option<f64>,
    pub delta_t: Option<f64>,
    /// Probability mass moved by the weather bias
    pub weather_shift: f64,

    /// `None` when the day could not be forecast
    pub color: Option<TempoColor>,
    /// Color of the base scorer before horizon and weather adjustments
    pub model_color: Option<TempoColor>,
    pub source: Option<DecisionSource>,
    pub probabilities: Option<ColorProbability>,

    /// Quota left after this day's decision
    pub quota_after: QuotaState,

    pub confidence: Confidence,
}

impl DecisionRecord {
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.color.is_some()
    }
}
