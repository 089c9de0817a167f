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

//! Anomaly scorer: turns a net consumption figure into a tension score Z.
//!
//! Z measures how far a day's demand sits above the "normal" band of the
//! trailing year rather than being a Gaussian z-score:
//!
//! ```text
//! Z = (net - q40) / max(q80 - q40, 1e-6)
//! ```
//!
//! where q40/q80 are percentiles of the daily means preceding the target
//! date. With fewer than three usable history points a plain mean/std
//! estimate is used instead, and with no history at all a static national
//! mean/std.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempocast_types::ZSource;

use crate::traits::BaselinePoint;

/// Trailing window of history considered for the quantile band
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Minimum history size for the quantile estimator
const MIN_QUANTILE_SAMPLES: usize = 3;

const MIN_BAND_WIDTH_MW: f64 = 1e-6;

/// Tension score with the estimator that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TensionScore {
    pub z: f64,
    pub source: ZSource,
    /// History points that entered the estimate
    pub history_count: usize,
    /// Reference level (q40 or mean) in MW
    pub reference_mw: f64,
    /// Band width (q80 - q40 or std) in MW
    pub scale_mw: f64,
}

/// Linear-interpolated order statistic of an already sorted slice
#[must_use]
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            #[expect(clippy::cast_precision_loss, reason = "history lengths are small")]
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "pos lies in [0, n-1]"
            )]
            let (low, high) = (pos.floor() as usize, pos.ceil() as usize);
            if low == high {
                return Some(sorted[low]);
            }
            #[expect(clippy::cast_precision_loss, reason = "index fits in f64")]
            let frac = pos - low as f64;
            Some(sorted[low] + frac * (sorted[high] - sorted[low]))
        }
    }
}

/// Positive daily means strictly before `target` and at most `window_days` old
fn history_window(target: NaiveDate, history: &[BaselinePoint], window_days: i64) -> Vec<f64> {
    history
        .iter()
        .filter(|p| p.date < target && (target - p.date).num_days() <= window_days)
        .map(|p| p.mean_mw)
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect()
}

/// Tension score of `net_mw` on `target` against the trailing baseline
#[must_use]
pub fn tension_score(
    target: NaiveDate,
    net_mw: f64,
    history: &[BaselinePoint],
    window_days: i64,
) -> TensionScore {
    let mut values = history_window(target, history, window_days);

    if values.len() < MIN_QUANTILE_SAMPLES {
        return small_sample_score(net_mw, &values);
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q40 = quantile(&values, 0.4).unwrap_or(net_mw);
    let q80 = quantile(&values, 0.8).unwrap_or(net_mw);
    let band = (q80 - q40).max(MIN_BAND_WIDTH_MW);

    TensionScore {
        z: (net_mw - q40) / band,
        source: ZSource::Quantile,
        history_count: values.len(),
        reference_mw: q40,
        scale_mw: band,
    }
}

/// Mean/std estimate used below three samples. The std uses Bessel's
/// correction and is floored at 1.0.
fn small_sample_score(net_mw: f64, values: &[f64]) -> TensionScore {
    #[expect(clippy::cast_precision_loss, reason = "at most two samples")]
    let n = values.len() as f64;
    let mean = if values.is_empty() {
        net_mw
    } else {
        values.iter().sum::<f64>() / n
    };
    let variance = if values.len() > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        1.0
    };
    let std = variance.sqrt().max(1.0);

    TensionScore {
        z: (net_mw - mean) / std,
        source: ZSource::SmallSample,
        history_count: values.len(),
        reference_mw: mean,
        scale_mw: std,
    }
}

/// Score against a fixed national mean/std when no baseline is available
#[must_use]
pub fn static_tension_score(net_mw: f64, mean_mw: f64, std_mw: f64) -> TensionScore {
    let std = if std_mw > 0.0 { std_mw } else { 1.0 };
    TensionScore {
        z: (net_mw - mean_mw) / std,
        source: ZSource::StaticFallback,
        history_count: 0,
        reference_mw: mean_mw,
        scale_mw: std,
    }
}
