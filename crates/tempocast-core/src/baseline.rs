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

//! Daily baseline built from weekly consumption forecasts.
//!
//! Annual forecasts come as weekly aggregates grouped in yearly blocks. The
//! anomaly scorer wants one value per day, so every week is spread over its
//! seven days.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::traits::{BaselinePoint, BaselineProvider};

/// One week of an annual consumption forecast (all values in MW)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyLoad {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub average_monday_to_sunday: Option<f64>,
    #[serde(default)]
    pub average_saturday_to_friday: Option<f64>,
    #[serde(default)]
    pub weekly_minimum: Option<f64>,
    #[serde(default)]
    pub weekly_maximum: Option<f64>,
}

impl WeeklyLoad {
    /// Representative daily mean: the Monday-Sunday average, else the
    /// Saturday-Friday average, else the min/max midpoint
    #[must_use]
    pub fn mean_mw(&self) -> Option<f64> {
        let positive = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);

        positive(self.average_monday_to_sunday)
            .or_else(|| positive(self.average_saturday_to_friday))
            .or_else(|| {
                match (positive(self.weekly_minimum), positive(self.weekly_maximum)) {
                    (Some(min), Some(max)) => Some(0.5 * (min + max)),
                    _ => None,
                }
            })
    }
}

/// A yearly block of weekly forecasts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnualForecast {
    /// Inclusive lower bound of the block
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Exclusive upper bound of the block
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub weeks: Vec<WeeklyLoad>,
}

/// Spread weekly means over their days.
///
/// Days falling outside their block bounds are dropped. When blocks overlap,
/// the later block wins for a given date. Output is sorted by date.
#[must_use]
pub fn expand_weekly_means(blocks: &[AnnualForecast]) -> Vec<BaselinePoint> {
    let mut by_date = BTreeMap::new();

    for block in blocks {
        let mut weeks: Vec<&WeeklyLoad> = block.weeks.iter().collect();
        weeks.sort_by_key(|w| w.start_date);

        for week in weeks {
            let Some(mean) = week.mean_mw() else {
                continue;
            };
            for k in 0..7 {
                let date = week.start_date + Duration::days(k);
                let in_block = block.start_date.is_none_or(|s| date >= s)
                    && block.end_date.is_none_or(|e| date < e);
                if in_block {
                    by_date.insert(date, mean);
                }
            }
        }
    }

    by_date
        .into_iter()
        .map(|(date, mean_mw)| BaselinePoint { date, mean_mw })
        .collect()
}

/// In-memory baseline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticBaseline {
    pub points: Vec<BaselinePoint>,
}

impl StaticBaseline {
    #[must_use]
    pub fn from_annual_forecasts(blocks: &[AnnualForecast]) -> Self {
        Self {
            points: expand_weekly_means(blocks),
        }
    }
}

impl BaselineProvider for StaticBaseline {
    fn daily_means(&self) -> Vec<BaselinePoint> {
        let mut points = self.points.clone();
        points.sort_by_key(|p| p.date);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_mean_fallback_chain() {
        let mut w = WeeklyLoad {
            start_date: date(2025, 1, 6),
            weekly_minimum: Some(40_000.0),
            weekly_maximum: Some(60_000.0),
            ..WeeklyLoad::default()
        };
        assert_eq!(w.mean_mw(), Some(50_000.0));

        w.average_saturday_to_friday = Some(52_000.0);
        assert_eq!(w.mean_mw(), Some(52_000.0));

        w.average_monday_to_sunday = Some(55_000.0);
        assert_eq!(w.mean_mw(), Some(55_000.0));

        w.average_monday_to_sunday = Some(-1.0);
        assert_eq!(w.mean_mw(), Some(52_000.0));
    }

    #[test]
    fn test_expand_spreads_weeks_and_clips_to_block() {
        let block = AnnualForecast {
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2026, 1, 1)),
            weeks: vec![
                WeeklyLoad {
                    start_date: date(2025, 1, 6),
                    average_monday_to_sunday: Some(60_000.0),
                    ..WeeklyLoad::default()
                },
                WeeklyLoad {
                    start_date: date(2024, 12, 30),
                    average_monday_to_sunday: Some(58_000.0),
                    ..WeeklyLoad::default()
                },
                WeeklyLoad {
                    start_date: date(2025, 1, 13),
                    ..WeeklyLoad::default()
                },
            ],
        };

        let points = expand_weekly_means(&[block]);
        // Dec 30/31 clipped, Jan 1..=5 from the first week, Jan 6..=12 from the second
        assert_eq!(points.len(), 12);
        assert_eq!(points[0].date, date(2025, 1, 1));
        assert_eq!(points[0].mean_mw, 58_000.0);
        assert_eq!(points[11].date, date(2025, 1, 12));
        assert_eq!(points[11].mean_mw, 60_000.0);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_later_block_wins_on_overlap() {
        let week = |mean| WeeklyLoad {
            start_date: date(2025, 12, 29),
            average_monday_to_sunday: Some(mean),
            ..WeeklyLoad::default()
        };
        let a = AnnualForecast {
            weeks: vec![week(1.0)],
            ..AnnualForecast::default()
        };
        let b = AnnualForecast {
            weeks: vec![week(2.0)],
            ..AnnualForecast::default()
        };
        let points = expand_weekly_means(&[a, b]);
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.mean_mw == 2.0));
    }
}
