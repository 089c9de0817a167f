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

//! End-to-end horizon runs against in-memory providers

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate, NaiveTime};
use tempocast_core::{
    BaselinePoint, BaselineProvider, DemandProvider, ForecastConfig, FrenchPublicHolidays,
    HolidayOracle, Providers, WeatherProvider, mask, run_forecast, score_day, shrink,
};
use tempocast_types::{
    ColorProbability, ConfidenceLabel, DecisionRecord, DecisionSource, QuotaState, TempoColor,
    ZSource,
};

const MEAN_MW: f64 = 46_050.0;
const STD_MW: f64 = 2_160.0;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Consumption forecast expressed as tension against the static national mean
#[derive(Default)]
struct MemoryDemand {
    consumption: HashMap<NaiveDate, f64>,
    generation: HashMap<NaiveDate, f64>,
}

impl MemoryDemand {
    fn with_z(today: NaiveDate, z_by_offset: &[Option<f64>]) -> Self {
        let mut demand = Self::default();
        for (offset, z) in (1u64..).zip(z_by_offset) {
            let day = today.checked_add_days(Days::new(offset)).unwrap();
            if let Some(z) = z {
                demand.consumption.insert(day, MEAN_MW + z * STD_MW);
                demand.generation.insert(day, 0.0);
            }
        }
        demand
    }
}

impl DemandProvider for MemoryDemand {
    fn consumption_mw(&self, date: NaiveDate) -> Option<f64> {
        self.consumption.get(&date).copied()
    }

    fn generation_mw(&self, date: NaiveDate) -> Option<f64> {
        self.generation.get(&date).copied()
    }
}

#[derive(Default)]
struct MemoryBaseline(Vec<BaselinePoint>);

impl BaselineProvider for MemoryBaseline {
    fn daily_means(&self) -> Vec<BaselinePoint> {
        self.0.clone()
    }
}

struct FixedTemperature(f64);

impl WeatherProvider for FixedTemperature {
    fn national_temperature(&self, _date: NaiveDate) -> Option<f64> {
        Some(self.0)
    }
}

struct ExtraHolidays(HashSet<NaiveDate>);

impl HolidayOracle for ExtraHolidays {
    fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.0.contains(&date) || FrenchPublicHolidays.is_public_holiday(date)
    }
}

fn forecast(
    today: NaiveDate,
    now: NaiveTime,
    demand: &MemoryDemand,
    baseline: &MemoryBaseline,
    weather: Option<&dyn WeatherProvider>,
    config: &ForecastConfig,
) -> Vec<DecisionRecord> {
    let providers = Providers {
        demand,
        baseline,
        weather,
        holidays: &FrenchPublicHolidays,
    };
    run_forecast(today, now, &providers, config).unwrap()
}

fn config_with_quota(red: u32, white: u32, blue: u32) -> ForecastConfig {
    let mut config = ForecastConfig::default();
    config.quota.red_remaining = red;
    config.quota.white_remaining = white;
    config.quota.blue_remaining = blue;
    config
}

fn assert_valid(p: &ColorProbability) {
    assert!(p.is_valid(), "invalid probability triple {p:?}");
}

#[test]
fn test_winter_week_respects_calendar() {
    // Monday; the horizon runs Tuesday 13 to Sunday 18
    let today = date(2026, 1, 12);
    let demand = MemoryDemand::with_z(
        today,
        &[Some(1.5), Some(2.5), Some(2.5), Some(2.5), Some(2.5), Some(2.5)],
    );
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        None,
        &config_with_quota(15, 30, 200),
    );

    assert_eq!(records.len(), 6);
    for (offset, record) in (1u32..).zip(&records) {
        assert_eq!(record.offset, offset);
        assert_eq!(record.z_source, Some(ZSource::StaticFallback));
        assert_valid(record.probabilities.as_ref().unwrap());
    }

    let saturday = &records[4];
    assert_eq!(saturday.date, date(2026, 1, 17));
    assert_eq!(saturday.probabilities.unwrap().red, 0.0);
    assert_ne!(saturday.color, Some(TempoColor::Red));

    let sunday = &records[5];
    assert_eq!(sunday.date, date(2026, 1, 18));
    assert_eq!(sunday.color, Some(TempoColor::Blue));
    assert_eq!(sunday.probabilities, Some(ColorProbability::CERTAIN_BLUE));
    assert_eq!(sunday.confidence.score, Some(5));
    assert_eq!(sunday.confidence.label, ConfidenceLabel::VeryHigh);

    // Very tense weekday at the start of the horizon
    assert_eq!(records[0].color, Some(TempoColor::Red));

    let json = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["z_source"], "fallback_std");
    assert_eq!(json["source"], "model");
}

#[test]
fn test_quota_consumed_once_per_known_day() {
    let today = date(2026, 1, 12);
    let demand = MemoryDemand::with_z(
        today,
        &[Some(2.5), Some(0.5), None, Some(2.5), Some(-1.0), Some(0.0)],
    );
    let start = QuotaState::new(3, 10, 150);
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        None,
        &config_with_quota(start.red, start.white, start.blue),
    );

    let mut previous = start;
    for record in &records {
        let after = record.quota_after;
        match record.color {
            Some(color) => {
                assert_eq!(previous.remaining(color) - 1, after.remaining(color));
                for other in TempoColor::ALL.into_iter().filter(|c| *c != color) {
                    assert_eq!(previous.remaining(other), after.remaining(other));
                }
            }
            None => assert_eq!(previous, after),
        }
        previous = after;
    }

    let unknown = &records[2];
    assert!(!unknown.is_known());
    assert_eq!(unknown.color, None);
    assert_eq!(unknown.probabilities, None);
    assert_eq!(unknown.confidence.score, None);
    assert_eq!(unknown.confidence.label, ConfidenceLabel::Unavailable);

    let known = records.iter().filter(|r| r.is_known()).count();
    let consumed = (start.red + start.white + start.blue)
        - (previous.red + previous.white + previous.blue);
    assert_eq!(consumed as usize, known);
}

#[test]
fn test_exhausted_red_stock_stays_at_zero() {
    let today = date(2026, 1, 12);
    let demand = MemoryDemand::with_z(today, &[Some(3.0); 6]);
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        None,
        &config_with_quota(0, 43, 250),
    );

    for record in &records {
        assert_eq!(record.quota_after.red, 0);
        assert_valid(record.probabilities.as_ref().unwrap());
    }
}

#[test]
fn test_final_probabilities_are_mask_fixed_points() {
    let today = date(2026, 1, 12);
    let demand = MemoryDemand::with_z(
        today,
        &[Some(0.2), Some(1.2), Some(1.8), Some(0.9), Some(2.4), Some(1.0)],
    );
    let weather = FixedTemperature(-3.0);
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        Some(&weather),
        &ForecastConfig::default(),
    );

    for record in &records {
        let probs = record.probabilities.unwrap();
        let remasked = mask(record.date, probs, &FrenchPublicHolidays);
        for color in TempoColor::ALL {
            assert!((remasked.get(color) - probs.get(color)).abs() < 1e-12);
        }
        assert_eq!(record.color, Some(probs.argmax()));
    }

    // Temperature only fetched for the first three offsets
    assert!(records[..3].iter().all(|r| r.temperature_c == Some(-3.0)));
    assert!(records[3..].iter().all(|r| r.temperature_c.is_none()));
}

#[test]
fn test_public_holiday_never_red() {
    // Wednesday 11 November 2026 is Armistice Day
    let today = date(2026, 11, 9);
    let demand = MemoryDemand::with_z(today, &[Some(2.5); 6]);
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        None,
        &ForecastConfig::default(),
    );

    let armistice = &records[1];
    assert_eq!(armistice.date, date(2026, 11, 11));
    let probs = armistice.probabilities.unwrap();
    assert_eq!(probs.red, 0.0);
    assert_eq!(armistice.color, Some(probs.argmax()));
    assert_ne!(armistice.color, Some(TempoColor::Red));
}

#[test]
fn test_custom_holiday_oracle_masks_red() {
    let wednesday = date(2026, 1, 14);
    let holidays = ExtraHolidays(HashSet::from([wednesday]));
    let quota = QuotaState::new(15, 30, 200);

    let regular = score_day(wednesday, Some(2.5), quota, &FrenchPublicHolidays);
    assert!(regular.probabilities.red > 0.5);

    let holiday = score_day(wednesday, Some(2.5), quota, &holidays);
    let masked = mask(wednesday, holiday.probabilities, &holidays);
    assert_eq!(masked.red, 0.0);
    assert_valid(&masked);
}

#[test]
fn test_summer_days_never_red() {
    let today = date(2026, 7, 13);
    let demand = MemoryDemand::with_z(today, &[Some(3.0); 6]);
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        None,
        &ForecastConfig::default(),
    );

    for record in &records {
        assert_eq!(record.probabilities.unwrap().red, 0.0);
        assert_ne!(record.color, Some(TempoColor::Red));
    }
}

#[test]
fn test_confirmed_color_after_cutoff() {
    let today = date(2026, 1, 12);
    let demand = MemoryDemand::with_z(today, &[Some(-1.0); 6]);
    let config = ForecastConfig::from_toml_str(
        r#"
[quota]
red_remaining = 10
white_remaining = 20
blue_remaining = 150

[override]
confirmed_day1 = "rouge"
cutoff = "06:45"
"#,
    )
    .unwrap();

    let records = forecast(today, at(7, 0), &demand, &MemoryBaseline::default(), None, &config);
    let tomorrow = &records[0];
    assert_eq!(tomorrow.color, Some(TempoColor::Red));
    assert_eq!(tomorrow.model_color, Some(TempoColor::Blue));
    assert_eq!(tomorrow.source, Some(DecisionSource::Confirmed));
    assert_eq!(tomorrow.probabilities, Some(ColorProbability::one_hot(TempoColor::Red)));
    assert_eq!(tomorrow.confidence.score, Some(5));
    assert_eq!(tomorrow.quota_after, QuotaState::new(9, 20, 150));

    // Later days never take the override
    assert!(records[1..].iter().all(|r| r.source == Some(DecisionSource::Model)));

    let early = forecast(today, at(6, 30), &demand, &MemoryBaseline::default(), None, &config);
    assert_eq!(early[0].source, Some(DecisionSource::Model));
    assert_eq!(early[0].color, Some(TempoColor::Blue));
    assert_eq!(early[0].quota_after, QuotaState::new(10, 20, 149));
}

#[test]
fn test_two_history_points_use_small_sample() {
    let today = date(2026, 1, 12);
    let baseline = MemoryBaseline(vec![
        BaselinePoint { date: date(2026, 1, 10), mean_mw: 50_000.0 },
        BaselinePoint { date: date(2026, 1, 11), mean_mw: 52_000.0 },
    ]);
    let demand = MemoryDemand::with_z(today, &[Some(1.0); 6]);
    let records = forecast(today, at(5, 0), &demand, &baseline, None, &ForecastConfig::default());

    for record in &records {
        assert_eq!(record.z_source, Some(ZSource::SmallSample));
        assert!(record.z.unwrap().is_finite());
    }
}

#[test]
fn test_far_days_are_flatter_than_scored() {
    let today = date(2026, 1, 12);
    let demand = MemoryDemand::with_z(today, &[Some(-1.0); 6]);
    let records = forecast(
        today,
        at(5, 0),
        &demand,
        &MemoryBaseline::default(),
        None,
        &config_with_quota(22, 43, 250),
    );

    // Wednesday 14 at offset 2, shrunk from the raw score
    let raw = score_day(date(2026, 1, 14), Some(-1.0), QuotaState::new(22, 43, 249), &FrenchPublicHolidays);
    let shrunk = records[1].probabilities.unwrap();
    assert!(shrunk.blue < raw.probabilities.blue);
    assert_eq!(records[1].color, Some(TempoColor::Blue));
}

#[test]
fn test_score_day_reference_points() {
    let wednesday = date(2026, 1, 14);
    let score = score_day(wednesday, Some(-1.0), QuotaState::new(22, 43, 250), &FrenchPublicHolidays);
    assert_eq!(score.color, TempoColor::Blue);
    assert!((score.probabilities.blue - 0.72778).abs() < 1e-4);
    assert!((score.probabilities.white - 0.17338).abs() < 1e-4);
    assert!((score.probabilities.red - 0.09884).abs() < 1e-4);

    let tense = score_day(wednesday, Some(2.5), QuotaState::new(15, 30, 200), &FrenchPublicHolidays);
    assert_eq!(tense.color, TempoColor::Red);
    assert!((tense.probabilities.red - 0.74138).abs() < 1e-4);
}

#[test]
fn test_shrink_bounds() {
    let p = ColorProbability::new(0.7, 0.2, 0.1);
    assert_eq!(shrink(p, 0.0), p);

    let flat = shrink(p, 1.0);
    for color in TempoColor::ALL {
        assert!((flat.get(color) - 1.0 / 3.0).abs() < 1e-12);
    }
}
