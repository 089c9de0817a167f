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

//! # Sequential Day Simulator
//!
//! Threads the quota through the horizon. Each known day is scored on the
//! quota left by the previous days, then commits exactly one decrement, so a
//! red placed on J+1 raises nothing but lowers the red pressure seen on J+2.
//!
//! Per day:
//!
//! 1. Score on the quota snapshot and mask by calendar (model color)
//! 2. Shrink towards uniform for offsets 2+ and mask again
//! 3. Weather bias, mask, argmax
//! 4. Day-ahead override when the color is published and the cutoff passed
//! 5. Consume one day of the final color

use chrono::{NaiveDate, NaiveTime};
use tempocast_types::{
    ColorProbability, Confidence, DecisionRecord, DecisionSource, QuotaState, TempoColor,
};
use tracing::info;

use crate::confidence::{self, ConfidenceInput};
use crate::config::ForecastConfig;
use crate::error::ForecastResult;
use crate::horizon::{horizon_lambda, mask_day, shrink};
use crate::inputs::{DayInputs, Providers, assemble_horizon};
use crate::scoring::{ScoringContext, score_context};
use crate::traits::HolidayOracle;
use crate::weather::apply_weather_bias;

/// Day-ahead color published by the grid operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAheadOverride {
    pub color: TempoColor,
    /// Publication time; before it the model keeps deciding
    pub cutoff: NaiveTime,
}

impl DayAheadOverride {
    fn applies(&self, offset: u32, now: NaiveTime) -> bool {
        offset == 1 && now >= self.cutoff
    }
}

fn unknown_record(day: &DayInputs, quota: QuotaState) -> DecisionRecord {
    DecisionRecord {
        date: day.date,
        offset: day.offset,
        consumption_mw: day.consumption_mw,
        generation_mw: day.generation_mw,
        generation_source: day.generation_source,
        net_demand_mw: day.net_demand_mw,
        z: day.z(),
        z_source: day.tension.map(|t| t.source),
        temperature_c: day.temperature_c,
        temperature_norm_c: day.temperature_norm_c,
        delta_t: day.delta_t,
        weather_shift: 0.0,
        color: None,
        model_color: None,
        source: None,
        probabilities: None,
        quota_after: quota,
        confidence: Confidence::unavailable(),
    }
}

/// Decides one day on the quota left by the previous days
pub fn decide_day(
    day: &DayInputs,
    quota: QuotaState,
    day_ahead: Option<DayAheadOverride>,
    now: NaiveTime,
    holidays: &dyn HolidayOracle,
) -> DecisionRecord {
    if day.consumption_mw.is_none() {
        return unknown_record(day, quota);
    }

    let ctx = ScoringContext::new(day.date, day.z(), quota, holidays);
    let model = mask_day(&ctx.day, score_context(&ctx).probabilities);
    let model_color = model.argmax();

    let lambda = horizon_lambda(day.offset, day.generation_source);
    let shrunk = if day.offset >= 2 {
        mask_day(&ctx.day, shrink(model, lambda))
    } else {
        model
    };

    let weather = apply_weather_bias(shrunk, day.delta_t);
    let mut probabilities = mask_day(&ctx.day, weather.probabilities);
    let mut color = probabilities.argmax();
    let mut source = DecisionSource::Model;

    if let Some(published) = day_ahead
        && published.applies(day.offset, now)
    {
        color = published.color;
        probabilities = ColorProbability::one_hot(color);
        source = DecisionSource::Confirmed;
    }

    let quota_after = quota.consume(color);
    let confidence = match source {
        DecisionSource::Confirmed => confidence::confirmed(),
        DecisionSource::Model => confidence::assess(&ConfidenceInput {
            date: day.date,
            offset: day.offset,
            color,
            probabilities,
            red_remaining: quota_after.red,
            white_remaining: quota_after.white,
            generation: day.generation_source,
        }),
    };

    info!(
        offset = day.offset,
        date = %day.date,
        z = ?day.z(),
        lambda,
        weather_shift = weather.shifted,
        model = %model_color,
        ?source,
        confidence = ?confidence.score,
        "Day decided: {color} (blue={:.3} white={:.3} red={:.3})",
        probabilities.blue,
        probabilities.white,
        probabilities.red
    );

    DecisionRecord {
        date: day.date,
        offset: day.offset,
        consumption_mw: day.consumption_mw,
        generation_mw: day.generation_mw,
        generation_source: day.generation_source,
        net_demand_mw: day.net_demand_mw,
        z: day.z(),
        z_source: day.tension.map(|t| t.source),
        temperature_c: day.temperature_c,
        temperature_norm_c: day.temperature_norm_c,
        delta_t: day.delta_t,
        weather_shift: weather.shifted,
        color: Some(color),
        model_color: Some(model_color),
        source: Some(source),
        probabilities: Some(probabilities),
        quota_after,
        confidence,
    }
}

/// Runs the horizon as a fold over the ordered days, threading only the quota
pub fn simulate(
    days: &[DayInputs],
    start: QuotaState,
    day_ahead: Option<DayAheadOverride>,
    now: NaiveTime,
    holidays: &dyn HolidayOracle,
) -> Vec<DecisionRecord> {
    days.iter()
        .scan(start, |quota, day| {
            let record = decide_day(day, *quota, day_ahead, now, holidays);
            *quota = record.quota_after;
            Some(record)
        })
        .collect()
}

/// Assembles the horizon after `today` and simulates it with the configured
/// starting quota and day-ahead override
pub fn run_forecast(
    today: NaiveDate,
    now: NaiveTime,
    providers: &Providers<'_>,
    config: &ForecastConfig,
) -> ForecastResult<Vec<DecisionRecord>> {
    let cutoff = config.confirmation.cutoff_time()?;
    let day_ahead = config
        .confirmation
        .confirmed_day1
        .map(|color| DayAheadOverride { color, cutoff });

    let days = assemble_horizon(today, providers, config);
    let start = config.quota.state();
    info!(
        %today,
        red = start.red,
        white = start.white,
        blue = start.blue,
        confirmed = ?day_ahead.map(|d| d.color),
        "Running forecast horizon"
    );
    Ok(simulate(&days, start, day_ahead, now, providers.holidays))
}
