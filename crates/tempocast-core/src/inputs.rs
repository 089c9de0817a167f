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

//! Per-day inputs for the forecast horizon.
//!
//! Everything that does not depend on the quota is computed here, once, before
//! the simulator threads the quota through the days.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tempocast_types::GenerationSource;
use tracing::{debug, warn};

use crate::anomaly::{TensionScore, static_tension_score, tension_score};
use crate::config::ForecastConfig;
use crate::norms::temperature_norm;
use crate::traits::{BaselinePoint, BaselineProvider, DemandProvider, HolidayOracle, WeatherProvider};

/// Number of days forecast after today
pub const HORIZON_DAYS: u32 = 6;

/// External collaborators of a forecast run
#[derive(Clone, Copy)]
pub struct Providers<'a> {
    pub demand: &'a dyn DemandProvider,
    pub baseline: &'a dyn BaselineProvider,
    pub weather: Option<&'a dyn WeatherProvider>,
    pub holidays: &'a dyn HolidayOracle,
}

impl std::fmt::Debug for Providers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("weather", &self.weather.is_some())
            .finish_non_exhaustive()
    }
}

/// Quota-independent inputs of one forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayInputs {
    pub date: NaiveDate,
    pub offset: u32,
    pub consumption_mw: Option<f64>,
    pub generation_mw: Option<f64>,
    pub generation_source: Option<GenerationSource>,
    /// Consumption minus generation (consumption alone without generation)
    pub net_demand_mw: Option<f64>,
    pub tension: Option<TensionScore>,
    pub temperature_c: Option<f64>,
    pub temperature_norm_c: Option<f64>,
    /// Forecast minus norm
    pub delta_t: Option<f64>,
}

impl DayInputs {
    #[must_use]
    pub fn z(&self) -> Option<f64> {
        self.tension.map(|t| t.z)
    }
}

/// Date `offset` days after `today`
#[must_use]
pub fn horizon_date(today: NaiveDate, offset: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MAX)
}

/// Generation figure and provenance for one day.
///
/// `last_known` carries the most recent observed or estimated value.
fn resolve_generation(
    today: NaiveDate,
    offset: u32,
    consumption: Option<f64>,
    demand: &dyn DemandProvider,
    config: &ForecastConfig,
    last_known: &mut Option<f64>,
) -> (Option<f64>, Option<GenerationSource>) {
    let date = horizon_date(today, offset);

    if let Some(generation) = demand.generation_mw(date) {
        *last_known = Some(generation);
        return (Some(generation), Some(GenerationSource::Observed));
    }
    let Some(consumption) = consumption else {
        return (None, None);
    };

    if config.generation.ratio_estimate_offsets.contains(&offset) {
        let next_day = horizon_date(today, 1);
        if let (Some(cons_j1), Some(gen_j1)) =
            (demand.consumption_mw(next_day), demand.generation_mw(next_day))
            && cons_j1 > 0.0
        {
            let ratio = (gen_j1 / cons_j1).clamp(0.0, config.generation.max_ratio);
            let estimate = consumption * ratio;
            *last_known = Some(estimate);
            return (Some(estimate), Some(GenerationSource::RatioEstimated));
        }
    }

    match *last_known {
        Some(previous) => (Some(previous), Some(GenerationSource::CarriedOver)),
        None => (None, None),
    }
}

fn tension_for(
    date: NaiveDate,
    net_mw: f64,
    history: &[BaselinePoint],
    config: &ForecastConfig,
) -> TensionScore {
    if history.is_empty() {
        static_tension_score(net_mw, config.anomaly.mean_mw, config.anomaly.std_mw)
    } else {
        tension_score(date, net_mw, history, config.anomaly.window_days)
    }
}

/// Builds the inputs of offsets 1 to [`HORIZON_DAYS`] after `today`
pub fn assemble_horizon(
    today: NaiveDate,
    providers: &Providers<'_>,
    config: &ForecastConfig,
) -> Vec<DayInputs> {
    let history = providers.baseline.daily_means();
    if history.is_empty() {
        warn!("No baseline history, tension scores use the static national mean");
    }

    let mut last_generation = None;
    (1..=HORIZON_DAYS)
        .map(|offset| {
            let date = horizon_date(today, offset);
            let consumption_mw = providers.demand.consumption_mw(date);
            let (generation_mw, generation_source) = resolve_generation(
                today,
                offset,
                consumption_mw,
                providers.demand,
                config,
                &mut last_generation,
            );

            let net_demand_mw = consumption_mw.map(|c| c - generation_mw.unwrap_or(0.0));
            let tension = net_demand_mw.map(|net| tension_for(date, net, &history, config));

            let temperature_c = if config.weather.enabled && offset <= config.weather.horizon_days {
                providers.weather.and_then(|w| w.national_temperature(date))
            } else {
                None
            };
            let temperature_norm_c = temperature_norm(date);
            let delta_t = temperature_c.zip(temperature_norm_c).map(|(t, n)| t - n);

            if consumption_mw.is_none() {
                warn!(offset, date = %date, "No consumption forecast, color will be unknown");
            }
            debug!(
                offset,
                date = %date,
                net_mw = ?net_demand_mw,
                generation = ?generation_source,
                z = ?tension.map(|t| t.z),
                delta_t = ?delta_t,
                "Assembled day inputs"
            );

            DayInputs {
                date,
                offset,
                consumption_mw,
                generation_mw,
                generation_source,
                net_demand_mw,
                tension,
                temperature_c,
                temperature_norm_c,
                delta_t,
            }
        })
        .collect()
}
