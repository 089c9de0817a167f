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

//! TempoCast decision engine: six-day Tempo color forecast under quota and
//! calendar constraints.

pub mod anomaly;
pub mod baseline;
pub mod calendar;
pub mod confidence;
pub mod config;
pub mod error;
pub mod horizon;
pub mod inputs;
pub mod norms;
pub mod pressure;
pub mod scoring;
pub mod simulator;
pub mod traits;
pub mod weather;

pub use anomaly::{TensionScore, static_tension_score, tension_score};
pub use baseline::{AnnualForecast, StaticBaseline, WeeklyLoad, expand_weekly_means};
pub use calendar::{CalendarDate, FrenchPublicHolidays, allowed, count_red_eligible_days_left};
pub use config::{EXAMPLE_CONFIG, ForecastConfig, parse_hhmm};
pub use error::{ForecastError, ForecastResult};
pub use horizon::{horizon_lambda, mask, shrink};
pub use inputs::{DayInputs, HORIZON_DAYS, Providers, assemble_horizon};
pub use pressure::{RedPressure, SeasonPeriod};
pub use scoring::{DayScore, ScoringContext, score_day};
pub use simulator::{DayAheadOverride, decide_day, run_forecast, simulate};
pub use traits::{BaselinePoint, BaselineProvider, DemandProvider, HolidayOracle, WeatherProvider};
pub use weather::{DailyExtremes, STATIONS, apply_weather_bias, national_mean_temperature};
