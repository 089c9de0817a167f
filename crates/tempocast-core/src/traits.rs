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

//! Seams to the outside world.
//!
//! The engine never performs I/O. Whatever fetches forecasts, history,
//! temperatures or holiday calendars implements these traits and hands them
//! to [`crate::inputs::assemble_horizon`] and the calendar functions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the historical consumption baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselinePoint {
    pub date: NaiveDate,
    /// Daily mean net consumption (MW)
    pub mean_mw: f64,
}

/// Consumption and renewable generation forecasts
pub trait DemandProvider {
    /// National consumption forecast for `date` (MW).
    ///
    /// Implementations combining a short-term and a weekly forecast should
    /// prefer the short-term one.
    fn consumption_mw(&self, date: NaiveDate) -> Option<f64>;

    /// Renewable generation forecast for `date` (MW)
    fn generation_mw(&self, date: NaiveDate) -> Option<f64>;
}

/// Historical daily means used to normalize demand into a tension score
pub trait BaselineProvider {
    /// Chronologically ordered daily means
    fn daily_means(&self) -> Vec<BaselinePoint>;
}

/// Temperature forecasts
pub trait WeatherProvider {
    /// Expected national average temperature on `date` (°C)
    fn national_temperature(&self, date: NaiveDate) -> Option<f64>;
}

/// Public holiday calendar
pub trait HolidayOracle {
    fn is_public_holiday(&self, date: NaiveDate) -> bool;
}

impl<T: HolidayOracle + ?Sized> HolidayOracle for &T {
    fn is_public_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_public_holiday(date)
    }
}
