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

//! JSON input snapshot served to the engine through in-memory providers.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tempocast_core::{
    AnnualForecast, BaselinePoint, DailyExtremes, DemandProvider, HolidayOracle, Providers,
    StaticBaseline, WeatherProvider, national_mean_temperature,
};
use tracing::{debug, info};

/// Everything a forecast run reads, captured at one point in time
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    /// Date the snapshot was taken for
    #[serde(default)]
    pub today: Option<NaiveDate>,

    /// Consumption forecast per date (MW)
    #[serde(default)]
    pub consumption_mw: BTreeMap<NaiveDate, f64>,

    /// Renewable generation forecast per date (MW)
    #[serde(default)]
    pub generation_mw: BTreeMap<NaiveDate, f64>,

    /// National temperature per date (°C)
    #[serde(default)]
    pub temperature_c: BTreeMap<NaiveDate, f64>,

    /// Per-station extremes aligned with the reference station table,
    /// used for dates missing from `temperature_c`
    #[serde(default)]
    pub station_extremes: BTreeMap<NaiveDate, Vec<Option<DailyExtremes>>>,

    /// Daily baseline series
    #[serde(default)]
    pub baseline: Vec<BaselinePoint>,

    /// Weekly forecast blocks, expanded when `baseline` is empty
    #[serde(default)]
    pub annual_forecasts: Vec<AnnualForecast>,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
        let snapshot = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;
        info!(
            path = %path.display(),
            consumption_days = snapshot.consumption_mw.len(),
            baseline_points = snapshot.baseline.len(),
            "Loaded input snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Split into provider implementations
    #[must_use]
    pub fn into_sources(self) -> SnapshotSources {
        let baseline = if self.baseline.is_empty() {
            StaticBaseline::from_annual_forecasts(&self.annual_forecasts)
        } else {
            StaticBaseline {
                points: self.baseline,
            }
        };
        debug!(points = baseline.points.len(), "Baseline series ready");

        SnapshotSources {
            demand: SnapshotDemand {
                consumption: self.consumption_mw,
                generation: self.generation_mw,
            },
            weather: SnapshotWeather {
                national: self.temperature_c,
                stations: self.station_extremes,
            },
            baseline,
        }
    }
}

/// Consumption and generation maps
#[derive(Debug, Clone, Default)]
pub struct SnapshotDemand {
    consumption: BTreeMap<NaiveDate, f64>,
    generation: BTreeMap<NaiveDate, f64>,
}

impl DemandProvider for SnapshotDemand {
    fn consumption_mw(&self, date: NaiveDate) -> Option<f64> {
        self.consumption.get(&date).copied()
    }

    fn generation_mw(&self, date: NaiveDate) -> Option<f64> {
        self.generation.get(&date).copied()
    }
}

/// National temperatures, falling back to the station-weighted mean
#[derive(Debug, Clone, Default)]
pub struct SnapshotWeather {
    national: BTreeMap<NaiveDate, f64>,
    stations: BTreeMap<NaiveDate, Vec<Option<DailyExtremes>>>,
}

impl WeatherProvider for SnapshotWeather {
    fn national_temperature(&self, date: NaiveDate) -> Option<f64> {
        self.national.get(&date).copied().or_else(|| {
            self.stations
                .get(&date)
                .and_then(|readings| national_mean_temperature(readings))
        })
    }
}

/// Owned providers built from a [`Snapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotSources {
    pub demand: SnapshotDemand,
    pub weather: SnapshotWeather,
    pub baseline: StaticBaseline,
}

impl SnapshotSources {
    /// Borrow as engine providers
    pub fn providers<'a>(&'a self, holidays: &'a dyn HolidayOracle) -> Providers<'a> {
        Providers {
            demand: &self.demand,
            baseline: &self.baseline,
            weather: Some(&self.weather),
            holidays,
        }
    }
}
