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

//! Forecast configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. CLI flags are applied on top by the front-end.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tempocast_types::{BLUE_TOTAL, QuotaState, RED_TOTAL, TempoColor, WHITE_TOTAL};
use tracing::info;

use crate::anomaly::DEFAULT_WINDOW_DAYS;
use crate::error::{ForecastError, ForecastResult};

/// Annotated configuration with every default spelled out
pub const EXAMPLE_CONFIG: &str = r#"# TempoCast configuration

[quota]
# Days left in the current Tempo year
red_remaining = 22
white_remaining = 43
blue_remaining = 300

[override]
# Color already published for tomorrow (blue | white | red)
# confirmed_day1 = "white"
# Publication time after which the confirmed color replaces the model (HH:MM)
cutoff = "06:45"

[anomaly]
# Trailing history used for the tension score
window_days = 365
# Static mean/std (MW) used when no history is available at all
mean_mw = 46050.0
std_mw = 2160.0

[weather]
enabled = true
# Temperature bias only for offsets 1..=horizon_days
horizon_days = 3

[generation]
# Offsets whose missing generation is estimated from tomorrow's ratio
ratio_estimate_offsets = [2, 3]
# Upper bound of the generation/consumption ratio
max_ratio = 0.5
"#;

/// Parses an `HH:MM` wall-clock time
pub fn parse_hhmm(value: &str) -> ForecastResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ForecastError::InvalidTime(value.to_owned()))
}

/// Complete forecast configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub quota: QuotaConfig,

    #[serde(default, rename = "override")]
    pub confirmation: ConfirmationConfig,

    #[serde(default)]
    pub anomaly: AnomalyConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Remaining days at the start of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_red_remaining")]
    pub red_remaining: u32,

    #[serde(default = "default_white_remaining")]
    pub white_remaining: u32,

    #[serde(default = "default_blue_remaining")]
    pub blue_remaining: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            red_remaining: default_red_remaining(),
            white_remaining: default_white_remaining(),
            blue_remaining: default_blue_remaining(),
        }
    }
}

impl QuotaConfig {
    #[must_use]
    pub fn state(&self) -> QuotaState {
        QuotaState::new(self.red_remaining, self.white_remaining, self.blue_remaining)
    }
}

fn default_red_remaining() -> u32 {
    RED_TOTAL
}
fn default_white_remaining() -> u32 {
    WHITE_TOTAL
}
fn default_blue_remaining() -> u32 {
    BLUE_TOTAL
}

/// Day-ahead color published by the grid operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Accepts `blue|white|red` and `bleu|blanc|rouge`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_day1: Option<TempoColor>,

    /// `HH:MM` after which the confirmed color wins
    #[serde(default = "default_cutoff")]
    pub cutoff: String,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            confirmed_day1: None,
            cutoff: default_cutoff(),
        }
    }
}

impl ConfirmationConfig {
    pub fn cutoff_time(&self) -> ForecastResult<NaiveTime> {
        parse_hhmm(&self.cutoff)
    }
}

fn default_cutoff() -> String {
    "06:45".to_owned()
}

/// Tension score settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Static mean (MW) when no baseline exists
    #[serde(default = "default_mean_mw")]
    pub mean_mw: f64,

    /// Static standard deviation (MW) when no baseline exists
    #[serde(default = "default_std_mw")]
    pub std_mw: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            mean_mw: default_mean_mw(),
            std_mw: default_std_mw(),
        }
    }
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}
fn default_mean_mw() -> f64 {
    46_050.0
}
fn default_std_mw() -> f64 {
    2_160.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_weather_horizon")]
    pub horizon_days: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            horizon_days: default_weather_horizon(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_weather_horizon() -> u32 {
    3
}

/// Estimation of missing renewable generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_ratio_offsets")]
    pub ratio_estimate_offsets: Vec<u32>,

    #[serde(default = "default_max_ratio")]
    pub max_ratio: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ratio_estimate_offsets: default_ratio_offsets(),
            max_ratio: default_max_ratio(),
        }
    }
}

fn default_ratio_offsets() -> Vec<u32> {
    vec![2, 3]
}
fn default_max_ratio() -> f64 {
    0.5
}

impl ForecastConfig {
    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ForecastError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        info!(path = %path.display(), "Loaded forecast configuration");
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> ForecastResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ForecastResult<()> {
        let totals = [
            ("quota.red_remaining", self.quota.red_remaining, RED_TOTAL),
            ("quota.white_remaining", self.quota.white_remaining, WHITE_TOTAL),
            ("quota.blue_remaining", self.quota.blue_remaining, BLUE_TOTAL),
        ];
        for (field, value, total) in totals {
            if value > total {
                return Err(ForecastError::invalid_config(
                    field,
                    format!("{value} exceeds the season total of {total}"),
                ));
            }
        }

        self.confirmation.cutoff_time()?;

        if self.anomaly.window_days <= 0 {
            return Err(ForecastError::invalid_config(
                "anomaly.window_days",
                "must be positive",
            ));
        }
        if !(self.anomaly.std_mw.is_finite() && self.anomaly.std_mw > 0.0) {
            return Err(ForecastError::invalid_config(
                "anomaly.std_mw",
                "must be a positive number",
            ));
        }
        if self.weather.horizon_days > 6 {
            return Err(ForecastError::invalid_config(
                "weather.horizon_days",
                "the horizon only spans 6 days",
            ));
        }
        if !(0.0..=1.0).contains(&self.generation.max_ratio) {
            return Err(ForecastError::invalid_config(
                "generation.max_ratio",
                "must be within [0, 1]",
            ));
        }
        if let Some(offset) = self
            .generation
            .ratio_estimate_offsets
            .iter()
            .find(|o| !(2..=6).contains(*o))
        {
            return Err(ForecastError::invalid_config(
                "generation.ratio_estimate_offsets",
                format!("offset {offset} is outside 2..=6"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        let config = ForecastConfig::from_toml_str("").unwrap();
        assert_eq!(config, ForecastConfig::default());
        assert_eq!(config.quota.state(), QuotaState::full_season());
        assert_eq!(config.generation.ratio_estimate_offsets, vec![2, 3]);
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = ForecastConfig::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, ForecastConfig::default());
        assert_eq!(
            config.confirmation.cutoff_time().unwrap(),
            NaiveTime::from_hms_opt(6, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_french_confirmed_color() {
        let config = ForecastConfig::from_toml_str(
            r#"
            [quota]
            red_remaining = 10

            [override]
            confirmed_day1 = "rouge"
            "#,
        )
        .unwrap();
        assert_eq!(config.confirmation.confirmed_day1, Some(TempoColor::Red));
        assert_eq!(config.quota.red_remaining, 10);
        assert_eq!(config.quota.white_remaining, WHITE_TOTAL);
    }

    #[test]
    fn test_rejects_quota_above_total() {
        let err = ForecastConfig::from_toml_str("[quota]\nred_remaining = 30\n").unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig { ref field, .. } if field == "quota.red_remaining"));
    }

    #[test]
    fn test_rejects_bad_cutoff() {
        let err = ForecastConfig::from_toml_str("[override]\ncutoff = \"quarter to seven\"\n")
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidTime(_)));
    }

    #[test]
    fn test_rejects_negative_quota() {
        let err = ForecastConfig::from_toml_str("[quota]\nwhite_remaining = -1\n").unwrap_err();
        assert!(matches!(err, ForecastError::Toml(_)));
    }

    #[test]
    fn test_rejects_unknown_color() {
        let err =
            ForecastConfig::from_toml_str("[override]\nconfirmed_day1 = \"green\"\n").unwrap_err();
        assert!(matches!(err, ForecastError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[weather]\nenabled = false\nhorizon_days = 2").unwrap();
        let config = ForecastConfig::from_file(file.path()).unwrap();
        assert!(!config.weather.enabled);
        assert_eq!(config.weather.horizon_days, 2);
    }

    #[test]
    fn test_from_missing_file() {
        let err = ForecastConfig::from_file("/nonexistent/tempocast.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tempocast.toml"));
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("07:00").unwrap(), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert!(parse_hhmm("25:00").is_err());
    }
}
