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

//! Subcommand execution.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use tempocast_core::{ForecastConfig, FrenchPublicHolidays, parse_hhmm, run_forecast};
use tracing::info;

use super::args::RunArgs;
use super::data_loaders::Snapshot;
use super::formatters::{JsonFormatter, TableFormatter};

/// Config file (or defaults) with the command-line overrides applied
pub fn resolve_config(args: &RunArgs) -> Result<ForecastConfig> {
    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_file(path)?,
        None => ForecastConfig::default(),
    };

    if let Some(red) = args.red {
        config.quota.red_remaining = red;
    }
    if let Some(white) = args.white {
        config.quota.white_remaining = white;
    }
    if let Some(blue) = args.blue {
        config.quota.blue_remaining = blue;
    }
    if args.confirmed.is_some() {
        config.confirmation.confirmed_day1 = args.confirmed;
    }

    config.validate().context("Invalid command-line overrides")?;
    Ok(config)
}

/// Run one horizon and render it, reading the clock in `--timezone`
pub fn execute_run(args: &RunArgs) -> Result<String> {
    let tz: Tz = args
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid --timezone '{}': {e}", args.timezone))?;
    run_at(args, Utc::now().with_timezone(&tz).fixed_offset())
}

/// [`execute_run`] with an explicit wall clock
pub fn run_at(args: &RunArgs, clock: DateTime<FixedOffset>) -> Result<String> {
    let config = resolve_config(args)?;
    let snapshot = Snapshot::load(&args.input)?;

    let today = args
        .today
        .or(snapshot.today)
        .unwrap_or_else(|| clock.date_naive());
    let now = match &args.now {
        Some(value) => parse_hhmm(value).context("Invalid --now value")?,
        None => clock.time(),
    };

    let sources = snapshot.into_sources();
    let holidays = FrenchPublicHolidays;
    let providers = sources.providers(&holidays);
    let records = run_forecast(today, now, &providers, &config)?;

    let decided = records.iter().filter(|r| r.is_known()).count();
    info!(%today, %now, decided, "Forecast complete");

    let start = config.quota.state();
    match args.format.as_str() {
        "json" => JsonFormatter::format_forecast(&records, today, start, clock),
        _ => Ok(TableFormatter::format_forecast(&records, today, start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempocast_types::TempoColor;

    fn args(input: PathBuf) -> RunArgs {
        RunArgs {
            input,
            config: None,
            red: None,
            white: None,
            blue: None,
            confirmed: None,
            today: None,
            now: None,
            timezone: "Europe/Paris".to_owned(),
            format: "json".to_owned(),
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[quota]\nred_remaining = 20\nwhite_remaining = 40\n").unwrap();

        let mut run = args(PathBuf::from("unused.json"));
        run.config = Some(file.path().to_path_buf());
        run.red = Some(5);
        run.confirmed = Some(TempoColor::White);

        let config = resolve_config(&run).unwrap();
        assert_eq!(config.quota.red_remaining, 5);
        assert_eq!(config.quota.white_remaining, 40);
        assert_eq!(config.quota.blue_remaining, 300);
        assert_eq!(config.confirmation.confirmed_day1, Some(TempoColor::White));
    }

    #[test]
    fn test_override_above_season_total_rejected() {
        let mut run = args(PathBuf::from("unused.json"));
        run.white = Some(50);
        assert!(resolve_config(&run).is_err());
    }
}
