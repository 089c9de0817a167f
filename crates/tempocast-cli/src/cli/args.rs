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

//! CLI argument definitions using clap.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tempocast_types::TempoColor;

#[derive(Debug, Parser)]
#[command(name = "tempocast")]
#[command(author, version, about = "Tempo color forecast for the next six days")]
#[command(
    long_about = "Batch forecaster for the blue/white/red Tempo tariff.\n\
    \nReads a JSON snapshot of demand, generation, temperature and baseline data,\n\
    simulates the quota day by day and prints one decision per day (J+1..J+6).\n\
    \nExamples:\n  \
    tempocast run --input snapshot.json\n  \
    tempocast run --input snapshot.json --config tempocast.toml --red 12 --white 30\n  \
    tempocast example-config > tempocast.toml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast the next six days from an input snapshot
    #[command(
        long_about = "Run one forecast horizon.\n\
        \nQuota and confirmed color come from the config file and can be overridden\n\
        on the command line. Logs go to stderr (RUST_LOG), results to stdout.\n\
        \nExamples:\n  \
        tempocast run --input snapshot.json --format json\n  \
        tempocast run --input snapshot.json --confirmed rouge --now 07:10"
    )]
    Run(RunArgs),

    /// Print an annotated configuration file with every default
    ExampleConfig,
}

#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// JSON input snapshot
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to the JSON input snapshot",
        long_help = "JSON document with per-date consumption_mw, generation_mw and\n\
          temperature_c maps, optional station_extremes, and either a baseline\n\
          series or annual_forecasts weekly blocks.\n\
          \nExample: --input demos/snapshot.json"
    )]
    pub input: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "PATH", help = "Path to tempocast.toml (defaults apply when omitted)")]
    pub config: Option<PathBuf>,

    /// Red days left in the Tempo year
    #[arg(long, value_name = "N", help = "Override quota.red_remaining")]
    pub red: Option<u32>,

    /// White days left in the Tempo year
    #[arg(long, value_name = "N", help = "Override quota.white_remaining")]
    pub white: Option<u32>,

    /// Blue days left in the Tempo year
    #[arg(long, value_name = "N", help = "Override quota.blue_remaining")]
    pub blue: Option<u32>,

    /// Color already published for tomorrow
    #[arg(
        long,
        value_name = "COLOR",
        help = "Confirmed J+1 color (blue, white, red or bleu, blanc, rouge)"
    )]
    pub confirmed: Option<TempoColor>,

    /// Forecast reference date
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Today's date (defaults to the snapshot's, then the clock date)"
    )]
    pub today: Option<NaiveDate>,

    /// Wall-clock time compared against the confirmation cutoff
    #[arg(long, value_name = "HH:MM", help = "Current time (defaults to the clock time)")]
    pub now: Option<String>,

    /// Time zone of the wall clock
    #[arg(
        long,
        default_value = "Europe/Paris",
        value_name = "TZ",
        help = "IANA time zone used for the default date and time"
    )]
    pub timezone: String,

    /// Output format
    #[arg(long, default_value = "table",
          value_parser = ["table", "json"],
          help = "How to display results")]
    pub format: String,
}
