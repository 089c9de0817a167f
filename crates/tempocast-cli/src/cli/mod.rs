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

//! CLI module for the batch forecaster.

pub mod args;
pub mod commands;
pub mod data_loaders;
pub mod formatters;

pub use args::{Cli, Commands, RunArgs};
pub use commands::{execute_run, resolve_config, run_at};
pub use data_loaders::{Snapshot, SnapshotSources};
pub use formatters::{JsonFormatter, TableFormatter};
