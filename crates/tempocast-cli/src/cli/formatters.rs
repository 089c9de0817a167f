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

//! Output formatters for forecast results.

use anyhow::Result;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tempocast_types::{DecisionRecord, DecisionSource, QuotaState, TempoColor};

/// Formatter for pretty ASCII tables
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for machine-readable JSON
#[derive(Debug)]
pub struct JsonFormatter;

fn day_key(offset: u32) -> String {
    format!("J+{offset}")
}

fn color_cell(color: Option<TempoColor>) -> Cell {
    match color {
        Some(TempoColor::Blue) => Cell::new("blue").fg(Color::Blue),
        Some(TempoColor::White) => Cell::new("white")
            .fg(Color::White)
            .add_attribute(Attribute::Bold),
        Some(TempoColor::Red) => Cell::new("red").fg(Color::Red).add_attribute(Attribute::Bold),
        None => Cell::new("unknown").fg(Color::DarkGrey),
    }
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.precision$}"))
}

fn percent(value: f64) -> String {
    format!("{:.1}", value * 100.0)
}

impl TableFormatter {
    /// Format one horizon as a table followed by a short summary
    #[must_use]
    pub fn format_forecast(records: &[DecisionRecord], today: NaiveDate, start: QuotaState) -> String {
        let mut output = String::new();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Day").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Color").add_attribute(Attribute::Bold),
            Cell::new("Blue\n(%)").add_attribute(Attribute::Bold),
            Cell::new("White\n(%)").add_attribute(Attribute::Bold),
            Cell::new("Red\n(%)").add_attribute(Attribute::Bold),
            Cell::new("Z").add_attribute(Attribute::Bold),
            Cell::new("ΔT\n(°C)").add_attribute(Attribute::Bold),
            Cell::new("Confidence").add_attribute(Attribute::Bold),
            Cell::new("Left\nR/W/B").add_attribute(Attribute::Bold),
        ]);

        for record in records {
            let (blue, white, red) = record.probabilities.map_or_else(
                || ("-".to_owned(), "-".to_owned(), "-".to_owned()),
                |p| (percent(p.blue), percent(p.white), percent(p.red)),
            );
            let mut color = color_cell(record.color);
            if record.source == Some(DecisionSource::Confirmed) {
                color = color.add_attribute(Attribute::Underlined);
            }
            let confidence = match record.confidence.score {
                Some(score) => format!("{score}/5 {}", record.confidence.label.as_str()),
                None => record.confidence.label.as_str().to_owned(),
            };
            let left = record.quota_after;

            table.add_row(vec![
                Cell::new(day_key(record.offset)),
                Cell::new(format!("{} {}", record.date.weekday(), record.date)),
                color,
                Cell::new(blue),
                Cell::new(white),
                Cell::new(red),
                Cell::new(optional(record.z, 2)),
                Cell::new(optional(record.delta_t, 1)),
                Cell::new(confidence),
                Cell::new(format!("{}/{}/{}", left.red, left.white, left.blue)),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        let known = records.iter().filter(|r| r.is_known()).count();
        let _ = writeln!(
            output,
            "Forecast from {today}: {known}/{} days decided | Start quota R/W/B: {}/{}/{}",
            records.len(),
            start.red,
            start.white,
            start.blue
        );
        for record in records.iter().filter(|r| r.is_known()) {
            let _ = writeln!(
                output,
                "  {}: {}",
                day_key(record.offset),
                record.confidence.rationale
            );
        }

        output
    }
}

#[derive(Serialize)]
struct ForecastReport<'a> {
    generated_at: String,
    today: NaiveDate,
    start_quota: QuotaState,
    #[serde(flatten)]
    days: BTreeMap<String, &'a DecisionRecord>,
}

impl JsonFormatter {
    /// Pretty JSON object keyed `J+1`..`J+6`
    pub fn format_forecast(
        records: &[DecisionRecord],
        today: NaiveDate,
        start: QuotaState,
        generated_at: DateTime<FixedOffset>,
    ) -> Result<String> {
        let report = ForecastReport {
            generated_at: generated_at.to_rfc3339(),
            today,
            start_quota: start,
            days: records.iter().map(|r| (day_key(r.offset), r)).collect(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempocast_types::{ColorProbability, Confidence};

    fn record(offset: u32, color: Option<TempoColor>) -> DecisionRecord {
        DecisionRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap() + chrono::Duration::days(offset.into()),
            offset,
            consumption_mw: color.map(|_| 60_000.0),
            generation_mw: None,
            generation_source: None,
            net_demand_mw: color.map(|_| 60_000.0),
            z: color.map(|_| 1.2),
            z_source: None,
            temperature_c: None,
            temperature_norm_c: None,
            delta_t: None,
            weather_shift: 0.0,
            color,
            model_color: color,
            source: color.map(|_| DecisionSource::Model),
            probabilities: color.map(ColorProbability::one_hot),
            quota_after: QuotaState::new(10, 20, 150),
            confidence: match color {
                Some(_) => Confidence::new(Some(4), "Solid signal."),
                None => Confidence::unavailable(),
            },
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()
    }

    #[test]
    fn test_table_lists_every_day() {
        let records = vec![record(1, Some(TempoColor::Red)), record(2, None)];
        let output = TableFormatter::format_forecast(&records, today(), QuotaState::new(11, 20, 150));

        assert!(output.contains("J+1"));
        assert!(output.contains("J+2"));
        assert!(output.contains("unknown"));
        assert!(output.contains("4/5 high"));
        assert!(output.contains("1/2 days decided"));
        assert!(output.contains("Start quota R/W/B: 11/20/150"));
    }

    #[test]
    fn test_json_keyed_by_offset() {
        let records = vec![record(1, Some(TempoColor::White)), record(2, None)];
        let generated_at = DateTime::parse_from_rfc3339("2026-01-12T07:00:00+01:00").unwrap();
        let json =
            JsonFormatter::format_forecast(&records, today(), QuotaState::full_season(), generated_at)
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["generated_at"], "2026-01-12T07:00:00+01:00");
        assert_eq!(value["J+1"]["color"], "white");
        assert_eq!(value["J+1"]["date"], "2026-01-13");
        assert!(value["J+2"]["color"].is_null());
        assert_eq!(value["J+2"]["confidence"]["label"], "unavailable");
        assert_eq!(value["start_quota"]["red"], 22);
    }
}
