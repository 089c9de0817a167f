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

//! Weather bias stage.
//!
//! A temperature anomaly `ΔT = forecast - norm` moves probability mass along a
//! fixed chain: mild days push red→white→blue, cold days blue→white→red. There
//! is never a direct red↔blue transfer.

use serde::{Deserialize, Serialize};
use tempocast_types::ColorProbability;

/// A reference weather station of the national temperature index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

const fn station(name: &'static str, latitude: f64, longitude: f64, weight: f64) -> Station {
    Station { name, latitude, longitude, weight }
}

/// Stations and weights of the national mean temperature
pub const STATIONS: [Station; 32] = [
    station("Abbeville", 50.1360, 1.8340, 1.0),
    station("Bale_Mulhouse", 47.5896, 7.5299, 2.0),
    station("Bordeaux_Merignac", 44.8283, -0.7156, 4.0),
    station("Boulogne", 50.6589, 1.6246, 1.0),
    station("Bourges", 47.0581, 2.3703, 4.2),
    station("Bourg_St_Maurice", 45.6170, 6.7680, 2.75),
    station("Brest_Guipavas", 48.4479, -4.4185, 4.2),
    station("Caen_Carpiquet", 49.1733, -0.4500, 2.5),
    station("Clermont_Ferrand_Aulnat", 45.7867, 3.1692, 2.75),
    station("Dijon_Longvic", 47.2689, 5.0883, 1.0),
    station("Le_Luc_Le_Cannet", 43.3847, 6.3872, 1.2),
    station("Lille_Lesquin", 50.5619, 3.0894, 3.0),
    station("Limoges_Bellegarde", 45.8614, 1.1794, 3.2),
    station("Lyon_St_Exupery", 45.7256, 5.0811, 5.5),
    station("Marseille_Marignane", 43.4372, 5.2150, 2.4),
    station("Montpellier_Frejorgues", 43.5762, 3.9630, 1.6),
    station("Nancy_Essey", 48.6921, 6.2303, 3.0),
    station("Nantes_Atlantique", 47.1532, -1.6107, 4.2),
    station("Nevers_Marzy", 46.9990, 3.1130, 1.5),
    station("Nice_Cote_dAzur", 43.6653, 7.2150, 3.6),
    station("Nimes_Courbessac", 43.8564, 4.4050, 2.4),
    station("Orange_Caritat", 44.1405, 4.8667, 1.2),
    station("Paris_Montsouris", 48.8218, 2.3376, 11.25),
    station("Perpignan_Rivesaltes", 42.7404, 2.8707, 1.6),
    station("Rennes_St_Jacques", 48.0695, -1.7348, 4.2),
    station("Saint_Auban", 44.0583, 5.9917, 1.2),
    station("Strasbourg_Entzheim", 48.5383, 7.6282, 1.0),
    station("Tarbes_Lourdes", 43.1786, -0.0064, 4.0),
    station("Toulouse_Blagnac", 43.6306, 1.3638, 1.6),
    station("Tours_Parcay_Meslay", 47.4322, 0.7276, 4.2),
    station("Trappes", 48.7742, 1.9936, 11.25),
    station("Troyes_Barberey", 48.3239, 4.0179, 1.5),
];

/// Daily minimum and maximum at one station (°C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyExtremes {
    pub tmin: f64,
    pub tmax: f64,
}

/// Weighted mean of `(tmin + tmax) / 2` over [`STATIONS`], rounded to 2 decimals.
///
/// `readings` is aligned with [`STATIONS`]; stations with no reading (or past
/// the end of the slice) are left out of the weights. `None` when nothing reported.
#[must_use]
pub fn national_mean_temperature(readings: &[Option<DailyExtremes>]) -> Option<f64> {
    let (sum, weights) = STATIONS
        .iter()
        .zip(readings)
        .filter_map(|(station, reading)| reading.map(|r| (station.weight, r)))
        .fold((0.0, 0.0), |(sum, weights), (weight, r)| {
            (sum + weight * (r.tmin + r.tmax) / 2.0, weights + weight)
        });

    (weights > 0.0).then(|| (sum / weights * 100.0).round() / 100.0)
}

/// Result of the weather stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherBias {
    pub probabilities: ColorProbability,
    /// Total probability mass moved along the chain
    pub shifted: f64,
}

/// Bounded shift size for a temperature anomaly
#[must_use]
pub fn weather_strength(delta_t: Option<f64>) -> f64 {
    let Some(delta) = delta_t else { return 0.0 };
    match delta.abs() {
        a if a < 0.5 => 0.0,
        a if a < 1.5 => 0.03,
        a if a < 3.0 => 0.06,
        _ => 0.09,
    }
}

/// Applies the weather chain for a temperature anomaly.
///
/// Mild: `min(s, red)` red→white, then `min(s, white)` white→blue.
/// Cold: `min(s, blue)` blue→white, then `min(s, white)` white→red.
#[must_use]
pub fn apply_weather_bias(probs: ColorProbability, delta_t: Option<f64>) -> WeatherBias {
    let strength = weather_strength(delta_t);
    let unchanged = WeatherBias { probabilities: probs, shifted: 0.0 };
    let Some(delta) = delta_t else { return unchanged };
    if strength <= 0.0 {
        return unchanged;
    }

    let ColorProbability { mut blue, mut white, mut red } = probs;
    let shifted = if delta > 0.0 {
        let first = strength.min(red);
        red -= first;
        white += first;
        let second = strength.min(white);
        white -= second;
        blue += second;
        first + second
    } else {
        let first = strength.min(blue);
        blue -= first;
        white += first;
        let second = strength.min(white);
        white -= second;
        red += second;
        first + second
    };

    WeatherBias {
        probabilities: ColorProbability::new(blue, white, red).normalized_or(probs),
        shifted,
    }
}
