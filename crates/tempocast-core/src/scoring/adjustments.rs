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

//! Ordered probability adjustments applied after the raw scores.
//!
//! Each stage is a pure `fn(ColorProbability, &ScoringContext) -> ColorProbability`.
//! The caller renormalizes after every stage. Several floors overlap (the
//! deep-winter red transfer, the core-winter catch-up and the final winter
//! floor can all fire on the same day), so the order of [`ADJUSTMENTS`] is
//! part of the model and must not be shuffled.

use chrono::Datelike;
use tempocast_types::ColorProbability;

use super::ScoringContext;
use crate::calendar::is_red_season_month;
use crate::pressure::{linear_expected_red_remaining, linear_expected_white_remaining};

/// A named stage of the adjustment pipeline
#[derive(Clone, Copy)]
pub struct Adjustment {
    pub name: &'static str,
    pub apply: fn(ColorProbability, &ScoringContext) -> ColorProbability,
}

impl std::fmt::Debug for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adjustment").field("name", &self.name).finish()
    }
}

/// Adjustment stages in application order
pub const ADJUSTMENTS: &[Adjustment] = &[
    Adjustment { name: "blue_stock_pacing", apply: blue_stock_pacing },
    Adjustment { name: "white_stock_balance", apply: white_stock_balance },
    Adjustment { name: "late_season_stock_floors", apply: late_season_stock_floors },
    Adjustment { name: "march_floors", apply: march_floors },
    Adjustment { name: "march_red_boost", apply: march_red_boost },
    Adjustment { name: "deep_winter_red_transfer", apply: deep_winter_red_transfer },
    Adjustment { name: "core_winter_red_catch_up", apply: core_winter_red_catch_up },
    Adjustment { name: "low_tension_white_lean", apply: low_tension_white_lean },
    Adjustment { name: "blue_white_duel", apply: blue_white_duel },
    Adjustment { name: "saturday_shaping", apply: saturday_shaping },
    Adjustment { name: "saturday_red_guard", apply: saturday_red_guard },
    Adjustment { name: "winter_red_floor", apply: winter_red_floor },
    Adjustment { name: "november_red_floor", apply: november_red_floor },
    Adjustment { name: "november_white_floor", apply: november_white_floor },
];

/// Minimum red share for a given tension on a deep-winter working day
#[must_use]
pub fn red_floor_from_z(z: f64) -> f64 {
    if z < 1.0 {
        0.0
    } else if z < 1.10 {
        0.10
    } else if z < 1.20 {
        0.12
    } else if z < 1.25 {
        0.15
    } else if z < 1.30 {
        0.18
    } else {
        0.22
    }
}

/// Moves `amount` from blue and white into red, proportionally to their shares
fn take_into_red(mut p: ColorProbability, amount: f64) -> ColorProbability {
    let non_red = p.blue + p.white;
    if non_red > 0.0 {
        p.blue -= amount * (p.blue / non_red);
        p.white -= amount * (p.white / non_red);
    }
    p.red += amount;
    p
}

fn normalized(p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    p.normalized_or(ctx.fallback())
}

/// Blue stock far ahead of or behind the days left in the Tempo year
fn blue_stock_pacing(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let blue_share = f64::from(ctx.quota.blue) / ctx.days_left;

    if blue_share > 0.8 && p.blue < 0.8 {
        let shift = (p.white * 0.3).min(0.05);
        if shift > 0.0 {
            p.blue += shift;
            p.white -= shift;
        }
    }

    if blue_share < 0.4 {
        let shift = (p.blue * 0.4).min(0.05);
        if shift > 0.0 {
            p.blue -= shift;
            let non_blue = p.white + p.red;
            if non_blue > 0.0 {
                p.white += shift * (p.white / non_blue);
                p.red += shift * (p.red / non_blue);
            }
        }
    }
    p
}

/// Plenty of whites left calms red and near-blue white; few whites left
/// pushes blue towards white
fn white_stock_balance(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let Some(z) = ctx.z else { return p };
    if !is_red_season_month(ctx.day.date) || z >= 9.5 {
        return p;
    }

    if ctx.quota.white >= 38 {
        if p.red > 0.0 {
            let cut = p.red * 0.25;
            p.red -= cut;
            p.blue += cut * 0.4;
            p.white += cut * 0.6;
        }
        if z < ctx.thresholds.blue_white_adjusted() + 0.5 && p.white > 0.45 {
            let shift = (p.white - 0.40).min(0.08);
            p.white -= shift;
            p.blue += shift;
        }
    } else if ctx.quota.white <= 10 && p.blue > 0.30 {
        let shift = (p.blue - 0.25).min(0.15);
        p.blue -= shift;
        p.white += shift;
    }
    normalized(p, ctx)
}

/// From mid-February, stock behind an even spread gets a minimum share
fn late_season_stock_floors(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    if ctx.z.is_none() {
        return p;
    }
    let date = ctx.day.date;
    if !((date.month() == 2 && date.day() >= 15) || date.month() == 3) {
        return p;
    }

    if f64::from(ctx.quota.white) > linear_expected_white_remaining(date) + 3.0 {
        p.white = p.white.max(0.25);
    }
    if f64::from(ctx.quota.red) > linear_expected_red_remaining(date) + 2.0
        && ctx.quota.red > 5
        && ctx.red_allowed
        && ctx.day.is_weekday()
    {
        p.red = p.red.max(0.20);
    }
    normalized(p, ctx)
}

/// March 10 onwards: leftover whites and reds must still be placed
fn march_floors(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    if ctx.month() != 3 || ctx.day.day() < 10 {
        return p;
    }
    if ctx.quota.white > 3 {
        p.white = p.white.max(0.30);
    }
    if ctx.quota.red > 5 && ctx.red_allowed && ctx.day.is_weekday() {
        p.red = p.red.max(0.22);
    }
    normalized(p, ctx)
}

fn march_red_boost(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let tense = ctx.z.is_some_and(|z| z >= 0.7);
    if ctx.month() != 3 || !ctx.red_allowed || !ctx.day.is_weekday() || !tense {
        return p;
    }
    let add = ((p.blue + p.white) * 0.4).min(0.12);
    if add > 0.0 {
        p.red += add;
        p.blue -= add * 0.5;
        p.white -= add * 0.5;
    }
    normalized(p, ctx)
}

/// December to February working days: tension moves mass into red in three
/// steps (bounded transfer, red not behind blue, red floor)
fn deep_winter_red_transfer(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let Some(z) = ctx.z else { return p };
    if !ctx.in_deep_winter_months() || !ctx.day.is_weekday() || !ctx.red_allowed {
        return p;
    }

    let max_shift: f64 = if z >= 1.30 {
        0.30
    } else if z >= 1.00 {
        0.10
    } else if z >= 0.70 {
        0.05
    } else {
        0.03
    };
    let non_red = p.blue + p.white;
    if non_red > 0.0 {
        p = normalized(take_into_red(p, max_shift.min(non_red * 0.5)), ctx);
    }

    if z >= 1.20 && p.red < p.blue {
        let diff = (p.blue - p.red) * 0.6;
        p.blue -= diff;
        p.red += diff;
        p = normalized(p, ctx);
    }

    let floor = red_floor_from_z(z);
    if floor > 0.0 && p.red < floor {
        let non_red = p.blue + p.white;
        if non_red > 0.0 {
            let add = (floor - p.red).min(non_red * 0.4);
            if add > 0.0 {
                p = take_into_red(p, add);
            }
        }
        p = normalized(p, ctx);
    }
    p
}

/// Core winter with Z in [1.25, 1.9]: red must be able to pass white
fn core_winter_red_catch_up(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let in_band = ctx.z.is_some_and(|z| (1.25..=1.9).contains(&z));
    if ctx.core_winter && in_band && ctx.red_allowed && ctx.day.is_weekday() && p.red < p.white {
        let diff = (p.white - p.red) * 0.45;
        p.red += diff;
        p.white -= diff;
    }
    p
}

/// Low tension on a deep-winter working day leans white rather than blue
fn low_tension_white_lean(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let low = ctx.z.is_some_and(|z| (0.0..=0.6).contains(&z));
    if low
        && ctx.in_deep_winter_months()
        && ctx.day.is_weekday()
        && p.red < 0.05
        && p.blue > p.white
    {
        let shift = ((p.blue - p.white) * 0.5).min(0.08);
        p.blue -= shift;
        p.white += shift;
    }
    p
}

/// Without red, a dominant white gives some of its surplus back to blue.
/// Skipped in core winter once Z reaches 0.62.
fn blue_white_duel(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let winter_tension = ctx.core_winter && ctx.z.is_some_and(|z| z >= 0.62);
    if p.red > 0.0 || p.white <= 0.55 || winter_tension {
        return p;
    }

    let base = if matches!(ctx.month(), 11 | 3) { 0.2 } else { 0.15 };
    let factor = if (p.white - p.blue).abs() < 0.03 { base * 0.7 } else { base };
    let surplus = p.white - 0.45;
    if surplus > 0.0 {
        let shift = surplus * factor;
        p.white -= shift;
        p.blue += shift;
    }
    p
}

/// Saturday blue/white shaping: no extreme split outside November, a
/// blue-leaning but not fixed split in November
fn saturday_shaping(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    if !ctx.day.is_saturday() || p.red > 0.0 {
        return p;
    }

    let pair = p.blue + p.white;
    if pair > 0.0 {
        p.blue /= pair;
        p.white /= pair;
    }

    if ctx.month() == 11 {
        let blue_share = f64::from(ctx.quota.blue) / ctx.days_left;
        let white_share = f64::from(ctx.quota.white) / ctx.days_left;
        let boost: f64 = if blue_share >= 0.6 && white_share <= 0.25 { 0.24 } else { 0.20 };

        if p.white < 0.30 {
            let shift = boost.min((0.30 - p.white) * 0.6);
            if shift > 0.0 {
                p.white += shift;
                p.blue -= shift;
            }
        }
        if ctx.z.is_some_and(|z| z <= 5.3) && p.white > p.blue {
            let shift = (p.white - p.blue) * 0.7;
            p.white -= shift;
            p.blue += shift;
        }
    } else if p.blue > 0.65 {
        p.white += p.blue - 0.65;
        p.blue = 0.65;
    } else if p.white > 0.70 {
        p.blue += p.white - 0.70;
        p.white = 0.70;
    }
    normalized(p, ctx)
}

fn saturday_red_guard(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    if ctx.day.is_saturday() && p.red > 0.0 {
        p.red = 0.0;
    }
    p
}

/// Deep-winter working day with Z >= 1.10: red lifted to the Z floor,
/// capped by white
fn winter_red_floor(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let Some(z) = ctx.z else { return p };
    if !ctx.in_deep_winter_months() || !ctx.day.is_weekday() || !ctx.red_allowed || z < 1.10 {
        return p;
    }

    let target = p.red.max(p.white.min(red_floor_from_z(z)));
    if p.red < target {
        let diff = target - p.red;
        let (take_blue, take_white) = (diff * 0.5, diff * 0.3);
        if p.blue >= take_blue {
            p.blue -= take_blue;
        }
        if p.white >= take_white {
            p.white -= take_white;
        }
        p.red += diff;
    }
    normalized(p, ctx)
}

fn november_red_floor(p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let tense = ctx.z.is_some_and(|z| z >= 0.75);
    if ctx.month() != 11 || !ctx.red_allowed || !tense || p.red >= 0.10 {
        return p;
    }
    normalized(take_into_red(p, 0.10 - p.red), ctx)
}

fn november_white_floor(mut p: ColorProbability, ctx: &ScoringContext) -> ColorProbability {
    let warm = ctx.z.is_some_and(|z| z >= 0.20);
    if ctx.month() != 11 || !ctx.white_allowed || !warm || p.white >= 0.35 {
        return p;
    }
    let add = 0.35 - p.white;
    if p.blue >= add {
        p.blue -= add;
        p.white += add;
    }
    normalized(p, ctx)
}
