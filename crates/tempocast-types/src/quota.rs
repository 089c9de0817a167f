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

use serde::{Deserialize, Serialize};

use crate::color::TempoColor;

/// Red days granted per Tempo year
pub const RED_TOTAL: u32 = 22;
/// White days granted per Tempo year
pub const WHITE_TOTAL: u32 = 43;
/// Blue days per Tempo year
pub const BLUE_TOTAL: u32 = 300;

/// Remaining color days for the current Tempo year.
///
/// Threaded through the horizon by the simulator and decremented once per
/// decided day. Counters saturate at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub red: u32,
    pub white: u32,
    pub blue: u32,
}

impl Default for QuotaState {
    fn default() -> Self {
        Self::full_season()
    }
}

impl QuotaState {
    #[must_use]
    pub const fn new(red: u32, white: u32, blue: u32) -> Self {
        Self { red, white, blue }
    }

    /// Quota at the start of a Tempo year
    #[must_use]
    pub const fn full_season() -> Self {
        Self::new(RED_TOTAL, WHITE_TOTAL, BLUE_TOTAL)
    }

    #[must_use]
    pub fn remaining(&self, color: TempoColor) -> u32 {
        match color {
            TempoColor::Blue => self.blue,
            TempoColor::White => self.white,
            TempoColor::Red => self.red,
        }
    }

    /// State after spending one day of `color`
    #[must_use]
    pub fn consume(self, color: TempoColor) -> Self {
        let mut next = self;
        match color {
            TempoColor::Blue => next.blue = next.blue.saturating_sub(1),
            TempoColor::White => next.white = next.white.saturating_sub(1),
            TempoColor::Red => next.red = next.red.saturating_sub(1),
        }
        next
    }

    /// Red plus white days still to place
    #[must_use]
    pub fn tension_stock(&self) -> u32 {
        self.red.saturating_add(self.white)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_decrements_one_field() {
        let q = QuotaState::new(3, 10, 100).consume(TempoColor::White);
        assert_eq!(q, QuotaState::new(3, 9, 100));
    }

    #[test]
    fn test_consume_saturates_at_zero() {
        let q = QuotaState::new(0, 0, 0)
            .consume(TempoColor::Red)
            .consume(TempoColor::Blue);
        assert_eq!(q, QuotaState::new(0, 0, 0));
    }

    #[test]
    fn test_tension_stock_saturates() {
        assert_eq!(QuotaState::new(12, 30, 150).tension_stock(), 42);
        assert_eq!(QuotaState::new(u32::MAX, 5, 0).tension_stock(), u32::MAX);
    }

    #[test]
    fn test_default_is_full_season() {
        assert_eq!(QuotaState::default(), QuotaState::new(22, 43, 300));
    }
}
