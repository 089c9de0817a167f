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

//! Plain data types shared by the Tempo forecast engine and its front-ends.

pub mod color;
pub mod quota;
pub mod record;

pub use color::{ColorProbability, TempoColor, UnknownColorError};
pub use quota::{BLUE_TOTAL, QuotaState, RED_TOTAL, WHITE_TOTAL};
pub use record::{
    Confidence, ConfidenceLabel, DecisionRecord, DecisionSource, GenerationSource, ZSource,
};
