//! Prediction records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{Game, Phase};

/// Theoretical wheel odds used when no spins have been seen.
pub const THEORETICAL_RED: f64 = 48.6;
pub const THEORETICAL_BLACK: f64 = 48.6;
pub const THEORETICAL_GREEN: f64 = 2.8;

/// 1/37 as a percentage.
pub const THEORETICAL_NUMBER_CONFIDENCE: f64 = 2.7;

/// Base blackjack win probability before any count adjustment.
pub const BASE_WIN_PROBABILITY: f64 = 46.0;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ColorProbabilities {
    pub red: f64,
    pub black: f64,
    pub green: f64,
}

impl Default for ColorProbabilities {
    fn default() -> Self {
        Self {
            red: THEORETICAL_RED,
            black: THEORETICAL_BLACK,
            green: THEORETICAL_GREEN,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HotNumber {
    pub number: u8,
    pub frequency: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RoulettePrediction {
    pub predicted_number: u8,
    /// Percentage, capped at 95.
    pub confidence: f64,
    pub color_probabilities: ColorProbabilities,
    pub hot_numbers: Vec<HotNumber>,
    pub cold_numbers: Vec<u8>,
    pub sequence_analysis: String,
    pub spins_analyzed: usize,
    pub recommendation: String,
}

impl Default for RoulettePrediction {
    fn default() -> Self {
        Self {
            predicted_number: 0,
            confidence: THEORETICAL_NUMBER_CONFIDENCE,
            color_probabilities: ColorProbabilities::default(),
            hot_numbers: Vec::new(),
            cold_numbers: Vec::new(),
            sequence_analysis: "Not enough data".to_string(),
            spins_analyzed: 0,
            recommendation: "More history is needed for accurate predictions".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BlackjackPrediction {
    pub win_probability: f64,
    pub running_count: i32,
    pub true_count: f64,
    pub player_edge: f64,
    pub cards_seen: usize,
    pub shoe_used_percent: f64,
    pub favorable: bool,
    pub recommendation: String,
}

impl Default for BlackjackPrediction {
    fn default() -> Self {
        Self {
            win_probability: BASE_WIN_PROBABILITY,
            running_count: 0,
            true_count: 0.0,
            player_edge: 0.0,
            cards_seen: 0,
            shoe_used_percent: 0.0,
            favorable: false,
            recommendation: "Neutral shoe. Play basic strategy".to_string(),
        }
    }
}

/// Rough strength class of a hold'em starting hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandStrength {
    /// Pocket kings or aces.
    Premium,
    Pair,
    /// At least one queen or better.
    HighCards,
    Medium,
    /// Anything other than exactly two hole cards.
    Unknown,
}

impl fmt::Display for HandStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Premium => "Premium (high pair)",
            Self::Pair => "Pair",
            Self::HighCards => "High cards",
            Self::Medium => "Medium hand",
            Self::Unknown => "unknown",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PokerPrediction {
    pub hand_strength: HandStrength,
    pub phase: Phase,
    pub estimated_outs: u32,
    /// Percentage, capped at 100.
    pub improvement_probability: f64,
    pub remaining_cards: usize,
    pub recommendation: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    /// Fewer than two points.
    Insufficient,
    /// No analysis was run.
    Unknown,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
            Self::Insufficient => "insufficient",
            Self::Unknown => "unknown",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PredictedRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct JackpotStatistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct JackpotPrediction {
    pub predicted_range: PredictedRange,
    pub statistics: Option<JackpotStatistics>,
    pub trend: Trend,
    pub payouts_analyzed: usize,
    pub recommendation: String,
}

impl Default for JackpotPrediction {
    fn default() -> Self {
        Self {
            predicted_range: PredictedRange::default(),
            statistics: None,
            trend: Trend::Unknown,
            payouts_analyzed: 0,
            recommendation: "More historical data is needed".to_string(),
        }
    }
}

/// A prediction for any game, tagged with its game id.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum Prediction {
    Roulette(RoulettePrediction),
    Blackjack(BlackjackPrediction),
    Poker(PokerPrediction),
    Jackpot(JackpotPrediction),
}

impl Prediction {
    pub fn game(&self) -> Game {
        match self {
            Self::Roulette(_) => Game::Roulette,
            Self::Blackjack(_) => Game::Blackjack,
            Self::Poker(_) => Game::Poker,
            Self::Jackpot(_) => Game::Jackpot,
        }
    }

    pub fn recommendation(&self) -> &str {
        match self {
            Self::Roulette(p) => &p.recommendation,
            Self::Blackjack(p) => &p.recommendation,
            Self::Poker(p) => &p.recommendation,
            Self::Jackpot(p) => &p.recommendation,
        }
    }
}
