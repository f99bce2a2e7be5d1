//! Simulation result records.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::game::{Card, Color, Game, Parity, Phase, Winner};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time in the format every record carries.
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RouletteSpin {
    pub table: String,
    pub number: u8,
    pub color: Color,
    pub parity: Parity,
    pub dozen: u8,
    pub column: u8,
    pub timestamp: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BlackjackRound {
    pub table: String,
    pub player_hand: Vec<Card>,
    pub dealer_hand: Vec<Card>,
    pub player_total: u32,
    /// Total of the dealer's face-up card only.
    pub dealer_visible_total: u32,
    /// Settled against the dealer's full hand.
    pub winner: Winner,
    /// Both player cards followed by the dealer's face-up card.
    pub visible_cards: Vec<Card>,
    pub cards_remaining: usize,
    pub timestamp: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PokerDeal {
    pub table: String,
    pub player_hand: Vec<Card>,
    pub community_cards: Vec<Card>,
    pub phase: Phase,
    pub pot: u32,
    pub active_players: u8,
    pub timestamp: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct JackpotTick {
    pub jackpot_id: String,
    pub current_prize: f64,
    /// Last reported payouts, oldest first.
    pub payouts: Vec<f64>,
    pub payout_occurred: bool,
    pub amount_paid: Option<f64>,
    pub timestamp: String,
}

/// One simulated round of any game, tagged with its game id.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum Outcome {
    Roulette(RouletteSpin),
    Blackjack(BlackjackRound),
    Poker(PokerDeal),
    Jackpot(JackpotTick),
}

impl Outcome {
    pub fn game(&self) -> Game {
        match self {
            Self::Roulette(_) => Game::Roulette,
            Self::Blackjack(_) => Game::Blackjack,
            Self::Poker(_) => Game::Poker,
            Self::Jackpot(_) => Game::Jackpot,
        }
    }

    /// Table or pool the round was played on.
    pub fn table(&self) -> &str {
        match self {
            Self::Roulette(spin) => &spin.table,
            Self::Blackjack(round) => &round.table,
            Self::Poker(deal) => &deal.table,
            Self::Jackpot(tick) => &tick.jackpot_id,
        }
    }
}
