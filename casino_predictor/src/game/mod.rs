//! Card and roulette domain model.
//!
//! This module provides:
//! - Cards, suits and shuffled multi-deck shoes
//! - Roulette number classification (color, parity, dozen, column)
//! - Blackjack hand values and winner settlement
//! - A fixed-capacity rolling history shared by tables and the predictor

pub mod constants;
pub mod entities;
pub mod history;

pub use entities::{
    Card, Color, Deck, Game, NumberInfo, Parity, Phase, Suit, Winner, classify_number,
    determine_winner, hand_value, number_color, rank_value,
};
pub use history::History;
