//! Casino error types.

use thiserror::Error;

use crate::game::entities::Game;

/// Errors surfaced by the simulator, table store, and predictor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CasinoError {
    /// Game identifier outside the closed `roulette|blackjack|poker|jackpot` set
    #[error("Invalid game: {0}")]
    InvalidGame(String),

    /// Roulette number outside 0..=36
    #[error("Invalid roulette number: {0}")]
    InvalidNumber(u8),

    /// Card label that is not `rank+suit`
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// Draw attempted on an empty deck
    #[error("Deck is empty")]
    DeckEmpty,

    /// Not enough accumulated history to run a prediction
    #[error("Insufficient history for {game}: {available} available, {required} required")]
    InsufficientHistory {
        game: Game,
        required: usize,
        available: usize,
    },
}

impl CasinoError {
    /// Short error label suitable for API `error` fields.
    pub fn label(&self) -> &'static str {
        match self {
            CasinoError::InvalidGame(_) => "Invalid game",
            CasinoError::InvalidNumber(_) => "Invalid number",
            CasinoError::InvalidCard(_) => "Invalid card",
            CasinoError::DeckEmpty => "Deck empty",
            CasinoError::InsufficientHistory { game, .. } => match game {
                Game::Blackjack => "Insufficient cards",
                _ => "Insufficient history",
            },
        }
    }

    /// Human-readable hint telling the caller how much history is needed.
    ///
    /// Only insufficient-history errors carry a hint.
    pub fn hint(&self) -> Option<String> {
        match self {
            CasinoError::InsufficientHistory { game, required, .. } => {
                let unit = match game {
                    Game::Roulette => "spins",
                    Game::Blackjack => "seen cards",
                    Game::Jackpot => "past payouts",
                    Game::Poker => "hands",
                };
                Some(format!(
                    "At least {required} {unit} are needed for a {game} prediction"
                ))
            }
            _ => None,
        }
    }
}

/// Result type for casino operations
pub type CasinoResult<T> = Result<T, CasinoError>;
