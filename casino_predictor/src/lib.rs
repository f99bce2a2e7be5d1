//! # Casino Predictor
//!
//! An educational casino simulator with a descriptive-statistics "predictor".
//!
//! Simulated rounds of roulette, blackjack, hold'em and a progressive jackpot
//! accumulate in bounded per-table histories. The predictor summarizes those
//! histories (hot and cold numbers, color split, Hi-Lo count, hand strength,
//! payout trend) and attaches a canned recommendation. None of it has any
//! real predictive value.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, decks, roulette numbers and the rolling history buffer
//! - [`table`]: The fixed set of tables, each behind its own lock
//! - [`simulator`]: One-round simulators producing result records
//! - [`predictor`]: Statistics and recommendations over recent history
//! - [`casino`]: Facade used by the HTTP server and the shell
//! - [`chat`]: Optional natural-language layer over an Ollama server
//!
//! ## Example
//!
//! ```
//! use casino_predictor::{Casino, Game};
//!
//! let casino = Casino::default();
//! for _ in 0..10 {
//!     casino.simulate(Game::Roulette, "table_1").unwrap();
//! }
//! let report = casino.predict(Game::Roulette, "table_1").unwrap();
//! assert_eq!(report.prediction.game(), Game::Roulette);
//! ```

/// Casino facade.
pub mod casino;
pub use casino::{Casino, CasinoConfig, GameInfo, GameStats, PredictionReport};

/// Completion-service chat layer.
pub mod chat;

/// Error types.
pub mod errors;
pub use errors::{CasinoError, CasinoResult};

/// Money and percentage formatting.
pub mod format;

/// Domain model: cards, decks, roulette numbers, histories.
pub mod game;
pub use game::{Card, Game, History};

/// Statistical predictor.
pub mod predictor;
pub use predictor::{Prediction, Predictor};

/// Round simulators.
pub mod simulator;
pub use simulator::Outcome;

/// Table state store.
pub mod table;
pub use table::{TableStats, TableStore};
