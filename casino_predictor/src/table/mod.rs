//! Table module providing the fixed set of casino tables.
//!
//! This module implements:
//! - Per-game table state (roulette wheel, blackjack shoe, poker deck, jackpot pool)
//! - TableStore: every table behind its own mutex with lookup-with-fallback
//! - Table counters for stats listings
//!
//! ## Example
//!
//! ```
//! use casino_predictor::game::Game;
//! use casino_predictor::table::TableStore;
//!
//! let store = TableStore::new(&mut rand::rng());
//! store.record_spin("table_1", 17).unwrap();
//!
//! // Unknown tables silently resolve to the first table.
//! assert_eq!(store.recent_numbers("no_such_table", 5), vec![17]);
//! assert_eq!(store.resolve(Game::Roulette, "no_such_table"), "table_1");
//! ```

pub mod state;
pub mod store;

pub use state::{BlackjackTable, JackpotPool, PokerTable, RouletteTable, TableStats};
pub use store::{DEFAULT_JACKPOT_ID, DEFAULT_TABLE_ID, TableId, TableStore};
