//! Fixed game parameters.

/// Cards in one standard deck.
pub const CARDS_PER_DECK: usize = 52;

/// Highest pocket on a European wheel.
pub const MAX_ROULETTE_NUMBER: u8 = 36;

/// The 18 red pockets. Every other nonzero pocket is black.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

// === Roulette ===

/// Chance of forcing the green zero on a spin.
pub const ZERO_PROBABILITY: f64 = 0.03;

/// Spins kept per roulette table.
pub const ROULETTE_HISTORY_CAPACITY: usize = 100;

// === Blackjack ===

pub const BLACKJACK_SHOE_DECKS: usize = 6;

/// A shoe below this many cards is replaced before the next deal.
pub const BLACKJACK_REFILL_THRESHOLD: usize = 20;

// === Poker ===

pub const POKER_DECKS: usize = 1;

/// A poker deck below this many cards is replaced before the next deal.
pub const POKER_REFILL_THRESHOLD: usize = 10;

pub const MIN_SIMULATED_POT: u32 = 100;
pub const MAX_SIMULATED_POT: u32 = 1000;
pub const MIN_ACTIVE_PLAYERS: u8 = 2;
pub const MAX_ACTIVE_PLAYERS: u8 = 6;

// === Jackpot ===

pub const JACKPOT_STARTING_PRIZE: f64 = 50_000.0;
pub const JACKPOT_INCREMENT: f64 = 0.5;
pub const JACKPOT_SEED_PAYOUTS: [f64; 5] = [45_000.0, 52_000.0, 48_000.0, 55_000.0, 51_000.0];

/// Chance that a single play wins the pool.
pub const JACKPOT_PAYOUT_PROBABILITY: f64 = 0.001;

pub const JACKPOT_RESET_MIN: f64 = 40_000.0;
pub const JACKPOT_RESET_MAX: f64 = 55_000.0;

/// Payouts retained in the pool ledger.
pub const JACKPOT_LEDGER_CAPACITY: usize = 100;

/// Payouts reported with each tick and fed to the predictor.
pub const JACKPOT_REPORTED_PAYOUTS: usize = 10;

// === Predict gating ===

pub const MIN_ROULETTE_SPINS: usize = 10;
pub const MIN_BLACKJACK_CARDS: usize = 10;
pub const MIN_JACKPOT_PAYOUTS: usize = 3;

/// Numbers read from a roulette table when predicting.
pub const ROULETTE_PREDICT_LOOKBACK: usize = 100;

/// Cards read from a blackjack table when predicting ("visible cards").
pub const BLACKJACK_VISIBLE_CARDS: usize = 20;

pub const DEFAULT_PREDICTION_WINDOW: usize = 100;

/// Largest accepted predictor window. Larger requests are clamped.
pub const MAX_PREDICTION_WINDOW: usize = 10_000;

/// Numbers listed in a roulette table's stats.
pub const RECENT_TABLE_NUMBERS: usize = 10;
