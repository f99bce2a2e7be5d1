//! Table store owning every table behind its own lock.

use rand::Rng;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::state::{BlackjackTable, JackpotPool, PokerTable, RouletteTable, TableStats};
use crate::{
    errors::CasinoResult,
    format::round2,
    game::{Card, Game, classify_number, constants::RECENT_TABLE_NUMBERS},
};

pub type TableId = String;

pub const ROULETTE_TABLES: usize = 3;
pub const BLACKJACK_TABLES: usize = 3;
pub const POKER_TABLES: usize = 2;
pub const JACKPOT_POOLS: usize = 1;

/// Identifier of the default pool.
pub const DEFAULT_JACKPOT_ID: &str = "progressive_1";

/// Identifier of the first table of a game.
pub const DEFAULT_TABLE_ID: &str = "table_1";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed, non-empty set of tables of one game, in creation order.
#[derive(Debug)]
struct Tables<T> {
    entries: Vec<(TableId, Mutex<T>)>,
}

impl<T> Tables<T> {
    /// Creates `count` tables (at least one) named `{prefix}_1..`.
    fn new(prefix: &str, count: usize, mut make: impl FnMut() -> T) -> Self {
        let entries = (1..=count.max(1))
            .map(|i| (format!("{prefix}_{i}"), Mutex::new(make())))
            .collect();
        Self { entries }
    }

    fn ids(&self) -> Vec<TableId> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    fn get(&self, id: &str) -> Option<(&str, &Mutex<T>)> {
        self.entries
            .iter()
            .find(|(table_id, _)| table_id == id)
            .map(|(table_id, table)| (table_id.as_str(), table))
    }

    /// Unknown ids fall back to the first table.
    fn resolve(&self, id: &str) -> (&str, &Mutex<T>) {
        self.get(id).unwrap_or_else(|| {
            let (table_id, table) = &self.entries[0];
            (table_id.as_str(), table)
        })
    }
}

/// Every roulette, blackjack, poker table and jackpot pool of the casino.
///
/// The set of tables is fixed at construction and each table has its own
/// mutex, so callers working on different tables never contend.
#[derive(Debug)]
pub struct TableStore {
    roulette: Tables<RouletteTable>,
    blackjack: Tables<BlackjackTable>,
    poker: Tables<PokerTable>,
    jackpot: Tables<JackpotPool>,
}

impl TableStore {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            roulette: Tables::new("table", ROULETTE_TABLES, RouletteTable::new),
            blackjack: Tables::new("table", BLACKJACK_TABLES, || BlackjackTable::new(rng)),
            poker: Tables::new("table", POKER_TABLES, || PokerTable::new(rng)),
            jackpot: Tables::new("progressive", JACKPOT_POOLS, JackpotPool::new),
        }
    }

    /// Table identifiers of `game` in creation order.
    pub fn table_ids(&self, game: Game) -> Vec<TableId> {
        match game {
            Game::Roulette => self.roulette.ids(),
            Game::Blackjack => self.blackjack.ids(),
            Game::Poker => self.poker.ids(),
            Game::Jackpot => self.jackpot.ids(),
        }
    }

    pub fn contains(&self, game: Game, id: &str) -> bool {
        match game {
            Game::Roulette => self.roulette.get(id).is_some(),
            Game::Blackjack => self.blackjack.get(id).is_some(),
            Game::Poker => self.poker.get(id).is_some(),
            Game::Jackpot => self.jackpot.get(id).is_some(),
        }
    }

    /// The id that `id` resolves to, substituting the first table when unknown.
    pub fn resolve(&self, game: Game, id: &str) -> TableId {
        let resolved = match game {
            Game::Roulette => self.roulette.resolve(id).0,
            Game::Blackjack => self.blackjack.resolve(id).0,
            Game::Poker => self.poker.resolve(id).0,
            Game::Jackpot => self.jackpot.resolve(id).0,
        };
        resolved.to_string()
    }

    /// Runs `f` inside the resolved roulette table's critical section.
    pub fn with_roulette<T>(&self, id: &str, f: impl FnOnce(&str, &mut RouletteTable) -> T) -> T {
        let (table_id, table) = self.roulette.resolve(id);
        f(table_id, &mut lock(table))
    }

    pub fn with_blackjack<T>(
        &self,
        id: &str,
        f: impl FnOnce(&str, &mut BlackjackTable) -> T,
    ) -> T {
        let (table_id, table) = self.blackjack.resolve(id);
        f(table_id, &mut lock(table))
    }

    pub fn with_poker<T>(&self, id: &str, f: impl FnOnce(&str, &mut PokerTable) -> T) -> T {
        let (table_id, table) = self.poker.resolve(id);
        f(table_id, &mut lock(table))
    }

    pub fn with_jackpot<T>(&self, id: &str, f: impl FnOnce(&str, &mut JackpotPool) -> T) -> T {
        let (pool_id, pool) = self.jackpot.resolve(id);
        f(pool_id, &mut lock(pool))
    }

    /// Clears history and counters and reshuffles the deck of a known table.
    ///
    /// Returns `false` without touching anything when the id is unknown.
    /// Jackpot pools have nothing to reset.
    pub fn reset<R: Rng + ?Sized>(&self, game: Game, id: &str, rng: &mut R) -> bool {
        match game {
            Game::Roulette => {
                let Some((_, table)) = self.roulette.get(id) else {
                    return false;
                };
                lock(table).reset();
            }
            Game::Blackjack => {
                let Some((_, table)) = self.blackjack.get(id) else {
                    return false;
                };
                lock(table).reset(rng);
            }
            Game::Poker => {
                let Some((_, table)) = self.poker.get(id) else {
                    return false;
                };
                lock(table).reset(rng);
            }
            Game::Jackpot => return false,
        }
        true
    }

    /// Validates and appends a number to a roulette table's history.
    pub fn record_spin(&self, id: &str, number: u8) -> CasinoResult<()> {
        classify_number(number)?;
        self.with_roulette(id, |_, table| table.record_spin(number));
        Ok(())
    }

    pub fn record_card_draw(&self, id: &str, card: Card) {
        self.with_blackjack(id, |_, table| table.record_card_draw(card));
    }

    /// The newest `n` roulette numbers, oldest first.
    pub fn recent_numbers(&self, id: &str, n: usize) -> Vec<u8> {
        self.with_roulette(id, |_, table| table.history.last_n(n))
    }

    /// The newest `n` cards dealt from a blackjack shoe, oldest first.
    pub fn recent_cards(&self, id: &str, n: usize) -> Vec<Card> {
        self.with_blackjack(id, |_, table| table.recent_cards(n))
    }

    pub fn payout_history(&self, id: &str) -> Vec<f64> {
        self.with_jackpot(id, |_, pool| pool.payout_history())
    }

    /// Counters of a known table; `None` when the id is unknown.
    pub fn table_stats(&self, game: Game, id: &str) -> Option<TableStats> {
        match game {
            Game::Roulette => self.roulette.get(id).map(|(_, table)| {
                let table = lock(table);
                TableStats::Roulette {
                    total_spins: table.total_spins,
                    last_numbers: table.history.last_n(RECENT_TABLE_NUMBERS),
                }
            }),
            Game::Blackjack => self.blackjack.get(id).map(|(_, table)| {
                let table = lock(table);
                TableStats::Blackjack {
                    hands_played: table.hands_played,
                    cards_remaining: table.deck.len(),
                }
            }),
            Game::Poker => self.poker.get(id).map(|(_, table)| {
                let table = lock(table);
                TableStats::Poker {
                    hands_played: table.hands_played,
                    current_phase: table.phase,
                }
            }),
            Game::Jackpot => self.jackpot.get(id).map(|(_, pool)| {
                let pool = lock(pool);
                TableStats::Jackpot {
                    current_prize: round2(pool.current_prize),
                    payouts: pool.payout_history(),
                }
            }),
        }
    }
}
