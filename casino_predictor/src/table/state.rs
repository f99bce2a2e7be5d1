//! Per-table game state.

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::game::{
    Card, Deck, History, Phase,
    constants::{
        BLACKJACK_SHOE_DECKS, JACKPOT_INCREMENT, JACKPOT_LEDGER_CAPACITY,
        JACKPOT_REPORTED_PAYOUTS, JACKPOT_SEED_PAYOUTS, JACKPOT_STARTING_PRIZE, POKER_DECKS,
        ROULETTE_HISTORY_CAPACITY,
    },
};

/// Spin history of one roulette wheel.
#[derive(Clone, Debug)]
pub struct RouletteTable {
    pub history: History<u8>,
    pub total_spins: u64,
}

impl RouletteTable {
    pub fn new() -> Self {
        Self {
            history: History::with_capacity(ROULETTE_HISTORY_CAPACITY),
            total_spins: 0,
        }
    }

    /// Appends to the bounded history and bumps the spin counter.
    pub fn record_spin(&mut self, number: u8) {
        self.history.push(number);
        self.total_spins += 1;
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.total_spins = 0;
    }
}

impl Default for RouletteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A six-deck shoe plus the ledger of cards dealt from it.
#[derive(Clone, Debug)]
pub struct BlackjackTable {
    pub deck: Deck,
    /// Cards dealt since the last reshuffle, oldest first.
    pub used_cards: Vec<Card>,
    pub hands_played: u64,
}

impl BlackjackTable {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            deck: Deck::new(BLACKJACK_SHOE_DECKS, rng),
            used_cards: Vec::new(),
            hands_played: 0,
        }
    }

    pub fn record_card_draw(&mut self, card: Card) {
        self.used_cards.push(card);
    }

    /// Replaces the shoe and forgets every card seen from the old one.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        debug!(
            "Reshuffling blackjack shoe ({} cards left, {} seen)",
            self.deck.len(),
            self.used_cards.len()
        );
        self.deck = Deck::new(BLACKJACK_SHOE_DECKS, rng);
        self.used_cards.clear();
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reshuffle(rng);
        self.hands_played = 0;
    }

    /// The newest `n` dealt cards, oldest first.
    pub fn recent_cards(&self, n: usize) -> Vec<Card> {
        let skip = self.used_cards.len().saturating_sub(n);
        self.used_cards[skip..].to_vec()
    }
}

/// A single-deck hold'em table.
#[derive(Clone, Debug)]
pub struct PokerTable {
    pub deck: Deck,
    pub phase: Phase,
    pub hands_played: u64,
}

impl PokerTable {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            deck: Deck::new(POKER_DECKS, rng),
            phase: Phase::Preflop,
            hands_played: 0,
        }
    }

    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        debug!("Reshuffling poker deck ({} cards left)", self.deck.len());
        self.deck = Deck::new(POKER_DECKS, rng);
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reshuffle(rng);
        self.phase = Phase::Preflop;
        self.hands_played = 0;
    }
}

/// Progressive jackpot pool and its payout ledger.
#[derive(Clone, Debug)]
pub struct JackpotPool {
    pub current_prize: f64,
    pub increment: f64,
    pub payouts: History<f64>,
}

impl JackpotPool {
    pub fn new() -> Self {
        let mut payouts = History::with_capacity(JACKPOT_LEDGER_CAPACITY);
        payouts.extend(JACKPOT_SEED_PAYOUTS);
        Self {
            current_prize: JACKPOT_STARTING_PRIZE,
            increment: JACKPOT_INCREMENT,
            payouts,
        }
    }

    /// The last reported payouts, oldest first.
    pub fn payout_history(&self) -> Vec<f64> {
        self.payouts.last_n(JACKPOT_REPORTED_PAYOUTS)
    }
}

impl Default for JackpotPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of one table's counters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableStats {
    Roulette {
        total_spins: u64,
        last_numbers: Vec<u8>,
    },
    Blackjack {
        hands_played: u64,
        cards_remaining: usize,
    },
    Poker {
        hands_played: u64,
        current_phase: Phase,
    },
    Jackpot {
        current_prize: f64,
        payouts: Vec<f64>,
    },
}
