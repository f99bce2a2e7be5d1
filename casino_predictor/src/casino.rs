//! Casino facade tying the table store, simulators and predictor together.

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    errors::{CasinoError, CasinoResult},
    game::{
        Card, Game,
        constants::{
            BLACKJACK_VISIBLE_CARDS, DEFAULT_PREDICTION_WINDOW, MIN_BLACKJACK_CARDS,
            MIN_JACKPOT_PAYOUTS, MIN_ROULETTE_SPINS, ROULETTE_PREDICT_LOOKBACK,
        },
    },
    predictor::{Prediction, Predictor},
    simulator::{self, Outcome, PokerDeal},
    table::{TableId, TableStats, TableStore},
};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct CasinoConfig {
    /// Capacity of the predictor's rolling windows.
    pub prediction_window: usize,
}

impl Default for CasinoConfig {
    fn default() -> Self {
        Self {
            prediction_window: DEFAULT_PREDICTION_WINDOW,
        }
    }
}

/// Catalog entry for one game.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub id: Game,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PredictionReport {
    pub prediction: Prediction,
    /// The fresh hand a poker prediction was computed for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_deal: Option<PokerDeal>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameStats {
    pub tables: Vec<TableId>,
    pub stats: BTreeMap<TableId, TableStats>,
}

fn require_history(game: Game, required: usize, available: usize) -> CasinoResult<()> {
    if available < required {
        return Err(CasinoError::InsufficientHistory {
            game,
            required,
            available,
        });
    }
    Ok(())
}

/// Process-wide casino state. Every method takes `&self`, so a single
/// instance can be shared behind an `Arc`.
#[derive(Debug)]
pub struct Casino {
    store: TableStore,
    predictor: Predictor,
}

impl Default for Casino {
    fn default() -> Self {
        Self::new(CasinoConfig::default())
    }
}

impl Casino {
    pub fn new(config: CasinoConfig) -> Self {
        Self::with_rng(config, &mut rand::rng())
    }

    /// Builds the tables with decks shuffled by `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: CasinoConfig, rng: &mut R) -> Self {
        Self {
            store: TableStore::new(rng),
            predictor: Predictor::new(config.prediction_window),
        }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn games(&self) -> Vec<GameInfo> {
        Game::ALL
            .iter()
            .map(|game| GameInfo {
                id: *game,
                name: game.display_name().to_string(),
                description: game.description().to_string(),
            })
            .collect()
    }

    pub fn tables(&self, game: Game) -> Vec<TableId> {
        self.store.table_ids(game)
    }

    /// Plays one round; for the jackpot `table` names the pool.
    pub fn simulate(&self, game: Game, table: &str) -> CasinoResult<Outcome> {
        self.simulate_with(game, table, &mut rand::rng())
    }

    pub fn simulate_with<R: Rng + ?Sized>(
        &self,
        game: Game,
        table: &str,
        rng: &mut R,
    ) -> CasinoResult<Outcome> {
        simulator::simulate(&self.store, game, table, rng)
    }

    /// Predicts from the table's accumulated history.
    ///
    /// Roulette needs 10 spins, blackjack 10 seen cards and the jackpot 3
    /// past payouts. Poker has no minimum: a fresh hand is dealt and
    /// returned alongside the prediction.
    pub fn predict(&self, game: Game, table: &str) -> CasinoResult<PredictionReport> {
        self.predict_with(game, table, &mut rand::rng())
    }

    pub fn predict_with<R: Rng + ?Sized>(
        &self,
        game: Game,
        table: &str,
        rng: &mut R,
    ) -> CasinoResult<PredictionReport> {
        let mut simulated_deal = None;
        let prediction = match game {
            Game::Roulette => {
                let history = self.store.recent_numbers(table, ROULETTE_PREDICT_LOOKBACK);
                require_history(game, MIN_ROULETTE_SPINS, history.len())?;
                Prediction::Roulette(self.predictor.predict_roulette(&history, rng)?)
            }
            Game::Blackjack => {
                let cards = self.store.recent_cards(table, BLACKJACK_VISIBLE_CARDS);
                require_history(game, MIN_BLACKJACK_CARDS, cards.len())?;
                let labels: Vec<String> = cards.iter().map(Card::to_string).collect();
                Prediction::Blackjack(self.predictor.predict_blackjack(&labels))
            }
            Game::Poker => {
                let deal = self
                    .store
                    .with_poker(table, |id, poker| simulator::deal_poker(id, poker, rng))?;
                let prediction =
                    self.predictor
                        .predict_poker(&deal.player_hand, &deal.community_cards, rng);
                simulated_deal = Some(deal);
                Prediction::Poker(prediction)
            }
            Game::Jackpot => {
                let payouts = self.store.payout_history(table);
                require_history(game, MIN_JACKPOT_PAYOUTS, payouts.len())?;
                Prediction::Jackpot(self.predictor.predict_jackpot(&payouts))
            }
        };

        Ok(PredictionReport {
            prediction,
            simulated_deal,
        })
    }

    /// Resets a known table; unknown ids and jackpot pools are left alone.
    pub fn reset(&self, game: Game, table: &str) -> bool {
        let reset = self.store.reset(game, table, &mut rand::rng());
        if reset {
            info!("Reset {} table {}", game, table);
        }
        reset
    }

    /// Table ids and counters for every game.
    pub fn stats(&self) -> BTreeMap<Game, GameStats> {
        Game::ALL
            .iter()
            .map(|&game| {
                let tables = self.store.table_ids(game);
                let stats = tables
                    .iter()
                    .filter_map(|id| Some((id.clone(), self.store.table_stats(game, id)?)))
                    .collect();
                (game, GameStats { tables, stats })
            })
            .collect()
    }

    pub fn table_stats(&self, game: Game, table: &str) -> Option<TableStats> {
        self.store.table_stats(game, table)
    }

    pub fn recent_numbers(&self, table: &str, n: usize) -> Vec<u8> {
        self.store.recent_numbers(table, n)
    }

    pub fn recent_cards(&self, table: &str, n: usize) -> Vec<Card> {
        self.store.recent_cards(table, n)
    }
}
