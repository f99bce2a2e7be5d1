//! Game endpoints: catalog, tables, simulation, prediction, stats and resets.
//!
//! ```bash
//! curl -X POST http://localhost:5000/api/v1/simulate \
//!   -H "Content-Type: application/json" \
//!   -d '{"game": "roulette", "table": "table_2"}'
//! ```

use std::{collections::BTreeMap, time::Instant};

use axum::{
    Json,
    extract::{Path, State},
};
use casino_predictor::{
    Game, GameInfo, GameStats, Outcome, PredictionReport,
    table::{DEFAULT_JACKPOT_ID, DEFAULT_TABLE_ID, TableId},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, casino_error, parse_game};
use crate::{logging, metrics};

/// Body of `/simulate` and `/predict`.
///
/// `game` stays a string so that an unknown game gets the API's own
/// error body instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub game: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub jackpot_id: Option<String>,
}

impl GameRequest {
    /// Target table; jackpot requests prefer `jackpot_id`.
    fn target(&self, game: Game) -> String {
        let table = match game {
            Game::Jackpot => self.jackpot_id.as_deref().or(self.table.as_deref()),
            _ => self.table.as_deref(),
        };
        match table.map(str::trim).filter(|t| !t.is_empty()) {
            Some(table) => table.to_string(),
            None if game == Game::Jackpot => DEFAULT_JACKPOT_ID.to_string(),
            None => DEFAULT_TABLE_ID.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameInfo>,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub game: Game,
    pub tables: Vec<TableId>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub result: Outcome,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub available_games: usize,
    pub games: BTreeMap<Game, GameStats>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

pub async fn list_games(State(state): State<AppState>) -> Json<GamesResponse> {
    Json(GamesResponse {
        games: state.casino.games(),
    })
}

/// # Errors
///
/// - `400 Bad Request`: unknown game
pub async fn list_tables(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<TablesResponse>, ApiError> {
    let game = parse_game(&game)?;
    let tables = state.casino.tables(game);
    Ok(Json(TablesResponse {
        game,
        total: tables.len(),
        tables,
    }))
}

/// Play one round. Unknown tables fall back to the first table of the game,
/// and the response names the table actually used.
///
/// # Errors
///
/// - `400 Bad Request`: unknown game
pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<GameRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let game = parse_game(&request.game)?;
    let table = request.target(game);

    let result = state.casino.simulate(game, &table).map_err(casino_error)?;
    metrics::simulations_total(game.id());
    logging::log_game_event("simulate", game.id(), result.table(), "round played");

    Ok(Json(SimulateResponse { result }))
}

/// Statistics over the table's recent history.
///
/// # Errors
///
/// - `400 Bad Request`: unknown game, or too little history
///   (`{"error": "Insufficient history", "message": "At least 10 spins ..."}`)
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<GameRequest>,
) -> Result<Json<PredictionReport>, ApiError> {
    let game = parse_game(&request.game)?;
    let table = request.target(game);

    let started = Instant::now();
    let report = state.casino.predict(game, &table);
    logging::log_performance(
        "predict",
        started.elapsed().as_millis() as u64,
        Some(game.id()),
    );

    match report {
        Ok(report) => {
            metrics::predictions_total(game.id(), "ok");
            Ok(Json(report))
        }
        Err(err) => {
            metrics::predictions_total(game.id(), "insufficient_history");
            Err(casino_error(err))
        }
    }
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        available_games: Game::ALL.len(),
        games: state.casino.stats(),
    })
}

/// Clear one table. Jackpot pools and unknown table ids answer `success: false`.
///
/// # Errors
///
/// - `400 Bad Request`: unknown game
pub async fn reset_table(
    State(state): State<AppState>,
    Path((game, table)): Path<(String, String)>,
) -> Result<Json<ResetResponse>, ApiError> {
    let game = parse_game(&game)?;
    let success = state.casino.reset(game, &table);

    let message = if success {
        metrics::table_resets_total(game.id());
        logging::log_game_event("reset", game.id(), &table, "table cleared");
        format!("Table {table} of {game} was reset")
    } else if game == Game::Jackpot {
        format!("{} pools cannot be reset", game.display_name())
    } else {
        format!("No {game} table named {table}")
    };

    Ok(Json(ResetResponse { success, message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(game: &str, table: Option<&str>, jackpot_id: Option<&str>) -> GameRequest {
        GameRequest {
            game: game.to_string(),
            table: table.map(str::to_string),
            jackpot_id: jackpot_id.map(str::to_string),
        }
    }

    #[test]
    fn test_target_defaults() {
        assert_eq!(request("roulette", None, None).target(Game::Roulette), "table_1");
        assert_eq!(request("jackpot", None, None).target(Game::Jackpot), "progressive_1");
        assert_eq!(request("poker", Some("  "), None).target(Game::Poker), "table_1");
    }

    #[test]
    fn test_target_prefers_jackpot_id_for_jackpot() {
        let req = request("jackpot", Some("table_2"), Some("progressive_1"));
        assert_eq!(req.target(Game::Jackpot), "progressive_1");
        assert_eq!(req.target(Game::Blackjack), "table_2");

        let req = request("jackpot", Some("progressive_1"), None);
        assert_eq!(req.target(Game::Jackpot), "progressive_1");
    }
}
