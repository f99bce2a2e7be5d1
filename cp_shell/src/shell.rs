//! Command execution and text rendering.
//!
//! Every command produces a `String` so the read-eval-print loop only
//! prints, and tests can assert on the exact output.

use std::sync::Arc;

use casino_predictor::{
    Casino, Game,
    chat::{ChatAssistant, prediction_context},
    table::{DEFAULT_JACKPOT_ID, DEFAULT_TABLE_ID},
};
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::commands::ShellCommand;

/// Items shown from any list before it is elided.
pub const LIST_LIMIT: usize = 5;

/// Entries shown by `history`.
pub const HISTORY_LENGTH: usize = 20;

pub const WARNING: &str = "\
EDUCATIONAL PROJECT ONLY. Do not use for real gambling.
Gambling can be addictive. The house always keeps a mathematical edge.";

pub const HELP_TEXT: &str = "\
COMMANDS:
  games                          List the available games
  tables <game>                  List the tables of a game
  sim <game> [table] [count]     Play 1..=100 rounds (default 1)
  predict <game> [table]         Statistics over the table's recent history
  history roulette|blackjack [table]
                                 Recent numbers or seen cards
  reset <game> <table>           Clear a table
  stats                          Per-table statistics
  chat [message]                 Ask the assistant (bare 'chat' enters chat mode)
  help                           Show this help
  quit | exit                    Leave the shell

GAMES: roulette, blackjack, poker, jackpot";

fn default_table(game: Game) -> &'static str {
    match game {
        Game::Jackpot => DEFAULT_JACKPOT_ID,
        _ => DEFAULT_TABLE_ID,
    }
}

pub struct Shell {
    casino: Arc<Casino>,
    assistant: Arc<ChatAssistant>,
}

impl Shell {
    pub fn new(casino: Arc<Casino>, assistant: Arc<ChatAssistant>) -> Self {
        Self { casino, assistant }
    }

    pub fn casino(&self) -> &Casino {
        &self.casino
    }

    pub fn assistant(&self) -> &ChatAssistant {
        &self.assistant
    }

    pub async fn execute(&self, command: ShellCommand) -> String {
        debug!("Executing {:?}", command);
        match command {
            ShellCommand::Help => HELP_TEXT.to_string(),
            ShellCommand::Games => self.games(),
            ShellCommand::Stats => self.stats(),
            ShellCommand::Quit => "Goodbye!".to_string(),
            ShellCommand::Tables(game) => format!(
                "{} tables: {}",
                game.display_name(),
                self.casino.tables(game).join(", ")
            ),
            ShellCommand::Simulate { game, table, count } => {
                self.simulate(game, table.as_deref().unwrap_or(default_table(game)), count)
            }
            ShellCommand::Predict { game, table } => {
                self.predict(game, table.as_deref().unwrap_or(default_table(game)))
            }
            ShellCommand::History { game, table } => {
                self.history(game, table.as_deref().unwrap_or(DEFAULT_TABLE_ID))
            }
            ShellCommand::Reset { game, table } => {
                if self.casino.reset(game, &table) {
                    format!("Table {} of {} was reset.", table, game)
                } else if game == Game::Jackpot {
                    format!("{} pools cannot be reset.", game.display_name())
                } else {
                    format!("No {} table named {}.", game, table)
                }
            }
            ShellCommand::ChatMode => {
                "Chat mode. Ask anything; type 'back' to return to commands.".to_string()
            }
            ShellCommand::Chat(message) => self.chat(&message).await,
        }
    }

    fn games(&self) -> String {
        self.casino
            .games()
            .iter()
            .map(|info| format!("  {:<10} {}: {}", info.id.id(), info.name, info.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn stats(&self) -> String {
        let mut out = Vec::new();
        for (game, stats) in self.casino.stats() {
            out.push(format!(
                "{} ({} tables)",
                game.display_name().to_uppercase(),
                stats.tables.len()
            ));
            for (table, table_stats) in &stats.stats {
                out.push(format!("  {}:", table));
                out.push(render_indented(table_stats, 4));
            }
        }
        out.join("\n")
    }

    fn simulate(&self, game: Game, table: &str, count: usize) -> String {
        let mut last = None;
        for _ in 0..count {
            match self.casino.simulate(game, table) {
                Ok(outcome) => last = Some(outcome),
                Err(err) => return format!("Error: {}", err),
            }
        }
        let Some(outcome) = last else {
            return "Nothing simulated.".to_string();
        };

        let header = if count == 1 {
            format!("{} result at {}:", game.display_name(), outcome.table())
        } else {
            format!(
                "Simulated {} {} rounds at {}. Last result:",
                count,
                game,
                outcome.table()
            )
        };
        format!("{}\n{}", header, render(&outcome))
    }

    fn predict(&self, game: Game, table: &str) -> String {
        let resolved = self.casino.store().resolve(game, table);
        match self.casino.predict(game, &resolved) {
            Ok(report) => {
                let mut out = format!(
                    "{} PREDICTION ({})\n{}",
                    game.display_name().to_uppercase(),
                    resolved,
                    render(&report.prediction)
                );
                if let Some(deal) = &report.simulated_deal {
                    out.push_str("\nSimulated deal:\n");
                    out.push_str(&render(deal));
                }
                out.push_str("\n\nReminder: past results do not change future odds.");
                out
            }
            Err(err) => match err.hint() {
                Some(hint) => format!("{}. {}", err.label(), hint),
                None => format!("Error: {}", err),
            },
        }
    }

    fn history(&self, game: Game, table: &str) -> String {
        let resolved = self.casino.store().resolve(game, table);
        let entries: Vec<String> = match game {
            Game::Roulette => self
                .casino
                .recent_numbers(&resolved, HISTORY_LENGTH)
                .iter()
                .map(u8::to_string)
                .collect(),
            _ => self
                .casino
                .recent_cards(&resolved, HISTORY_LENGTH)
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        if entries.is_empty() {
            return format!("No history yet at {} {}.", game, resolved);
        }
        let separator = if game == Game::Roulette { " - " } else { " " };
        format!(
            "Last {} at {} {}:\n  {}",
            entries.len(),
            game,
            resolved,
            entries.join(separator)
        )
    }

    async fn chat(&self, message: &str) -> String {
        let context = prediction_context(&self.casino, message);
        let answer = self.assistant.respond(message, context.as_ref()).await;
        match context {
            Some(prediction) => format!("[using {} data]\n{}", prediction.game(), answer),
            None => answer,
        }
    }
}

/// Renders any serializable record as `key: value` lines.
pub fn render<T: Serialize>(record: &T) -> String {
    render_indented(record, 2)
}

fn render_indented<T: Serialize>(record: &T, indent: usize) -> String {
    match serde_json::to_value(record) {
        Ok(value) => {
            let mut lines = Vec::new();
            render_value(&value, indent, &mut lines);
            lines.join("\n")
        }
        Err(err) => format!("{:indent$}<unrenderable: {}>", "", err),
    }
}

fn render_value(value: &Value, indent: usize, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let label = key.replace('_', " ");
                match value {
                    Value::Object(inner) if !inner.is_empty() => {
                        lines.push(format!("{:indent$}{}:", "", label));
                        render_value(value, indent + 2, lines);
                    }
                    _ => lines.push(format!("{:indent$}{}: {}", "", label, inline(value))),
                }
            }
        }
        other => lines.push(format!("{:indent$}{}", "", inline(other))),
    }
}

/// Single-line form; lists are cut to [`LIST_LIMIT`] items.
pub fn inline(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let mut shown: Vec<String> = items.iter().take(LIST_LIMIT).map(inline).collect();
            if items.len() > LIST_LIMIT {
                shown.push(format!("... (+{} more)", items.len() - LIST_LIMIT));
            }
            format!("[{}]", shown.join(", "))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k.replace('_', " "), inline(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_truncates_lists() {
        let value = json!([1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(inline(&value), "[1, 2, 3, 4, 5, ... (+2 more)]");
        assert_eq!(inline(&json!([1, 2])), "[1, 2]");
    }

    #[test]
    fn test_inline_scalars_and_objects() {
        assert_eq!(inline(&Value::Null), "-");
        assert_eq!(inline(&json!(true)), "yes");
        assert_eq!(inline(&json!({"count": 3, "number": 17})), "{count: 3, number: 17}");
    }

    #[test]
    fn test_render_nests_objects() {
        let value = json!({
            "color_probabilities": {"black": 48.5, "red": 48.5},
            "hot_numbers": [],
            "spins_analyzed": 10,
        });
        let rendered = render(&value);
        assert_eq!(
            rendered,
            "  color probabilities:\n    black: 48.5\n    red: 48.5\n  hot numbers: []\n  spins analyzed: 10"
        );
    }
}
