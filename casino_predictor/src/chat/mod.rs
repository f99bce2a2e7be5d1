//! Natural-language chat layer.
//!
//! The completion backend is opaque: anything implementing
//! [`CompletionService`] can answer prompts. [`OllamaClient`] talks to a
//! local Ollama server and [`ChatAssistant`] keeps the conversation and
//! turns every failure into a readable answer.

pub mod assistant;
pub mod client;
pub mod errors;

pub use assistant::{ChatAssistant, Role, Turn, clean_answer};
pub use client::{ChatConfig, CompletionService, ConnectionStatus, OllamaClient};
pub use errors::{ChatError, ChatResult};

use crate::{
    casino::Casino,
    game::Game,
    predictor::Prediction,
    table::{DEFAULT_JACKPOT_ID, DEFAULT_TABLE_ID},
};

const ROULETTE_KEYWORDS: &[&str] = &["roulette", "number", "red", "black", "color"];
const BLACKJACK_KEYWORDS: &[&str] = &["blackjack", "card", "count", "shoe", "deck"];
const JACKPOT_KEYWORDS: &[&str] = &["jackpot", "prize", "progressive"];

fn mentions(words: &[&str], keywords: &[&str]) -> bool {
    words.iter().any(|word| {
        let singular = word.strip_suffix('s').unwrap_or(word);
        keywords.iter().any(|kw| kw == word || *kw == singular)
    })
}

/// Infers which game a message is about from whole-word keywords
/// (a trailing plural `s` is accepted).
pub fn detect_game(message: &str) -> Option<Game> {
    let message = message.to_lowercase();
    let words: Vec<&str> = message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if mentions(&words, ROULETTE_KEYWORDS) {
        Some(Game::Roulette)
    } else if mentions(&words, BLACKJACK_KEYWORDS) {
        Some(Game::Blackjack)
    } else if mentions(&words, JACKPOT_KEYWORDS) {
        Some(Game::Jackpot)
    } else {
        None
    }
}

/// Prediction for the game `message` talks about, taken from the default
/// table when it has enough history.
pub fn prediction_context(casino: &Casino, message: &str) -> Option<Prediction> {
    let game = detect_game(message)?;
    let table = match game {
        Game::Jackpot => DEFAULT_JACKPOT_ID,
        Game::Poker => return None,
        _ => DEFAULT_TABLE_ID,
    };
    casino.predict(game, table).ok().map(|report| report.prediction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_game() {
        assert_eq!(detect_game("Is RED hot right now?"), Some(Game::Roulette));
        assert_eq!(detect_game("which numbers are cold"), Some(Game::Roulette));
        assert_eq!(detect_game("What's the blackjack count?"), Some(Game::Blackjack));
        assert_eq!(detect_game("how many decks are left"), Some(Game::Blackjack));
        assert_eq!(detect_game("When will the jackpot pay?"), Some(Game::Jackpot));
        assert_eq!(detect_game("hello there"), None);
    }

    #[test]
    fn test_context_requires_history() {
        let casino = Casino::default();
        assert!(prediction_context(&casino, "any hot number?").is_none());

        for _ in 0..10 {
            casino.simulate(Game::Roulette, DEFAULT_TABLE_ID).unwrap();
        }
        let context = prediction_context(&casino, "any hot number?").unwrap();
        assert_eq!(context.game(), Game::Roulette);
    }

    #[test]
    fn test_jackpot_context_uses_seed_ledger() {
        let casino = Casino::default();
        let context = prediction_context(&casino, "what prize is next").unwrap();
        assert_eq!(context.game(), Game::Jackpot);
    }
}
