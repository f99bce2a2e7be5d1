//! Conversational assistant built on a completion service.

use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::client::{CompletionService, ConnectionStatus};
use crate::{format::format_money, game::History, predictor::Prediction};

/// Turns remembered across requests.
pub const MAX_CONVERSATION_TURNS: usize = 10;

/// Turns replayed into each prompt.
pub const PROMPT_TURNS: usize = 6;

const ANSWER_MARKER: &str = "ANSWER:";

pub const SYSTEM_PROMPT: &str = "You are an expert analyst of casino games and probabilities.
Your job is to help users understand strategies, probabilities and the statistical analysis of casino games.

Key knowledge:
- Mathematical probabilities in roulette, blackjack, poker and jackpots
- Optimal strategies grounded in mathematics
- Risk analysis and bankroll management
- Card counting systems and statistical edges
- Expected value and variance

IMPORTANT:
- This is an EDUCATIONAL SIMULATION system
- Do NOT encourage compulsive gambling
- ALWAYS mention that the house has a mathematical edge
- Focus on mathematical and statistical analysis

Rules:
1. Always answer clearly and educationally
2. Base answers on real mathematical probabilities
3. Without specific data, use the known theoretical probabilities
4. Be objective and honest about the house edge
5. Keep a professional but approachable tone
6. Include responsible gambling warnings when relevant";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Keeps the running conversation and turns every failure into text.
pub struct ChatAssistant {
    service: Arc<dyn CompletionService>,
    conversation: Mutex<History<Turn>>,
}

impl fmt::Debug for ChatAssistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatAssistant")
            .field("turns", &self.lock_conversation().len())
            .finish()
    }
}

impl ChatAssistant {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            conversation: Mutex::new(History::with_capacity(MAX_CONVERSATION_TURNS)),
        }
    }

    fn lock_conversation(&self) -> MutexGuard<'_, History<Turn>> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn check_connection(&self) -> ConnectionStatus {
        self.service.check_connection().await
    }

    /// Remembered turns, oldest first.
    pub fn conversation(&self) -> Vec<Turn> {
        self.lock_conversation().to_vec()
    }

    pub fn clear(&self) {
        self.lock_conversation().clear();
    }

    /// System prompt, optional prediction block, recent turns and the question.
    pub fn build_prompt(&self, message: &str, context: Option<&Prediction>) -> String {
        let mut prompt = String::from(SYSTEM_PROMPT);
        prompt.push_str("\n\n---\n");

        if let Some(prediction) = context {
            prompt.push_str("PREDICTION DATA:\n");
            prompt.push_str(&format!("Game: {}\n", prediction.game()));
            prompt.push_str(&context_lines(prediction));
            prompt.push('\n');
        }

        let recent = self.lock_conversation().last_n(PROMPT_TURNS);
        if !recent.is_empty() {
            prompt.push_str("CONVERSATION CONTEXT:\n");
            for turn in &recent {
                prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!("USER QUESTION:\n{message}\n\n"));
        prompt.push_str("ANSWER (at most 3 paragraphs):");
        prompt
    }

    /// Answers `message`. Never fails: service errors come back as
    /// user-facing text and are remembered like any other answer.
    pub async fn respond(&self, message: &str, context: Option<&Prediction>) -> String {
        let prompt = self.build_prompt(message, context);
        let answer = match self.service.complete(&prompt).await {
            Ok(raw) => clean_answer(&raw),
            Err(err) => {
                warn!("Chat completion failed: {}", err);
                err.user_message()
            }
        };

        let mut conversation = self.lock_conversation();
        conversation.push(Turn {
            role: Role::User,
            content: message.to_string(),
        });
        conversation.push(Turn {
            role: Role::Assistant,
            content: answer.clone(),
        });
        answer
    }
}

fn context_lines(prediction: &Prediction) -> String {
    match prediction {
        Prediction::Roulette(p) => format!(
            "Predicted number: {}\nConfidence: {}%\nProbabilities - Red: {}%, Black: {}%, Green: {}%\n",
            p.predicted_number,
            p.confidence,
            p.color_probabilities.red,
            p.color_probabilities.black,
            p.color_probabilities.green
        ),
        Prediction::Blackjack(p) => format!(
            "Win probability: {}%\nTrue count: {}\nPlayer edge: {}%\n",
            p.win_probability, p.true_count, p.player_edge
        ),
        Prediction::Poker(p) => format!(
            "Hand strength: {}\nImprovement probability: {}%\nPhase: {}\n",
            p.hand_strength, p.improvement_probability, p.phase
        ),
        Prediction::Jackpot(p) => format!(
            "Predicted range: {} - {}\nTrend: {}\n",
            format_money(p.predicted_range.min),
            format_money(p.predicted_range.max),
            p.trend
        ),
    }
}

/// Drops anything before the last answer marker and all blank lines.
pub fn clean_answer(raw: &str) -> String {
    let answer = raw.rsplit(ANSWER_MARKER).next().unwrap_or(raw);
    answer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
