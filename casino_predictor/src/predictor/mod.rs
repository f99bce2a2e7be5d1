//! Statistical predictor over rolling game histories.
//!
//! Nothing here predicts anything in the gambling sense: every figure is a
//! descriptive statistic over the recent window, paired with a canned
//! recommendation chosen by a fixed priority chain.

pub mod models;

use log::debug;
use rand::Rng;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use models::{
    BlackjackPrediction, ColorProbabilities, HandStrength, HotNumber, JackpotPrediction,
    JackpotStatistics, PokerPrediction, PredictedRange, Prediction, RoulettePrediction, Trend,
};

use crate::{
    errors::{CasinoError, CasinoResult},
    format::{format_money, percentage, round2},
    game::{
        Card, Color, History, Phase,
        constants::{
            BLACKJACK_SHOE_DECKS, CARDS_PER_DECK, DEFAULT_PREDICTION_WINDOW, MAX_PREDICTION_WINDOW,
            MAX_ROULETTE_NUMBER,
        },
        entities::{KING, QUEEN},
        number_color, rank_value,
    },
};

// === Roulette ===

const HOT_NUMBERS: usize = 5;
const COLD_NUMBERS: usize = 5;
const STREAK_LENGTH: usize = 5;
const MAX_NUMBER_CONFIDENCE: f64 = 95.0;
/// Color frequency (percent) above which the color is recommended.
const DOMINANT_COLOR_THRESHOLD: f64 = 55.0;
/// Appearances above which the hottest number is flagged.
const HOT_NUMBER_THRESHOLD: usize = 5;

// === Blackjack ===

/// Edge in percentage points per unit of true count.
const EDGE_PER_TRUE_COUNT: f64 = 0.5;
const FAVORABLE_TRUE_COUNT: f64 = 2.0;

// === Poker ===

const PREFLOP_OUTS: u32 = 6;
const MIN_RANDOM_OUTS: u32 = 4;
const MAX_RANDOM_OUTS: u32 = 15;
const GOOD_IMPROVEMENT_ODDS: f64 = 30.0;
const MODERATE_IMPROVEMENT_ODDS: f64 = 15.0;

// === Jackpot ===

const MIN_TREND_PAYOUTS: usize = 3;
/// Relative change (percent) between half-means that counts as a trend.
const TREND_THRESHOLD: f64 = 10.0;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the roulette and blackjack windows; poker and jackpot predictions
/// only look at what they are handed.
#[derive(Debug)]
pub struct Predictor {
    window: usize,
    roulette: Mutex<History<u8>>,
    blackjack: Mutex<History<String>>,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(DEFAULT_PREDICTION_WINDOW)
    }
}

impl Predictor {
    /// `window` is clamped to `1..=MAX_PREDICTION_WINDOW`.
    pub fn new(window: usize) -> Self {
        let window = window.clamp(1, MAX_PREDICTION_WINDOW);
        Self {
            window,
            roulette: Mutex::new(History::with_capacity(window)),
            blackjack: Mutex::new(History::with_capacity(window)),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Current roulette window, oldest first.
    pub fn roulette_window(&self) -> Vec<u8> {
        lock(&self.roulette).to_vec()
    }

    /// Current blackjack window, oldest first.
    pub fn blackjack_window(&self) -> Vec<String> {
        lock(&self.blackjack).to_vec()
    }

    /// Frequencies, color split and streak over the roulette window after
    /// appending the newest `window` numbers of `history`.
    ///
    /// An empty `history` yields the default prediction and leaves the
    /// window untouched.
    pub fn predict_roulette<R: Rng + ?Sized>(
        &self,
        history: &[u8],
        rng: &mut R,
    ) -> CasinoResult<RoulettePrediction> {
        if let Some(&bad) = history.iter().find(|&&n| n > MAX_ROULETTE_NUMBER) {
            return Err(CasinoError::InvalidNumber(bad));
        }
        if history.is_empty() {
            return Ok(RoulettePrediction::default());
        }

        let numbers = {
            let mut window = lock(&self.roulette);
            let skip = history.len().saturating_sub(self.window);
            window.extend(history[skip..].iter().copied());
            window.to_vec()
        };
        let total = numbers.len();

        let hot_numbers: Vec<HotNumber> = frequencies(&numbers)
            .into_iter()
            .take(HOT_NUMBERS)
            .map(|(number, frequency)| HotNumber { number, frequency })
            .collect();

        let mut seen = [false; MAX_ROULETTE_NUMBER as usize + 1];
        for &n in &numbers {
            seen[usize::from(n)] = true;
        }
        let cold_numbers: Vec<u8> = (0..=MAX_ROULETTE_NUMBER)
            .filter(|&n| !seen[usize::from(n)])
            .take(COLD_NUMBERS)
            .collect();

        let color_probabilities = color_probabilities(&numbers);

        let (predicted_number, confidence) = match hot_numbers.first() {
            Some(hot) => (
                hot.number,
                round2((hot.frequency as f64 / total as f64 * 100.0).min(MAX_NUMBER_CONFIDENCE)),
            ),
            None => (
                rng.random_range(0..=MAX_ROULETTE_NUMBER),
                models::THEORETICAL_NUMBER_CONFIDENCE,
            ),
        };

        let recommendation = roulette_recommendation(&color_probabilities, hot_numbers.first());
        debug!(
            "Roulette prediction over {} spins: {} ({}%)",
            total, predicted_number, confidence
        );

        Ok(RoulettePrediction {
            predicted_number,
            confidence,
            color_probabilities,
            hot_numbers,
            cold_numbers,
            sequence_analysis: analyze_sequence(&numbers),
            spins_analyzed: total,
            recommendation,
        })
    }

    /// Hi-Lo count over `labels`, which are also appended to the blackjack
    /// window. Labels whose rank cannot be read count as zero.
    pub fn predict_blackjack<S: AsRef<str>>(&self, labels: &[S]) -> BlackjackPrediction {
        if labels.is_empty() {
            return BlackjackPrediction::default();
        }
        lock(&self.blackjack).extend(labels.iter().map(|l| l.as_ref().to_string()));

        let running_count: i32 = labels.iter().map(|l| hi_lo_value(l.as_ref())).sum();
        let shoe_cards = (BLACKJACK_SHOE_DECKS * CARDS_PER_DECK) as f64;
        let cards_seen = labels.len();
        let remaining_decks = ((shoe_cards - cards_seen as f64) / CARDS_PER_DECK as f64).max(1.0);

        let true_count = f64::from(running_count) / remaining_decks;
        let player_edge = true_count * EDGE_PER_TRUE_COUNT;
        let win_probability = (models::BASE_WIN_PROBABILITY + player_edge).clamp(0.0, 100.0);
        debug!(
            "Blackjack prediction over {} cards: running {}, true {:.2}",
            cards_seen, running_count, true_count
        );

        BlackjackPrediction {
            win_probability: round2(win_probability),
            running_count,
            true_count: round2(true_count),
            player_edge: round2(player_edge),
            cards_seen,
            shoe_used_percent: percentage(cards_seen as f64, shoe_cards),
            favorable: true_count > FAVORABLE_TRUE_COUNT,
            recommendation: blackjack_recommendation(true_count),
        }
    }

    /// Strength class and rough improvement odds of a hold'em hand.
    pub fn predict_poker<R: Rng + ?Sized>(
        &self,
        player: &[Card],
        community: &[Card],
        rng: &mut R,
    ) -> PokerPrediction {
        let hand_strength = hand_strength(player);
        let phase = Phase::from_community_count(community.len());
        let estimated_outs = if community.is_empty() {
            PREFLOP_OUTS
        } else {
            rng.random_range(MIN_RANDOM_OUTS..MAX_RANDOM_OUTS)
        };

        let remaining_cards = CARDS_PER_DECK.saturating_sub(player.len() + community.len());
        let improvement = match phase {
            // Rule of 4 on the flop, rule of 2 on the turn.
            Phase::Flop | Phase::Turn if remaining_cards > 0 => {
                f64::from(estimated_outs) / remaining_cards as f64 * 100.0 * 2.0
            }
            _ => 0.0,
        }
        .min(100.0);

        let recommendation = if is_premium_pair(player) {
            "Premium hand. Play aggressively.".to_string()
        } else if improvement > GOOD_IMPROVEMENT_ODDS {
            format!("Good odds of improving ({improvement:.1}%). Consider calling.")
        } else if improvement > MODERATE_IMPROVEMENT_ODDS {
            format!("Moderate odds ({improvement:.1}%). Check the pot odds.")
        } else {
            "Weak hand. Consider folding under pressure.".to_string()
        };

        PokerPrediction {
            hand_strength,
            phase,
            estimated_outs,
            improvement_probability: round2(improvement),
            remaining_cards,
            recommendation,
        }
    }

    /// Range, summary statistics and trend of past payouts.
    pub fn predict_jackpot(&self, payouts: &[f64]) -> JackpotPrediction {
        if payouts.len() < MIN_TREND_PAYOUTS {
            return JackpotPrediction::default();
        }

        let mean = mean(payouts);
        let std_dev = std_dev(payouts, mean);
        let min = payouts.iter().copied().fold(f64::INFINITY, f64::min);
        let max = payouts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let trend = trend(payouts);

        let recommendation = match trend {
            Trend::Increasing => format!("Upward trend. Average prize: {}", format_money(mean)),
            Trend::Decreasing => "Downward trend. Wait for the pool to build up.".to_string(),
            _ => format!("Stable trend. Average prize: {}", format_money(mean)),
        };

        JackpotPrediction {
            predicted_range: PredictedRange {
                min: round2((mean - std_dev).max(0.0)),
                max: round2(mean + std_dev),
                mean: round2(mean),
            },
            statistics: Some(JackpotStatistics {
                mean: round2(mean),
                median: round2(median(payouts)),
                std_dev: round2(std_dev),
                min: round2(min),
                max: round2(max),
            }),
            trend,
            payouts_analyzed: payouts.len(),
            recommendation,
        }
    }
}

/// Counts per number, most frequent first; ties keep first-seen order.
fn frequencies(numbers: &[u8]) -> Vec<(u8, usize)> {
    let mut counts: Vec<(u8, usize)> = Vec::new();
    for &n in numbers {
        match counts.iter_mut().find(|(number, _)| *number == n) {
            Some((_, count)) => *count += 1,
            None => counts.push((n, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn color_probabilities(numbers: &[u8]) -> ColorProbabilities {
    if numbers.is_empty() {
        return ColorProbabilities::default();
    }
    let total = numbers.len() as f64;
    let count = |color: Color| numbers.iter().filter(|&&n| number_color(n) == color).count() as f64;
    ColorProbabilities {
        red: percentage(count(Color::Red), total),
        black: percentage(count(Color::Black), total),
        green: percentage(count(Color::Green), total),
    }
}

fn analyze_sequence(numbers: &[u8]) -> String {
    if numbers.len() < STREAK_LENGTH {
        return "Insufficient history".to_string();
    }
    let last = &numbers[numbers.len() - STREAK_LENGTH..];
    let color = number_color(last[0]);
    if last.iter().all(|&n| number_color(n) == color) {
        format!("Streak of {color} ({STREAK_LENGTH} in a row)")
    } else {
        "Mixed sequence".to_string()
    }
}

fn roulette_recommendation(colors: &ColorProbabilities, hottest: Option<&HotNumber>) -> String {
    if colors.red > DOMINANT_COLOR_THRESHOLD {
        return format!("Reds are hot ({:.1}%). Consider betting on red.", colors.red);
    }
    if colors.black > DOMINANT_COLOR_THRESHOLD {
        return format!("Blacks dominate ({:.1}%). Consider betting on black.", colors.black);
    }
    match hottest {
        Some(hot) if hot.frequency > HOT_NUMBER_THRESHOLD => format!(
            "Number {} has come up {} times. It may be hot.",
            hot.number, hot.frequency
        ),
        _ => "Balanced distribution. Play with caution.".to_string(),
    }
}

/// +1 for 2..=6, -1 for tens, faces and aces, 0 otherwise.
fn hi_lo_value(label: &str) -> i32 {
    match rank_value(label) {
        Some(2..=6) => 1,
        Some(10..) => -1,
        _ => 0,
    }
}

fn blackjack_recommendation(true_count: f64) -> String {
    if true_count > 3.0 {
        format!("Very favorable moment! True count: {true_count:.1}. Raise your bet.")
    } else if true_count > 1.0 {
        format!("Favorable moment. True count: {true_count:.1}. Stay aggressive.")
    } else if true_count < -2.0 {
        "Unfavorable shoe. Reduce bets or wait.".to_string()
    } else {
        "Neutral shoe. Use conservative basic strategy.".to_string()
    }
}

fn hand_strength(player: &[Card]) -> HandStrength {
    let [Card(first, _), Card(second, _)] = player else {
        return HandStrength::Unknown;
    };
    if first == second {
        if *first >= KING {
            HandStrength::Premium
        } else {
            HandStrength::Pair
        }
    } else if (*first).max(*second) >= QUEEN {
        HandStrength::HighCards
    } else {
        HandStrength::Medium
    }
}

/// AA, KK or QQ.
fn is_premium_pair(player: &[Card]) -> bool {
    matches!(player, [Card(a, _), Card(b, _)] if a == b && *a >= QUEEN)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        _ => sorted[mid],
    }
}

/// Population standard deviation.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compares the means of both halves; the second half gets the odd element.
fn trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Insufficient;
    }
    let (first, second) = values.split_at(values.len() / 2);
    let (first, second) = (mean(first), mean(second));
    if first == 0.0 {
        return if second > 0.0 {
            Trend::Increasing
        } else {
            Trend::Stable
        };
    }
    let change = (second - first) / first * 100.0;
    if change > TREND_THRESHOLD {
        Trend::Increasing
    } else if change < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
