use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt::{self},
    str::FromStr,
};

use super::constants::{CARDS_PER_DECK, MAX_ROULETTE_NUMBER, RED_NUMBERS};
use crate::errors::{CasinoError, CasinoResult};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            '♠' | 's' => Some(Self::Spade),
            '♥' | 'h' => Some(Self::Heart),
            '♦' | 'd' => Some(Self::Diamond),
            '♣' | 'c' => Some(Self::Club),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const JACK: Value = 11;
pub const QUEEN: Value = 12;
pub const KING: Value = 13;
pub const ACE: Value = 14;

/// A card is a value (2..=10, jack=11 ... ace=14) and a suit.
///
/// Its identity is the string form `rank+suit`, e.g. `10♠` or `A♥`, which is
/// also how it serializes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card(pub Value, pub Suit);

impl Card {
    pub fn rank_label(&self) -> String {
        match self.0 {
            JACK => "J".to_string(),
            QUEEN => "Q".to_string(),
            KING => "K".to_string(),
            ACE => "A".to_string(),
            v => v.to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank_label(), self.1)
    }
}

/// Parses a bare rank label (`2`..`10`, `J`, `Q`, `K`, `A`).
fn parse_rank(label: &str) -> Option<Value> {
    match label.to_ascii_uppercase().as_str() {
        "J" => Some(JACK),
        "Q" => Some(QUEEN),
        "K" => Some(KING),
        "A" => Some(ACE),
        other => other.parse::<Value>().ok().filter(|v| (2..=10).contains(v)),
    }
}

/// Rank value of a card label, with or without a trailing suit mark.
///
/// `"K"`, `"K♠"` and `"kh"` all yield 13; anything unrecognized yields `None`.
pub fn rank_value(label: &str) -> Option<Value> {
    let label = label.trim();
    if let Some(value) = parse_rank(label) {
        return Some(value);
    }
    let mut chars = label.chars();
    let suit = chars.next_back()?;
    Suit::from_char(suit)?;
    parse_rank(chars.as_str())
}

impl FromStr for Card {
    type Err = CasinoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let invalid = || CasinoError::InvalidCard(s.to_string());
        let mut chars = label.chars();
        let suit = chars.next_back().and_then(Suit::from_char).ok_or_else(invalid)?;
        let value = parse_rank(chars.as_str()).ok_or_else(invalid)?;
        Ok(Card(value, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Blackjack points for a single card. Aces start at 11.
pub fn blackjack_value(card: &Card) -> u32 {
    match card.0 {
        ACE => 11,
        JACK..=KING => 10,
        v => u32::from(v),
    }
}

/// Blackjack total with aces demoted from 11 to 1 while the hand is over 21.
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut total: u32 = cards.iter().map(blackjack_value).sum();
    let mut soft_aces = cards.iter().filter(|card| card.0 == ACE).count();
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

/// A shoe of one or more standard decks, dealt from the end.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds `52 * num_decks` cards and shuffles them uniformly.
    pub fn new<R: Rng + ?Sized>(num_decks: usize, rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(CARDS_PER_DECK * num_decks);
        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for value in 2..=ACE {
                    cards.push(Card(value, suit));
                }
            }
        }
        cards.shuffle(rng);
        Self { cards }
    }

    pub fn draw(&mut self) -> CasinoResult<Card> {
        self.cards.pop().ok_or(CasinoError::DeckEmpty)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The four supported games. Validation is closed: anything else is rejected.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Roulette,
    Blackjack,
    Poker,
    Jackpot,
}

impl Game {
    pub const ALL: [Game; 4] = [Game::Roulette, Game::Blackjack, Game::Poker, Game::Jackpot];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Roulette => "roulette",
            Self::Blackjack => "blackjack",
            Self::Poker => "poker",
            Self::Jackpot => "jackpot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Roulette => "European Roulette",
            Self::Blackjack => "Blackjack",
            Self::Poker => "Texas Hold'em Poker",
            Self::Jackpot => "Progressive Jackpot",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Roulette => "Number and color frequencies from recent spins",
            Self::Blackjack => "Hi-Lo card counting and win probability",
            Self::Poker => "Hand strength and improvement odds",
            Self::Jackpot => "Payout range and trend from past prizes",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Game {
    type Err = CasinoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "roulette" => Ok(Self::Roulette),
            "blackjack" => Ok(Self::Blackjack),
            "poker" => Ok(Self::Poker),
            "jackpot" => Ok(Self::Jackpot),
            _ => Err(CasinoError::InvalidGame(s.trim().to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
    Green,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Red => "red",
            Self::Black => "black",
            Self::Green => "green",
        };
        write!(f, "{repr}")
    }
}

/// Zero has no parity.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
    None,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Even => "even",
            Self::Odd => "odd",
            Self::None => "none",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NumberInfo {
    pub number: u8,
    pub color: Color,
    pub parity: Parity,
    /// 1..=3, or 0 for the zero pocket.
    pub dozen: u8,
    /// `number % 3`, or 0 for the zero pocket.
    pub column: u8,
}

pub fn number_color(n: u8) -> Color {
    if n == 0 {
        Color::Green
    } else if RED_NUMBERS.contains(&n) {
        Color::Red
    } else {
        Color::Black
    }
}

pub fn classify_number(n: u8) -> CasinoResult<NumberInfo> {
    if n > MAX_ROULETTE_NUMBER {
        return Err(CasinoError::InvalidNumber(n));
    }
    let (parity, dozen, column) = match n {
        0 => (Parity::None, 0, 0),
        n if n % 2 == 0 => (Parity::Even, (n - 1) / 12 + 1, n % 3),
        n => (Parity::Odd, (n - 1) / 12 + 1, n % 3),
    };
    Ok(NumberInfo {
        number: n,
        color: number_color(n),
        parity,
        dozen,
        column,
    })
}

/// Hold'em betting round, identified by the number of community cards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Preflop,
    Flop,
    Turn,
    River,
    Unknown,
}

impl Phase {
    /// Phases a deal can land on.
    pub const DEALT: [Phase; 4] = [Phase::Preflop, Phase::Flop, Phase::Turn, Phase::River];

    pub fn community_cards(&self) -> usize {
        match self {
            Self::Preflop | Self::Unknown => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }

    pub fn from_community_count(count: usize) -> Self {
        match count {
            0 => Self::Preflop,
            3 => Self::Flop,
            4 => Self::Turn,
            5 => Self::River,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Unknown => "unknown",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    PlayerWins,
    DealerWins,
    Push,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlayerWins => "player wins",
            Self::DealerWins => "dealer wins",
            Self::Push => "push",
        };
        write!(f, "{repr}")
    }
}

/// Settles a blackjack round from both full totals.
///
/// A player bust is checked before a dealer bust, so when both bust the
/// dealer wins.
pub fn determine_winner(player_total: u32, dealer_total: u32) -> Winner {
    if player_total > 21 {
        Winner::DealerWins
    } else if dealer_total > 21 || player_total > dealer_total {
        Winner::PlayerWins
    } else if dealer_total > player_total {
        Winner::DealerWins
    } else {
        Winner::Push
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    fn cards(labels: &[&str]) -> Vec<Card> {
        labels.iter().map(|l| l.parse().unwrap()).collect()
    }

    // === Card Tests ===

    #[test]
    fn test_card_display() {
        assert_eq!(Card(ACE, Suit::Heart).to_string(), "A♥");
        assert_eq!(Card(10, Suit::Spade).to_string(), "10♠");
        assert_eq!(Card(QUEEN, Suit::Club).to_string(), "Q♣");
    }

    #[test]
    fn test_card_parse() {
        assert_eq!("10♦".parse::<Card>().unwrap(), Card(10, Suit::Diamond));
        assert_eq!("ks".parse::<Card>().unwrap(), Card(KING, Suit::Spade));
        assert!("1♠".parse::<Card>().is_err());
        assert!("K".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn test_card_serializes_as_identity_string() {
        let card = Card(JACK, Suit::Diamond);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"J♦\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_rank_value_with_and_without_suit() {
        assert_eq!(rank_value("K"), Some(KING));
        assert_eq!(rank_value("K♠"), Some(KING));
        assert_eq!(rank_value("10♥"), Some(10));
        assert_eq!(rank_value("10"), Some(10));
        assert_eq!(rank_value("2c"), Some(2));
        assert_eq!(rank_value("joker"), None);
        assert_eq!(rank_value(""), None);
    }

    // === Deck Tests ===

    #[test]
    fn test_deck_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Deck::new(1, &mut rng).len(), 52);
        assert_eq!(Deck::new(6, &mut rng).len(), 312);
    }

    #[test]
    fn test_deck_contains_each_card_k_times() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut deck = Deck::new(2, &mut rng);
        let mut counts: HashMap<Card, usize> = HashMap::new();
        while let Ok(card) = deck.draw() {
            *counts.entry(card).or_default() += 1;
        }
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_draw_from_empty_deck() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::new(0, &mut rng);
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(CasinoError::DeckEmpty));
    }

    // === Blackjack values ===

    #[test]
    fn test_hand_value_aces() {
        assert_eq!(hand_value(&cards(&["A♠", "A♥"])), 12);
        assert_eq!(hand_value(&cards(&["A♠", "K♥"])), 21);
        assert_eq!(hand_value(&cards(&["A♠", "A♥", "A♦", "9♣"])), 12);
    }

    #[test]
    fn test_hand_value_bust_without_ace() {
        assert_eq!(hand_value(&cards(&["10♠", "10♥", "5♦"])), 25);
    }

    #[test]
    fn test_determine_winner() {
        assert_eq!(determine_winner(22, 18), Winner::DealerWins);
        assert_eq!(determine_winner(18, 22), Winner::PlayerWins);
        assert_eq!(determine_winner(20, 19), Winner::PlayerWins);
        assert_eq!(determine_winner(17, 19), Winner::DealerWins);
        assert_eq!(determine_winner(19, 19), Winner::Push);
    }

    #[test]
    fn test_both_bust_goes_to_dealer() {
        assert_eq!(determine_winner(24, 23), Winner::DealerWins);
    }

    // === Roulette ===

    #[test]
    fn test_classify_zero() {
        let info = classify_number(0).unwrap();
        assert_eq!(info.color, Color::Green);
        assert_eq!(info.parity, Parity::None);
        assert_eq!((info.dozen, info.column), (0, 0));
    }

    #[test]
    fn test_classify_examples() {
        let info = classify_number(1).unwrap();
        assert_eq!(
            (info.color, info.parity, info.dozen, info.column),
            (Color::Red, Parity::Odd, 1, 1)
        );

        let info = classify_number(24).unwrap();
        assert_eq!(
            (info.color, info.parity, info.dozen, info.column),
            (Color::Black, Parity::Even, 2, 0)
        );

        let info = classify_number(36).unwrap();
        assert_eq!(
            (info.color, info.parity, info.dozen, info.column),
            (Color::Red, Parity::Even, 3, 0)
        );
    }

    #[test]
    fn test_classify_out_of_range() {
        assert_eq!(classify_number(37), Err(CasinoError::InvalidNumber(37)));
    }

    // === Game / Phase ===

    #[test]
    fn test_game_parse_is_closed() {
        assert_eq!(" Roulette ".parse::<Game>().unwrap(), Game::Roulette);
        assert_eq!("JACKPOT".parse::<Game>().unwrap(), Game::Jackpot);
        assert!(matches!("ruleta".parse::<Game>(), Err(CasinoError::InvalidGame(_))));
        assert!("".parse::<Game>().is_err());
    }

    #[test]
    fn test_phase_community_counts() {
        for phase in Phase::DEALT {
            assert_eq!(Phase::from_community_count(phase.community_cards()), phase);
        }
        assert_eq!(Phase::from_community_count(2), Phase::Unknown);
    }
}
