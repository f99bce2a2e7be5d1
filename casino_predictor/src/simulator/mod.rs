//! Game simulators.
//!
//! Each simulator plays exactly one round against a table's state and
//! returns the resulting record. Randomness is injected so rounds can be
//! replayed from a seeded generator.

pub mod models;

use log::{debug, info};
use rand::Rng;

pub use models::{BlackjackRound, JackpotTick, Outcome, PokerDeal, RouletteSpin, timestamp};

use crate::{
    errors::CasinoResult,
    format::round2,
    game::{
        Card, Game, Phase, classify_number,
        constants::{
            BLACKJACK_REFILL_THRESHOLD, JACKPOT_PAYOUT_PROBABILITY, JACKPOT_RESET_MAX,
            JACKPOT_RESET_MIN, MAX_ACTIVE_PLAYERS, MAX_ROULETTE_NUMBER, MAX_SIMULATED_POT,
            MIN_ACTIVE_PLAYERS, MIN_SIMULATED_POT, POKER_REFILL_THRESHOLD, ZERO_PROBABILITY,
        },
        determine_winner, hand_value,
    },
    table::{BlackjackTable, JackpotPool, PokerTable, RouletteTable, TableStore},
};

/// Spins a European wheel with a 3% forced zero.
pub fn spin_roulette<R: Rng + ?Sized>(
    table_id: &str,
    table: &mut RouletteTable,
    rng: &mut R,
) -> CasinoResult<RouletteSpin> {
    let number = if rng.random_bool(ZERO_PROBABILITY) {
        0
    } else {
        rng.random_range(1..=MAX_ROULETTE_NUMBER)
    };
    let info = classify_number(number)?;
    table.record_spin(number);

    Ok(RouletteSpin {
        table: table_id.to_string(),
        number,
        color: info.color,
        parity: info.parity,
        dozen: info.dozen,
        column: info.column,
        timestamp: timestamp(),
    })
}

fn deal_blackjack_card(table: &mut BlackjackTable) -> CasinoResult<Card> {
    let card = table.deck.draw()?;
    table.record_card_draw(card);
    Ok(card)
}

/// Deals two cards each to the player and the dealer and settles the hand.
pub fn play_blackjack<R: Rng + ?Sized>(
    table_id: &str,
    table: &mut BlackjackTable,
    rng: &mut R,
) -> CasinoResult<BlackjackRound> {
    if table.deck.len() < BLACKJACK_REFILL_THRESHOLD {
        table.reshuffle(rng);
    }

    let player_hand = vec![deal_blackjack_card(table)?, deal_blackjack_card(table)?];
    let dealer_hand = vec![deal_blackjack_card(table)?, deal_blackjack_card(table)?];

    let player_total = hand_value(&player_hand);
    let dealer_visible_total = hand_value(&dealer_hand[..1]);
    let winner = determine_winner(player_total, hand_value(&dealer_hand));
    table.hands_played += 1;

    let mut visible_cards = player_hand.clone();
    visible_cards.push(dealer_hand[0]);

    Ok(BlackjackRound {
        table: table_id.to_string(),
        player_hand,
        dealer_hand,
        player_total,
        dealer_visible_total,
        winner,
        visible_cards,
        cards_remaining: table.deck.len(),
        timestamp: timestamp(),
    })
}

/// Deals a hole-card pair and the community cards of a random phase.
///
/// The phase is rolled independently on every call; hands do not progress
/// from street to street.
pub fn deal_poker<R: Rng + ?Sized>(
    table_id: &str,
    table: &mut PokerTable,
    rng: &mut R,
) -> CasinoResult<PokerDeal> {
    if table.deck.len() < POKER_REFILL_THRESHOLD {
        table.reshuffle(rng);
    }

    let player_hand = vec![table.deck.draw()?, table.deck.draw()?];
    let phase = Phase::DEALT[rng.random_range(0..Phase::DEALT.len())];
    let community_cards = (0..phase.community_cards())
        .map(|_| table.deck.draw())
        .collect::<CasinoResult<Vec<_>>>()?;

    table.hands_played += 1;
    table.phase = phase;

    Ok(PokerDeal {
        table: table_id.to_string(),
        player_hand,
        community_cards,
        phase,
        pot: rng.random_range(MIN_SIMULATED_POT..=MAX_SIMULATED_POT),
        active_players: rng.random_range(MIN_ACTIVE_PLAYERS..=MAX_ACTIVE_PLAYERS),
        timestamp: timestamp(),
    })
}

/// Adds one play's increment to the pool and rolls for a payout.
pub fn tick_jackpot<R: Rng + ?Sized>(
    pool_id: &str,
    pool: &mut JackpotPool,
    rng: &mut R,
) -> JackpotTick {
    pool.current_prize += pool.increment;

    let amount_paid = if rng.random_bool(JACKPOT_PAYOUT_PROBABILITY) {
        let paid = pool.current_prize;
        pool.payouts.push(paid);
        pool.current_prize = rng.random_range(JACKPOT_RESET_MIN..=JACKPOT_RESET_MAX);
        info!(
            "Jackpot {} paid out {:.2}, pool reset to {:.2}",
            pool_id, paid, pool.current_prize
        );
        Some(round2(paid))
    } else {
        None
    };

    JackpotTick {
        jackpot_id: pool_id.to_string(),
        current_prize: round2(pool.current_prize),
        payouts: pool.payout_history(),
        payout_occurred: amount_paid.is_some(),
        amount_paid,
        timestamp: timestamp(),
    }
}

/// Plays one round of `game` on the table `id` resolves to.
pub fn simulate<R: Rng + ?Sized>(
    store: &TableStore,
    game: Game,
    id: &str,
    rng: &mut R,
) -> CasinoResult<Outcome> {
    let outcome = match game {
        Game::Roulette => Outcome::Roulette(
            store.with_roulette(id, |table_id, table| spin_roulette(table_id, table, rng))?,
        ),
        Game::Blackjack => Outcome::Blackjack(
            store.with_blackjack(id, |table_id, table| play_blackjack(table_id, table, rng))?,
        ),
        Game::Poker => Outcome::Poker(
            store.with_poker(id, |table_id, table| deal_poker(table_id, table, rng))?,
        ),
        Game::Jackpot => Outcome::Jackpot(
            store.with_jackpot(id, |pool_id, pool| tick_jackpot(pool_id, pool, rng)),
        ),
    };
    debug!("Simulated {} round on {}", game, outcome.table());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Color, Parity, Winner, constants::JACKPOT_SEED_PAYOUTS};
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn test_roulette_spin_records_history() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut table = RouletteTable::new();
        for _ in 0..25 {
            let spin = spin_roulette("table_1", &mut table, &mut rng).unwrap();
            assert!(spin.number <= 36);
            if spin.number == 0 {
                assert_eq!(spin.color, Color::Green);
                assert_eq!(spin.parity, Parity::None);
            }
        }
        assert_eq!(table.total_spins, 25);
        assert_eq!(table.history.len(), 25);
    }

    #[test]
    fn test_blackjack_round_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut table = BlackjackTable::new(&mut rng);
        let round = play_blackjack("table_1", &mut table, &mut rng).unwrap();

        assert_eq!(round.player_hand.len(), 2);
        assert_eq!(round.dealer_hand.len(), 2);
        assert_eq!(round.visible_cards.len(), 3);
        assert_eq!(round.visible_cards[2], round.dealer_hand[0]);
        assert_eq!(round.player_total, hand_value(&round.player_hand));
        assert_eq!(round.dealer_visible_total, hand_value(&round.dealer_hand[..1]));
        assert_eq!(round.cards_remaining, 312 - 4);
        assert_eq!(table.used_cards.len(), 4);
        assert_eq!(table.hands_played, 1);
    }

    #[test]
    fn test_blackjack_winner_uses_full_dealer_hand() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut table = BlackjackTable::new(&mut rng);
        for _ in 0..40 {
            let round = play_blackjack("table_1", &mut table, &mut rng).unwrap();
            let expected = determine_winner(round.player_total, hand_value(&round.dealer_hand));
            assert_eq!(round.winner, expected);
        }
    }

    #[test]
    fn test_blackjack_refills_low_shoe() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut table = BlackjackTable::new(&mut rng);
        while table.deck.len() >= BLACKJACK_REFILL_THRESHOLD {
            let card = table.deck.draw().unwrap();
            table.record_card_draw(card);
        }
        let round = play_blackjack("table_1", &mut table, &mut rng).unwrap();
        assert_eq!(round.cards_remaining, 308);
        assert_eq!(table.used_cards.len(), 4);
    }

    #[test]
    fn test_poker_deal_matches_phase() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut table = PokerTable::new(&mut rng);
        let mut phases = HashSet::new();
        for _ in 0..200 {
            let deal = deal_poker("table_1", &mut table, &mut rng).unwrap();
            assert_eq!(deal.player_hand.len(), 2);
            assert_eq!(deal.community_cards.len(), deal.phase.community_cards());
            assert!((100..=1000).contains(&deal.pot));
            assert!((2..=6).contains(&deal.active_players));
            assert_eq!(table.phase, deal.phase);

            let unique: HashSet<_> = deal.player_hand.iter().chain(&deal.community_cards).collect();
            assert_eq!(unique.len(), 2 + deal.community_cards.len());
            phases.insert(deal.phase);
        }
        assert_eq!(phases.len(), 4);
        assert_eq!(table.hands_played, 200);
    }

    #[test]
    fn test_jackpot_tick_increments() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = JackpotPool::new();
        let tick = tick_jackpot("progressive_1", &mut pool, &mut rng);
        if !tick.payout_occurred {
            assert_eq!(tick.current_prize, 50_000.5);
            assert_eq!(tick.amount_paid, None);
            assert_eq!(tick.payouts, JACKPOT_SEED_PAYOUTS.to_vec());
        }
    }

    #[test]
    fn test_jackpot_payout_resets_pool() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut pool = JackpotPool::new();
        let tick = (0..100_000)
            .map(|_| tick_jackpot("progressive_1", &mut pool, &mut rng))
            .find(|tick| tick.payout_occurred)
            .unwrap();

        let paid = tick.amount_paid.unwrap();
        assert!((JACKPOT_RESET_MIN..=JACKPOT_RESET_MAX).contains(&tick.current_prize));
        assert_eq!(tick.payouts.last(), Some(&paid));
        assert_eq!(tick.payouts.len(), 6);
    }

    #[test]
    fn test_simulate_falls_back_to_default_table() {
        let mut rng = StdRng::seed_from_u64(12);
        let store = TableStore::new(&mut rng);
        let outcome = simulate(&store, Game::Blackjack, "table_42", &mut rng).unwrap();
        assert_eq!(outcome.table(), "table_1");
        assert_eq!(outcome.game(), Game::Blackjack);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["game"], "blackjack");
        assert!(matches!(
            json["winner"].as_str(),
            Some("player_wins" | "dealer_wins" | "push")
        ));
        let _: Winner = serde_json::from_value(json["winner"].clone()).unwrap();
    }
}
