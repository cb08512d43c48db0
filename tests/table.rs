//! Table integration tests.

#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use twentyone::{
    ActionError, BalanceLedger, BetError, BetReceipt, Card, Hand, LedgerError, RoundOutcome,
    RoundState, Shoe, Suit, Table, TableOptions,
};

const fn card(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

fn hand_of(cards: &[Card]) -> Hand {
    let mut hand = Hand::new();
    for &card in cards {
        hand.add_card(card);
    }
    hand
}

fn rig_shoe(table: &mut Table<FlakyLedger>, draws: &[Card]) {
    let mut cards = draws.to_vec();
    cards.reverse();
    table.load_shoe(cards);
}

fn open_table(chips: usize) -> Table<FlakyLedger> {
    Table::open(TableOptions::default(), FlakyLedger::new(chips), 7).unwrap()
}

/// Ledger double with switchable failure injection.
struct FlakyLedger {
    chips: usize,
    fail_bets: bool,
    fail_results: bool,
    reject_bets: bool,
    bets_placed: usize,
    results_reported: usize,
}

impl FlakyLedger {
    const fn new(chips: usize) -> Self {
        Self {
            chips,
            fail_bets: false,
            fail_results: false,
            reject_bets: false,
            bets_placed: 0,
            results_reported: 0,
        }
    }
}

impl BalanceLedger for FlakyLedger {
    fn place_bet(&mut self, amount: usize) -> Result<BetReceipt, LedgerError> {
        if self.fail_bets {
            return Err(LedgerError::Status(503));
        }

        if self.reject_bets || amount > self.chips {
            return Ok(BetReceipt {
                accepted: false,
                new_balance: self.chips,
            });
        }

        self.bets_placed += 1;
        self.chips -= amount;
        Ok(BetReceipt {
            accepted: true,
            new_balance: self.chips,
        })
    }

    fn report_result(&mut self, _won: bool, payout: usize) -> Result<usize, LedgerError> {
        if self.fail_results {
            return Err(LedgerError::Status(503));
        }

        self.results_reported += 1;
        self.chips += payout;
        Ok(self.chips)
    }

    fn fetch_balance(&mut self) -> Result<usize, LedgerError> {
        Ok(self.chips)
    }
}

#[test]
fn hand_value_fixtures() {
    assert_eq!(
        hand_of(&[card(Suit::Hearts, 10), card(Suit::Spades, 6)]).value(),
        16
    );

    let natural = hand_of(&[card(Suit::Hearts, 1), card(Suit::Spades, 13)]);
    assert_eq!(natural.value(), 21);
    assert!(natural.is_natural());
    assert!(natural.is_soft());

    // One Ace stays at 11, the other downgrades to 1.
    assert_eq!(
        hand_of(&[
            card(Suit::Hearts, 1),
            card(Suit::Clubs, 1),
            card(Suit::Diamonds, 9)
        ])
        .value(),
        21
    );

    assert_eq!(
        hand_of(&[card(Suit::Hearts, 13), card(Suit::Spades, 12)]).value(),
        20
    );

    // Bust totals are reported as-is, no clamping.
    let bust = hand_of(&[
        card(Suit::Hearts, 13),
        card(Suit::Spades, 12),
        card(Suit::Clubs, 5),
    ]);
    assert_eq!(bust.value(), 25);
    assert!(bust.is_bust());
    assert!(!bust.is_soft());
}

#[test]
fn ace_heavy_hands_follow_the_downgrade_algorithm() {
    // Expected values come from the downgrade loop itself, not hand-picked
    // literals.
    for aces in 1u8..=10 {
        let cards: Vec<Card> = (0..aces).map(|_| card(Suit::Spades, 1)).collect();

        let mut expected = 11 * u16::from(aces);
        let mut high_aces = aces;
        while expected > 21 && high_aces > 0 {
            expected -= 10;
            high_aces -= 1;
        }

        let hand = hand_of(&cards);
        assert_eq!(u16::from(hand.value()), expected, "{aces} aces");
        assert_eq!(hand.is_soft(), high_aces > 0, "{aces} aces");
    }
}

#[test]
fn shoe_builds_six_decks_with_six_copies_of_each_card() {
    let mut shoe = Shoe::new(6, 3);
    assert_eq!(shoe.remaining(), 312);

    let mut counts: HashMap<Card, usize> = HashMap::new();
    for _ in 0..312 {
        *counts.entry(shoe.draw()).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), 52);
    assert!(counts.values().all(|&copies| copies == 6));
    assert_eq!(shoe.remaining(), 0);

    // The 313th draw rebuilds the shoe rather than failing.
    let _extra = shoe.draw();
    assert_eq!(shoe.remaining(), 311);
}

#[test]
fn exhausted_shoe_rebuilds_instead_of_failing() {
    let mut shoe = Shoe::new(1, 9);
    for _ in 0..52 {
        shoe.draw();
    }
    assert_eq!(shoe.remaining(), 0);

    let _extra = shoe.draw();
    assert_eq!(shoe.remaining(), 51);
}

#[test]
fn deal_rejects_invalid_bets_without_drawing() {
    let mut table = open_table(50);

    assert!(matches!(table.deal(0), Err(BetError::ZeroBet)));
    assert!(matches!(table.deal(51), Err(BetError::InsufficientChips)));

    assert_eq!(table.state(), RoundState::Idle);
    assert!(table.player_hand().is_empty());
    assert!(table.dealer_hand().is_empty());
    assert_eq!(table.ledger().bets_placed, 0);
}

#[test]
fn ledger_rejection_keeps_round_idle() {
    let mut table = open_table(100);
    table.ledger_mut().reject_bets = true;

    assert!(matches!(table.deal(10), Err(BetError::Rejected)));
    assert_eq!(table.state(), RoundState::Idle);
    assert!(table.player_hand().is_empty());
}

#[test]
fn bet_request_failure_keeps_round_recoverable() {
    let mut table = open_table(100);
    table.ledger_mut().fail_bets = true;

    assert!(matches!(table.deal(10), Err(BetError::Ledger(_))));
    assert_eq!(table.state(), RoundState::Idle);
    assert_eq!(table.balance(), 100);

    // The very same deal succeeds once the ledger is reachable again.
    table.ledger_mut().fail_bets = false;
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 8),
            card(Suit::Clubs, 6),
            card(Suit::Diamonds, 7),
            card(Suit::Spades, 10),
        ],
    );
    assert!(table.deal(10).unwrap().is_none());
    assert_eq!(table.state(), RoundState::Playing);
}

#[test]
fn basic_round_flow_deals_in_order_and_compares() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 8),   // player
            card(Suit::Clubs, 6),    // dealer up
            card(Suit::Diamonds, 7), // player
            card(Suit::Spades, 10),  // dealer hole
            card(Suit::Clubs, 5),    // dealer draw
        ],
    );

    assert!(table.deal(10).unwrap().is_none());
    assert_eq!(table.state(), RoundState::Playing);
    assert_eq!(table.bet(), Some(10));
    assert_eq!(table.balance(), 90);

    let ranks: Vec<u8> = table.player_hand().cards().iter().map(|c| c.rank).collect();
    assert_eq!(ranks, vec![8, 7]);
    assert_eq!(table.dealer_hand().up_card().unwrap().rank, 6);
    assert!(!table.dealer_hand().is_hole_revealed());
    assert_eq!(table.dealer_hand().visible_value(), 6);

    let resolution = table.stand().unwrap();
    assert_eq!(table.dealer_hand().len(), 3); // drew on 16
    assert!(table.dealer_hand().is_hole_revealed());
    assert_eq!(resolution.outcome, RoundOutcome::DealerWin);
    assert_eq!(resolution.player_value, 15);
    assert_eq!(resolution.dealer_value, 21);
    assert_eq!(resolution.bet, 10);
    assert_eq!(resolution.payout, 0);
    assert_eq!(resolution.new_balance, Some(90));
    assert_eq!(table.state(), RoundState::Idle);
    assert_eq!(table.bet(), None);
}

#[test]
fn natural_resolves_on_the_deal() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 1),   // player
            card(Suit::Clubs, 9),    // dealer up
            card(Suit::Spades, 13),  // player
            card(Suit::Diamonds, 7), // dealer hole
        ],
    );

    let resolution = table
        .deal(10)
        .unwrap()
        .expect("a natural resolves immediately");

    assert_eq!(resolution.outcome, RoundOutcome::Natural);
    assert_eq!(resolution.player_value, 21);
    assert_eq!(resolution.dealer_value, 16);
    assert_eq!(resolution.payout, 20);
    assert_eq!(table.state(), RoundState::Idle);
    assert_eq!(table.balance(), 110);
    assert!(table.dealer_hand().is_hole_revealed());
}

#[test]
fn hit_past_21_resolves_as_dealer_win() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 10),  // player
            card(Suit::Clubs, 9),    // dealer up
            card(Suit::Diamonds, 2), // player
            card(Suit::Spades, 7),   // dealer hole
            card(Suit::Hearts, 4),   // first hit, safe
            card(Suit::Spades, 13),  // second hit, bust
        ],
    );

    assert!(table.deal(10).unwrap().is_none());

    let outcome = table.hit().unwrap();
    assert_eq!(outcome.card.rank, 4);
    assert!(outcome.resolution.is_none());
    assert_eq!(table.state(), RoundState::Playing);

    let outcome = table.hit().unwrap();
    assert_eq!(outcome.card.rank, 13);
    let resolution = outcome.resolution.expect("a bust resolves the round");
    assert_eq!(resolution.outcome, RoundOutcome::DealerWin);
    assert_eq!(resolution.player_value, 26); // reported as-is
    assert_eq!(resolution.payout, 0);
    assert_eq!(table.state(), RoundState::Idle);

    // The round is over; further actions fall through.
    assert!(table.hit().is_none());
    assert!(table.stand().is_none());
}

#[test]
fn dealer_stands_on_hard_17() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 10),  // player
            card(Suit::Clubs, 10),   // dealer up
            card(Suit::Diamonds, 8), // player
            card(Suit::Spades, 7),   // dealer hole
        ],
    );

    table.deal(10).unwrap();
    let resolution = table.stand().unwrap();

    assert_eq!(table.dealer_hand().len(), 2); // no draws on 17
    assert_eq!(resolution.outcome, RoundOutcome::PlayerWin);
    assert_eq!(resolution.player_value, 18);
    assert_eq!(resolution.dealer_value, 17);
    assert_eq!(resolution.payout, 20);
}

#[test]
fn dealer_stands_on_soft_17() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 10),  // player
            card(Suit::Clubs, 1),    // dealer up
            card(Suit::Diamonds, 8), // player
            card(Suit::Spades, 6),   // dealer hole: soft 17
        ],
    );

    table.deal(10).unwrap();
    let resolution = table.stand().unwrap();

    assert_eq!(table.dealer_hand().len(), 2); // no draws on soft 17
    assert!(table.dealer_hand().is_soft());
    assert_eq!(resolution.outcome, RoundOutcome::PlayerWin);
    assert_eq!(resolution.dealer_value, 17);
}

#[test]
fn dealer_bust_pays_the_player() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 10),  // player
            card(Suit::Clubs, 10),   // dealer up
            card(Suit::Diamonds, 8), // player
            card(Suit::Spades, 6),   // dealer hole
            card(Suit::Hearts, 10),  // dealer draw, bust
        ],
    );

    table.deal(10).unwrap();
    let resolution = table.stand().unwrap();

    assert_eq!(resolution.outcome, RoundOutcome::PlayerWin);
    assert_eq!(resolution.dealer_value, 26);
    assert_eq!(resolution.payout, 20);
    assert_eq!(table.balance(), 110);
}

#[test]
fn push_settles_as_dealer_win() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 10),  // player
            card(Suit::Clubs, 10),   // dealer up
            card(Suit::Diamonds, 8), // player
            card(Suit::Spades, 8),   // dealer hole
        ],
    );

    table.deal(10).unwrap();
    let resolution = table.stand().unwrap();

    // Equal totals are not returned to the player at this table.
    assert_eq!(resolution.player_value, resolution.dealer_value);
    assert_eq!(resolution.outcome, RoundOutcome::DealerWin);
    assert_eq!(resolution.payout, 0);
    assert_eq!(table.balance(), 90);
}

#[test]
fn actions_outside_a_round_are_no_ops() {
    let mut table = open_table(100);

    assert!(table.hit().is_none());
    assert!(table.stand().is_none());
    assert!(table.player_hand().is_empty());
    assert_eq!(table.state(), RoundState::Idle);
}

#[test]
fn deal_rejects_when_round_in_progress() {
    let mut table = open_table(100);
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 8),
            card(Suit::Clubs, 6),
            card(Suit::Diamonds, 7),
            card(Suit::Spades, 10),
        ],
    );

    assert!(table.deal(10).unwrap().is_none());
    assert!(matches!(table.deal(10), Err(BetError::RoundInProgress)));
    assert_eq!(table.bet(), Some(10));
}

#[test]
fn split_and_insurance_are_reserved() {
    let mut table = open_table(100);

    assert_eq!(table.split().unwrap_err(), ActionError::SplitUnimplemented);
    assert_eq!(
        table.take_insurance().unwrap_err(),
        ActionError::InsuranceUnimplemented
    );

    // Mid-round the affordances still fail and leave the round untouched.
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 8),   // player
            card(Suit::Clubs, 1),    // dealer shows an Ace
            card(Suit::Diamonds, 8), // player pair
            card(Suit::Spades, 10),  // dealer hole
        ],
    );
    table.deal(10).unwrap();

    assert_eq!(table.split().unwrap_err(), ActionError::SplitUnimplemented);
    assert_eq!(
        table.take_insurance().unwrap_err(),
        ActionError::InsuranceUnimplemented
    );
    assert_eq!(table.state(), RoundState::Playing);
    assert_eq!(table.player_hand().len(), 2);
}

#[test]
fn failed_settlement_queues_and_retries() {
    let mut table = open_table(100);
    assert!(matches!(table.retry_settlement(), Ok(None)));

    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 10),  // player
            card(Suit::Clubs, 10),   // dealer up
            card(Suit::Diamonds, 10), // player: 20
            card(Suit::Spades, 8),   // dealer hole: 18
        ],
    );

    table.ledger_mut().fail_results = true;
    table.deal(10).unwrap();
    let resolution = table.stand().unwrap();

    // The round settled locally; only the report is outstanding.
    assert_eq!(resolution.outcome, RoundOutcome::PlayerWin);
    assert_eq!(resolution.new_balance, None);
    assert_eq!(table.state(), RoundState::Idle);

    let pending = table.pending_settlement().expect("settlement queued");
    assert!(pending.won);
    assert_eq!(pending.payout, 20);

    // No new round while the report is outstanding.
    assert!(matches!(table.deal(10), Err(BetError::SettlementPending)));

    // A failed retry keeps it queued.
    assert!(table.retry_settlement().is_err());
    assert!(table.pending_settlement().is_some());

    table.ledger_mut().fail_results = false;
    let balance = table
        .retry_settlement()
        .unwrap()
        .expect("pending settlement delivered");
    assert_eq!(balance, 110);
    assert_eq!(table.balance(), 110);
    assert!(table.pending_settlement().is_none());
    assert_eq!(table.ledger().results_reported, 1); // exactly once

    // The table accepts bets again.
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 8),
            card(Suit::Clubs, 6),
            card(Suit::Diamonds, 7),
            card(Suit::Spades, 10),
        ],
    );
    assert!(table.deal(10).is_ok());
}

#[test]
fn penetration_reshuffle_between_rounds() {
    let options = TableOptions::default().with_decks(1).with_penetration(0.5);
    let mut table = Table::open(options, FlakyLedger::new(100), 1).unwrap();

    table.load_shoe(vec![card(Suit::Hearts, 2); 10]);
    assert!(table.check_and_reshuffle());
    assert_eq!(table.cards_remaining(), 52);

    // Never mid-round; the shoe rebuilds itself on demand instead.
    rig_shoe(
        &mut table,
        &[
            card(Suit::Hearts, 8),   // player
            card(Suit::Clubs, 6),    // dealer up
            card(Suit::Diamonds, 7), // player
            card(Suit::Spades, 10),  // dealer hole: 16, must draw
        ],
    );
    table.deal(10).unwrap();
    assert!(!table.check_and_reshuffle());
    assert_eq!(table.cards_remaining(), 0);

    // The dealer's mandatory draw rebuilds the exhausted shoe.
    let resolution = table.stand().unwrap();
    assert!(resolution.dealer_value >= 17);
    assert!(table.cards_remaining() > 0);
}

#[test]
fn sync_balance_refreshes_from_ledger() {
    let mut table = open_table(100);
    table.ledger_mut().chips = 250;

    assert_eq!(table.balance(), 100);
    assert_eq!(table.sync_balance().unwrap(), 250);
    assert_eq!(table.balance(), 250);
}

#[test]
fn options_builder_sets_fields() {
    let options = TableOptions::default().with_decks(2).with_penetration(0.66);
    assert_eq!(options.decks, 2);
    assert_eq!(options.penetration, 0.66);

    let defaults = TableOptions::default();
    assert_eq!(defaults.decks, 6);
    assert_eq!(defaults.penetration, 0.0);
}
