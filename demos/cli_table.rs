//! CLI table example.
//!
//! Plays against an in-process ledger by default. Set `LEDGER_URL` to a
//! balance service base URL to play against a remote ledger instead.

#![allow(clippy::missing_docs_in_private_items)]

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use twentyone::{
    BalanceLedger, Card, DealerHand, Hand, HttpLedger, LedgerConfig, LocalLedger, Resolution,
    RoundOutcome, RoundState, Suit, Table, TableOptions,
};

fn main() {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let options = TableOptions::default().with_penetration(0.75);

    let result = match std::env::var("LEDGER_URL") {
        Ok(url) => match HttpLedger::new(LedgerConfig::new(url)) {
            Ok(ledger) => Table::open(options, ledger, seed).map(run),
            Err(err) => {
                eprintln!("Could not build ledger client: {err}");
                return;
            }
        },
        Err(_) => Table::open(options, LocalLedger::new(500), seed).map(run),
    };

    if let Err(err) = result {
        eprintln!("Could not open table: {err}");
    }
}

fn run<L: BalanceLedger>(mut table: Table<L>) {
    println!("Blackjack CLI example (type 'q' to quit)");

    loop {
        if table.pending_settlement().is_some() {
            match table.retry_settlement() {
                Ok(_) => println!("Pending settlement delivered."),
                Err(err) => {
                    println!("Settlement error: {err}");
                    if prompt_line("Retry? (y/n): ") != "y" {
                        return;
                    }
                    continue;
                }
            }
        }

        let balance = table.balance();
        if balance == 0 {
            println!("You are out of chips. Game over.");
            break;
        }

        if table.check_and_reshuffle() {
            println!("Shoe reshuffled.");
        }

        let Some(bet) = prompt_usize(&format!("Bet amount (1-{balance}, 0 to quit): ")) else {
            break;
        };

        if bet == 0 {
            println!("Goodbye.");
            break;
        }

        let resolution = match table.deal(bet) {
            Ok(Some(resolution)) => {
                print_table(&table);
                Some(resolution)
            }
            Ok(None) => None,
            Err(err) => {
                println!("Deal error: {err}");
                continue;
            }
        };

        if let Some(resolution) = resolution {
            print_resolution(&resolution);
            continue;
        }

        let resolution = play_round(&mut table);
        if let Some(resolution) = resolution {
            print_table(&table);
            print_resolution(&resolution);
        }
    }
}

fn play_round<L: BalanceLedger>(table: &mut Table<L>) -> Option<Resolution> {
    while table.state() == RoundState::Playing {
        print_table(table);
        println!("Actions: [h]it [s]tand [p]split [i]nsurance [q]uit");

        match prompt_line("Action: ").as_str() {
            "h" | "hit" => {
                if let Some(outcome) = table.hit() {
                    println!("You draw {}.", format_card(&outcome.card));
                    if outcome.resolution.is_some() {
                        return outcome.resolution;
                    }
                }
            }
            "s" | "stand" => return table.stand(),
            "p" | "split" => {
                if let Err(err) = table.split() {
                    println!("Split error: {err}");
                }
            }
            "i" | "insurance" => {
                if let Err(err) = table.take_insurance() {
                    println!("Insurance error: {err}");
                }
            }
            "q" | "quit" => std::process::exit(0),
            _ => println!("Unknown action."),
        }
    }

    None
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn prompt_usize(prompt: &str) -> Option<usize> {
    loop {
        let input = prompt_line(prompt);
        if input == "q" || input == "quit" {
            return None;
        }
        match input.parse::<usize>() {
            Ok(value) => return Some(value),
            Err(_) => println!("Please enter a number."),
        }
    }
}

fn print_table<L: BalanceLedger>(table: &Table<L>) {
    println!("\nShoe: {} cards remaining", table.cards_remaining());

    let dealer = table.dealer_hand();
    println!(
        "Dealer: {} (value {})",
        format_dealer(dealer),
        dealer.visible_value()
    );

    let player = table.player_hand();
    let bet = table.bet().unwrap_or(0);
    println!(
        "You:    {} | value {} | bet {}\n",
        format_hand(player),
        player.value(),
        bet
    );
}

fn print_resolution(resolution: &Resolution) {
    let headline = match resolution.outcome {
        RoundOutcome::Natural => "Blackjack! You win.",
        RoundOutcome::PlayerWin => "You win.",
        RoundOutcome::DealerWin => "Dealer wins.",
    };
    println!(
        "{headline} ({} vs {}) Payout: {}",
        resolution.player_value, resolution.dealer_value, resolution.payout
    );

    match resolution.new_balance {
        Some(balance) => println!("Balance: {balance} chips"),
        None => println!("Settlement pending; it will be retried."),
    }
}

fn format_dealer(dealer: &DealerHand) -> String {
    if dealer.cards().is_empty() {
        return "(no cards)".to_string();
    }

    if dealer.is_hole_revealed() {
        dealer
            .cards()
            .iter()
            .map(format_card)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        let mut parts = Vec::new();
        if let Some(card) = dealer.up_card() {
            parts.push(format_card(card));
        }
        if dealer.len() > 1 {
            parts.push("??".to_string());
        }
        parts.join(" ")
    }
}

fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    hand.cards()
        .iter()
        .map(format_card)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_card(card: &Card) -> String {
    let (suit, color_code) = match card.suit {
        Suit::Hearts => ("H", "31"),
        Suit::Diamonds => ("D", "31"),
        Suit::Clubs => ("C", "32"),
        Suit::Spades => ("S", "34"),
    };

    let rank = match card.rank {
        1 => "A".to_string(),
        11 => "J".to_string(),
        12 => "Q".to_string(),
        13 => "K".to_string(),
        _ => card.rank.to_string(),
    };

    format!("{rank}{}", colorize(suit, color_code))
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}
