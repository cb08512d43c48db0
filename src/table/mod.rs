//! The table: session state and the round state machine.

use tracing::debug;

use crate::card::Card;
use crate::error::LedgerError;
use crate::hand::{DealerHand, Hand};
use crate::ledger::BalanceLedger;
use crate::options::TableOptions;
use crate::result::PendingSettlement;
use crate::shoe::Shoe;

mod actions;
mod deal;
mod settle;
pub mod state;

pub use state::RoundState;

/// A single-seat blackjack table.
///
/// The table owns the shoe, both hands, the active bet, and the round
/// state machine. All session state lives here; chip accounting is
/// delegated to the ledger `L` and only the last reported balance is
/// cached for local bet validation.
pub struct Table<L> {
    /// Cards in the shoe.
    shoe: Shoe,
    /// Table options.
    options: TableOptions,
    /// Current round state.
    state: RoundState,
    /// The player's hand. Kept after resolution until the next deal.
    player: Hand,
    /// The dealer's hand. Kept after resolution until the next deal.
    dealer: DealerHand,
    /// The active bet. Zero while idle.
    bet: usize,
    /// Last balance reported by the ledger.
    balance: usize,
    /// A resolved outcome awaiting delivery to the ledger.
    pending: Option<PendingSettlement>,
    /// Chip accounting service.
    ledger: L,
}

impl<L: BalanceLedger> Table<L> {
    /// Opens a table, fetching the starting balance from the ledger.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::{LocalLedger, Table, TableOptions};
    ///
    /// let table = Table::open(TableOptions::default(), LocalLedger::new(500), 42).unwrap();
    /// assert_eq!(table.balance(), 500);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the starting balance cannot be fetched.
    pub fn open(options: TableOptions, mut ledger: L, seed: u64) -> Result<Self, LedgerError> {
        let balance = ledger.fetch_balance()?;
        let shoe = Shoe::new(options.decks, seed);
        debug!(balance, decks = options.decks, "table opened");

        Ok(Self {
            shoe,
            options,
            state: RoundState::Idle,
            player: Hand::new(),
            dealer: DealerHand::new(),
            bet: 0,
            balance,
            pending: None,
            ledger,
        })
    }

    /// Refreshes the cached balance from the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete; the cached
    /// balance is left unchanged.
    pub fn sync_balance(&mut self) -> Result<usize, LedgerError> {
        self.balance = self.ledger.fetch_balance()?;
        Ok(self.balance)
    }

    /// Returns the current round state.
    #[must_use]
    pub const fn state(&self) -> RoundState {
        self.state
    }

    /// Returns the last balance reported by the ledger.
    #[must_use]
    pub const fn balance(&self) -> usize {
        self.balance
    }

    /// Returns the bet riding on the round in progress.
    #[must_use]
    pub const fn bet(&self) -> Option<usize> {
        if matches!(self.state, RoundState::Playing) {
            Some(self.bet)
        } else {
            None
        }
    }

    /// Returns the player's hand.
    #[must_use]
    pub const fn player_hand(&self) -> &Hand {
        &self.player
    }

    /// Returns the dealer's hand.
    #[must_use]
    pub const fn dealer_hand(&self) -> &DealerHand {
        &self.dealer
    }

    /// Returns the table options.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Returns the ledger mutably.
    pub const fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Returns the number of cards left before the shoe rebuilds itself.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    /// Reshuffles the shoe between rounds once penetration is reached.
    ///
    /// Does nothing while a round is in progress or when penetration is
    /// disabled. Returns `true` if a reshuffle was performed.
    pub fn check_and_reshuffle(&mut self) -> bool {
        if !matches!(self.state, RoundState::Idle) {
            return false;
        }

        if !self.shoe.needs_reshuffle(self.options.penetration) {
            return false;
        }

        self.shoe.reshuffle();
        true
    }

    /// Replaces the shoe contents; cards are drawn from the end.
    ///
    /// Intended for deterministic replay and tests.
    pub fn load_shoe(&mut self, cards: Vec<Card>) {
        self.shoe.load(cards);
    }
}
