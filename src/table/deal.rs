use tracing::debug;

use crate::error::BetError;
use crate::hand::{DealerHand, Hand};
use crate::ledger::BalanceLedger;
use crate::result::Resolution;

use super::{RoundState, Table};

impl<L: BalanceLedger> Table<L> {
    /// Opens a round with the given bet.
    ///
    /// The bet is validated locally (positive, within the last-known
    /// balance) before a single blocking `place_bet` request is sent; on
    /// any failure the round stays idle and the deal can simply be
    /// retried. Once the bet is accepted, two cards go to each side in
    /// player, dealer, player, dealer order and the round is in progress.
    ///
    /// Returns `Ok(Some(resolution))` when the opening two cards total 21
    /// and the round resolves on the spot as a player win, or `Ok(None)`
    /// when play continues.
    ///
    /// # Errors
    ///
    /// Returns an error if a round is already in progress, a previous
    /// settlement is still pending, the bet is zero or exceeds the
    /// last-known balance, or the ledger declines or fails the bet
    /// request. No cards are drawn on any error path.
    pub fn deal(&mut self, bet: usize) -> Result<Option<Resolution>, BetError> {
        if matches!(self.state, RoundState::Playing) {
            return Err(BetError::RoundInProgress);
        }

        if self.pending.is_some() {
            return Err(BetError::SettlementPending);
        }

        if bet == 0 {
            return Err(BetError::ZeroBet);
        }

        if bet > self.balance {
            return Err(BetError::InsufficientChips);
        }

        // Single blocking request; the round stays idle on any failure.
        let receipt = self.ledger.place_bet(bet)?;
        if !receipt.accepted {
            return Err(BetError::Rejected);
        }
        self.balance = receipt.new_balance;

        self.player = Hand::new();
        self.dealer = DealerHand::new();
        self.bet = bet;

        // Player, dealer, player, dealer.
        let card = self.shoe.draw();
        self.player.add_card(card);
        let card = self.shoe.draw();
        self.dealer.add_card(card);
        let card = self.shoe.draw();
        self.player.add_card(card);
        let card = self.shoe.draw();
        self.dealer.add_card(card);

        self.state = RoundState::Playing;
        debug!(
            bet,
            player = self.player.value(),
            dealer_up = self.dealer.visible_value(),
            "round opened"
        );

        // A natural resolves without waiting for further input.
        if self.player.is_natural() {
            return Ok(Some(self.resolve(Some(true))));
        }

        Ok(None)
    }
}
