use tracing::debug;

use crate::error::ActionError;
use crate::ledger::BalanceLedger;
use crate::result::{HitOutcome, Resolution};

use super::{RoundState, Table};

impl<L: BalanceLedger> Table<L> {
    /// Player action: Hit (draw a card).
    ///
    /// Outside of a round this is a no-op returning `None`; nothing is
    /// drawn. If the draw takes the hand over 21 the round resolves
    /// immediately as a dealer win.
    pub fn hit(&mut self) -> Option<HitOutcome> {
        if !matches!(self.state, RoundState::Playing) {
            return None;
        }

        let card = self.shoe.draw();
        self.player.add_card(card);
        debug!(rank = card.rank, value = self.player.value(), "player hits");

        let resolution = if self.player.is_bust() {
            Some(self.resolve(Some(false)))
        } else {
            None
        };

        Some(HitOutcome { card, resolution })
    }

    /// Player action: Stand.
    ///
    /// Outside of a round this is a no-op returning `None`. The dealer
    /// reveals the hole card and draws until reaching 17 or higher;
    /// scoring always returns the best total not over 21, so the dealer
    /// stands on soft 17 as well. The round then resolves by comparison.
    pub fn stand(&mut self) -> Option<Resolution> {
        if !matches!(self.state, RoundState::Playing) {
            return None;
        }

        self.dealer.reveal_hole();
        while self.dealer.value() < 17 {
            let card = self.shoe.draw();
            self.dealer.add_card(card);
            debug!(rank = card.rank, value = self.dealer.value(), "dealer draws");
        }

        Some(self.resolve(None))
    }

    /// Player action: Split. Reserved; no resolving logic exists yet.
    ///
    /// # Errors
    ///
    /// Always returns [`ActionError::SplitUnimplemented`].
    pub fn split(&mut self) -> Result<(), ActionError> {
        Err(ActionError::SplitUnimplemented)
    }

    /// Player action: Insurance. Reserved; no resolving logic exists yet.
    ///
    /// # Errors
    ///
    /// Always returns [`ActionError::InsuranceUnimplemented`].
    pub fn take_insurance(&mut self) -> Result<(), ActionError> {
        Err(ActionError::InsuranceUnimplemented)
    }
}
