use tracing::{info, warn};

use crate::error::LedgerError;
use crate::ledger::BalanceLedger;
use crate::result::{PendingSettlement, Resolution, RoundOutcome};

use super::{RoundState, Table};

impl<L: BalanceLedger> Table<L> {
    /// Settles the round, reports the outcome to the ledger, and returns
    /// to idle.
    ///
    /// `forced` overrides the value comparison for short-circuit
    /// resolutions: `Some(true)` for a natural on the deal, `Some(false)`
    /// for a bust on a hit.
    pub(super) fn resolve(&mut self, forced: Option<bool>) -> Resolution {
        self.dealer.reveal_hole();

        let player_value = self.player.value();
        let dealer_value = self.dealer.value();

        // Ties settle as dealer wins.
        let player_wins = forced.unwrap_or(
            player_value <= 21 && (player_value > dealer_value || dealer_value > 21),
        );

        let outcome = if player_wins {
            if self.player.is_natural() {
                RoundOutcome::Natural
            } else {
                RoundOutcome::PlayerWin
            }
        } else {
            RoundOutcome::DealerWin
        };

        let bet = self.bet;
        let payout = if player_wins { bet * 2 } else { 0 };

        self.bet = 0;
        self.state = RoundState::Idle;
        info!(?outcome, player_value, dealer_value, payout, "round resolved");

        // The round is already settled locally; a delivery failure only
        // queues the report for retry.
        let new_balance = match self.ledger.report_result(player_wins, payout) {
            Ok(balance) => {
                self.balance = balance;
                Some(balance)
            }
            Err(err) => {
                warn!(%err, "settlement report failed, queued for retry");
                self.pending = Some(PendingSettlement {
                    won: player_wins,
                    payout,
                });
                None
            }
        };

        Resolution {
            outcome,
            player_value,
            dealer_value,
            bet,
            payout,
            new_balance,
        }
    }

    /// Retries delivery of a settlement that failed to reach the ledger.
    ///
    /// Returns the refreshed balance when a pending settlement was
    /// delivered, or `Ok(None)` when nothing was pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails again; the settlement stays
    /// queued.
    pub fn retry_settlement(&mut self) -> Result<Option<usize>, LedgerError> {
        let Some(settlement) = self.pending else {
            return Ok(None);
        };

        let balance = self.ledger.report_result(settlement.won, settlement.payout)?;
        self.pending = None;
        self.balance = balance;
        Ok(Some(balance))
    }

    /// Returns the settlement awaiting delivery, if any.
    #[must_use]
    pub const fn pending_settlement(&self) -> Option<PendingSettlement> {
        self.pending
    }
}
