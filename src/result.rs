//! Round resolution types.

use crate::card::Card;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Player beat the dealer, or the dealer busted.
    PlayerWin,
    /// Player's opening two cards totalled 21.
    Natural,
    /// Dealer won. Ties settle as dealer wins at this table.
    DealerWin,
}

impl RoundOutcome {
    /// Returns whether the player won the round.
    #[must_use]
    pub const fn is_player_win(self) -> bool {
        matches!(self, Self::PlayerWin | Self::Natural)
    }
}

/// The settled result of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// How the round ended.
    pub outcome: RoundOutcome,
    /// The player's final hand value. Bust totals are reported as-is.
    pub player_value: u8,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// The bet that rode on the round.
    pub bet: usize,
    /// Chips returned to the player: twice the bet on a win, zero on a loss.
    pub payout: usize,
    /// Balance reported by the ledger, or `None` while the settlement is
    /// pending delivery (see [`Table::retry_settlement`]).
    ///
    /// [`Table::retry_settlement`]: crate::Table::retry_settlement
    pub new_balance: Option<usize>,
}

/// A resolved outcome that has not reached the ledger yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSettlement {
    /// Whether the player won.
    pub won: bool,
    /// Chips owed to the player.
    pub payout: usize,
}

/// Outcome of a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitOutcome {
    /// The card drawn into the player's hand.
    pub card: Card,
    /// The resolution, when the hit busted the hand.
    pub resolution: Option<Resolution>,
}
