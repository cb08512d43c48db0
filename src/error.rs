//! Error types for table and ledger operations.

use thiserror::Error;

/// Errors that can occur when talking to the balance ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request failed at the transport level (connection, timeout).
    #[error("ledger request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("ledger returned HTTP {0}")]
    Status(u16),
}

/// Errors that can occur when opening a round.
#[derive(Debug, Error)]
pub enum BetError {
    /// Bet amount is zero.
    #[error("bet amount is zero")]
    ZeroBet,
    /// Bet exceeds the last-known balance.
    #[error("insufficient chips")]
    InsufficientChips,
    /// A round is already in progress.
    #[error("a round is already in progress")]
    RoundInProgress,
    /// The previous round's settlement has not reached the ledger yet.
    #[error("previous settlement is still pending")]
    SettlementPending,
    /// The ledger declined the bet.
    #[error("bet rejected by the ledger")]
    Rejected,
    /// The bet request never completed; the round was not opened.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors for player actions outside the hit/stand core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Splitting pairs is declared at this table but has no resolving logic.
    #[error("split is not implemented")]
    SplitUnimplemented,
    /// Insurance is declared at this table but has no resolving logic.
    #[error("insurance is not implemented")]
    InsuranceUnimplemented,
}
