//! A single-seat blackjack hand engine backed by a balance ledger.
//!
//! [`Table`] owns the shoe, both hands, and the two-state round machine
//! (idle/playing) that drives dealing, hit/stand, and settlement. Chip
//! accounting lives behind the [`BalanceLedger`] seam: [`HttpLedger`]
//! talks JSON to a remote service, [`LocalLedger`] keeps the books
//! in-process.
//!
//! # Example
//!
//! ```
//! use twentyone::{LocalLedger, Table, TableOptions};
//!
//! let ledger = LocalLedger::new(500);
//! let mut table = Table::open(TableOptions::default(), ledger, 42)?;
//!
//! if table.deal(25)?.is_none() {
//!     let resolution = table.stand().expect("round is in progress");
//!     println!("{:?}: payout {}", resolution.outcome, resolution.payout);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod card;
pub mod error;
pub mod hand;
pub mod ledger;
pub mod options;
pub mod result;
pub mod shoe;
pub mod table;

// Re-export main types
pub use card::{Card, DECK_SIZE, SUITS, Suit};
pub use error::{ActionError, BetError, LedgerError};
pub use hand::{DealerHand, Hand};
pub use ledger::{BalanceLedger, BetReceipt, HttpLedger, LedgerConfig, LocalLedger};
pub use options::TableOptions;
pub use result::{HitOutcome, PendingSettlement, Resolution, RoundOutcome};
pub use shoe::Shoe;
pub use table::{RoundState, Table};
