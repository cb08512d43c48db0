//! The balance & ledger service seam.
//!
//! The table never mutates chip balances itself; it consumes the
//! [`BalanceLedger`] contract. [`HttpLedger`] talks JSON to a remote
//! service, [`LocalLedger`] keeps the books in-process for tests and
//! offline play.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerError;

/// Receipt returned by the ledger when a bet is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BetReceipt {
    /// Whether the ledger accepted the bet.
    pub accepted: bool,
    /// Balance after the bet was deducted (unchanged when rejected).
    #[serde(rename = "newBalance")]
    pub new_balance: usize,
}

/// Chip accounting service consumed by the table.
///
/// Each call is a single blocking request; the table suspends the round
/// state machine until it returns. A failure is a failure of that one
/// operation, never a corruption of round state.
pub trait BalanceLedger {
    /// Places a bet. Must succeed before a round may open.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete.
    fn place_bet(&mut self, amount: usize) -> Result<BetReceipt, LedgerError>;

    /// Reports a round outcome. Called exactly once per round; the table
    /// retries delivery if this fails.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete.
    fn report_result(&mut self, won: bool, payout: usize) -> Result<usize, LedgerError>;

    /// Returns the current balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete.
    fn fetch_balance(&mut self) -> Result<usize, LedgerError>;
}

#[derive(Serialize)]
struct BetRequest {
    amount: usize,
}

#[derive(Serialize)]
struct ResultRequest {
    won: bool,
    payout: usize,
}

#[derive(Deserialize)]
struct ResultResponse {
    #[serde(rename = "newBalance")]
    new_balance: usize,
}

#[derive(Deserialize)]
struct BalanceResponse {
    chips: usize,
}

/// Configuration for [`HttpLedger`].
///
/// ```
/// use std::time::Duration;
/// use twentyone::LedgerConfig;
///
/// let config = LedgerConfig::new("https://ledger.example.com")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Base URL of the ledger service.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl LedgerConfig {
    /// Creates a configuration for the given base URL with a 5 second
    /// per-request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Ledger client speaking JSON over HTTP.
///
/// Requests are blocking and carry no retry or idempotency key of their
/// own; delivery retries are driven by the table.
#[derive(Debug)]
pub struct HttpLedger {
    client: reqwest::blocking::Client,
    config: LedgerConfig,
}

impl HttpLedger {
    /// Creates a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, LedgerError> {
        debug!(path, "ledger request");
        let response = self.client.post(self.url(path)).json(body).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Status(status.as_u16()));
        }

        Ok(response.json()?)
    }

    fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, LedgerError> {
        debug!(path, "ledger request");
        let response = self.client.get(self.url(path)).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Status(status.as_u16()));
        }

        Ok(response.json()?)
    }
}

impl BalanceLedger for HttpLedger {
    fn place_bet(&mut self, amount: usize) -> Result<BetReceipt, LedgerError> {
        self.post("bet", &BetRequest { amount })
    }

    fn report_result(&mut self, won: bool, payout: usize) -> Result<usize, LedgerError> {
        let response: ResultResponse = self.post("result", &ResultRequest { won, payout })?;
        Ok(response.new_balance)
    }

    fn fetch_balance(&mut self) -> Result<usize, LedgerError> {
        let response: BalanceResponse = self.get("balance")?;
        Ok(response.chips)
    }
}

/// In-process ledger, used by tests and offline play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalLedger {
    chips: usize,
}

impl LocalLedger {
    /// Creates a ledger holding the given number of chips.
    #[must_use]
    pub const fn new(chips: usize) -> Self {
        Self { chips }
    }

    /// Returns the chips currently held.
    #[must_use]
    pub const fn chips(&self) -> usize {
        self.chips
    }
}

impl BalanceLedger for LocalLedger {
    fn place_bet(&mut self, amount: usize) -> Result<BetReceipt, LedgerError> {
        if amount > self.chips {
            return Ok(BetReceipt {
                accepted: false,
                new_balance: self.chips,
            });
        }

        self.chips -= amount;
        Ok(BetReceipt {
            accepted: true,
            new_balance: self.chips,
        })
    }

    fn report_result(&mut self, _won: bool, payout: usize) -> Result<usize, LedgerError> {
        self.chips += payout;
        Ok(self.chips)
    }

    fn fetch_balance(&mut self) -> Result<usize, LedgerError> {
        Ok(self.chips)
    }
}
