//! Table configuration options.

/// Configuration options for a table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use twentyone::TableOptions;
///
/// let options = TableOptions::default()
///     .with_decks(1)
///     .with_penetration(0.75);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Number of decks in the shoe.
    pub decks: u8,
    /// Shoe penetration: the fraction of the shoe played before a
    /// between-rounds reshuffle. 0 to disable; the shoe still rebuilds
    /// itself mid-round when exhausted.
    pub penetration: f64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            decks: 6,
            penetration: 0.0,
        }
    }
}

impl TableOptions {
    /// Sets the number of decks.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::TableOptions;
    ///
    /// let options = TableOptions::default().with_decks(1);
    /// assert_eq!(options.decks, 1);
    /// ```
    #[must_use]
    pub const fn with_decks(mut self, decks: u8) -> Self {
        self.decks = decks;
        self
    }

    /// Sets the shoe penetration.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::TableOptions;
    ///
    /// let options = TableOptions::default().with_penetration(0.8);
    /// assert_eq!(options.penetration, 0.8);
    /// ```
    #[must_use]
    pub const fn with_penetration(mut self, penetration: f64) -> Self {
        self.penetration = penetration;
        self
    }
}
