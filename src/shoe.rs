//! The shoe: one or more shuffled decks that cards are drawn from.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::card::{Card, DECK_SIZE, SUITS};

/// A shoe of one or more 52-card decks.
///
/// Cards are drawn from the top. An exhausted shoe transparently rebuilds
/// itself with a fresh shuffle, so [`Shoe::draw`] never fails. This models
/// an infinite-shoe table, not one that can be counted.
#[derive(Debug, Clone)]
pub struct Shoe {
    /// Remaining cards; the top of the shoe is the end of the vector.
    cards: Vec<Card>,
    /// Number of decks per rebuild.
    decks: u8,
    /// Random number generator used for shuffling.
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a shuffled shoe with the specified number of decks.
    ///
    /// A `decks` value of zero is treated as one deck.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::Shoe;
    ///
    /// let shoe = Shoe::new(6, 42);
    /// assert_eq!(shoe.remaining(), 312);
    /// ```
    #[must_use]
    pub fn new(decks: u8, seed: u64) -> Self {
        let decks = decks.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cards = build(decks, &mut rng);
        Self { cards, decks, rng }
    }

    /// Draws the top card.
    ///
    /// If the shoe is empty, it is rebuilt and reshuffled first.
    #[expect(
        clippy::missing_panics_doc,
        reason = "a rebuilt shoe always holds at least one full deck"
    )]
    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            debug!(decks = self.decks, "shoe exhausted, rebuilding");
            self.cards = build(self.decks, &mut self.rng);
        }
        self.cards
            .pop()
            .expect("rebuilt shoe holds at least one full deck")
    }

    /// Discards the remaining cards and rebuilds a full shuffled shoe.
    pub fn reshuffle(&mut self) {
        self.cards = build(self.decks, &mut self.rng);
    }

    /// Returns whether the used fraction of the shoe has reached `penetration`.
    ///
    /// A penetration of zero disables the check.
    #[must_use]
    pub fn needs_reshuffle(&self, penetration: f64) -> bool {
        if penetration == 0.0 {
            return false;
        }

        let total = self.decks as usize * DECK_SIZE;
        #[expect(
            clippy::cast_precision_loss,
            reason = "f64 has sufficient precision for card counts"
        )]
        let used_ratio = 1.0 - (self.cards.len() as f64 / total as f64);

        used_ratio >= penetration
    }

    /// Replaces the shoe contents.
    ///
    /// Cards are drawn from the end of `cards`. Intended for deterministic
    /// replay and tests; the replacement is used up before any rebuild.
    pub fn load(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }

    /// Returns the number of cards remaining before the next rebuild.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Returns the number of decks per rebuild.
    #[must_use]
    pub const fn decks(&self) -> u8 {
        self.decks
    }
}

/// Builds and Fisher-Yates shuffles `decks` concatenated 52-card decks.
fn build(decks: u8, rng: &mut ChaCha8Rng) -> Vec<Card> {
    let mut cards = Vec::with_capacity(decks as usize * DECK_SIZE);

    for _ in 0..decks {
        for suit in SUITS {
            for rank in 1..=13 {
                cards.push(Card::new(suit, rank));
            }
        }
    }

    cards.shuffle(rng);
    cards
}
