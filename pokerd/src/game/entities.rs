use rand::{Rng, seq::SliceRandom};
use std::fmt;
use thiserror::Error;

use super::constants::{DECK_SIZE, MAX_RANK, MAX_USERNAME_LENGTH, MIN_RANK};

/// Programming-contract violations in the card engine.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    /// More cards were requested than a 52-card deck holds. Unreachable in a
    /// legal round (at most 2 per player, 3 burns, and 5 community cards).
    #[error("deck exhausted")]
    DeckExhausted,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card ranks (2 = deuce ... 14 = ace). Face cards only
/// differ at display time; ranking always uses the integer.
pub type Rank = u8;

/// A card is a tuple of a rank and a suit.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card(pub Rank, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.0 {
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            14 => "A".to_string(),
            r => r.to_string(),
        };
        write!(f, "[{rank:<2}{}]", self.1)
    }
}

/// Renders cards back to back, the way the table prints them.
#[must_use]
pub fn render_cards(cards: &[Card]) -> String {
    cards.iter().map(ToString::to_string).collect()
}

/// A standard 52-card deck with pop-style dealing. Reshuffled in place at
/// the start of every round.
#[derive(Debug)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    next: usize,
}

impl Deck {
    /// Removes and returns the next card.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DeckExhausted`] once all 52 cards were dealt.
    pub fn deal(&mut self) -> Result<Card, GameError> {
        let card = self
            .cards
            .get(self.next)
            .copied()
            .ok_or(GameError::DeckExhausted)?;
        self.next += 1;
        Ok(card)
    }

    /// Restores the full 52-card set and randomizes it, discarding any
    /// previously dealt state.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Shuffles with a caller-provided generator. Seeded generators keep
    /// test rounds reproducible.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.next = 0;
    }

    /// How many cards are left to deal.
    #[must_use]
    pub fn remaining(&self) -> usize {
        DECK_SIZE - self.next
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = [Card(MIN_RANK, Suit::Club); DECK_SIZE];
        for (i, rank) in (MIN_RANK..=MAX_RANK).enumerate() {
            for (j, suit) in Suit::ALL.into_iter().enumerate() {
                cards[4 * i + j] = Card(rank, suit);
            }
        }
        Self { cards, next: 0 }
    }
}

/// A display name solicited at connect time. Whitespace collapses to
/// underscores and overlong names are truncated.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Username(String);

impl Username {
    #[must_use]
    pub fn new(s: &str) -> Self {
        let name: String = s
            .chars()
            .take(MAX_USERNAME_LENGTH)
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        Self(name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
