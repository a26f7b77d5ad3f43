//! Game-wide constants.

use super::entities::Rank;

/// Fewest seated players required for a round to start.
pub const MIN_PLAYERS: usize = 2;

/// Cards dealt to each player's private hand.
pub const HAND_SIZE: usize = 2;

/// Community cards revealed by the flop.
pub const FLOP_SIZE: usize = 3;

/// Community cards on a full board.
pub const BOARD_SIZE: usize = 5;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Lowest card rank (deuce).
pub const MIN_RANK: Rank = 2;

/// Highest card rank (ace).
pub const MAX_RANK: Rank = 14;

/// Longest username kept from the name prompt.
pub const MAX_USERNAME_LENGTH: usize = 16;
