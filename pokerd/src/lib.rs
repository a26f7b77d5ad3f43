//! # pokerd
//!
//! A lock-step multiplayer poker table.
//!
//! Players connect over a plain text line protocol and are driven through a
//! fixed sequence of dealing and betting phases:
//!
//! ```text
//! LOBBY → TABLE → DEAL → BET → FLOP → BET → TURN → BET → RIVER → BET → SCORE
//! ```
//!
//! Advancement is gated by a readiness barrier: the table leaves a phase only
//! once every seated player has finished processing it. The table itself is
//! owned by a single-writer actor; connection tasks exchange messages with it
//! and observe snapshots through a watch channel, so no two tasks ever race
//! on the roster, deck, or community cards.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, deck, hand scoring, and the round state machine
//! - [`table`]: the table actor and its message API
//! - [`net`]: line-protocol transport and the per-connection session loop

/// Core game logic: entities, hand scoring, and the round state machine.
pub mod game;

/// Networking: the line protocol, per-connection sessions, and the listener.
pub mod net;

/// The shared table: actor, handle, and message types.
pub mod table;

pub use game::{
    constants,
    entities::{Card, Deck, GameError, Rank, Suit, Username},
    scoring::{Score, score_hand},
    state_machine::{Phase, PlayerId, Seat, Session, Showdown, ShowdownEntry, Street},
};
pub use net::{LineStream, PlayerSession, ProtocolError, server};
pub use table::{TableActor, TableConfig, TableError, TableHandle, TableView};
