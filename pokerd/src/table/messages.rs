//! Messages understood by the table actor, and the snapshots it publishes.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::game::entities::{Card, Username};
use crate::game::state_machine::{Phase, PlayerId, Seat, Showdown};

/// Errors surfaced to connection tasks talking to the table.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    /// The table is mid-round; try again once it resets.
    #[error("round already in progress")]
    RoundInProgress,
    /// The table actor is gone.
    #[error("table closed")]
    Closed,
}

/// Requests a connection task can send to the table actor.
#[derive(Debug)]
pub enum TableMessage {
    /// Seat a player; replies with the assigned id.
    Join {
        name: Username,
        wins: u32,
        reply: oneshot::Sender<Result<PlayerId, TableError>>,
    },
    /// Report that a player finished processing `phase`.
    Ready { player: PlayerId, phase: Phase },
    /// Drop out of the current round but stay connected.
    Fold { player: PlayerId },
    /// Leave the table entirely (disconnect).
    Leave { player: PlayerId },
    /// Reply with a snapshot taken after every earlier message was handled.
    GetView {
        reply: oneshot::Sender<TableView>,
    },
}

/// Immutable snapshot of the table, published through the watch channel
/// after every handled message.
#[derive(Clone, Debug)]
pub struct TableView {
    pub phase: Phase,
    pub seats: Vec<Seat>,
    pub community: Vec<Card>,
    /// Present while the table sits in [`Phase::Score`].
    pub showdown: Option<Showdown>,
}

impl TableView {
    /// The seat belonging to `id`, if still present.
    #[must_use]
    pub fn seat(&self, id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.id == id)
    }
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            phase: Phase::Lobby,
            seats: Vec::new(),
            community: Vec::new(),
            showdown: None,
        }
    }
}
