//! Connection-level errors.

use std::io;

use thiserror::Error;

/// Failures on the line protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The peer closed its end. Recoverable at the table level: the seat is
    /// removed and the barrier recomputed.
    #[error("peer disconnected")]
    PeerDisconnected,
    /// Empty or non-UTF-8 line. Callers re-prompt; never treated as a fold.
    #[error("malformed response")]
    MalformedResponse,
    /// The table actor is gone; nothing left to play on.
    #[error("table closed")]
    TableClosed,
    /// Transport failure, handled like a disconnect.
    #[error("connection error: {0}")]
    Io(#[from] io::Error),
}
