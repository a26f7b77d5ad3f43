//! Table configuration.

use crate::game::constants::MIN_PLAYERS;

/// Tuning knobs for a table.
#[derive(Clone, Debug)]
pub struct TableConfig {
    /// Seats required before a round starts.
    pub min_players: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
        }
    }
}
