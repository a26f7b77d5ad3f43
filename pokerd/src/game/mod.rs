//! Poker game engine.
//!
//! This module provides the table-independent pieces of the game:
//! - Card, deck, and player-name entities
//! - The banded hand scorer
//! - The round state machine and its readiness barrier

pub mod constants;
pub mod entities;
pub mod scoring;
pub mod state_machine;
