//! The round state machine.
//!
//! A [`Session`] is the shared table: phase, seated players, community cards,
//! and the deck. It is owned exclusively by the table actor; every mutation
//! arrives as a message and runs to completion before the next one is looked
//! at. Advancement between phases is gated on a readiness barrier: the table
//! leaves a phase only once every seated player's cursor has caught up to it.

use log::{error, info};
use thiserror::Error;

use super::constants::{FLOP_SIZE, HAND_SIZE};
use super::entities::{Card, Deck, GameError, Username};
use super::scoring::{Score, score_hand};

/// Identifies one seated player for the lifetime of a round.
pub type PlayerId = u64;

/// Errors returned to a joining player.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SeatError {
    /// The table is mid-round; the player keeps waiting in the lobby.
    #[error("round already in progress")]
    RoundInProgress,
}

/// One betting round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

/// The shared table phase. Every seated player must report readiness for the
/// current phase before the table advances past it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// No round underway; connections may join.
    Lobby,
    /// Seated players waiting for the table to fill.
    Table,
    /// Private hands dealt.
    Deal,
    /// Fold-or-call decision after the preceding deal.
    Bet(Street),
    /// Three community cards revealed.
    Flop,
    /// Fourth community card revealed.
    Turn,
    /// Fifth community card revealed.
    River,
    /// Showdown: scores computed, winner picked.
    Score,
}

impl Phase {
    /// Whether a round is underway.
    #[must_use]
    pub fn in_round(self) -> bool {
        !self.joinable()
    }

    /// Whether new players may take a seat.
    #[must_use]
    pub fn joinable(self) -> bool {
        matches!(self, Self::Lobby | Self::Table)
    }

    /// The transition table: the phase entered once the barrier clears.
    fn next(self) -> Self {
        match self {
            Self::Lobby => Self::Table,
            Self::Table => Self::Deal,
            Self::Deal => Self::Bet(Street::PreFlop),
            Self::Bet(Street::PreFlop) => Self::Flop,
            Self::Flop => Self::Bet(Street::Flop),
            Self::Bet(Street::Flop) => Self::Turn,
            Self::Turn => Self::Bet(Street::Turn),
            Self::Bet(Street::Turn) => Self::River,
            Self::River => Self::Bet(Street::River),
            Self::Bet(Street::River) => Self::Score,
            Self::Score => Self::Lobby,
        }
    }
}

/// Actor-side record of a seated player.
#[derive(Clone, Debug)]
pub struct Seat {
    pub id: PlayerId,
    pub name: Username,
    /// Round wins the player reported when joining; display only.
    pub wins: u32,
    /// Private hand; empty until the deal, exactly two cards afterwards.
    pub hand: Vec<Card>,
    /// Barrier cursor: the last phase this player finished processing.
    pub ready: Phase,
}

/// Outcome of a scored round.
#[derive(Clone, Debug)]
pub struct Showdown {
    pub entries: Vec<ShowdownEntry>,
    /// The strictly best-scoring player; `None` when the top score is tied.
    pub winner: Option<PlayerId>,
}

#[derive(Clone, Debug)]
pub struct ShowdownEntry {
    pub id: PlayerId,
    pub name: Username,
    pub hand: Vec<Card>,
    pub score: Score,
}

/// The shared table state.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    players: Vec<Seat>,
    community: Vec<Card>,
    deck: Deck,
    showdown: Option<Showdown>,
    min_players: usize,
    next_seat: PlayerId,
}

impl Session {
    #[must_use]
    pub fn new(min_players: usize) -> Self {
        Self {
            phase: Phase::Lobby,
            players: Vec::new(),
            community: Vec::new(),
            deck: Deck::default(),
            showdown: None,
            min_players,
            next_seat: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn players(&self) -> &[Seat] {
        &self.players
    }

    #[must_use]
    pub fn community(&self) -> &[Card] {
        &self.community
    }

    #[must_use]
    pub fn showdown(&self) -> Option<&Showdown> {
        self.showdown.as_ref()
    }

    /// Seats a player. The first seat opens the table; reaching the player
    /// minimum starts the round on the spot.
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::RoundInProgress`] while a round is underway; the
    /// player stays in the lobby until the next reset.
    pub fn join(&mut self, name: Username, wins: u32) -> Result<PlayerId, SeatError> {
        if !self.phase.joinable() {
            return Err(SeatError::RoundInProgress);
        }
        let id = self.next_seat;
        self.next_seat += 1;
        self.players.push(Seat {
            id,
            name,
            wins,
            hand: Vec::new(),
            ready: Phase::Table,
        });
        info!("now have {} players", self.players.len());
        if self.players.len() < self.min_players {
            self.phase = Phase::Table;
        } else {
            self.start_round();
        }
        Ok(id)
    }

    /// Marks a player's barrier cursor and advances if the barrier cleared.
    pub fn mark_ready(&mut self, id: PlayerId, phase: Phase) {
        if let Some(seat) = self.players.iter_mut().find(|seat| seat.id == id) {
            seat.ready = phase;
        }
        self.try_advance();
    }

    /// Removes a player, whether they folded, disconnected, or walked away
    /// between rounds. Stale ids from an already-reset round are ignored.
    pub fn remove(&mut self, id: PlayerId) {
        let before = self.players.len();
        self.players.retain(|seat| seat.id != id);
        if self.players.len() == before {
            return;
        }
        info!("now have {} players", self.players.len());
        if self.players.is_empty() {
            self.reset();
        } else if self.phase.in_round() && self.phase != Phase::Score && self.players.len() == 1 {
            // Last player standing takes the round without further dealing
            // or betting.
            self.enter(Phase::Score);
        } else {
            self.try_advance();
        }
    }

    /// The readiness barrier: the current phase is left only once every
    /// seated player has caught up to it.
    fn try_advance(&mut self) {
        if !self.phase.in_round() {
            return;
        }
        if self.players.iter().any(|seat| seat.ready != self.phase) {
            return;
        }
        match self.phase.next() {
            Phase::Lobby => self.reset(),
            next => self.enter(next),
        }
    }

    /// Fires the TABLE → DEAL transition: wipes hands, reshuffles, deals.
    fn start_round(&mut self) {
        for seat in &mut self.players {
            seat.hand.clear();
            seat.ready = Phase::Table;
        }
        self.community.clear();
        self.showdown = None;
        self.deck.shuffle();
        self.enter(Phase::Deal);
    }

    /// Runs a phase's entry action, then publishes the phase. A deal failure
    /// here is a broken invariant; the table resets instead of wedging.
    fn enter(&mut self, next: Phase) {
        let result = match next {
            Phase::Deal => self.deal_hands(),
            Phase::Flop => self.deal_community(FLOP_SIZE),
            Phase::Turn | Phase::River => self.deal_community(1),
            Phase::Score => {
                self.score_hands();
                Ok(())
            }
            Phase::Lobby | Phase::Table | Phase::Bet(_) => Ok(()),
        };
        match result {
            Ok(()) => self.phase = next,
            Err(err) => {
                error!("deal failed mid-round: {err}; resetting table");
                self.reset();
            }
        }
    }

    /// Deals two cards to every seat, interleaved: one card each, twice.
    fn deal_hands(&mut self) -> Result<(), GameError> {
        for _ in 0..HAND_SIZE {
            for seat in &mut self.players {
                seat.hand.push(self.deck.deal()?);
            }
        }
        Ok(())
    }

    /// Burns one card, then reveals `count` community cards.
    fn deal_community(&mut self, count: usize) -> Result<(), GameError> {
        self.deck.deal()?;
        for _ in 0..count {
            let card = self.deck.deal()?;
            self.community.push(card);
        }
        Ok(())
    }

    /// Scores every remaining hand against the community cards. The winner
    /// must hold a strictly maximal score; a tied top score crowns nobody.
    fn score_hands(&mut self) {
        let entries: Vec<ShowdownEntry> = self
            .players
            .iter()
            .map(|seat| ShowdownEntry {
                id: seat.id,
                name: seat.name.clone(),
                hand: seat.hand.clone(),
                score: score_hand(&seat.hand, &self.community),
            })
            .collect();
        let top = entries.iter().map(|entry| entry.score).max().unwrap_or(0);
        let mut at_top = entries.iter().filter(|entry| entry.score == top);
        let winner = match (at_top.next(), at_top.next()) {
            (Some(best), None) => Some(best.id),
            _ => None,
        };
        self.showdown = Some(Showdown { entries, winner });
    }

    /// Round reset: back to the lobby with an empty roster.
    fn reset(&mut self) {
        self.phase = Phase::Lobby;
        self.players.clear();
        self.community.clear();
        self.showdown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::constants::{BOARD_SIZE, DECK_SIZE, MIN_PLAYERS};
    use super::super::entities::Suit;
    use super::*;

    fn seat_two(session: &mut Session) -> (PlayerId, PlayerId) {
        let alice = session.join(Username::new("alice"), 0).unwrap();
        let bob = session.join(Username::new("bob"), 0).unwrap();
        (alice, bob)
    }

    fn everyone_ready(session: &mut Session, phase: Phase) {
        let ids: Vec<PlayerId> = session.players().iter().map(|seat| seat.id).collect();
        for id in ids {
            session.mark_ready(id, phase);
        }
    }

    #[test]
    fn round_waits_for_minimum_players() {
        let mut session = Session::new(MIN_PLAYERS);
        session.join(Username::new("alice"), 0).unwrap();
        assert_eq!(session.phase(), Phase::Table);
        assert!(session.players()[0].hand.is_empty());
    }

    #[test]
    fn second_seat_starts_the_round_with_a_fresh_deck() {
        let mut session = Session::new(MIN_PLAYERS);
        seat_two(&mut session);
        assert_eq!(session.phase(), Phase::Deal);
        assert!(session.community().is_empty());
        let mut dealt = Vec::new();
        for seat in session.players() {
            assert_eq!(seat.hand.len(), HAND_SIZE);
            dealt.extend(seat.hand.iter().copied());
        }
        dealt.sort_unstable();
        dealt.dedup();
        assert_eq!(dealt.len(), MIN_PLAYERS * HAND_SIZE);
        assert_eq!(session.deck.remaining(), DECK_SIZE - MIN_PLAYERS * HAND_SIZE);
    }

    #[test]
    fn joining_mid_round_is_rejected() {
        let mut session = Session::new(MIN_PLAYERS);
        seat_two(&mut session);
        assert_eq!(
            session.join(Username::new("carol"), 0),
            Err(SeatError::RoundInProgress)
        );
    }

    #[test]
    fn barrier_gates_every_transition() {
        let mut session = Session::new(MIN_PLAYERS);
        let (alice, _bob) = seat_two(&mut session);

        session.mark_ready(alice, Phase::Deal);
        assert_eq!(session.phase(), Phase::Deal);
        everyone_ready(&mut session, Phase::Deal);
        assert_eq!(session.phase(), Phase::Bet(Street::PreFlop));

        session.mark_ready(alice, Phase::Bet(Street::PreFlop));
        assert_eq!(session.phase(), Phase::Bet(Street::PreFlop));
        assert!(session.community().is_empty());
        everyone_ready(&mut session, Phase::Bet(Street::PreFlop));
        assert_eq!(session.phase(), Phase::Flop);
        assert_eq!(session.community().len(), FLOP_SIZE);
    }

    #[test]
    fn community_grows_to_a_full_board() {
        let mut session = Session::new(MIN_PLAYERS);
        seat_two(&mut session);

        everyone_ready(&mut session, Phase::Deal);
        everyone_ready(&mut session, Phase::Bet(Street::PreFlop));
        assert_eq!(session.community().len(), 3);
        everyone_ready(&mut session, Phase::Flop);
        everyone_ready(&mut session, Phase::Bet(Street::Flop));
        assert_eq!(session.community().len(), 4);
        everyone_ready(&mut session, Phase::Turn);
        everyone_ready(&mut session, Phase::Bet(Street::Turn));
        assert_eq!(session.community().len(), BOARD_SIZE);
        everyone_ready(&mut session, Phase::River);
        everyone_ready(&mut session, Phase::Bet(Street::River));

        assert_eq!(session.phase(), Phase::Score);
        let showdown = session.showdown().unwrap();
        assert_eq!(showdown.entries.len(), 2);
        // Two hands, two burns, five community cards.
        assert_eq!(session.deck.remaining(), DECK_SIZE - 12);
    }

    #[test]
    fn score_barrier_resets_the_table() {
        let mut session = Session::new(MIN_PLAYERS);
        seat_two(&mut session);
        everyone_ready(&mut session, Phase::Deal);
        everyone_ready(&mut session, Phase::Bet(Street::PreFlop));
        everyone_ready(&mut session, Phase::Flop);
        everyone_ready(&mut session, Phase::Bet(Street::Flop));
        everyone_ready(&mut session, Phase::Turn);
        everyone_ready(&mut session, Phase::Bet(Street::Turn));
        everyone_ready(&mut session, Phase::River);
        everyone_ready(&mut session, Phase::Bet(Street::River));
        everyone_ready(&mut session, Phase::Score);

        assert_eq!(session.phase(), Phase::Lobby);
        assert!(session.players().is_empty());
        assert!(session.community().is_empty());
        assert!(session.showdown().is_none());
    }

    #[test]
    fn folding_to_one_short_circuits_to_the_showdown() {
        let mut session = Session::new(MIN_PLAYERS);
        let (alice, bob) = seat_two(&mut session);
        everyone_ready(&mut session, Phase::Deal);
        session.mark_ready(bob, Phase::Bet(Street::PreFlop));

        session.remove(alice);
        assert_eq!(session.phase(), Phase::Score);
        assert!(session.community().is_empty());
        assert_eq!(session.showdown().unwrap().winner, Some(bob));
    }

    #[test]
    fn fold_leaves_the_wait_set_so_the_rest_proceed() {
        let mut session = Session::new(3);
        let alice = session.join(Username::new("alice"), 0).unwrap();
        let bob = session.join(Username::new("bob"), 0).unwrap();
        let carol = session.join(Username::new("carol"), 0).unwrap();
        assert_eq!(session.phase(), Phase::Deal);

        everyone_ready(&mut session, Phase::Deal);
        session.mark_ready(alice, Phase::Bet(Street::PreFlop));
        session.mark_ready(bob, Phase::Bet(Street::PreFlop));
        assert_eq!(session.phase(), Phase::Bet(Street::PreFlop));

        session.remove(carol);
        assert_eq!(session.phase(), Phase::Flop);
        assert_eq!(session.players().len(), 2);
    }

    #[test]
    fn everyone_leaving_resets_to_the_lobby() {
        let mut session = Session::new(MIN_PLAYERS);
        let (alice, bob) = seat_two(&mut session);
        session.remove(alice);
        session.remove(bob);
        assert_eq!(session.phase(), Phase::Lobby);
        assert!(session.players().is_empty());
        assert!(session.community().is_empty());
    }

    #[test]
    fn disconnect_at_the_showdown_does_not_wedge_the_rest() {
        let mut session = Session::new(MIN_PLAYERS);
        let (alice, bob) = seat_two(&mut session);
        everyone_ready(&mut session, Phase::Deal);
        session.mark_ready(bob, Phase::Bet(Street::PreFlop));
        session.remove(alice);
        assert_eq!(session.phase(), Phase::Score);

        session.mark_ready(bob, Phase::Score);
        assert_eq!(session.phase(), Phase::Lobby);
    }

    #[test]
    fn tied_top_scores_crown_nobody() {
        let mut session = Session::new(MIN_PLAYERS);
        let (alice, bob) = seat_two(&mut session);
        let hands = [
            vec![Card(9, Suit::Spade), Card(4, Suit::Heart)],
            vec![Card(9, Suit::Club), Card(4, Suit::Diamond)],
        ];
        for (seat, hand) in session.players.iter_mut().zip(hands) {
            seat.hand = hand;
        }
        session.community = vec![
            Card(2, Suit::Heart),
            Card(6, Suit::Spade),
            Card(11, Suit::Club),
        ];

        session.score_hands();
        let showdown = session.showdown().unwrap();
        assert_eq!(showdown.winner, None);
        assert_eq!(showdown.entries[0].score, showdown.entries[1].score);

        // A strictly better hand takes it back.
        session.players[0].hand = vec![Card(11, Suit::Spade), Card(4, Suit::Heart)];
        session.score_hands();
        assert_eq!(session.showdown().unwrap().winner, Some(alice));
        let _ = bob;
    }
}
