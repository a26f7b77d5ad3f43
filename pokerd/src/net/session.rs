//! Per-connection protocol loop.
//!
//! A [`PlayerSession`] drives one player through the table's phases: it
//! mirrors the shared phase with a local cursor, performs the interaction
//! each phase asks for, reports readiness, and parks on the watch channel
//! until the barrier clears. It owns the player's private hand, fold flag,
//! and win counter; the table only ever learns about joins, readiness,
//! folds, and departures.
//!
//! Waits adopt whatever phase the table lands on next rather than assuming
//! the usual successor: a fold or disconnect elsewhere can jump the table
//! straight to the showdown, or a reset can put it back in the lobby, and
//! the local cursor just follows.

use std::convert::Infallible;
use std::time::Duration;

use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio::time;

use super::connection::LineStream;
use super::errors::ProtocolError;
use crate::game::entities::{Card, Username, render_cards};
use crate::game::state_machine::{Phase, PlayerId, Street};
use crate::table::{TableError, TableHandle, TableView};

const BANNER: &str = r"                 _                _
     _ __   ___ | | _____ _ __ __| |
    | '_ \ / _ \| |/ / _ \ '__/ _` |
    | |_) | (_) |   <  __/ | | (_| |
    | .__/ \___/|_|\_\___|_|  \__,_|
    |_|";

/// One player's protocol loop over a line stream.
pub struct PlayerSession<S> {
    conn: LineStream<S>,
    table: TableHandle,
    view: watch::Receiver<TableView>,
    peer: String,
    name: Username,
    seat: Option<PlayerId>,
    hand: Vec<Card>,
    /// Local phase cursor, mirroring the table phases this player has
    /// caught up with.
    phase: Phase,
    folded: bool,
    /// Rounds won on this connection; survives round resets.
    wins: u32,
}

impl<S> PlayerSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: String, table: TableHandle) -> Self {
        let view = table.subscribe();
        let name = Username::new(&format!("player {peer}"));
        Self {
            conn: LineStream::new(stream),
            table,
            view,
            peer,
            name,
            seat: None,
            hand: Vec::new(),
            phase: Phase::Lobby,
            folded: false,
            wins: 0,
        }
    }

    /// Drives the protocol until the peer disconnects, then vacates the seat
    /// so nobody waits on a gone player.
    pub async fn run(mut self) {
        let result = self.drive().await;
        if let Some(id) = self.seat.take() {
            let _ = self.table.leave(id).await;
        }
        match result {
            Err(ProtocolError::PeerDisconnected) => {
                info!("player {} ({}) disconnected", self.name, self.peer);
            }
            Err(err) => info!("player {} ({}) dropped: {err}", self.name, self.peer),
            Ok(never) => match never {},
        }
    }

    async fn drive(&mut self) -> Result<Infallible, ProtocolError> {
        self.conn
            .send_lines(
                &format!(
                    "Welcome to Poker Daemon {}\n{BANNER}",
                    env!("CARGO_PKG_VERSION")
                ),
                false,
            )
            .await?;
        self.name = Username::new(&self.conn.prompt("What is your name").await?);
        info!("player {} ({}) joined", self.name, self.peer);

        loop {
            match self.phase {
                Phase::Lobby => self.wait_in_lobby().await?,
                Phase::Table => self.wait_at_table().await?,
                Phase::Deal => self.show_deal().await?,
                Phase::Bet(street) => self.place_bet(street).await?,
                Phase::Flop | Phase::Turn | Phase::River => self.show_street().await?,
                Phase::Score => self.show_showdown().await?,
            }
        }
    }

    /// LOBBY: hold until the table is joinable again.
    async fn wait_in_lobby(&mut self) -> Result<(), ProtocolError> {
        self.hand.clear();
        if self.folded {
            debug!("player {} waits out the round after folding", self.name);
            self.folded = false;
        }
        self.conn
            .send_lines("\nWaiting in lobby for next round...", false)
            .await?;
        self.wait_counting("Waiting in lobby for next round...", |view| {
            view.phase.joinable()
        })
        .await?;
        self.phase = Phase::Table;
        Ok(())
    }

    /// TABLE: take a seat, then hold until the round starts.
    async fn wait_at_table(&mut self) -> Result<(), ProtocolError> {
        self.conn
            .send_lines("\nWaiting at table for players...", false)
            .await?;
        let id = match self.table.join(self.name.clone(), self.wins).await {
            Ok(id) => id,
            Err(TableError::RoundInProgress) => {
                // Lost the race against a starting round; back to the lobby.
                self.phase = Phase::Lobby;
                return Ok(());
            }
            Err(TableError::Closed) => return Err(ProtocolError::TableClosed),
        };
        self.seat = Some(id);

        let view = self
            .wait_counting("Waiting at table for players...", move |view| {
                !view.phase.joinable() || view.seat(id).is_none()
            })
            .await?;
        if view.seat(id).is_none() {
            self.seat = None;
            self.phase = Phase::Lobby;
        } else {
            self.phase = view.phase;
        }
        Ok(())
    }

    /// DEAL: the roster, then the private hand.
    async fn show_deal(&mut self) -> Result<(), ProtocolError> {
        let view = self.snapshot();
        self.conn
            .send_lines(&format!("\nTable has {} players\n", view.seats.len()), false)
            .await?;
        for seat in &view.seats {
            self.conn
                .send_lines(&format!("{:>18}: {} wins", seat.name, seat.wins), false)
                .await?;
        }

        self.conn.send_lines("\nDealing hand...", false).await?;
        let Some(id) = self.seat else {
            self.phase = Phase::Lobby;
            return Ok(());
        };
        if let Some(seat) = view.seat(id) {
            self.hand = seat.hand.clone();
        }
        self.conn
            .send_lines(
                &format!("\n        Your cards: {}", render_cards(&self.hand)),
                false,
            )
            .await?;
        self.advance_with_table(Phase::Deal).await
    }

    /// BET: solicit the fold-or-call decision.
    async fn place_bet(&mut self, street: Street) -> Result<(), ProtocolError> {
        let response = self
            .conn
            .prompt("Choose an action: (F)old or (C)all")
            .await?;
        let Some(id) = self.seat else {
            self.phase = Phase::Lobby;
            return Ok(());
        };
        if response == "f" {
            self.table
                .fold(id)
                .await
                .map_err(|_| ProtocolError::TableClosed)?;
            self.seat = None;
            self.folded = true;
            self.conn.send_lines("\nYou lost...", false).await?;
            self.phase = Phase::Lobby;
            return Ok(());
        }

        self.table
            .ready(id, Phase::Bet(street))
            .await
            .map_err(|_| ProtocolError::TableClosed)?;
        self.conn
            .send_lines("Waiting for other players...", false)
            .await?;
        let view = self
            .wait_counting("Waiting for other players...", |view| {
                view.phase != Phase::Bet(street)
            })
            .await?;
        self.phase = view.phase;
        Ok(())
    }

    /// FLOP/TURN/RIVER: the newly revealed community cards plus our own.
    async fn show_street(&mut self) -> Result<(), ProtocolError> {
        let phase = self.phase;
        let view = self.snapshot();
        let (dealing, reveal) = match phase {
            Phase::Turn => (
                "\nDealing turn...",
                format!("\n        Turn cards: {}", render_cards(&view.community)),
            ),
            Phase::River => (
                "\nDealing river...",
                format!("\n       River cards: {}", render_cards(&view.community)),
            ),
            _ => (
                "\nDealing flop...",
                format!("\n        Flop cards: {}", render_cards(&view.community)),
            ),
        };
        self.conn.send_lines(dealing, false).await?;
        self.conn.send_lines(&reveal, false).await?;
        self.conn
            .send_lines(
                &format!("        Your cards: {}", render_cards(&self.hand)),
                false,
            )
            .await?;
        self.advance_with_table(phase).await
    }

    /// SCORE: the full board, everyone's cards and scores, and the verdict.
    async fn show_showdown(&mut self) -> Result<(), ProtocolError> {
        let view = self.snapshot();
        self.conn
            .send_lines(
                &format!("\n       Table cards: {}", render_cards(&view.community)),
                false,
            )
            .await?;
        if let Some(showdown) = &view.showdown {
            for entry in &showdown.entries {
                self.conn
                    .send_lines(
                        &format!(
                            "{:>10}'s cards: {} (Score: {})",
                            entry.name,
                            render_cards(&entry.hand),
                            entry.score
                        ),
                        false,
                    )
                    .await?;
            }
            if self.seat.is_some() && showdown.winner == self.seat {
                self.wins += 1;
                self.conn.send_lines("\nYou are the winner!", false).await?;
            } else {
                self.conn.send_lines("\nYou lost...", false).await?;
            }
        }

        self.conn
            .send_lines("\nWaiting for other players...", false)
            .await?;
        let Some(id) = self.seat else {
            self.phase = Phase::Lobby;
            return Ok(());
        };
        self.table
            .ready(id, Phase::Score)
            .await
            .map_err(|_| ProtocolError::TableClosed)?;
        self.wait_counting("Waiting for other players...", |view| {
            view.phase != Phase::Score
        })
        .await?;
        self.seat = None;
        self.phase = Phase::Lobby;
        Ok(())
    }

    /// Reports readiness for `phase` and parks until the table leaves it,
    /// then mirrors whatever phase the table moved to (the short circuit can
    /// skip straight to the showdown).
    async fn advance_with_table(&mut self, phase: Phase) -> Result<(), ProtocolError> {
        let Some(id) = self.seat else {
            self.phase = Phase::Lobby;
            return Ok(());
        };
        self.table
            .ready(id, phase)
            .await
            .map_err(|_| ProtocolError::TableClosed)?;
        let view = self.wait_until(|view| view.phase != phase).await?;
        self.phase = view.phase;
        Ok(())
    }

    /// The latest published table snapshot.
    fn snapshot(&mut self) -> TableView {
        self.view.borrow_and_update().clone()
    }

    /// Parks until `done` holds, silently.
    async fn wait_until<F>(&mut self, mut done: F) -> Result<TableView, ProtocolError>
    where
        F: FnMut(&TableView) -> bool,
    {
        loop {
            {
                let view = self.view.borrow_and_update();
                if done(&view) {
                    return Ok(view.clone());
                }
            }
            self.view
                .changed()
                .await
                .map_err(|_| ProtocolError::TableClosed)?;
        }
    }

    /// Parks until `done` holds, redrawing an in-place seconds counter while
    /// the barrier keeps us waiting.
    async fn wait_counting<F>(
        &mut self,
        banner: &str,
        mut done: F,
    ) -> Result<TableView, ProtocolError>
    where
        F: FnMut(&TableView) -> bool,
    {
        let mut ticker = time::interval(Duration::from_secs(1));
        ticker.tick().await;
        let mut seconds = 0u64;
        loop {
            {
                let view = self.view.borrow_and_update();
                if done(&view) {
                    return Ok(view.clone());
                }
            }
            tokio::select! {
                changed = self.view.changed() => {
                    changed.map_err(|_| ProtocolError::TableClosed)?;
                }
                _ = ticker.tick() => {
                    seconds += 1;
                    self.conn
                        .send_lines(&format!("{banner} {seconds}s"), true)
                        .await?;
                }
            }
        }
    }
}
