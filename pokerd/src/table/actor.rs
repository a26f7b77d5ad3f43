//! Single-writer table actor.
//!
//! The actor exclusively owns the [`Session`]; connection tasks talk to it
//! through a [`TableHandle`] and observe it through a watch channel. Every
//! read-modify-write of the roster, phase, community cards, or deck is
//! serialized through the inbox, and each phase's entry action completes
//! before the resulting view is published.

use log::{debug, info};
use tokio::sync::{mpsc, oneshot, watch};

use super::config::TableConfig;
use super::messages::{TableError, TableMessage, TableView};
use crate::game::entities::Username;
use crate::game::state_machine::{Phase, PlayerId, SeatError, Session};

/// Cloneable handle for talking to a table actor.
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    view: watch::Receiver<TableView>,
}

impl TableHandle {
    /// Subscribes to table snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TableView> {
        self.view.clone()
    }

    /// Seats a player, reporting `wins` for the roster display.
    ///
    /// # Errors
    ///
    /// [`TableError::RoundInProgress`] while a round is underway,
    /// [`TableError::Closed`] if the actor is gone.
    pub async fn join(&self, name: Username, wins: u32) -> Result<PlayerId, TableError> {
        let (reply, response) = oneshot::channel();
        self.send(TableMessage::Join { name, wins, reply }).await?;
        response.await.map_err(|_| TableError::Closed)?
    }

    /// Reports that `player` finished processing `phase`.
    ///
    /// # Errors
    ///
    /// [`TableError::Closed`] if the actor is gone.
    pub async fn ready(&self, player: PlayerId, phase: Phase) -> Result<(), TableError> {
        self.send(TableMessage::Ready { player, phase }).await
    }

    /// Drops `player` out of the current round.
    ///
    /// # Errors
    ///
    /// [`TableError::Closed`] if the actor is gone.
    pub async fn fold(&self, player: PlayerId) -> Result<(), TableError> {
        self.send(TableMessage::Fold { player }).await
    }

    /// Removes `player` from the table entirely.
    ///
    /// # Errors
    ///
    /// [`TableError::Closed`] if the actor is gone.
    pub async fn leave(&self, player: PlayerId) -> Result<(), TableError> {
        self.send(TableMessage::Leave { player }).await
    }

    /// A snapshot taken after every previously sent message was handled.
    ///
    /// # Errors
    ///
    /// [`TableError::Closed`] if the actor is gone.
    pub async fn view(&self) -> Result<TableView, TableError> {
        let (reply, response) = oneshot::channel();
        self.send(TableMessage::GetView { reply }).await?;
        response.await.map_err(|_| TableError::Closed)
    }

    async fn send(&self, message: TableMessage) -> Result<(), TableError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TableError::Closed)
    }
}

/// Owns one table's [`Session`] and serializes all access to it.
#[derive(Debug)]
pub struct TableActor {
    session: Session,
    inbox: mpsc::Receiver<TableMessage>,
    views: watch::Sender<TableView>,
}

impl TableActor {
    /// Creates an actor and its handle.
    #[must_use]
    pub fn new(config: TableConfig) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(64);
        let (views, view) = watch::channel(TableView::default());
        let actor = Self {
            session: Session::new(config.min_players),
            inbox,
            views,
        };
        (actor, TableHandle { sender, view })
    }

    /// Spawns the actor onto the current runtime and returns its handle.
    #[must_use]
    pub fn spawn(config: TableConfig) -> TableHandle {
        let (actor, handle) = Self::new(config);
        tokio::spawn(actor.run());
        handle
    }

    /// Message loop; returns once every handle is dropped.
    pub async fn run(mut self) {
        info!("table open");
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            self.publish();
        }
        info!("table closed");
    }

    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Join { name, wins, reply } => {
                let result = self.session.join(name, wins).map_err(|err| match err {
                    SeatError::RoundInProgress => TableError::RoundInProgress,
                });
                // Publish before acking so the joiner never reads a pre-join
                // snapshot.
                self.publish();
                let _ = reply.send(result);
            }
            TableMessage::Ready { player, phase } => {
                debug!("player {player} ready for {phase:?}");
                self.session.mark_ready(player, phase);
            }
            TableMessage::Fold { player } => {
                info!("player {player} folds");
                self.session.remove(player);
            }
            TableMessage::Leave { player } => {
                info!("player {player} left the table");
                self.session.remove(player);
            }
            TableMessage::GetView { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn publish(&self) {
        self.views.send_replace(self.snapshot());
    }

    fn snapshot(&self) -> TableView {
        TableView {
            phase: self.session.phase(),
            seats: self.session.players().to_vec(),
            community: self.session.community().to_vec(),
            showdown: self.session.showdown().cloned(),
        }
    }
}
