//! TCP accept loop.

use std::io;

use log::info;
use tokio::net::TcpListener;

use super::session::PlayerSession;
use crate::table::TableHandle;

/// Default listen address of the daemon.
pub const DEFAULT_BIND: &str = "0.0.0.0:9204";

/// Accepts connections forever, one [`PlayerSession`] task per peer.
///
/// # Errors
///
/// Returns the underlying I/O error if accepting fails.
pub async fn serve(listener: TcpListener, table: TableHandle) -> io::Result<()> {
    info!("serving on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("player {peer} connected");
        let session = PlayerSession::new(stream, peer.to_string(), table.clone());
        tokio::spawn(session.run());
    }
}
