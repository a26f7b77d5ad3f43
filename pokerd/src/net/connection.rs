//! Line-oriented connection plumbing.
//!
//! The daemon's wire format prefixes every outgoing line with its separator
//! instead of terminating it: `\n` normally, `\r` when a progress line should
//! overwrite the previous one in place. Prompts therefore stay on the same
//! line as the peer's cursor.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use super::errors::ProtocolError;

/// Buffered line transport over any byte stream.
#[derive(Debug)]
pub struct LineStream<S> {
    stream: BufReader<S>,
    line: Vec<u8>,
}

impl<S> LineStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
            line: Vec::new(),
        }
    }

    /// Writes `text` line by line, each prefixed with a newline, or with a
    /// carriage return when `overwrite` redraws an in-place counter.
    ///
    /// # Errors
    ///
    /// Any transport failure.
    pub async fn send_lines(&mut self, text: &str, overwrite: bool) -> Result<(), ProtocolError> {
        let prefix: &[u8] = if overwrite { b"\r" } else { b"\n" };
        for line in text.split('\n') {
            self.stream.write_all(prefix).await?;
            self.stream.write_all(line.as_bytes()).await?;
        }
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one line, trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PeerDisconnected`] on EOF,
    /// [`ProtocolError::MalformedResponse`] on a non-UTF-8 line.
    pub async fn recv_line(&mut self) -> Result<String, ProtocolError> {
        self.line.clear();
        let read = self.stream.read_until(b'\n', &mut self.line).await?;
        if read == 0 {
            return Err(ProtocolError::PeerDisconnected);
        }
        match std::str::from_utf8(&self.line) {
            Ok(text) => Ok(text.trim().to_lowercase()),
            Err(_) => Err(ProtocolError::MalformedResponse),
        }
    }

    /// Prompts until the peer sends a non-empty, readable line.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::PeerDisconnected`] or a transport failure. Empty and
    /// malformed lines re-prompt instead of failing.
    pub async fn prompt(&mut self, prompt: &str) -> Result<String, ProtocolError> {
        loop {
            self.send_lines(&format!("\n{prompt}? "), false).await?;
            match self.recv_line().await {
                Ok(response) if !response.is_empty() => return Ok(response),
                Ok(_) | Err(ProtocolError::MalformedResponse) => {}
                Err(err) => return Err(err),
            }
        }
    }
}
