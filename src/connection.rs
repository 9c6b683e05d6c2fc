//! Link between the agent and the game server.
//!
//! [`Transport`] is what the loop driver needs from a server link; [`Connection`] implements it
//! over TCP with the line protocol described in [`game_interface`](crate::game_interface).

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use anyhow::{bail, Context};
use tracing::{info, instrument, trace};

use crate::configuration::Configuration;
use crate::game_interface::{Direction, GameState};

/// A server link delivering one snapshot and accepting one move per tick.
pub trait Transport {
    /// False once the server has closed the link.
    fn is_active(&self) -> bool;

    /// Blocks until the next snapshot arrives.
    ///
    /// Returns `Ok(None)` if the server closed the link cleanly in between snapshots.
    ///
    /// # Errors
    /// Returned on I/O failure or malformed snapshot.
    fn receive_game_state(&mut self) -> anyhow::Result<Option<GameState>>;

    /// Sends this tick's move.
    ///
    /// # Errors
    /// Returned on I/O failure.
    fn send_move(&mut self, direction: Direction) -> anyhow::Result<()>;
}

/// TCP link to a game server.
///
/// The socket is shut down on drop.
#[derive(Debug)]
pub struct Connection {
    reader: BufReader<TcpStream>,
    stream: TcpStream,
    active: bool,
}

impl Connection {
    /// Connects to the server from `config` and registers as `name`.
    ///
    /// # Errors
    /// Returned when the server cannot be reached or the registration cannot be sent.
    #[instrument(skip(config), fields(server = %config.server_address()))]
    pub fn connect(config: &Configuration, name: &str) -> anyhow::Result<Connection> {
        let address = config.server_address();
        let stream = TcpStream::connect(&address)
            .with_context(|| format!("could not connect to game server at {address}"))?;
        stream
            .set_nodelay(true)
            .context("could not disable Nagle's algorithm")?;
        let reader = BufReader::new(
            stream
                .try_clone()
                .context("could not clone the server stream")?,
        );

        let mut connection = Connection {
            reader,
            stream,
            active: true,
        };
        connection.send_line(&format!("name {name}"))?;
        info!("{name}: connected to the server");
        Ok(connection)
    }

    fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.stream
            .write_all(format!("{line}\n").as_bytes())
            .context("I/O error while sending msg")?;
        self.stream.flush().context("I/O error while flushing msg")
    }

    /// Reads one line. `None` on end of stream.
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .context("error while reading stream")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Reads lines up to and including `end`. `None` if the stream ends before a new block.
    fn read_block(&mut self) -> anyhow::Result<Option<String>> {
        let mut block = String::new();
        loop {
            let Some(line) = self.read_line()? else {
                if block.trim().is_empty() {
                    trace!("server closed the connection");
                    return Ok(None);
                }
                bail!("connection closed in the middle of a snapshot");
            };
            let is_end = line.trim() == "end";
            block.push_str(&line);
            if is_end {
                return Ok(Some(block));
            }
        }
    }
}

impl Transport for Connection {
    fn is_active(&self) -> bool {
        self.active
    }

    fn receive_game_state(&mut self) -> anyhow::Result<Option<GameState>> {
        let block = match self.read_block() {
            Ok(Some(block)) => block,
            other => {
                self.active = false;
                return other.map(|_| None);
            }
        };
        let state = block
            .parse::<GameState>()
            .context("received an invalid snapshot")?;
        Ok(Some(state))
    }

    fn send_move(&mut self, direction: Direction) -> anyhow::Result<()> {
        self.send_line(&direction.to_string())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // the peer may already be gone
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
