// LDB - Levels Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! TCP transport to the debuggee
//!
//! LDB is the listening side: the instrumented program connects to
//! `host:port` and exchanges newline-terminated messages with the session.
//! The socket itself is owned by [`serve`], a tokio task. The session talks to
//! it through [`SocketChannel`], which only queues commands and therefore
//! never blocks the synchronous state machine.

use std::{io, net::SocketAddr};

use ldb_engine::{ChannelError, DebuggeeChannel};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
};
use tracing::{debug, info, warn};

/// Request from the session to the socket task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCommand {
    /// Write an encoded message to the debuggee.
    Send(String),
    /// Drop the current connection and discard queued messages.
    Close,
}

/// Something the socket task observed.
#[derive(Debug)]
pub enum ChannelEvent {
    /// A debuggee connected.
    Connected(SocketAddr),
    /// One received line, with its terminator restored.
    Data(String),
    /// The debuggee closed the connection.
    Closed,
    /// Reading or writing failed; the connection is gone.
    Failed(io::Error),
}

/// Session side of the socket.
#[derive(Debug)]
pub struct SocketChannel {
    commands: UnboundedSender<ChannelCommand>,
    open: bool,
}

impl SocketChannel {
    /// Channel feeding the socket task behind `commands`.
    pub fn new(commands: UnboundedSender<ChannelCommand>) -> Self {
        Self { commands, open: false }
    }

    /// Whether the session currently holds the channel open.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl DebuggeeChannel for SocketChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        if self.commands.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.open = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        if std::mem::take(&mut self.open) {
            // The socket task may already be gone at shutdown.
            let _ = self.commands.send(ChannelCommand::Close);
        }
    }

    fn send_message(&mut self, message: &str) -> Result<(), ChannelError> {
        if !self.open {
            return Err(ChannelError::NotConnected);
        }
        self.commands.send(ChannelCommand::Send(message.to_string())).map_err(|_| ChannelError::Closed)
    }
}

/// Serve debuggee connections, one at a time, until `commands` is dropped.
///
/// Messages sent while no debuggee is connected are queued and flushed as
/// soon as one connects, so breakpoints announced at start reach the program.
pub async fn serve(
    listener: TcpListener,
    mut commands: UnboundedReceiver<ChannelCommand>,
    events: UnboundedSender<ChannelEvent>,
) {
    let mut backlog: Vec<String> = Vec::new();

    loop {
        let stream = loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!(%peer, "Debuggee connected");
                        let _ = events.send(ChannelEvent::Connected(peer));
                        break stream;
                    }
                    Err(error) => warn!(%error, "Failed to accept debuggee connection"),
                },
                command = commands.recv() => match command {
                    Some(ChannelCommand::Send(message)) => backlog.push(message),
                    Some(ChannelCommand::Close) => backlog.clear(),
                    None => return,
                },
            }
        };

        if let Err(error) = stream.set_nodelay(true) {
            debug!(%error, "Failed to disable Nagle's algorithm");
        }
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        let mut flushed = Ok(());
        for message in backlog.drain(..) {
            flushed = writer.write_all(message.as_bytes()).await;
            if flushed.is_err() {
                break;
            }
        }
        if let Err(error) = flushed {
            let _ = events.send(ChannelEvent::Failed(error));
            continue;
        }

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(mut line)) => {
                        line.push('\n');
                        let _ = events.send(ChannelEvent::Data(line));
                    }
                    Ok(None) => {
                        info!("Debuggee closed the connection");
                        let _ = events.send(ChannelEvent::Closed);
                        break;
                    }
                    Err(error) => {
                        warn!(%error, "Failed to read from debuggee");
                        let _ = events.send(ChannelEvent::Failed(error));
                        break;
                    }
                },
                command = commands.recv() => match command {
                    Some(ChannelCommand::Send(message)) => {
                        if let Err(error) = writer.write_all(message.as_bytes()).await {
                            warn!(%error, "Failed to write to debuggee");
                            let _ = events.send(ChannelEvent::Failed(error));
                            break;
                        }
                    }
                    Some(ChannelCommand::Close) => {
                        debug!("Closing debuggee connection");
                        let _ = writer.shutdown().await;
                        break;
                    }
                    None => return,
                },
            }
        }
    }
}
