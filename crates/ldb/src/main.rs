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


//! LDB - Levels Debugger
//!
//! Listens for an instrumented Levels program, records every state it reports
//! and lets the user step, set breakpoints and replay past method calls from a
//! console on stdin.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use ldb::{
    channel::{self, ChannelEvent, SocketChannel},
    config::Config,
    console::{self, ConsoleCommand},
    markers::LogMarkers,
};
use ldb_common::logging;
use ldb_engine::{ChannelError, Debugger, MessageDispatcher, SessionEventKind};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::TcpListener,
    sync::mpsc,
};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "ldb")]
#[command(about = "LDB - Levels Debugger, a record-and-replay debugger for Levels programs")]
#[command(version)]
struct Cli {
    /// Host to listen on for the debuggee
    #[arg(long, env = "LDB_HOST", global = true)]
    host: Option<String>,

    /// Port to listen on for the debuggee
    #[arg(long, env = "LDB_PORT", global = true)]
    port: Option<u16>,

    /// Configuration file (default: ~/.ldb.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field delimiter of the wire protocol
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// How long changed variables stay highlighted, in milliseconds
    #[arg(long, global = true)]
    highlight_ms: Option<u64>,

    /// Only log to the console
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Wait for a debuggee and start the console (default)
    Listen,
    /// Print the effective configuration
    Config,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(host) = &self.host {
            config.channel.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.channel.port = port;
        }
        if let Some(delimiter) = &self.delimiter {
            config.protocol.delimiter.clone_from(delimiter);
        }
        if let Some(highlight_ms) = self.highlight_ms {
            config.session.highlight_ms = highlight_ms;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging("ldb", !cli.no_file_log)?;
    let config = cli.load_config()?;

    match cli.command.unwrap_or(Commands::Listen) {
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Commands::Listen => {
            listen(config).await?;
            // A blocking stdin read still in flight would keep the runtime alive.
            std::process::exit(0)
        }
    }
}

async fn listen(config: Config) -> Result<()> {
    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("Failed to listen on {address}"))?;
    info!(%address, "Waiting for the debuggee");

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let server = tokio::spawn(channel::serve(listener, command_rx, event_tx));

    let mut debugger = Debugger::new(
        Box::new(SocketChannel::new(command_tx)),
        Arc::new(LogMarkers),
        config.session_config(),
    );
    for kind in SessionEventKind::ALL {
        debugger.subscribe(kind, |event| {
            debug!(?event, "Session event");
            if let Some(text) = console::render_event(event) {
                println!("{text}");
            }
        });
    }
    let mut dispatcher = MessageDispatcher::new(config.wire_format());

    println!("{}", console::HELP);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
            line = stdin.next_line() => {
                let Some(line) = line.wrap_err("Failed to read from stdin")? else {
                    break;
                };
                match console::parse_command(&line) {
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(Some(command)) => match console::execute(command, &mut debugger) {
                        Ok(Some(text)) => println!("{text}"),
                        Ok(None) => {}
                        Err(error) => println!("Error: {error}"),
                    },
                    Ok(None) => {}
                    Err(error) => println!("{error:#}"),
                }
            }
            event = event_rx.recv() => match event {
                Some(ChannelEvent::Connected(_)) => {
                    dispatcher.reset();
                    if !debugger.is_running() {
                        if let Err(error) = debugger.start() {
                            println!("Error: {error}");
                        }
                    }
                }
                Some(ChannelEvent::Data(data)) => {
                    dispatcher.dispatch(&data, &mut debugger);
                }
                Some(ChannelEvent::Closed) => {
                    dispatcher.reset();
                    debugger.stop();
                }
                Some(ChannelEvent::Failed(error)) => {
                    dispatcher.reset();
                    debugger.handle_channel_error(&ChannelError::Io(error));
                }
                None => break,
            },
        }
    }

    debugger.stop();
    server.abort();
    info!("Shutting down LDB...");
    Ok(())
}
