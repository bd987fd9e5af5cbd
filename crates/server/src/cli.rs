//! Command-line interface.

use clap::{Parser, Subcommand};

/// Financial Document Analyzer API server.
#[derive(Parser, Debug)]
#[command(name = "finlens-server", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve {
        /// Bind address; overrides HOST.
        #[arg(long)]
        host: Option<String>,

        /// Bind port; overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the results database and apply migrations, then exit.
    InitDb,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { host: None, port: None })
    }
}
