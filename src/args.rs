use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Hangman with persisted scores and match history.
#[derive(Parser)]
#[command(name = "gallows", version)]
pub struct Args {
    /// Override the data directory (defaults to the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print stored data as JSON and exit
    Export {
        #[arg(value_enum)]
        what: ExportKind,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportKind {
    /// Full match history
    History,
    /// Player ranking
    Ranking,
    /// Global statistics
    Stats,
}
