//! CLI interface for Timetable

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(author = "Krakaw")]
#[command(version = "0.1.0")]
#[command(about = "Class timetable with role-gated editing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new timetable.toml configuration file
    Init,

    /// Start the web UI
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage registered users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Issue or inspect session tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Book catalog tools
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a new user
    Add {
        #[arg(short, long)]
        login: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        group: String,

        #[arg(short, long)]
        role: String,

        /// Password (read from TIMETABLE_PASSWORD if omitted)
        #[arg(long, env = "TIMETABLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// List registered users
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Sign a token for a registered user
    Issue {
        /// Login of the user
        login: String,
    },

    /// Verify a token and show its claims
    Inspect {
        token: String,
    },
}

#[derive(Subcommand)]
pub enum LibraryAction {
    /// Build a small catalog, exercise it and save it to a file
    Demo {
        #[arg(short, long, default_value = "library.json")]
        file: PathBuf,
    },

    /// Show the books and statistics of a saved catalog
    Show {
        #[arg(short, long, default_value = "library.json")]
        file: PathBuf,

        /// Only books by this author
        #[arg(long)]
        author: Option<String>,

        /// Only books in this genre
        #[arg(long)]
        genre: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
