//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How a turn's events are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored console output: reasoning on stderr, answer on stdout
    #[default]
    Text,
    /// Server-sent event frames on stdout
    Sse,
    /// One JSON object per event on stdout
    Json,
}

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Streaming conversational agent with background summarization")]
#[command(long_about = r#"
parley runs conversation turns against an OpenAI-compatible model.

The model reasons first and then introduces its answer with a marker. parley
streams the reasoning and the answer as separate events, stores every turn,
and compresses long messages in the background so later turns stay inside
the model's context window.

Configuration files are loaded from (in priority order):
1. PARLEY_<SECTION>__<KEY>   Environment variables
2. --config <path>           Explicit config file
3. ./parley.toml             Project-level config
4. ~/.config/parley/config.toml   Global config

Example:
  parley ask "How much water should I drink a day?"
  parley ask --session 7f2c --format sse "And when exercising?"
  parley history --session 7f2c
  parley session rename 7f2c "Hydration"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one conversation turn
    Ask {
        /// The question to ask
        query: String,

        /// Session to continue (a new one is created when omitted)
        #[arg(short, long, value_name = "ID")]
        session: Option<String>,

        /// Title for a session created by this turn
        #[arg(short, long)]
        title: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the stored messages of a session
    History {
        /// Session to print
        #[arg(short, long, value_name = "ID")]
        session: String,

        /// Maximum number of most recent messages
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// List sessions, newest first
    Sessions,

    /// Create, rename or delete a session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show configuration file locations and validation results
    Config,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Create an empty session and print its id
    New {
        /// Session title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Change the title of a session
    Rename {
        /// Session to rename
        session: String,

        /// New title
        title: String,
    },

    /// Delete a session together with its messages
    Delete {
        /// Session to delete
        session: String,
    },
}
