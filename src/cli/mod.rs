//! CLI module for deep-research
//!
//! Provides command-line interface parsing for the deep-research binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Deep Research - clarify, plan, search and synthesize
///
/// Turns a free-text research query into a markdown report, optionally
/// asking clarification questions first.
#[derive(Parser, Debug)]
#[command(
    name = "deep-research",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Deep Research - clarify, plan, search and synthesize",
    long_about = "Deep Research - turns a free-text research query into a markdown report.\n\n\
                  The interactive workflow asks clarification questions first. It can run\n\
                  in one process ('interactive') or be split in two ('start' saves a\n\
                  snapshot, 'resume' continues it with the answers).",
    after_help = "EXAMPLES:\n    \
                  deep-research init                                  # Scaffold research.toml\n    \
                  deep-research run \"Impact of remote work on housing\" # Direct research\n    \
                  deep-research interactive \"Impact of remote work\"    # Ask, then research\n    \
                  deep-research start \"Impact of remote work\" --out s.json\n    \
                  deep-research resume --state s.json -a Berlin -a 2020-2024 -a \"Rents\""
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        default_value = "research.toml",
        env = "DEEP_RESEARCH_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a query without clarification questions
    Run {
        /// The research query
        query: String,
    },

    /// Generate clarification questions and save the workflow snapshot
    ///
    /// The snapshot is printed as JSON, or written to --out.
    Start {
        /// The research query
        query: String,

        /// Write the snapshot to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Continue a saved workflow with answers to its questions
    Resume {
        /// Snapshot file produced by 'start'
        #[arg(short, long)]
        state: PathBuf,

        /// One answer per clarification question, in order
        #[arg(short, long = "answer")]
        answer: Vec<String>,

        /// Print progress events as JSON lines instead of status messages
        #[arg(long)]
        json: bool,
    },

    /// Ask clarification questions on the terminal, then research
    Interactive {
        /// The research query
        query: String,
    },

    /// Initialize a research.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure
        #[arg(long, value_enum, default_value_t = ProviderChoice::Ollama)]
        provider: ProviderChoice,
    },

    /// Show configuration information
    Config {
        /// Print the full resolved configuration as TOML
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file, including referenced env vars
        #[arg(long)]
        validate: bool,
    },
}

/// Provider written by `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderChoice {
    Ollama,
    Openai,
}

impl ProviderChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderChoice::Ollama => "ollama",
            ProviderChoice::Openai => "openai",
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
