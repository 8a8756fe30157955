//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the persona advisor.

use clap::{Parser, Subcommand};

use crate::persona::Persona;

/// Persona Advisor - career consultation form backed by a chat completion API
///
/// Serves a single-page form where a question is answered in the voice of a
/// chosen career persona, or asks one question directly from the terminal.
#[derive(Parser, Debug)]
#[command(name = "persona-advisor")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the consultation form over HTTP
    Serve {
        /// Path to configuration file
        #[arg(short, long, env = "ADVISOR_CONFIG")]
        config: Option<String>,

        /// Override the bind interface
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Path to configuration file
        #[arg(short, long, env = "ADVISOR_CONFIG")]
        config: Option<String>,

        /// Persona display label or slug (career-coach, interviewer)
        #[arg(long, default_value = "career-coach")]
        persona: String,

        /// Question text
        text: String,
    },

    /// Persona listing
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List the selectable personas
    List,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// Map typed `--persona` input onto the display label the registry expects.
///
/// Padding and slug case are forgiven here; anything else passes through
/// unchanged and gets the default prompt.
pub fn persona_label(input: &str) -> &str {
    input.parse::<Persona>().map(|p| p.label()).unwrap_or(input)
}
