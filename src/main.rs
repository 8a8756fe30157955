//! Persona Advisor - career consultation form
//!
//! This is the main entry point for the persona-advisor binary.
//! It serves the consultation form, or answers one question from the
//! terminal, by forwarding the question to a chat completion API under the
//! system prompt of the chosen persona.

mod backend;
mod cli;
mod config;
mod credentials;
mod dispatcher;
mod error;
mod logging;
mod persona;
mod state;
#[cfg(test)]
mod testing;
mod types;
mod version;
mod web;

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use crate::backend::OpenAiBackend;
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::persona::PersonaRegistry;
use crate::state::AppState;

fn main() -> Result<()> {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    // Commands that never talk to the completion API
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone());
        }
        Commands::Persona { subcommand } => {
            return handle_persona_command(subcommand.clone());
        }
        _ => {}
    }

    let config_path = match &cli.command {
        Commands::Serve { config, .. } | Commands::Ask { config, .. } => config.clone(),
        _ => None,
    };

    let mut config = match AppConfig::load(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    };

    if let Commands::Serve { host, port, .. } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting Persona Advisor"
    );

    let state = build_state(&config)?;

    match cli.command {
        Commands::Serve { .. } => run_server(state, config.listen_addr()),
        Commands::Ask { persona, text, .. } => {
            run_ask(state, cli::persona_label(&persona), &text)
        }
        Commands::Version | Commands::Config { .. } | Commands::Persona { .. } => {
            // Already handled above
            unreachable!();
        }
    }
}

/// Resolve the credential and wire the backend, dispatcher and state together
fn build_state(config: &AppConfig) -> Result<AppState> {
    let (api_key, source) = match credentials::resolve(&config.secrets) {
        Some(credential) => {
            info!(source = %credential.source, "API credential found");
            (Some(credential.key), Some(credential.source))
        }
        None => {
            warn!(
                var = credentials::API_KEY_VAR,
                "No API credential found; submissions will be rejected"
            );
            (None, None)
        }
    };

    let backend = OpenAiBackend::new(&config.openai, api_key)?;
    let dispatcher = Dispatcher::new(Arc::new(backend), config.openai.model.as_str());

    Ok(AppState::new(Arc::new(dispatcher), source))
}

/// Serve the form until shutdown
fn run_server(state: AppState, addr: String) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("persona-advisor")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(web::serve(state, &addr))
}

/// Answer one question on stdout
fn run_ask(state: AppState, persona: &str, text: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;

    match runtime.block_on(state.submit(text, persona)) {
        Ok(answer) => {
            println!("{}", answer.text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            if let Some(hint) = e.suggestion() {
                eprintln!("Hint: {}", hint);
            }
            std::process::exit(e.exit_code());
        }
    }
}

/// Handle persona subcommands
fn handle_persona_command(subcommand: cli::PersonaSubcommand) -> Result<()> {
    use cli::PersonaSubcommand;

    match subcommand {
        PersonaSubcommand::List => {
            let registry = PersonaRegistry::new();
            let default = registry.default_persona();

            println!("Available personas:");
            println!();
            for listing in registry.list_available() {
                let marker = if listing.persona == default { " (default)" } else { "" };
                println!("  {:<14} {}{}", listing.slug, listing.label, marker);
                println!("  {:<14} {}", "", listing.description);
            }
        }
    }

    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: cli::ConfigSubcommand) -> Result<()> {
    use cli::ConfigSubcommand;

    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = AppConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate { config } => match AppConfig::load(config.as_deref()) {
            Ok(_) => {
                println!("Configuration is valid.");
            }
            Err(e) => {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
        },
    }

    Ok(())
}
