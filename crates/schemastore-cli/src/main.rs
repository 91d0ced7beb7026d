//! SchemaStore CLI - resolve named schemas from a directory tree
//!
//! This is the main entry point for the SchemaStore CLI application, providing
//! commands for finding single schemas, loading whole schema trees and
//! inspecting configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    let result = load_config(&cli).and_then(|config| {
        init_logging(&cli, &config);
        run(cli, config)
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nSet a schema root with '--root' or in a configuration file. For more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Load the configuration file and apply command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with_file(cli.config.as_deref())?;
    config.apply_cli(cli);

    if !config.output.color {
        control::set_override(false);
    }
    Ok(config)
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(
        config.output.format,
        control::SHOULD_COLORIZE.should_colorize(),
        cli.quiet,
    );

    tracing::info!(verbosity = cli.verbosity_level(), "Executing command");

    match cli.command {
        Commands::Find(args) => handlers::handle_find(args, &config, &mut output),
        Commands::LoadAll(args) => handlers::handle_load_all(args, &config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) {
    let mut logging_config = LoggingConfig::from_settings(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();
    logging_config.ansi = config.output.color;

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    if let Err(e) = logging::init_logging(logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
