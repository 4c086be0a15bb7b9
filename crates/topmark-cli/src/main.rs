//! topmark CLI
//!
//! Adds, updates, and removes metadata headers in source files.

mod cli;
mod commands;
mod error;
mod files;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;
use topmark_core::Pipeline;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(commands::EXIT_FAILURE);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
    tracing::debug!("Verbose mode enabled");
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Check(args)) => commands::run_pipeline(Pipeline::Check, config, &args),
        Some(Commands::Strip(args)) => commands::run_pipeline(Pipeline::Strip, config, &args),
        Some(Commands::Probe {
            paths,
            json,
            config: overrides,
        }) => commands::run_probe(config, &paths, &overrides, json),
        Some(Commands::Filetypes { json }) => commands::run_filetypes(json),
        None => {
            // No command provided - show help hint
            println!("{} source file headers", "topmark".green().bold());
            println!();
            println!("Run {} for available commands.", "topmark --help".cyan());
            Ok(commands::EXIT_OK)
        }
    }
}
