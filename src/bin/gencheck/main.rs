//! gencheck CLI - Exercise a project's code generators and verify their output

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use gencheck::util::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gencheck=debug")
    } else {
        EnvFilter::new("gencheck=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    // Execute command
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &shell),
        Commands::Variations(args) => commands::variations::execute(args, &shell),
        Commands::Restore(args) => commands::restore::execute(args, &shell),
        Commands::Config(args) => commands::config::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
