//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

use gencheck::util::shell::ColorChoice;
use gencheck::GeneratorKind;

/// gencheck - Exercise a project's code generators and verify their output
#[derive(Parser)]
#[command(name = "gencheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for machine consumption
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate every variation, run lint and typecheck, then clean up
    Run(RunArgs),

    /// List the variations a run would generate
    Variations(VariationsArgs),

    /// Restore the root state file from a leftover backup
    Restore(RestoreArgs),

    /// Show or initialize gencheck.toml
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Generate only one kind (component or slice)
    #[arg(long, value_name = "KIND")]
    pub only: Option<GeneratorKind>,

    /// Skip the lint and typecheck gates
    #[arg(long)]
    pub skip_verify: bool,

    /// Leave generated directories in place (the root state is still restored)
    #[arg(long)]
    pub keep: bool,

    /// Do not check that configured programs are on PATH
    #[arg(long)]
    pub no_preflight: bool,
}

#[derive(Args)]
pub struct VariationsArgs {
    /// Only list one kind (component or slice)
    #[arg(long, value_name = "KIND")]
    pub kind: Option<GeneratorKind>,

    /// Print the JSON each generator receives on stdin
    #[arg(long)]
    pub input: bool,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Succeed silently when there is no backup
    #[arg(long)]
    pub if_exists: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write a gencheck.toml with every default spelled out
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing gencheck.toml with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
