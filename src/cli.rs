use crate::report::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// pq-outline CLI options.
#[derive(Debug, Parser)]
#[command(
    name = "pq-outline",
    version,
    about = "Outline Power Query let-expression ASTs with per-step references",
    args_conflicts_with_subcommands = true,
    subcommand_precedence_over_arg = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub outline: OutlineArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Outline AST files or directories.
    Outline(OutlineArgs),

    /// List the node kinds with a dedicated rendering.
    Kinds,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct OutlineArgs {
    /// AST JSON files/directories. Defaults to stdin when absent.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Output format. Overrides the config file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Spaces per nesting level. Overrides the config file.
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Path to a pq-outline.toml. Discovered from the first PATH when absent.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit with code 1 if any node kind was rendered as unhandled.
    #[arg(long)]
    pub deny_unhandled: bool,
}
