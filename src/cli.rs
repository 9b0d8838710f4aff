//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and shared types.
//! Individual command definitions are in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Command;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate GraphQL type YAML from ORM entity metadata", long_about = None)]
pub struct Args {
    /// Path to the configuration file (defaults to ./.graphql_typegen.json when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for the run summary
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}
