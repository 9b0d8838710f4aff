mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

/// Default metadata dump location, relative to the working directory.
pub const DEFAULT_METADATA_PATH: &str = "var/graphql_typegen/metadata.json";

/// Generate GraphQL object types from entity metadata
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  graphql_typegen types                              # Write to config/graphql/types/entity
  graphql_typegen types config/graphql/types/orm     # Custom types path
  graphql_typegen types -m var/metadata.yaml -n      # YAML dump, no questions asked
  graphql_typegen -o json types --skip-unsupported   # JSON summary, drop unmapped fields")]
pub struct TypesCmd {
    /// Path to types, relative to the project root [default: config/graphql/types/entity]
    pub types_path: Option<PathBuf>,

    /// Metadata dump (JSON or YAML) describing the mapped entities
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Do not ask any question; generate every entity and overwrite existing files
    #[arg(short = 'n', long, default_value_t = false)]
    pub no_interaction: bool,

    /// Leave out fields whose type has no GraphQL mapping instead of writing `type: null`
    #[arg(long, default_value_t = false)]
    pub skip_unsupported: bool,
}
