//! Command execution implementations

use super::Commands;
use super::{catalog, config, optimize, rename, thumbnails};
use crate::cli::GlobalArgs;

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, args: &GlobalArgs) -> anyhow::Result<()> {
        match self {
            Commands::Catalog {
                dry_run,
                cdn_base,
                output,
            } => catalog::execute(args, *dry_run, cdn_base.as_deref(), output.as_deref()),
            Commands::Thumbnails {
                width,
                quality,
                skip_existing,
            } => thumbnails::execute(args, *width, *quality, *skip_existing),
            Commands::Optimize { max_size_mb } => optimize::execute(args, *max_size_mb),
            Commands::Rename { dry_run } => rename::execute(args, *dry_run),
            Commands::Config => config::execute(args),
        }
    }
}
