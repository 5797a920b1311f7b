use clap::Subcommand;
use std::path::PathBuf;

pub mod catalog;
pub mod config;
pub mod execute;
pub mod optimize;
pub mod rename;
pub mod thumbnails;

#[derive(Subcommand)]
pub enum Commands {
    /// Add new textures to the metadata catalog
    Catalog {
        /// Report what would be added without writing the catalog
        #[arg(long)]
        dry_run: bool,

        /// CDN base URL (overrides the config file)
        #[arg(long = "cdn-base", value_name = "URL")]
        cdn_base: Option<String>,

        /// Catalog file to update (default: <root>/texture_metadata.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate JPEG thumbnails for every texture
    Thumbnails {
        /// Thumbnail width in pixels
        #[arg(long, value_name = "N")]
        width: Option<u32>,

        /// JPEG quality (1-100)
        #[arg(long, value_name = "Q", value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Keep thumbnails that are newer than their source image
        #[arg(long)]
        skip_existing: bool,
    },

    /// Re-encode textures larger than the size ceiling
    Optimize {
        /// Size ceiling in megabytes
        #[arg(long, value_name = "N")]
        max_size_mb: Option<f64>,
    },

    /// Rename texture files and folders to URL-safe names
    Rename {
        /// Print the planned renames without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective configuration
    Config,
}
