//! CLI command for generating thumbnails

use std::time::Instant;

use crate::cli::GlobalArgs;
use crate::cli::progress::{LOOKING_GLASS, PICTURE, update_bar};
use crate::thumbnails::{ThumbnailOptions, generate_thumbnails};

/// Generate thumbnails for every texture in the library
pub fn execute(
    args: &GlobalArgs,
    width: Option<u32>,
    quality: Option<u8>,
    skip_existing: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();

    args.step(1, 2, LOOKING_GLASS, "Loading configuration...");
    let config = args.load_config()?;
    let layout = config.layout(&args.root);

    let mut options = ThumbnailOptions::from(&config.thumbnails);
    options.width = width.unwrap_or(options.width);
    options.quality = quality.unwrap_or(options.quality);
    options.skip_existing = skip_existing;

    args.step(
        2,
        2,
        PICTURE,
        &format!("Creating {}px thumbnails (quality {})...", options.width, options.quality),
    );
    let pb = args.bar("Thumbnails");
    let result = generate_thumbnails(&layout, &options, &|p| update_bar(&pb, p));
    pb.finish_and_clear();
    let result = result?;

    println!();
    println!("Thumbnails complete:");
    println!("  Written: {}", result.success_count);
    if skip_existing {
        println!("  Up to date: {}", result.skip_count);
    }
    println!("  Failed: {}", result.fail_count());

    if result.fail_count() > 0 {
        println!();
        println!("Failures:");
        for failure in &result.failures {
            println!("  {}: {}", failure.path.display(), failure.message);
        }
    }

    args.done(start.elapsed());
    Ok(())
}
