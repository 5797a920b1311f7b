//! CLI command for updating the metadata catalog

use std::path::Path;
use std::time::Instant;

use crate::catalog::{CatalogOptions, LoadOutcome, update_catalog};
use crate::cdn::CdnPathBuilder;
use crate::cli::GlobalArgs;
use crate::cli::progress::{DISK, DOCUMENT, LOOKING_GLASS, WARNING, update_spinner};

/// Scan the texture folders and add uncatalogued images
pub fn execute(
    args: &GlobalArgs,
    dry_run: bool,
    cdn_base: Option<&str>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let start = Instant::now();

    args.step(1, 2, LOOKING_GLASS, "Loading configuration...");
    let config = args.load_config()?;
    let mut layout = config.layout(&args.root);
    if let Some(output) = output {
        layout.catalog_path = output.to_path_buf();
    }
    let options = CatalogOptions {
        cdn: cdn_base.map_or_else(|| config.cdn(), CdnPathBuilder::new),
        overrides: config.overrides(&args.root)?,
        dry_run,
    };

    args.step(2, 2, DISK, "Updating catalog...");
    let pb = args.spinner("Scanning");
    let report = update_catalog(&layout, &options, &|p| update_spinner(&pb, p));
    pb.finish_and_clear();
    let report = report?;

    if let LoadOutcome::Recovered(reason) = &report.load_outcome {
        println!(
            "{}{} was unreadable ({reason}); rebuilt from scratch",
            WARNING,
            layout.catalog_path.display()
        );
    }

    let stats = &report.stats;
    println!();
    println!("Categories: {} ({} new)", stats.categories_seen, stats.categories_created);
    println!(
        "Textures:   {} added, {} already catalogued, {} total",
        stats.textures_added,
        stats.textures_existing,
        report.catalog.texture_count()
    );

    if !stats.failures.is_empty() {
        println!();
        println!("Skipped:");
        for failure in &stats.failures {
            println!("  {}: {}", failure.path.display(), failure.message);
        }
    }

    if report.written {
        println!("{}Wrote {}", DOCUMENT, layout.catalog_path.display());
    } else {
        println!("Dry run: {} not written", layout.catalog_path.display());
    }

    args.done(start.elapsed());
    Ok(())
}
