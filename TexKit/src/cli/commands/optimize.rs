//! CLI command for shrinking oversized textures

use std::time::Instant;

use crate::cli::GlobalArgs;
use crate::cli::progress::{GEAR, LOOKING_GLASS, WARNING, format_size, update_bar};
use crate::optimize::{OptimizeOptions, optimize_library};

/// Re-encode every texture above the size ceiling
pub fn execute(args: &GlobalArgs, max_size_mb: Option<f64>) -> anyhow::Result<()> {
    let start = Instant::now();

    args.step(1, 2, LOOKING_GLASS, "Loading configuration...");
    let config = args.load_config()?;
    let layout = config.layout(&args.root);
    let options = match max_size_mb {
        Some(mb) => OptimizeOptions::with_max_size_mb(mb),
        None => OptimizeOptions::from(&config.optimize),
    };

    args.step(
        2,
        2,
        GEAR,
        &format!("Optimizing images over {}...", format_size(options.max_size_bytes)),
    );
    let pb = args.bar("Optimizing");
    let result = optimize_library(&layout.textures_dir, &options, &|p| update_bar(&pb, p));
    pb.finish_and_clear();
    let result = result?;

    println!();
    println!("Optimization complete:");
    println!("  Optimized: {}", result.success_count);
    println!("  Already small enough: {}", result.skip_count);
    println!("  Still too large: {}", result.warnings.len());
    println!("  Failed: {}", result.fail_count());

    for warning in &result.warnings {
        println!("{}{}: {}", WARNING, warning.path.display(), warning.message);
    }
    for failure in &result.failures {
        println!("  {}: {}", failure.path.display(), failure.message);
    }

    args.done(start.elapsed());
    Ok(())
}
