//! CLI command for URL-safe renaming

use std::path::Path;
use std::time::Instant;

use crate::cli::GlobalArgs;
use crate::cli::progress::{LOOKING_GLASS, PENCIL, WARNING, update_bar};
use crate::naming::{apply_renames, plan_renames};

/// Rename texture files and folders so their names need no escaping
pub fn execute(args: &GlobalArgs, dry_run: bool) -> anyhow::Result<()> {
    let start = Instant::now();

    args.step(1, 2, LOOKING_GLASS, "Planning renames...");
    let config = args.load_config()?;
    let layout = config.layout(&args.root);
    let plan = plan_renames(&layout.textures_dir, &config.rename.replacements)?;

    if plan.is_empty() {
        println!("Nothing to rename");
        return Ok(());
    }

    if dry_run {
        for rename in &plan.renames {
            println!(
                "  {} -> {}",
                display_relative(&rename.from, &args.root),
                display_relative(&rename.to, &args.root)
            );
        }
        let conflicts = plan.conflicts();
        for conflict in &conflicts {
            println!("{}conflict: {}", WARNING, conflict.display());
        }
        println!();
        println!("Dry run: {} renames planned, nothing changed", plan.renames.len());
        return Ok(());
    }

    args.step(2, 2, PENCIL, "Renaming...");
    let pb = args.bar("Renaming");
    let renamed = apply_renames(&plan, &|p| update_bar(&pb, p));
    pb.finish_and_clear();
    let renamed = renamed?;

    println!("Renamed {renamed} entries");
    args.done(start.elapsed());
    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
