//! CLI command for showing the effective configuration

use crate::cli::GlobalArgs;
use crate::config::CONFIG_FILE_NAME;

/// Print the configuration in effect for the library
pub fn execute(args: &GlobalArgs) -> anyhow::Result<()> {
    let config = args.load_config()?;

    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => {
            let default = args.root.join(CONFIG_FILE_NAME);
            if default.is_file() {
                default.display().to_string()
            } else {
                "built-in defaults".to_string()
            }
        }
    };
    println!("# Effective configuration ({source})");
    print!("{}", config.to_toml_string()?);
    Ok(())
}
