use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use shared::config::Config;

/// Writes the default configuration as `config.yaml` or `config.json` in `dir`.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str, dir: &Path) -> Result<()> {
    let file_name = match format {
        "yaml" => "config.yaml",
        "json" => "config.json",
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    };

    let serialized = Config::with_defaults().render(format)?;
    let target = dir.join(file_name);
    fs::write(&target, serialized)
        .with_context(|| format!("failed to write {}", target.display()))?;

    println!(
        "Configuration file '{}' generated successfully.",
        target.display()
    );
    Ok(())
}
