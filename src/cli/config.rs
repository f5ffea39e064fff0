use nested_params::Settings;
use std::path::PathBuf;

use crate::cli::global::GlobalArgs;

/// Loads settings from `--config` if given, otherwise from the override chain.
pub fn load_settings(global: &GlobalArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
            Ok(Settings::load_from_file(&expanded)?)
        }
        None => Ok(Settings::load_with_overrides()?),
    }
}

/// Rejects inputs over `--max-size` unless `--force` is given.
pub fn check_size(
    len: usize,
    what: &str,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if global.max_size == 0 || len <= global.max_size {
        return Ok(());
    }
    if global.force {
        if !global.quiet {
            eprintln!(
                "Warning: Processing large {} ({} bytes, limit: {} bytes)",
                what, len, global.max_size
            );
        }
        return Ok(());
    }
    Err(format!(
        "{} size ({} bytes) exceeds limit ({} bytes). Use --force to process anyway.",
        what, len, global.max_size
    )
    .into())
}

/// Rejects parameter names nested deeper than `--max-depth`.
///
/// Unlike `--max-size` this is not lifted by `--force`; raise the limit instead.
pub fn check_depth(
    depth: usize,
    name: &str,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if global.max_depth == 0 || depth <= global.max_depth {
        return Ok(());
    }
    let mut shown: String = name.chars().take(40).collect();
    if shown.len() < name.len() {
        shown.push_str("...");
    }
    Err(format!(
        "parameter '{}' nests {} levels deep, limit is {}. Use --max-depth to raise it.",
        shown, depth, global.max_depth
    )
    .into())
}
