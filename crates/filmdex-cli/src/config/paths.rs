//! Where the config file lives.
//!
//! Lookup order: `--dir`, then `FILMDEX_CONFIG` (a file path), then
//! `$XDG_CONFIG_HOME/filmdex/config.toml`, then `~/.config/filmdex/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Environment variable naming the config file directly.
pub const CONFIG_ENV: &str = "FILMDEX_CONFIG";

/// File name inside a config directory.
const FILE_NAME: &str = "config.toml";

/// Sub-directory under the XDG or home config root.
const APP_DIR: &str = "filmdex";

/// Resolves the config file path from `--dir` and the process environment.
///
/// # Errors
///
/// Returns an error if no override is given and neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_with(dir, |key| std::env::var(key).ok())
}

/// Same as [`resolve_config_path`] with an injectable variable lookup.
/// Empty variables count as unset.
fn resolve_with(dir: Option<&PathBuf>, var: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

    if let Some(dir) = dir {
        return Ok(dir.join(FILE_NAME));
    }
    if let Some(file) = var(CONFIG_ENV) {
        return Ok(PathBuf::from(file));
    }
    let root = match (var("XDG_CONFIG_HOME"), var("HOME")) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => Path::new(&home).join(".config"),
        (None, None) => bail!("cannot locate config: set --dir, {CONFIG_ENV}, XDG_CONFIG_HOME or HOME"),
    };
    Ok(root.join(APP_DIR).join(FILE_NAME))
}
