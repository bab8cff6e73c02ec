use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$LARDER_HOME`, else `~/.larder`.
pub fn larder_home() -> Result<PathBuf> {
    larder_home_from(|k| std::env::var(k).ok())
}

pub fn larder_home_from(lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(dir) = lookup("LARDER_HOME").filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = lookup("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".larder"))
}

pub fn ensure_larder_home() -> Result<PathBuf> {
    let dir = larder_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn cache_dir() -> Result<PathBuf> {
    Ok(ensure_larder_home()?.join("cache"))
}
