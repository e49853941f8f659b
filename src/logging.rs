/// File logging via `tracing`.
///
/// The TUI owns stdout/stderr, so log lines go to
/// `$XDG_DATA_HOME/shoplist/shoplist.log` (or `~/.local/share/...`).
/// `SHOPLIST_LOG` takes precedence over the configured level.
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SHOPLIST_LOG";

pub fn log_path() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".local/share")
        });
    base.join("shoplist").join("shoplist.log")
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| level_filter(default_level))
}

/// The configured level, or `info` when it doesn't parse.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`.
pub fn init_at(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

/// Best effort: if the log file can't be opened the app still runs, unlogged.
pub fn init(default_level: &str) -> Option<PathBuf> {
    let path = log_path();
    match init_at(&path, default_level) {
        Ok(()) => Some(path),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_uses_configured_level() {
        assert_eq!(level_filter("debug").to_string(), "debug");
        assert_eq!(level_filter("shoplist=trace").to_string(), "shoplist=trace");
    }

    #[test]
    fn test_level_filter_falls_back_to_info() {
        assert_eq!(level_filter("shoplist=loud").to_string(), "info");
    }

    #[test]
    fn test_log_path_ends_with_app_file() {
        let p = log_path();
        assert!(p.ends_with("shoplist/shoplist.log"));
    }
}
