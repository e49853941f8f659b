use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::plans;

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Product cards per grid row
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// How long a tapped memo stays visible
    #[serde(default = "default_memo_hide_ms")]
    pub memo_hide_ms: u64,
    /// Max gap between two presses to count as a double tap
    #[serde(default = "default_double_tap_ms")]
    pub double_tap_ms: u64,
    /// Mouse hold time before a long press fires
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive, overridden by SHOPLIST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_grid_columns() -> usize {
    3
}

fn default_memo_hide_ms() -> u64 {
    2000
}

fn default_double_tap_ms() -> u64 {
    300
}

fn default_long_press_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { grid_columns: default_grid_columns() }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            memo_hide_ms: default_memo_hide_ms(),
            double_tap_ms: default_double_tap_ms(),
            long_press_ms: default_long_press_ms(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

// ── Config file ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Plan ids shown on the list screen, top to bottom
    #[serde(default = "plans::default_plans")]
    pub plans: Vec<String>,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            plans: plans::default_plans(),
            display: DisplayConfig::default(),
            gestures: GestureConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Load from the user config dir, or defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Write a starter config file (only if it doesn't exist).
    pub fn write_default_if_missing() -> Result<PathBuf> {
        let path = config_path();
        write_default_to(&path)?;
        Ok(path)
    }
}

fn write_default_to(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("Failed to write {}", path.display()))
}

// ── Resolved runtime config (file + CLI overrides) ────────────────────────────

pub const MAX_GRID_COLUMNS: usize = 6;

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub plans: Vec<String>,
    pub grid_columns: usize,
    pub memo_hide: Duration,
    pub double_tap: Duration,
    pub long_press: Duration,
    pub log_level: String,
}

impl ResolvedConfig {
    /// Priority: CLI args > env vars (handled by clap) > config file > built-in defaults
    pub fn resolve(file: &ConfigFile, columns_override: Option<usize>) -> Self {
        let plans = if file.plans.is_empty() {
            plans::default_plans()
        } else {
            file.plans.clone()
        };
        let columns = columns_override.unwrap_or(file.display.grid_columns);
        Self {
            plans,
            grid_columns: columns.clamp(1, MAX_GRID_COLUMNS),
            memo_hide: Duration::from_millis(file.gestures.memo_hide_ms),
            double_tap: Duration::from_millis(file.gestures.double_tap_ms),
            long_press: Duration::from_millis(file.gestures.long_press_ms),
            log_level: file.log.level.clone(),
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn config_path() -> PathBuf {
    dirs_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shoplist")
        .join("config.toml")
}

fn dirs_config_dir() -> Option<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config on Linux/macOS, %APPDATA% on Windows
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("APPDATA").ok().map(PathBuf::from))
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

// ── Default config template written by --init ─────────────────────────────────

const DEFAULT_CONFIG_TOML: &str = r#"# shoplist configuration
# Run `shoplist --init` to regenerate this file.

# Plans listed on the start screen, top to bottom
plans = ["2025-06-25", "2025-06-24", "2025-06-23"]

[display]
grid_columns = 3        # product cards per row (1-6)

[gestures]
memo_hide_ms  = 2000    # how long a tapped memo stays up
double_tap_ms = 300     # second press within this window = double tap (toggle done)
long_press_ms = 500     # mouse hold this long = long press (edit)

[log]
# Written to ~/.local/share/shoplist/shoplist.log; SHOPLIST_LOG overrides.
level = "info"
"#;
