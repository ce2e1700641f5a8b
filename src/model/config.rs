use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub click: ClickConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Accepted double-click window, in milliseconds
pub const DELAY_MS_RANGE: RangeInclusive<u64> = 1..=5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickConfig {
    /// Double-click window in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl ClickConfig {
    /// The window, clamped to `DELAY_MS_RANGE`. A zero window would make
    /// double clicks impossible.
    pub fn delay(&self) -> Duration {
        let ms = self
            .delay_ms
            .clamp(*DELAY_MS_RANGE.start(), *DELAY_MS_RANGE.end());
        Duration::from_millis(ms)
    }
}

impl Default for ClickConfig {
    fn default() -> Self {
        ClickConfig {
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_delay_ms() -> u64 {
    250
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Category shown when the TUI starts
    #[serde(default)]
    pub default_category: Option<String>,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Color overrides, e.g. green = "#44FF88"
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_category: None,
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive, e.g. "info" or "dewtrack=debug"
    #[serde(default)]
    pub level: Option<String>,
}
