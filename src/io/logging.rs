use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `DEWTRACK_LOG=debug`
pub const LOG_ENV: &str = "DEWTRACK_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter: env var, then the config's `[log] level`, then `warn`.
pub fn build_filter(env_value: Option<&str>, config_level: Option<&str>) -> EnvFilter {
    [env_value, config_level]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

/// Send logs to a file. The TUI owns the terminal, so nothing is written
/// to stdout or stderr.
pub fn init_file_logging(log_path: &Path, config_level: Option<&str>) -> std::io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env_value.as_deref(), config_level);

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_beats_config() {
        let f = build_filter(Some("debug"), Some("error"));
        assert_eq!(f.to_string(), "debug");
    }

    #[test]
    fn config_used_when_env_missing_or_invalid() {
        assert_eq!(build_filter(None, Some("info")).to_string(), "info");
        assert_eq!(build_filter(Some("dewtrack=loud"), Some("info")).to_string(), "info");
    }

    #[test]
    fn default_is_warn() {
        assert_eq!(build_filter(None, None).to_string(), "warn");
        assert_eq!(build_filter(Some("  "), None).to_string(), "warn");
    }
}
