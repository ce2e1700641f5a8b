use std::fs;
use std::path::{Path, PathBuf};

use crate::io::kv::atomic_write;
use crate::model::config::{DELAY_MS_RANGE, TrackerConfig};

/// Error type for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    DocumentError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0} (known: {known})", known = KNOWN_KEYS.join(", "))]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Keys accepted by `set_value`
pub const KNOWN_KEYS: &[&str] = &[
    "click.delay_ms",
    "ui.default_category",
    "ui.show_key_hints",
    "ui.colors.<name>",
    "log.level",
];

/// Read config.toml. A missing file yields the defaults.
pub fn read_config(config_path: &Path) -> Result<TrackerConfig, ConfigError> {
    if !config_path.exists() {
        return Ok(TrackerConfig::default());
    }
    let text = fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Read config.toml as an editable document, preserving comments and layout.
pub fn read_config_doc(config_path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    if !config_path.exists() {
        return Ok(toml_edit::DocumentMut::new());
    }
    let text = fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    Ok(text.parse()?)
}

/// Write the document back, creating the data directory if needed.
pub fn write_config_doc(
    config_path: &Path,
    doc: &toml_edit::DocumentMut,
) -> Result<(), ConfigError> {
    let write_err = |e| ConfigError::WriteError {
        path: config_path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    atomic_write(config_path, doc.to_string().as_bytes()).map_err(write_err)
}

fn ensure_table<'a>(doc: &'a mut toml_edit::DocumentMut, name: &str) -> &'a mut toml_edit::Item {
    if !doc.contains_key(name) {
        doc[name] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    &mut doc[name]
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Set a dotted config key from a string value, typed by key.
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match key {
        "click.delay_ms" => {
            let ms: i64 = value
                .parse()
                .map_err(|_| invalid(key, "expected a whole number of milliseconds"))?;
            if !u64::try_from(ms).is_ok_and(|ms| DELAY_MS_RANGE.contains(&ms)) {
                return Err(invalid(
                    key,
                    format!(
                        "must be between {} and {}",
                        DELAY_MS_RANGE.start(),
                        DELAY_MS_RANGE.end()
                    ),
                ));
            }
            ensure_table(doc, "click")["delay_ms"] = toml_edit::value(ms);
        }
        "ui.default_category" => {
            ensure_table(doc, "ui")["default_category"] = toml_edit::value(value);
        }
        "ui.show_key_hints" => {
            let b: bool = value
                .parse()
                .map_err(|_| invalid(key, "expected true or false"))?;
            ensure_table(doc, "ui")["show_key_hints"] = toml_edit::value(b);
        }
        "log.level" => {
            ensure_table(doc, "log")["level"] = toml_edit::value(value);
        }
        _ => {
            let Some(color) = key.strip_prefix("ui.colors.") else {
                return Err(ConfigError::UnknownKey(key.to_string()));
            };
            if color.is_empty() {
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
            if !is_hex_color(value) {
                return Err(invalid(key, "expected a color like #44FF88"));
            }
            let ui = ensure_table(doc, "ui");
            if ui.get("colors").is_none() {
                ui["colors"] = toml_edit::Item::Table(toml_edit::Table::new());
            }
            ui["colors"][color] = toml_edit::value(value);
        }
    }
    Ok(())
}
