use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "DEWTRACK_DIR";

/// Files inside the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataDir { root: root.into() }
    }

    /// Resolve from the `--data-dir` flag and the environment.
    pub fn discover(flag: Option<&str>) -> Self {
        DataDir::new(resolve_data_dir(
            flag,
            std::env::var(DATA_DIR_ENV).ok().as_deref(),
            std::env::var("XDG_DATA_HOME").ok().as_deref(),
            &home_dir(),
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn progress_path(&self) -> PathBuf {
        self.root.join("progress.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("dewtrack.log")
    }
}

/// Precedence: flag, then `DEWTRACK_DIR`, then `$XDG_DATA_HOME/dewtrack`,
/// then `~/.local/share/dewtrack`. Empty values are ignored.
pub fn resolve_data_dir(
    flag: Option<&str>,
    env_dir: Option<&str>,
    xdg_data_home: Option<&str>,
    home: &Path,
) -> PathBuf {
    let non_empty = |s: Option<&str>| s.filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(dir) = non_empty(flag) {
        return dir;
    }
    if let Some(dir) = non_empty(env_dir) {
        return dir;
    }
    if let Some(xdg) = non_empty(xdg_data_home) {
        return xdg.join("dewtrack");
    }
    home.join(".local").join("share").join("dewtrack")
}

/// Get the user's home directory
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
