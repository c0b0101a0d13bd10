//! Filesystem locations for rolodex data and configuration.
//!
//! Follows the XDG base directory convention with the usual home-relative
//! fallbacks. Nothing here touches the filesystem; callers create directories
//! when they need them.

use std::path::PathBuf;

/// Returns the directory for rolodex runtime data.
///
/// `$XDG_DATA_HOME/rolodex` when the variable is set, otherwise
/// `~/.local/share/rolodex`. The trace export file lives here.
#[must_use]
pub fn data_dir() -> PathBuf {
    base_dir("XDG_DATA_HOME", ".local/share").join("rolodex")
}

/// Returns the directory for rolodex configuration.
///
/// `$XDG_CONFIG_HOME/rolodex` when the variable is set, otherwise
/// `~/.config/rolodex`. A `categories.toml` placed here is picked up when no
/// explicit category file is configured.
#[must_use]
pub fn config_dir() -> PathBuf {
    base_dir("XDG_CONFIG_HOME", ".config").join("rolodex")
}

fn base_dir(xdg_var: &str, home_suffix: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(xdg_var).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(home_suffix)
}
