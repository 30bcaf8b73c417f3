//! Where keyseq looks for keymaps and writes logs
//!
//! Per-user files live under:
//! - Unix/macOS: `$XDG_CONFIG_HOME/keyseq/` or `~/.config/keyseq/`
//! - Windows: `%APPDATA%\keyseq\`
//!
//! A `keymap.yaml` in the working directory is layered between the built-in
//! tables and the user file.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "keyseq";
const KEYMAP_FILE_NAME: &str = "keymap.yaml";

/// Base name of the rotating log file; rotation appends `.YYYY-MM-DD`
pub const LOG_FILE_NAME: &str = "keyseq.log";

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let base = match env::var_os("XDG_CONFIG_HOME") {
            Some(xdg) if !xdg.is_empty() => Some(PathBuf::from(xdg)),
            _ => dirs::home_dir().map(|home| home.join(".config")),
        };
        base.map(|base| base.join(APP_DIR))
    }
}

/// The user keymap, `<config dir>/keymap.yaml`
pub fn keymap_file() -> Option<PathBuf> {
    Some(config_dir()?.join(KEYMAP_FILE_NAME))
}

/// The project-local keymap, `./keymap.yaml`
pub fn local_keymap_file() -> PathBuf {
    PathBuf::from(KEYMAP_FILE_NAME)
}

pub fn logs_dir() -> Option<PathBuf> {
    Some(config_dir()?.join("logs"))
}

/// The newest rotated log file, or where the first one will be written
pub fn log_file() -> Option<PathBuf> {
    let logs_dir = logs_dir()?;
    let newest = fs::read_dir(&logs_dir).ok().and_then(|entries| {
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_log_file(path))
            // date suffixes sort lexically
            .max()
    });
    Some(newest.unwrap_or_else(|| logs_dir.join(LOG_FILE_NAME)))
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_FILE_NAME))
}

fn no_config_dir() -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        "no config directory (HOME and XDG_CONFIG_HOME are unset)",
    )
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir().ok_or_else(no_config_dir)?;
    fs::create_dir_all(&logs)?;
    Ok(logs)
}
