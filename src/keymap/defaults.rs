//! Default keymap and layered loading
//!
//! The default tables ship embedded in the binary. Project-local and user
//! files are layered on top, per table and per binding.

use std::path::Path;

use super::config::{load_keymap_file, parse_keymap_yaml, KeymapConfig};

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Get the embedded default keymap YAML
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// The embedded defaults alone
pub fn default_config() -> KeymapConfig {
    match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to parse embedded keymap: {}", e);
            KeymapConfig::default()
        }
    }
}

/// Load and merge keymaps: defaults + overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/keyseq/keymap.yaml
pub fn load_default_keymap() -> KeymapConfig {
    let user = crate::config_paths::keymap_file();
    load_layered_keymap(&crate::config_paths::local_keymap_file(), user.as_deref())
}

/// [`load_default_keymap`] with explicit override paths
pub fn load_layered_keymap(local: &Path, user: Option<&Path>) -> KeymapConfig {
    let mut config = default_config();
    tracing::info!(
        "Loaded embedded default keymap ({} tables)",
        config.maps.len()
    );

    for path in std::iter::once(local).chain(user) {
        if !path.exists() {
            continue;
        }
        match load_keymap_file(path) {
            Ok(overlay) => {
                tracing::info!(
                    "Merging keymap from {} ({} tables)",
                    path.display(),
                    overlay.maps.len()
                );
                config.merge(overlay);
            }
            Err(e) => {
                tracing::warn!("Failed to load keymap from {}: {}", path.display(), e);
            }
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_override_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_layered_keymap(&dir.path().join("nope.yaml"), None);
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_layers_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.yaml");
        let user = dir.path().join("user.yaml");
        std::fs::write(&local, "maps: { nmaps: { bindings: { j: local-down, Q: quit } } }").unwrap();
        std::fs::write(&user, "maps: { nmaps: { bindings: { j: user-down } } }").unwrap();

        let config = load_layered_keymap(&local, Some(&user));
        let table = config.table("nmaps").unwrap();
        assert_eq!(table.get("j").map(String::as_str), Some("user-down"));
        assert_eq!(table.get("Q").map(String::as_str), Some("quit"));
        assert_eq!(table.get("gg").map(String::as_str), Some("scrollto 0"));
    }

    #[test]
    fn test_broken_override_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.yaml");
        std::fs::write(&local, "maps: [").unwrap();
        let config = load_layered_keymap(&local, None);
        assert_eq!(config, default_config());
    }
}
