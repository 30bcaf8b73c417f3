//! Configuration system tests
//!
//! Tests for config paths, layered keymap loading, inheritance and the
//! errors a broken keymap file produces.

use std::fs;

use keyseq::cli::load_config;
use keyseq::config_paths;
use keyseq::keymap::{
    default_config, load_keymap_file, load_layered_keymap, mapstr_to_keyseq, parse, parse_keymap_yaml,
    KeymapError,
};
use tempfile::TempDir;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_ends_with_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.ends_with("keyseq"), "got {}", dir.display());
}

#[test]
fn test_keymap_file_ends_with_yaml() {
    let path = config_paths::keymap_file().unwrap();
    assert!(path.to_string_lossy().ends_with("keymap.yaml"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&config));
}

// ========================================================================
// Layered Loading Tests
// ========================================================================

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_local_then_user_layers() {
    let dir = TempDir::new().unwrap();
    let local = write(&dir, "local.yaml", "maps: { nmaps: { bindings: { j: scrollline 5, k: scrollline -5 } } }");
    let user = write(&dir, "user.yaml", "maps: { nmaps: { bindings: { j: scrollline 1 } } }");

    let config = load_layered_keymap(&local, Some(&user));
    let table = config.table("nmaps").unwrap();
    assert_eq!(table["j"], "scrollline 1");
    assert_eq!(table["k"], "scrollline -5");
    assert_eq!(table["gg"], "scrollto 0");
}

#[test]
fn test_null_unbinds_default() {
    let dir = TempDir::new().unwrap();
    let user = write(&dir, "user.yaml", "maps:\n  nmaps:\n    bindings:\n      d: null\n      x: \"\"\n");

    let config = load_layered_keymap(&dir.path().join("missing.yaml"), Some(&user));
    let keymap = config.keymap("nmaps").unwrap();
    assert!(parse(&mapstr_to_keyseq("d"), &keymap).resolved().is_none());
    assert!(parse(&mapstr_to_keyseq("x"), &keymap).resolved().is_none());
    assert_eq!(parse(&mapstr_to_keyseq("j"), &keymap).exstr(), Some("scrollline 10"));
}

#[test]
fn test_unbinding_allows_longer_sequence() {
    let dir = TempDir::new().unwrap();
    let user = write(&dir, "user.yaml", "maps: { nmaps: { bindings: { d: null, dd: tabclose } } }");

    let config = load_layered_keymap(&dir.path().join("missing.yaml"), Some(&user));
    let keymap = config.keymap("nmaps").unwrap();
    assert_eq!(parse(&mapstr_to_keyseq("dd"), &keymap).exstr(), Some("tabclose"));
}

#[test]
fn test_broken_layer_is_skipped() {
    let dir = TempDir::new().unwrap();
    let local = write(&dir, "local.yaml", "maps: [this is not a table");
    let user = write(&dir, "user.yaml", "hintchars: asdf");

    let config = load_layered_keymap(&local, Some(&user));
    assert_eq!(config.hint_chars(), "asdf");
    assert_eq!(config.maps, default_config().maps);
}

#[test]
fn test_cli_config_overlays_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "keymap.yaml", "maps: { findmaps: { bindings: { \"<C-j>\": null } } }");
    let config = load_config(Some(&path)).unwrap();
    assert!(!config.table("findmaps").unwrap().contains_key("<C-j>"));
    assert!(config.table("nmaps").is_ok());
}

#[test]
fn test_cli_config_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(load_config(Some(&dir.path().join("nope.yaml"))).is_err());
}

// ========================================================================
// Error Tests
// ========================================================================

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_keymap_file(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, KeymapError::Io(_)));
}

#[test]
fn test_bad_yaml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.yaml", "hintnames: sometimes");
    let err = load_keymap_file(&path).unwrap_err();
    assert!(matches!(err, KeymapError::Parse(_)));
}

#[test]
fn test_inheritance_cycle() {
    let config = parse_keymap_yaml(
        "maps: { a: { inherits: b, bindings: { x: y } }, b: { inherits: a, bindings: { z: w } } }",
    )
    .unwrap();
    let err = config.keymap("a").unwrap_err();
    assert_eq!(err.to_string(), "Inheritance cycle: a -> b -> a");
}

#[test]
fn test_unknown_parent() {
    let config = parse_keymap_yaml("maps: { a: { inherits: nothing, bindings: { x: y } } }").unwrap();
    assert!(matches!(
        config.keymap("a"),
        Err(KeymapError::UnknownParent { ref parent, .. }) if parent == "nothing"
    ));
}

#[test]
fn test_child_shadows_inherited_prefix() {
    let config = parse_keymap_yaml(
        "maps: { nmaps: { bindings: { yy: yank, j: down } }, vmaps: { inherits: nmaps, bindings: { y: yankselection } } }",
    )
    .unwrap();
    let keymap = config.keymap("vmaps").unwrap();
    assert_eq!(keymap.len(), 2);
    assert_eq!(parse(&mapstr_to_keyseq("y"), &keymap).exstr(), Some("yankselection"));
    assert_eq!(parse(&mapstr_to_keyseq("j"), &keymap).exstr(), Some("down"));
}
