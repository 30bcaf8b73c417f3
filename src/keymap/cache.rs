//! Cache of compiled keymaps, keyed by table name
//!
//! Nothing here watches the configuration. Whoever changes it calls
//! [`KeymapCache::invalidate`] or [`KeymapCache::clear`].

use std::collections::HashMap;
use std::sync::Arc;

use super::config::{KeymapConfig, KeymapError};
use super::keymap::KeyMap;

#[derive(Debug, Default)]
pub struct KeymapCache {
    maps: HashMap<String, Arc<KeyMap>>,
}

impl KeymapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled map for `name`, compiling it from `config` on a miss.
    ///
    /// Failures are not cached; the next call tries again.
    pub fn get_or_build(
        &mut self,
        name: &str,
        config: &KeymapConfig,
    ) -> Result<Arc<KeyMap>, KeymapError> {
        self.get_or_insert_with(name, || config.keymap(name))
    }

    pub fn get_or_insert_with<F>(&mut self, name: &str, build: F) -> Result<Arc<KeyMap>, KeymapError>
    where
        F: FnOnce() -> Result<KeyMap, KeymapError>,
    {
        if let Some(map) = self.maps.get(name) {
            return Ok(Arc::clone(map));
        }
        let map = Arc::new(build()?);
        tracing::info!("Compiled keymap '{}' ({} bindings)", name, map.len());
        self.maps.insert(name.to_string(), Arc::clone(&map));
        Ok(map)
    }

    /// Install an already built map under `name`, replacing any cached one
    pub fn insert(&mut self, name: &str, map: KeyMap) -> Arc<KeyMap> {
        let map = Arc::new(map);
        self.maps.insert(name.to_string(), Arc::clone(&map));
        map
    }

    pub fn get(&self, name: &str) -> Option<Arc<KeyMap>> {
        self.maps.get(name).cloned()
    }

    /// Drop the compiled map for one table
    pub fn invalidate(&mut self, name: &str) {
        if self.maps.remove(name).is_some() {
            tracing::debug!("Invalidated keymap '{}'", name);
        }
    }

    /// Drop every compiled map
    pub fn clear(&mut self) {
        self.maps.clear();
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::config::parse_keymap_yaml;

    fn config() -> KeymapConfig {
        parse_keymap_yaml("maps: { nmaps: { bindings: { j: down, gg: top } } }").unwrap()
    }

    #[test]
    fn test_builds_once() {
        let mut cache = KeymapCache::new();
        let config = config();
        let first = cache.get_or_build("nmaps", &config).unwrap();
        let second = cache.get_or_build("nmaps", &config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut cache = KeymapCache::new();
        let mut config = config();
        let before = cache.get_or_build("nmaps", &config).unwrap();

        config.merge(parse_keymap_yaml("maps: { nmaps: { bindings: { k: up } } }").unwrap());
        assert_eq!(cache.get_or_build("nmaps", &config).unwrap().len(), 2);

        cache.invalidate("nmaps");
        let after = cache.get_or_build("nmaps", &config).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = KeymapCache::new();
        assert!(cache.get_or_build("imaps", &config()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut cache = KeymapCache::new();
        cache.get_or_build("nmaps", &config()).unwrap();
        let map = KeyMap::from_mapstrs([("x", "stop")]).unwrap();
        cache.insert("nmaps", map);
        assert_eq!(cache.get_or_build("nmaps", &config()).unwrap().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = KeymapCache::new();
        cache.get_or_build("nmaps", &config()).unwrap();
        cache.clear();
        assert!(cache.get("nmaps").is_none());
    }
}
