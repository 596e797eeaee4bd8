//! Per-instance tag state.

use codetags_config::EnvLoader;
use std::collections::HashMap;
use tracing::trace;

/// Declared tags plus the environment-sourced include/exclude lists.
///
/// Activation follows a fixed precedence: excluded tags are off, declared
/// tags are on, anything else is on only when included. Results are
/// memoized until [`TagStore::clear_cache`].
#[derive(Debug, Default)]
pub struct TagStore {
    declared: Vec<String>,
    included: Option<Vec<String>>,
    excluded: Option<Vec<String>>,
    cached: HashMap<String, bool>,
    env: HashMap<String, Vec<String>>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a tag. Returns `false` when it was already declared.
    pub fn declare(&mut self, tag: &str) -> bool {
        if self.is_declared(tag) {
            return false;
        }
        self.declared.push(tag.to_string());
        self.cached.remove(tag);
        true
    }

    pub fn is_declared(&self, tag: &str) -> bool {
        self.declared.iter().any(|t| t == tag)
    }

    /// Load the include/exclude lists unless this cache epoch already has them.
    pub fn refresh_env(&mut self, loader: &EnvLoader, positive_label: &str, negative_label: &str) {
        if self.included.is_none() {
            let tags = self.env_list(loader, positive_label);
            self.included = Some(tags);
        }
        if self.excluded.is_none() {
            let tags = self.env_list(loader, negative_label);
            self.excluded = Some(tags);
        }
    }

    fn env_list(&mut self, loader: &EnvLoader, label: &str) -> Vec<String> {
        self.env
            .entry(loader.var_name(label))
            .or_insert_with(|| loader.load_list(label))
            .clone()
    }

    /// Whether a single tag is active.
    ///
    /// Lists that have not been loaded yet count as empty, and results are
    /// only memoized once both lists are loaded.
    pub fn check_label_activated(&mut self, tag: &str) -> bool {
        if let Some(&active) = self.cached.get(tag) {
            return active;
        }

        let contains = |list: &Option<Vec<String>>| {
            list.as_ref()
                .is_some_and(|tags| tags.iter().any(|t| t == tag))
        };

        let active = if contains(&self.excluded) {
            false
        } else if self.is_declared(tag) {
            true
        } else {
            contains(&self.included)
        };

        if self.included.is_some() && self.excluded.is_some() {
            trace!(tag, active, "Memoized tag activation");
            self.cached.insert(tag.to_string(), active);
        }
        active
    }

    /// Drop the environment lists, raw env reads and memoized results.
    pub fn clear_cache(&mut self) {
        self.included = None;
        self.excluded = None;
        self.cached.clear();
        self.env.clear();
    }

    /// Clear the cache and every declared tag.
    pub fn clear(&mut self) {
        self.clear_cache();
        self.declared.clear();
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub fn included(&self) -> Option<&[String]> {
        self.included.as_deref()
    }

    pub fn excluded(&self) -> Option<&[String]> {
        self.excluded.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetags_config::{EnvSource, MapEnv};
    use std::sync::Arc;

    fn loaded_store(positive: &str, negative: &str) -> TagStore {
        let env = MapEnv::new()
            .with_var("CODETAGS_POSITIVE_TAGS", positive)
            .with_var("CODETAGS_NEGATIVE_TAGS", negative);
        let loader = EnvLoader::new(Arc::new(env), Some("CODETAGS".to_string()));

        let mut store = TagStore::new();
        store.refresh_env(&loader, "POSITIVE_TAGS", "NEGATIVE_TAGS");
        store
    }

    #[test]
    fn test_declare_deduplicates_in_order() {
        let mut store = TagStore::new();
        assert!(store.declare("b"));
        assert!(store.declare("a"));
        assert!(!store.declare("b"));

        assert_eq!(store.declared(), ["b", "a"]);
    }

    #[test]
    fn test_precedence() {
        let mut store = loaded_store("abc, both, tag-4", "disabled, both, tag-2");
        store.declare("tag-1");
        store.declare("tag-2");

        assert!(store.check_label_activated("abc"));
        assert!(store.check_label_activated("tag-1"));
        assert!(store.check_label_activated("tag-4"));
        assert!(!store.check_label_activated("tag-2"));
        assert!(!store.check_label_activated("both"));
        assert!(!store.check_label_activated("disabled"));
        assert!(!store.check_label_activated("nil"));
    }

    #[test]
    fn test_refresh_env_reads_once_per_epoch() {
        #[derive(Debug)]
        struct CountingEnv(std::sync::atomic::AtomicUsize);

        impl EnvSource for CountingEnv {
            fn var(&self, _key: &str) -> Option<String> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Some("abc".to_string())
            }
        }

        let env = Arc::new(CountingEnv(Default::default()));
        let loader = EnvLoader::new(env.clone(), Some("CODETAGS".to_string()));
        let mut store = TagStore::new();

        store.refresh_env(&loader, "POSITIVE_TAGS", "NEGATIVE_TAGS");
        store.refresh_env(&loader, "POSITIVE_TAGS", "NEGATIVE_TAGS");
        assert_eq!(env.0.load(std::sync::atomic::Ordering::SeqCst), 2);

        store.clear_cache();
        assert!(store.included().is_none());
        store.refresh_env(&loader, "POSITIVE_TAGS", "NEGATIVE_TAGS");
        assert_eq!(env.0.load(std::sync::atomic::Ordering::SeqCst), 4);
    }

    #[test]
    fn test_same_label_shares_env_read() {
        let env = MapEnv::new().with_var("APP_TAGS", "x");
        let loader = EnvLoader::new(Arc::new(env), Some("APP".to_string()));
        let mut store = TagStore::new();

        store.refresh_env(&loader, "TAGS", "TAGS");
        assert_eq!(store.included(), Some(&["x".to_string()][..]));
        assert_eq!(store.excluded(), Some(&["x".to_string()][..]));
        assert!(!store.check_label_activated("x"));
    }

    #[test]
    fn test_memoized_until_cleared() {
        let mut store = loaded_store("abc", "");
        assert!(!store.check_label_activated("late"));

        store.declare("late");
        assert!(store.check_label_activated("late"));

        store.clear_cache();
        assert!(store.included().is_none());
        assert!(store.excluded().is_none());
        assert!(store.check_label_activated("late"));
        assert!(!store.check_label_activated("abc"));
    }

    #[test]
    fn test_clear_removes_declared() {
        let mut store = loaded_store("", "");
        store.declare("tag-1");
        store.clear();

        assert!(store.declared().is_empty());
        assert!(!store.check_label_activated("tag-1"));
    }
}
