//! A single evaluator instance.

use crate::descriptor::TagDescriptor;
use crate::error::CodetagsResult;
use crate::expr::Expr;
use crate::store::TagStore;
use codetags_config::{EnvLoader, EnvSource, Presets, ProcessEnv, load_presets};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Feature tag evaluator
///
/// Combines declared tags, the include/exclude lists read from
/// `<NAMESPACE>_<POSITIVE_TAGS>` and `<NAMESPACE>_<NEGATIVE_TAGS>`, and tag
/// expressions.
///
/// # Examples
///
/// ```
/// use codetags_features::{Codetags, Expr};
/// use codetags_config::MapEnv;
/// use std::sync::Arc;
///
/// let env = MapEnv::new()
///     .with_var("CODETAGS_POSITIVE_TAGS", "abc, def")
///     .with_var("CODETAGS_NEGATIVE_TAGS", "disabled");
/// let mut codetags = Codetags::with_env(Arc::new(env));
///
/// assert!(codetags.is_active(["abc"]));
/// assert!(codetags.is_active(["disabled", "abc"]));
/// assert!(!codetags.is_active([vec!["abc", "nil"]]));
/// assert!(codetags.is_active([Expr::not("disabled")]));
/// ```
#[derive(Debug)]
pub struct Codetags {
    presets: Presets,
    store: TagStore,
    env: Arc<dyn EnvSource>,
}

impl Codetags {
    /// Create an instance reading the process environment
    pub fn new() -> Self {
        Self::with_env(Arc::new(ProcessEnv))
    }

    /// Create an instance reading from the given environment source
    pub fn with_env(env: Arc<dyn EnvSource>) -> Self {
        Self {
            presets: Presets::default(),
            store: TagStore::new(),
            env,
        }
    }

    /// Apply presets, keeping any field `presets` leaves unset.
    ///
    /// A namespace or label change takes effect after [`Codetags::clear_cache`].
    pub fn initialize(&mut self, presets: Presets) -> &mut Self {
        self.presets.merge(presets);
        self
    }

    /// Apply presets from a loosely-typed configuration object.
    pub fn initialize_value(&mut self, config: &Value) -> &mut Self {
        self.initialize(Presets::from_value(config))
    }

    /// Apply presets from a JSON, TOML or `.env` file.
    pub fn initialize_from_file(&mut self, path: impl AsRef<Path>) -> CodetagsResult<&mut Self> {
        let presets = load_presets(path)?;
        Ok(self.initialize(presets))
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    /// Whether any of the expressions holds.
    ///
    /// Each item is one alternative; an empty input is never active. Use a
    /// `Vec` item to require several tags at once.
    pub fn is_active<I, E>(&mut self, exprs: I) -> bool
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.refresh_env();
        let store = &mut self.store;
        exprs.into_iter().any(|expr| {
            let expr: Expr = expr.into();
            expr.evaluate(&mut |tag: &str| store.check_label_activated(tag))
        })
    }

    /// Alias of [`Codetags::is_active`].
    pub fn is_enabled<I, E>(&mut self, exprs: I) -> bool
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.is_active(exprs)
    }

    /// Declare the tags of the given descriptors.
    ///
    /// Rollout plans are evaluated against the current `version` preset.
    pub fn register<I, D>(&mut self, descriptors: I) -> &mut Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TagDescriptor>,
    {
        let version = self.presets.version();
        for descriptor in descriptors {
            let descriptor: TagDescriptor = descriptor.into();
            let declared = descriptor.is_declared(version);
            trace!(tag = descriptor.tag(), declared, "Registered tag descriptor");
            if declared {
                self.store.declare(descriptor.tag());
            }
        }
        self
    }

    /// Register loosely-typed descriptors.
    ///
    /// Does nothing unless `descriptors` is an array. Entries without a usable
    /// tag are skipped.
    pub fn register_values(&mut self, descriptors: &Value) -> &mut Self {
        if let Some(items) = descriptors.as_array() {
            self.register(items.iter().filter_map(TagDescriptor::from_value));
        }
        self
    }

    /// Forget environment reads and memoized results
    pub fn clear_cache(&mut self) -> &mut Self {
        debug!(namespace = self.presets.namespace(), "Clearing tag cache");
        self.store.clear_cache();
        self
    }

    /// Return to the just-constructed state
    pub fn reset(&mut self) -> &mut Self {
        debug!(namespace = self.presets.namespace(), "Resetting codetags instance");
        self.store.clear();
        self.presets = Presets::default();
        self
    }

    pub fn declared_tags(&self) -> Vec<String> {
        self.store.declared().to_vec()
    }

    /// Include list of the current cache epoch, `None` before the first query
    pub fn included_tags(&self) -> Option<Vec<String>> {
        self.store.included().map(<[String]>::to_vec)
    }

    /// Exclude list of the current cache epoch, `None` before the first query
    pub fn excluded_tags(&self) -> Option<Vec<String>> {
        self.store.excluded().map(<[String]>::to_vec)
    }

    fn refresh_env(&mut self) {
        let loader = EnvLoader::new(
            self.env.clone(),
            Some(self.presets.namespace().to_string()),
        );
        self.store.refresh_env(
            &loader,
            self.presets.positive_tags_label(),
            self.presets.negative_tags_label(),
        );
    }
}

impl Default for Codetags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RolloutPlan;
    use codetags_config::MapEnv;
    use serde_json::json;

    fn codetags(positive: &str, negative: &str) -> Codetags {
        let env = MapEnv::new()
            .with_var("CODETAGS_POSITIVE_TAGS", positive)
            .with_var("CODETAGS_NEGATIVE_TAGS", negative);
        Codetags::with_env(Arc::new(env))
    }

    #[test]
    fn test_or_across_arguments() {
        let mut codetags = codetags("abc, def, xyz", "disabled");

        assert!(codetags.is_active(["abc"]));
        assert!(codetags.is_active(["abc", "xyz"]));
        assert!(codetags.is_active(["abc", "disabled"]));
        assert!(codetags.is_active(["disabled", "abc"]));
        assert!(codetags.is_active(["undefined", "abc", "nil"]));
        assert!(!codetags.is_active(Vec::<&str>::new()));
        assert!(!codetags.is_active(["disabled"]));
        assert!(!codetags.is_active(["nil", "disabled", "abc.xyz"]));
    }

    #[test]
    fn test_and_within_array() {
        let mut codetags = codetags("abc, def, xyz", "disabled");

        assert!(codetags.is_active([json!(["abc", "xyz"]), json!("nil")]));
        assert!(codetags.is_active([json!(["abc", "xyz"]), json!(null)]));
        assert!(!codetags.is_active([vec!["abc", "nil"]]));
        assert!(!codetags.is_active([vec!["abc", "def", "disabled"]]));
        assert!(!codetags.is_active([vec!["abc", "123"], vec!["def", "456"]]));
        assert!(codetags.is_active([Vec::<&str>::new()]));
    }

    #[test]
    fn test_operators() {
        let mut codetags = codetags("abc, def", "disabled");

        assert!(codetags.is_active([json!({"$not": "disabled"})]));
        assert!(!codetags.is_active([json!({"$not": "abc"})]));
        assert!(codetags.is_active([json!({"$or": ["nil", "def"]})]));
        assert!(codetags.is_active([json!({"$any": ["nil", "def"]})]));
        assert!(!codetags.is_active([json!({"$and": ["abc", "nil"]})]));
        assert!(!codetags.is_active([json!({"$all": ["abc", "nil"]})]));
        assert!(!codetags.is_active([json!({"$unknown": ["abc"]})]));
        assert!(codetags.is_active([json!({"$unknown": ["abc"]}), json!("abc")]));
    }

    #[test]
    fn test_register_and_precedence() {
        let mut codetags = codetags("abc, tag-4", "disabled, tag-2");
        codetags.register_values(&json!([
            {"name": "tag-1"},
            {"label": "tag-2", "enabled": true},
            {"tag": "tag-3", "enabled": false},
            {"name": "tag-4", "enabled": false},
            null,
        ]));

        assert_eq!(codetags.declared_tags(), vec!["tag-1", "tag-2"]);
        assert!(codetags.is_active(["tag-1"]));
        assert!(!codetags.is_active(["tag-2"]));
        assert!(!codetags.is_active(["tag-3"]));
        assert!(codetags.is_active(["tag-4"]));
        assert!(codetags.is_active(["disabled", "tag-1"]));
        assert!(!codetags.is_active([vec!["nil", "tag-1"]]));
    }

    #[test]
    fn test_register_values_ignores_non_arrays() {
        let mut codetags = codetags("", "");
        codetags.register_values(&json!({"name": "tag-1"}));
        codetags.register_values(&json!("tag-1"));
        assert!(codetags.declared_tags().is_empty());
    }

    #[test]
    fn test_register_typed_descriptors() {
        let mut codetags = codetags("", "");
        codetags
            .initialize(Presets::new().with_version("1.5.0"))
            .register([
                TagDescriptor::named("plain"),
                TagDescriptor::detailed("rolled-out").with_plan(
                    RolloutPlan::new(true)
                        .with_min_bound("1.0.0")
                        .with_max_bound("2.0.0"),
                ),
                TagDescriptor::detailed("sunset").with_plan(
                    RolloutPlan::new(true).with_max_bound("1.0.0"),
                ),
            ])
            .register(["plain", "extra"]);

        assert_eq!(codetags.declared_tags(), vec!["plain", "rolled-out", "extra"]);
    }

    #[test]
    fn test_tag_lists_before_and_after_query() {
        let mut codetags = codetags("abc, def", "disabled");
        assert_eq!(codetags.included_tags(), None);
        assert_eq!(codetags.excluded_tags(), None);

        codetags.is_active(["abc"]);
        assert_eq!(
            codetags.included_tags(),
            Some(vec!["abc".to_string(), "def".to_string()])
        );
        assert_eq!(codetags.excluded_tags(), Some(vec!["disabled".to_string()]));

        codetags.clear_cache();
        assert_eq!(codetags.included_tags(), None);
    }

    #[test]
    fn test_namespace_change_after_clear_cache() {
        let env = MapEnv::new()
            .with_var("CODETAGS_POSITIVE_TAGS", "abc")
            .with_var("DEVEBOT_UPGRADE_ENABLED", "xyz");
        let mut codetags = Codetags::with_env(Arc::new(env));
        assert!(codetags.is_active(["abc"]));

        codetags.initialize_value(&json!({
            "namespace": "Devebot",
            "POSITIVE_TAGS": "UPGRADE_ENABLED",
        }));
        assert!(codetags.is_active(["abc"]));

        codetags.clear_cache();
        assert!(!codetags.is_active(["abc"]));
        assert!(codetags.is_active(["xyz"]));
    }

    #[test]
    fn test_reset() {
        let mut codetags = codetags("abc", "");
        codetags
            .initialize(Presets::new().with_namespace("other").with_version("1.0.0"))
            .register(["tag-1"]);
        codetags.is_active(["tag-1"]);

        codetags.reset();
        assert!(codetags.declared_tags().is_empty());
        assert_eq!(codetags.included_tags(), None);
        assert_eq!(codetags.presets(), &Presets::default());
        assert!(codetags.is_active(["abc"]));
        assert!(!codetags.is_active(["tag-1"]));
    }

    #[test]
    fn test_is_enabled_alias() {
        let mut codetags = codetags("abc", "");
        assert_eq!(codetags.is_enabled(["abc"]), codetags.is_active(["abc"]));
        assert_eq!(codetags.is_enabled(["nil"]), codetags.is_active(["nil"]));
    }
}
