//! Named evaluator instances
//!
//! The registry is built once by application start-up code and passed to
//! whatever needs it. It is seeded with the default instance under the
//! reserved name `CODETAGS`; other instances are created on demand and keyed
//! by their labelified name.

use crate::codetags::Codetags;
use crate::descriptor::TagDescriptor;
use crate::error::{CodetagsError, CodetagsResult};
use crate::expr::Expr;
use codetags_config::{DEFAULT_NAMESPACE, EnvSource, Presets, ProcessEnv, labelify};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handle to an instance held by the registry
pub type SharedCodetags = Arc<Mutex<Codetags>>;

/// Registry of independently configured instances
#[derive(Debug)]
pub struct Registry {
    env: Arc<dyn EnvSource>,
    default: SharedCodetags,
    instances: RwLock<HashMap<String, SharedCodetags>>,
}

impl Registry {
    /// Create a registry whose instances read the process environment
    pub fn new() -> Self {
        Self::with_env(Arc::new(ProcessEnv))
    }

    /// Create a registry whose instances all read from `env`
    pub fn with_env(env: Arc<dyn EnvSource>) -> Self {
        let default = Arc::new(Mutex::new(Codetags::with_env(env.clone())));
        let mut instances = HashMap::new();
        instances.insert(DEFAULT_NAMESPACE.to_string(), default.clone());

        Self {
            env,
            default,
            instances: RwLock::new(instances),
        }
    }

    /// The instance registered under the reserved default name
    pub fn default_instance(&self) -> SharedCodetags {
        self.default.clone()
    }

    /// Fetch an instance, creating it when missing.
    ///
    /// `opts` are applied to an existing instance as well. The registry lock
    /// is never held while an instance is locked.
    pub fn get_instance(&self, name: &str, opts: Option<Presets>) -> CodetagsResult<SharedCodetags> {
        let key = labelify(name);
        let existing = self.instances.read().get(&key).cloned();

        if let Some(existing) = existing {
            if let Some(opts) = opts {
                existing.lock().initialize(opts);
            }
            return Ok(existing);
        }

        let instance = self.create(&key, opts)?;
        Ok(self
            .instances
            .write()
            .entry(key)
            .or_insert(instance)
            .clone())
    }

    /// Create a fresh instance, replacing any previous one of the same name.
    ///
    /// The namespace defaults to the instance name. Fails for names that
    /// normalize to the reserved default name.
    pub fn new_instance(&self, name: &str, opts: Option<Presets>) -> CodetagsResult<SharedCodetags> {
        let key = labelify(name);
        let instance = self.create(&key, opts)?;

        if self
            .instances
            .write()
            .insert(key.clone(), instance.clone())
            .is_some()
        {
            warn!(name = %key, "Replaced existing codetags instance");
        }
        Ok(instance)
    }

    fn create(&self, key: &str, opts: Option<Presets>) -> CodetagsResult<SharedCodetags> {
        if key == DEFAULT_NAMESPACE {
            warn!(name = %key, "Rejected reserved instance name");
            return Err(CodetagsError::invalid_argument(format!(
                "{} is the default instance name. Please provide another name.",
                DEFAULT_NAMESPACE
            )));
        }

        let mut presets = opts.unwrap_or_default();
        if !presets.has_namespace() {
            presets = presets.with_namespace(key);
        }

        debug!(name = %key, namespace = presets.namespace(), "Created codetags instance");
        let mut instance = Codetags::with_env(self.env.clone());
        instance.initialize(presets);
        Ok(Arc::new(Mutex::new(instance)))
    }

    /// Names of every registered instance, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Query the default instance
    pub fn is_active<I, E>(&self, exprs: I) -> bool
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.default.lock().is_active(exprs)
    }

    /// Register descriptors on the default instance
    pub fn register<I, D>(&self, descriptors: I) -> &Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TagDescriptor>,
    {
        self.default.lock().register(descriptors);
        self
    }

    /// Apply presets to the default instance
    pub fn initialize(&self, presets: Presets) -> &Self {
        self.default.lock().initialize(presets);
        self
    }

    /// Clear the default instance cache
    pub fn clear_cache(&self) -> &Self {
        self.default.lock().clear_cache();
        self
    }

    /// Reset the default instance
    pub fn reset(&self) -> &Self {
        self.default.lock().reset();
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
