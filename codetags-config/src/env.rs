// Environment variable access

use crate::label::string_to_array;
use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read-only key/value lookup for environment variables.
pub trait EnvSource: fmt::Debug + Send + Sync {
    /// Look up a variable by its full name.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// An in-memory environment.
///
/// Useful for tests and for applications that keep tag overrides in a
/// `.env` file instead of the process environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Load variables from a `.env` file without touching the process environment.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        let iter = dotenvy::from_path_iter(path.as_ref())
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        Self::collect(iter)
    }

    /// Parse variables from `.env` formatted text.
    pub fn from_dotenv_str(content: &str) -> Result<Self> {
        Self::collect(dotenvy::from_read_iter(content.as_bytes()))
    }

    fn collect<I>(iter: I) -> Result<Self>
    where
        I: Iterator<Item = std::result::Result<(String, String), dotenvy::Error>>,
    {
        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::ParseError(e.to_string()))?;
            vars.insert(key, value);
        }
        Ok(Self { vars })
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Environment variable loader scoped to a namespace prefix
pub struct EnvLoader {
    source: Arc<dyn EnvSource>,
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(source: Arc<dyn EnvSource>, prefix: Option<String>) -> Self {
        Self { source, prefix }
    }

    /// Full variable name for a label, `<PREFIX>_<LABEL>` when prefixed.
    pub fn var_name(&self, label: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, label),
            None => label.to_string(),
        }
    }

    /// Load a comma-separated variable as a token list.
    ///
    /// A missing variable yields an empty list.
    pub fn load_list(&self, label: &str) -> Vec<String> {
        let name = self.var_name(label);
        let tokens = self
            .source
            .var(&name)
            .map(|value| string_to_array(&value))
            .unwrap_or_default();
        debug!(variable = %name, count = tokens.len(), "Loaded tag list from environment");
        tokens
    }
}
