// Presets and environment access for codetags

pub mod env;
pub mod error;
pub mod label;
pub mod loader;
pub mod presets;

pub use env::{EnvLoader, EnvSource, MapEnv, ProcessEnv};
pub use error::{ConfigError, Result};
pub use label::{labelify, string_to_array};
pub use loader::{ConfigLoader, FileFormat};
pub use presets::{
    DEFAULT_NAMESPACE, DEFAULT_NEGATIVE_TAGS_LABEL, DEFAULT_POSITIVE_TAGS_LABEL, Presets,
};

use std::path::Path;

/// Load presets from a file, picking the format from its extension.
pub fn load_presets(path: impl AsRef<Path>) -> Result<Presets> {
    let path = path.as_ref();
    ConfigLoader::auto(path)?.load_file(path)
}
