// Codetags - runtime feature tags for Rust
//
// This library decides whether a feature tag is active by combining declared
// defaults, environment allow/deny lists and boolean tag expressions.

// Re-export the evaluator
pub use codetags_features::*;

// Re-export presets and environment access
pub use codetags_config;
pub use codetags_config::{
    ConfigError, ConfigLoader, EnvLoader, EnvSource, FileFormat, MapEnv, Presets, ProcessEnv,
    labelify, load_presets, string_to_array,
};

// Loose expressions and descriptors are plain JSON values
pub use serde_json;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Codetags, CodetagsError, CodetagsResult, EnvSource, Expr, MapEnv, Presets, ProcessEnv,
        Registry, RolloutPlan, SharedCodetags, TagDescriptor,
    };
    pub use serde_json::json;
}
