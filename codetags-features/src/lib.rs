//! Feature Tags for Codetags
//!
//! Runtime feature tag evaluation combining statically declared tags,
//! environment overrides and boolean tag expressions.
//!
//! # Features
//!
//! - 🚀 **Declared Tags** - Register code-level defaults
//! - 🌱 **Environment Overrides** - `<NAMESPACE>_POSITIVE_TAGS` / `<NAMESPACE>_NEGATIVE_TAGS`
//! - 🧮 **Tag Expressions** - `$all`/`$and`, `$any`/`$or`, `$not`
//! - 🎲 **Version-Gated Rollout** - Declare tags inside a version window
//! - 🗂️ **Namespaces** - Independent instances in one registry
//!
//! Precedence is fixed: an excluded tag is always off, a declared tag is on,
//! and any other tag is on only when included.
//!
//! # Quick Start
//!
//! ```
//! use codetags_features::*;
//! use codetags_config::MapEnv;
//! use std::sync::Arc;
//!
//! let env = MapEnv::new()
//!     .with_var("CODETAGS_POSITIVE_TAGS", "new-ui")
//!     .with_var("CODETAGS_NEGATIVE_TAGS", "legacy-export");
//! let mut codetags = Codetags::with_env(Arc::new(env));
//!
//! codetags.register(["legacy-export", "fast-search"]);
//!
//! assert!(codetags.is_active(["new-ui"]));
//! assert!(codetags.is_active(["fast-search"]));
//! assert!(!codetags.is_active(["legacy-export"]));
//! ```
//!
//! # Tag Expressions
//!
//! ```
//! use codetags_features::*;
//! use codetags_config::MapEnv;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let env = MapEnv::new().with_var("CODETAGS_POSITIVE_TAGS", "abc, def");
//! let mut codetags = Codetags::with_env(Arc::new(env));
//!
//! // Arguments are alternatives, arrays require every element
//! assert!(codetags.is_active([json!("nil"), json!(["abc", "def"])]));
//! assert!(codetags.is_active([json!({"$any": ["nil", "abc"], "$not": "xyz"})]));
//! assert!(codetags.is_active([Expr::all(["abc", "def"])]));
//! ```
//!
//! # Gradual Rollout
//!
//! ```
//! use codetags_features::*;
//! use codetags_config::{MapEnv, Presets};
//! use std::sync::Arc;
//!
//! let mut codetags = Codetags::with_env(Arc::new(MapEnv::new()));
//! codetags
//!     .initialize(Presets::new().with_version("1.5.0"))
//!     .register([TagDescriptor::detailed("new-algorithm").with_plan(
//!         RolloutPlan::new(true)
//!             .with_min_bound("1.0.0")
//!             .with_max_bound("2.0.0"),
//!     )]);
//!
//! assert!(codetags.is_active(["new-algorithm"]));
//! ```
//!
//! # Namespaces
//!
//! ```
//! use codetags_features::*;
//! use codetags_config::MapEnv;
//! use std::sync::Arc;
//!
//! let env = MapEnv::new().with_var("BILLING_POSITIVE_TAGS", "invoices");
//! let registry = Registry::with_env(Arc::new(env));
//!
//! let billing = registry.get_instance("billing", None).unwrap();
//! assert!(billing.lock().is_active(["invoices"]));
//! assert!(!registry.is_active(["invoices"]));
//! assert!(registry.new_instance("codetags", None).is_err());
//! ```

pub mod codetags;
pub mod descriptor;
pub mod error;
pub mod expr;
pub mod registry;
pub mod store;
pub mod version;

pub use codetags::Codetags;
pub use descriptor::{RolloutPlan, TagDescriptor};
pub use error::{CodetagsError, CodetagsResult};
pub use expr::Expr;
pub use registry::{Registry, SharedCodetags};
pub use store::TagStore;
