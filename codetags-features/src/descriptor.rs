//! Tag descriptors and version-gated rollout plans.
//!
//! A descriptor names a tag and says whether registering it should declare
//! it. Plain names are always declared; detailed descriptors may switch
//! themselves off or defer to a [`RolloutPlan`] evaluated against the
//! instance version.

use crate::version;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::trace;

const TAG_KEYS: [&str; 3] = ["tag", "name", "label"];
const MIN_BOUND_KEYS: [&str; 3] = ["minBound", "from", "begin"];
const MAX_BOUND_KEYS: [&str; 3] = ["maxBound", "to", "end"];

/// Version window in which a tag takes its planned state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutPlan {
    /// State of the tag inside the window
    pub enabled: bool,

    /// Inclusive lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bound: Option<String>,

    /// Exclusive upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bound: Option<String>,
}

impl RolloutPlan {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            min_bound: None,
            max_bound: None,
        }
    }

    pub fn with_min_bound(mut self, version: impl Into<String>) -> Self {
        self.min_bound = Some(version.into());
        self
    }

    pub fn with_max_bound(mut self, version: impl Into<String>) -> Self {
        self.max_bound = Some(version.into());
        self
    }

    /// Read a plan from loose data.
    ///
    /// Only objects with a boolean `enabled` are plans. Bounds accept the
    /// aliases `minBound`/`from`/`begin` and `maxBound`/`to`/`end`; empty
    /// values count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let enabled = map.get("enabled")?.as_bool()?;
        let bound = |keys: &[&str]| keys.iter().find_map(|key| map.get(*key).and_then(bound_text));

        Some(Self {
            enabled,
            min_bound: bound(&MIN_BOUND_KEYS[..]),
            max_bound: bound(&MAX_BOUND_KEYS[..]),
        })
    }

    /// Decide the tag state for `current`.
    ///
    /// Returns `None` when a configured bound is not a valid version, in which
    /// case the plan does not apply. Otherwise `Some(true)` means `current`
    /// lies in `[min_bound, max_bound)`.
    pub fn window_contains(&self, current: &str) -> Option<bool> {
        let mut satisfied = true;
        if let Some(ref min) = self.min_bound {
            satisfied &= version::less_or_equal(min, current)?;
        }
        if let Some(ref max) = self.max_bound {
            satisfied &= version::less_than(current, max)?;
        }
        Some(satisfied)
    }
}

// Truthy bound values only. Non-string values are kept as text so they fail
// version validation instead of silently widening the window.
fn bound_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Tag registration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagDescriptor {
    /// A bare tag name, always declared
    Name(String),

    /// A tag with an explicit switch and/or rollout plan
    Detailed {
        tag: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        plan: Option<RolloutPlan>,
    },
}

impl TagDescriptor {
    pub fn named(tag: impl Into<String>) -> Self {
        Self::Name(tag.into())
    }

    pub fn detailed(tag: impl Into<String>) -> Self {
        Self::Detailed {
            tag: tag.into(),
            enabled: None,
            plan: None,
        }
    }

    /// Set the explicit switch, turning a bare name into a detailed descriptor
    pub fn with_enabled(self, value: bool) -> Self {
        match self {
            Self::Name(tag) => Self::Detailed {
                tag,
                enabled: Some(value),
                plan: None,
            },
            Self::Detailed { tag, plan, .. } => Self::Detailed {
                tag,
                enabled: Some(value),
                plan,
            },
        }
    }

    /// Attach a rollout plan, turning a bare name into a detailed descriptor
    pub fn with_plan(self, plan: RolloutPlan) -> Self {
        match self {
            Self::Name(tag) => Self::Detailed {
                tag,
                enabled: None,
                plan: Some(plan),
            },
            Self::Detailed { tag, enabled, .. } => Self::Detailed {
                tag,
                enabled,
                plan: Some(plan),
            },
        }
    }

    /// Normalize a loosely-typed descriptor.
    ///
    /// Accepts a string, or an object naming its tag through `tag`, `name` or
    /// `label` (first non-empty wins). `enabled` counts only when boolean and
    /// `plan` only when [`RolloutPlan::from_value`] accepts it. Returns
    /// `None` for anything without a usable tag.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(tag) => Some(Self::Name(tag.clone())),
            Value::Object(map) => {
                let tag = TAG_KEYS.iter().find_map(|key| {
                    map.get(*key)
                        .and_then(Value::as_str)
                        .filter(|tag| !tag.is_empty())
                })?;
                Some(Self::Detailed {
                    tag: tag.to_string(),
                    enabled: map.get("enabled").and_then(Value::as_bool),
                    plan: map.get("plan").and_then(RolloutPlan::from_value),
                })
            }
            _ => None,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Name(tag) => tag,
            Self::Detailed { tag, .. } => tag,
        }
    }

    /// Whether registering this descriptor declares its tag.
    ///
    /// `current_version` is the instance version preset. Plans only apply when
    /// it is a valid version and every configured bound is valid. Inside the
    /// window the tag follows `plan.enabled`; outside it follows the explicit
    /// `enabled` switch if any, else the opposite of `plan.enabled`.
    pub fn is_declared(&self, current_version: Option<&str>) -> bool {
        let Self::Detailed { tag, enabled, plan } = self else {
            return true;
        };

        if let Some(plan) = plan
            && let Some(current) = current_version.filter(|v| version::is_valid(v))
            && let Some(satisfied) = plan.window_contains(current)
        {
            let declared = if satisfied {
                plan.enabled
            } else {
                enabled.unwrap_or(!plan.enabled)
            };
            trace!(tag = %tag, satisfied, declared, "Evaluated rollout plan");
            return declared;
        }

        *enabled != Some(false)
    }
}

impl From<&str> for TagDescriptor {
    fn from(tag: &str) -> Self {
        Self::Name(tag.to_string())
    }
}

impl From<String> for TagDescriptor {
    fn from(tag: String) -> Self {
        Self::Name(tag)
    }
}

impl<'de> Deserialize<'de> for TagDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("descriptor needs a tag, name or label"))
    }
}
