//! Per-instance presets.

use crate::label::labelify;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Namespace used when none is configured; also the default instance name.
pub const DEFAULT_NAMESPACE: &str = "CODETAGS";

/// Default suffix of the include-list variable.
pub const DEFAULT_POSITIVE_TAGS_LABEL: &str = "POSITIVE_TAGS";

/// Default suffix of the exclude-list variable.
pub const DEFAULT_NEGATIVE_TAGS_LABEL: &str = "NEGATIVE_TAGS";

const POSITIVE_KEYS: [&str; 3] = ["positiveTagsLabel", "POSITIVE_TAGS_LABEL", "POSITIVE_TAGS"];
const NEGATIVE_KEYS: [&str; 3] = ["negativeTagsLabel", "NEGATIVE_TAGS_LABEL", "NEGATIVE_TAGS"];

/// Instance configuration.
///
/// Namespace and label suffixes are stored labelified; `version` is kept
/// verbatim because it is compared as a semantic version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presets {
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    positive_tags_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_tags_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl Presets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build presets from a loosely-typed configuration object.
    ///
    /// Recognizes `namespace`, `version` and the alias groups
    /// `positiveTagsLabel`/`POSITIVE_TAGS_LABEL`/`POSITIVE_TAGS` and
    /// `negativeTagsLabel`/`NEGATIVE_TAGS_LABEL`/`NEGATIVE_TAGS`, where the
    /// first key present wins. Anything else, including non-string values,
    /// is ignored.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let string_at = |key: &str| map.get(key).and_then(Value::as_str);
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| string_at(*key));

        Self {
            namespace: string_at("namespace").map(labelify),
            positive_tags_label: first_of(&POSITIVE_KEYS[..]).map(labelify),
            negative_tags_label: first_of(&NEGATIVE_KEYS[..]).map(labelify),
            version: string_at("version").map(String::from),
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(labelify(namespace));
        self
    }

    pub fn with_positive_tags_label(mut self, label: &str) -> Self {
        self.positive_tags_label = Some(labelify(label));
        self
    }

    pub fn with_negative_tags_label(mut self, label: &str) -> Self {
        self.negative_tags_label = Some(labelify(label));
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Overwrite the fields that `other` sets, keep the rest.
    pub fn merge(&mut self, other: Presets) {
        if other.namespace.is_some() {
            self.namespace = other.namespace;
        }
        if other.positive_tags_label.is_some() {
            self.positive_tags_label = other.positive_tags_label;
        }
        if other.negative_tags_label.is_some() {
            self.negative_tags_label = other.negative_tags_label;
        }
        if other.version.is_some() {
            self.version = other.version;
        }
    }

    /// Whether a namespace was configured explicitly.
    pub fn has_namespace(&self) -> bool {
        self.namespace.is_some()
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn positive_tags_label(&self) -> &str {
        self.positive_tags_label
            .as_deref()
            .unwrap_or(DEFAULT_POSITIVE_TAGS_LABEL)
    }

    pub fn negative_tags_label(&self) -> &str {
        self.negative_tags_label
            .as_deref()
            .unwrap_or(DEFAULT_NEGATIVE_TAGS_LABEL)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl<'de> Deserialize<'de> for Presets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("presets must be an object"));
        }
        Ok(Self::from_value(&value))
    }
}
