//! String helpers shared by presets and environment loading.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Normalize a free-form string into a label token.
///
/// The input is uppercased and every run of non-word characters becomes a
/// single `_`, so `"Devebot"` becomes `"DEVEBOT"` and `"my app.v2"` becomes
/// `"MY_APP_V2"`.
pub fn labelify(value: &str) -> String {
    NON_WORD
        .replace_all(&value.to_uppercase(), "_")
        .into_owned()
}

/// Split a comma-separated value into trimmed, non-empty tokens.
pub fn string_to_array(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
