//! Tag expressions
//!
//! Queries combine tags with a small boolean language. Loose JSON input is
//! parsed once into [`Expr`]:
//!
//! - a string is a single tag,
//! - an array requires every element (`[]` holds trivially),
//! - an object applies its operator keys `$all`/`$and`, `$any`/`$or` and
//!   `$not`, all of which must hold,
//! - anything else, including unknown operator keys, never holds.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parsed tag expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single tag
    Tag(String),

    /// Every sub-expression must hold
    All(Vec<Expr>),

    /// At least one sub-expression must hold
    Any(Vec<Expr>),

    /// Negation
    Not(Box<Expr>),

    /// Input that could not be understood; always false
    Invalid,
}

impl Expr {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn all<I, E>(exprs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self::All(exprs.into_iter().map(Into::into).collect())
    }

    pub fn any<I, E>(exprs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self::Any(exprs.into_iter().map(Into::into).collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: impl Into<Expr>) -> Self {
        Self::Not(Box::new(expr.into()))
    }

    /// Parse loosely-typed input.
    ///
    /// Besides a list, `$all`/`$and` and `$any`/`$or` also accept a single
    /// non-list operand, read as a one-element list: `{"$any": "abc"}` is
    /// `{"$any": ["abc"]}`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(tag) => Self::Tag(tag.clone()),
            Value::Array(items) => Self::All(items.iter().map(Self::from_value).collect()),
            Value::Object(map) => {
                let mut clauses = Vec::with_capacity(map.len());
                for (op, operand) in map {
                    let clause = match op.as_str() {
                        "$all" | "$and" => Self::All(Self::operands(operand)),
                        "$any" | "$or" => Self::Any(Self::operands(operand)),
                        "$not" => Self::not(Self::from_value(operand)),
                        _ => return Self::Invalid,
                    };
                    clauses.push(clause);
                }
                if clauses.len() == 1 {
                    clauses.remove(0)
                } else {
                    Self::All(clauses)
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Invalid,
        }
    }

    // A lone operand counts as a one-element list.
    fn operands(value: &Value) -> Vec<Expr> {
        match value {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            other => vec![Self::from_value(other)],
        }
    }

    /// Evaluate against a tag predicate.
    pub fn evaluate<F>(&self, is_tag_active: &mut F) -> bool
    where
        F: FnMut(&str) -> bool,
    {
        match self {
            Self::Tag(tag) => is_tag_active(tag.as_str()),
            Self::All(exprs) => exprs.iter().all(|e| e.evaluate(is_tag_active)),
            Self::Any(exprs) => exprs.iter().any(|e| e.evaluate(is_tag_active)),
            Self::Not(expr) => !expr.evaluate(is_tag_active),
            Self::Invalid => false,
        }
    }
}

impl From<&str> for Expr {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for Expr {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<&String> for Expr {
    fn from(tag: &String) -> Self {
        Self::Tag(tag.clone())
    }
}

impl<E: Into<Expr>> From<Vec<E>> for Expr {
    fn from(exprs: Vec<E>) -> Self {
        Self::all(exprs)
    }
}

impl<E: Into<Expr>> From<Option<E>> for Expr {
    fn from(expr: Option<E>) -> Self {
        expr.map(Into::into).unwrap_or(Self::Invalid)
    }
}

impl From<&Value> for Expr {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}
