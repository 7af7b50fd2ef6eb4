// SPDX-License-Identifier: MIT

//! The tagged-variant rule tree a playbook is made of.
//!
//! Canonical, internally-tagged form used for storage and wire round-trips.
//! Parsing the author-facing shorthand JSON (`{"run":"enrich"}`, `{"if":{...}}`)
//! into this form is the rules engine's concern, not this crate's — see
//! `DESIGN.md` for why the two shapes are kept separate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single step of a playbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Rule {
    /// Invoke a named automation through the `Executor`.
    Run { name: String, #[serde(default)] params: Map<String, Value> },
    /// Branch on one or more conditions.
    If {
        conditions: Vec<Condition>,
        logic: Logic,
        #[serde(rename = "true")]
        when_true: Box<Rule>,
        #[serde(rename = "false", default, skip_serializing_if = "Option::is_none")]
        when_false: Option<Box<Rule>>,
    },
    /// Recursively evaluate a named playbook.
    Play { name: String },
    /// Invoke a named automation through the `PluginExecutor`.
    Plugin { name: String, #[serde(default)] params: Map<String, Value> },
    /// Resolve a context path and yield its value directly (not stringified).
    Var { path: String },
    /// A raw literal, passed through as its own result.
    Value(Value),
}

impl Rule {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Run { .. } => "run",
            Self::If { .. } => "if",
            Self::Play { .. } => "play",
            Self::Plugin { .. } => "plugin",
            Self::Var { .. } => "var",
            Self::Value(_) => "value",
        }
    }
}

/// Combinator for multiple conditions within an `If` rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    And,
    Or,
}

/// `[operator, operand_a, operand_b]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: Operator,
    pub lhs: Operand,
    pub rhs: Operand,
}

/// An operand of a [`Condition`]: either a context path lookup or a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Var { var: String },
    Literal(Value),
}

/// Comparison operator. Serializes to its canonical symbol; deserializes any
/// of the aliases enumerated in the spec (`==`/`eq`/`===`, `<`/`lt`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "==" | "eq" | "===" => Self::Eq,
            "!=" | "!==" => Self::Ne,
            "<" | "lt" => Self::Lt,
            ">" | "gt" => Self::Gt,
            "<=" | "lte" => Self::Le,
            ">=" | "gte" => Self::Ge,
            _ => return None,
        })
    }

    pub fn canonical(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// Whether this operator requires natural ordering (as opposed to equality only).
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Operator::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown operator {s:?}")))
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
