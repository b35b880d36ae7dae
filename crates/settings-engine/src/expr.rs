//! Single-clause dependency expressions: `key=literal` and `key!=literal`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use settings_store::Value;

use crate::{Error, Result};

/// `key`, then `!=` or `=`, then the literal. Keys never contain `!` or `=`, so the
/// alternation always prefers `!=` when present.
static CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_.\-]+)\s*(!=|=)\s*(.*?)\s*$").expect("clause pattern compiles")
});

/// Comparison operator of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`: holds when the values match.
    Equals,
    /// `!=`: holds when the values differ.
    NotEquals,
}

impl Operator {
    /// True for `=`.
    pub fn equality_mode(self) -> bool {
        matches!(self, Self::Equals)
    }
}

/// Parsed `(key, operator, literal)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    /// Referent setting key.
    pub key: String,
    /// Comparison operator.
    pub op: Operator,
    /// Literal compared against the string form of the referent's value.
    pub literal: String,
}

impl Expr {
    /// Parse `source`, rejecting anything but exactly one clause.
    pub fn parse(source: &str) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedExpression {
            expr: source.to_string(),
            reason: reason.to_string(),
        };
        if !source.contains('=') {
            return Err(malformed("expected 'key=value' or 'key!=value'"));
        }
        let caps = CLAUSE
            .captures(source)
            .ok_or_else(|| malformed("left side must be a setting key"))?;
        let literal = &caps[3];
        if literal.contains('=') {
            return Err(malformed("only one comparison is allowed"));
        }
        let op = match &caps[2] {
            "!=" => Operator::NotEquals,
            _ => Operator::Equals,
        };
        Ok(Self {
            key: caps[1].to_string(),
            op,
            literal: literal.to_string(),
        })
    }

    /// Whether the clause holds for `value`.
    pub fn holds(&self, value: &Value) -> bool {
        let matches = value.to_string() == self.literal;
        self.op.equality_mode() == matches
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
        };
        write!(f, "{}{}{}", self.key, op, self.literal)
    }
}
