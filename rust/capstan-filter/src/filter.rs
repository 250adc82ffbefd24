//! The filter syntax tree.
//!
//! A [`Filter`] is either a composite (`&`, `|`, `!`) over child filters or a
//! leaf comparing one named attribute against a literal. Filters print back
//! in the textual syntax they are parsed from:
//!
//! ```text
//! (&(osgi.wiring.package=com.example)(version>=1.0.0)(!(version>=2.0.0)))
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{FilterError, substring::encode_into};

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Matches everything; produced for an empty attribute set.
    MatchAll,
    /// `(&...)`: every child must match.
    And(Vec<Filter>),
    /// `(|...)`: at least one child must match.
    Or(Vec<Filter>),
    /// `(!...)`: no child may match.
    Not(Vec<Filter>),
    /// `(name=value)`
    Equal { name: String, value: String },
    /// `(name<=value)`
    LessEqual { name: String, value: String },
    /// `(name>=value)`
    GreaterEqual { name: String, value: String },
    /// `(name~=value)`
    Approx { name: String, value: String },
    /// `(name=*)`
    Present { name: String },
    /// `(name=a*b*c)`; see [`crate::parse_substring`] for the piece layout.
    Substring { name: String, pieces: Vec<String> },
}

/// A borrowed view of a leaf filter's comparison and operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    Equal(&'a str),
    LessEqual(&'a str),
    GreaterEqual(&'a str),
    Approx(&'a str),
    Present,
    Substring(&'a [String]),
}

impl Filter {
    /// Parse a filter string. Equivalent to [`str::parse`].
    pub fn parse(source: &str) -> Result<Self, FilterError> {
        crate::parser::parse(source)
    }

    /// Shorthand for an equality leaf.
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equal {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The attribute name of a leaf filter; composites have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Filter::Equal { name, .. }
            | Filter::LessEqual { name, .. }
            | Filter::GreaterEqual { name, .. }
            | Filter::Approx { name, .. }
            | Filter::Present { name }
            | Filter::Substring { name, .. } => Some(name),
            Filter::MatchAll | Filter::And(_) | Filter::Or(_) | Filter::Not(_) => None,
        }
    }

    /// Split a leaf filter into its attribute name and [`Predicate`].
    pub fn predicate(&self) -> Option<(&str, Predicate<'_>)> {
        Some(match self {
            Filter::Equal { name, value } => (name, Predicate::Equal(value)),
            Filter::LessEqual { name, value } => (name, Predicate::LessEqual(value)),
            Filter::GreaterEqual { name, value } => (name, Predicate::GreaterEqual(value)),
            Filter::Approx { name, value } => (name, Predicate::Approx(value)),
            Filter::Present { name } => (name, Predicate::Present),
            Filter::Substring { name, pieces } => (name, Predicate::Substring(pieces)),
            Filter::MatchAll | Filter::And(_) | Filter::Or(_) | Filter::Not(_) => return None,
        })
    }

    /// The children of a composite filter; leaves have none.
    pub fn children(&self) -> &[Filter] {
        match self {
            Filter::And(children) | Filter::Or(children) | Filter::Not(children) => children,
            _ => &[],
        }
    }

    fn write_to(&self, out: &mut String) {
        let mut leaf = |name: &str, operator: &str, value: &str| {
            out.push('(');
            out.push_str(name);
            out.push_str(operator);
            encode_into(out, value);
            out.push(')');
        };

        match self {
            Filter::MatchAll => out.push_str("(*)"),
            Filter::And(children) => write_composite(out, '&', children),
            Filter::Or(children) => write_composite(out, '|', children),
            Filter::Not(children) => write_composite(out, '!', children),
            Filter::Equal { name, value } => leaf(name, "=", value),
            Filter::LessEqual { name, value } => leaf(name, "<=", value),
            Filter::GreaterEqual { name, value } => leaf(name, ">=", value),
            Filter::Approx { name, value } => leaf(name, "~=", value),
            Filter::Present { name } => {
                out.push('(');
                out.push_str(name);
                out.push_str("=*)");
            }
            Filter::Substring { name, pieces } => {
                out.push('(');
                out.push_str(name);
                out.push('=');
                for (i, piece) in pieces.iter().enumerate() {
                    if i > 0 {
                        out.push('*');
                    }
                    encode_into(out, piece);
                }
                out.push(')');
            }
        }
    }
}

fn write_composite(out: &mut String, operator: char, children: &[Filter]) {
    out.push('(');
    out.push(operator);
    for child in children {
        child.write_to(out);
    }
    out.push(')');
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Filter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(|error| serde::de::Error::custom(format!("{error}")))
    }
}
