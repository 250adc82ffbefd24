//! Building a filter that selects capabilities by attribute.

use crate::{AttrValue, Attributes, Filter, Version, VersionRange, substring::parse_substring};

impl Filter {
    /// Build the filter a requirement without an explicit `filter`
    /// directive uses to match capabilities carrying `attributes`.
    ///
    /// Each attribute contributes, in map order:
    ///
    /// - for a [`VersionRange`], a lower-bound clause and, when the range
    ///   has a ceiling, an upper-bound clause. Open ends are expressed as
    ///   the negation of the opposite inclusive comparison.
    /// - for anything else, an equality on its textual form, or a wildcard
    ///   match when that text contains unescaped `*`.
    ///
    /// No clauses yields [`Filter::MatchAll`], a single clause is returned
    /// bare and several are conjoined.
    pub fn from_attributes(attributes: &Attributes) -> Filter {
        let mut clauses = Vec::with_capacity(attributes.len());

        for (name, value) in attributes {
            match value {
                AttrValue::VersionRange(range) => range_clauses(name, range, &mut clauses),
                other => {
                    let mut pieces = parse_substring(&other.to_string());
                    let clause = if pieces.len() > 1 {
                        Filter::Substring {
                            name: name.clone(),
                            pieces,
                        }
                    } else {
                        Filter::Equal {
                            name: name.clone(),
                            value: pieces.pop().unwrap_or_default(),
                        }
                    };
                    clauses.push(clause);
                }
            }
        }

        match clauses.len() {
            0 => Filter::MatchAll,
            1 => clauses.pop().unwrap_or(Filter::MatchAll),
            _ => Filter::And(clauses),
        }
    }
}

fn range_clauses(name: &str, range: &VersionRange, clauses: &mut Vec<Filter>) {
    let bound = |version: &Version, lower: bool| {
        let (name, value) = (name.to_string(), version.to_string());
        if lower {
            Filter::GreaterEqual { name, value }
        } else {
            Filter::LessEqual { name, value }
        }
    };

    clauses.push(if range.is_open_floor() {
        Filter::Not(vec![bound(range.floor(), false)])
    } else {
        bound(range.floor(), true)
    });

    if let Some(ceiling) = range.ceiling() {
        clauses.push(if range.is_open_ceiling() {
            Filter::Not(vec![bound(ceiling, true)])
        } else {
            bound(ceiling, false)
        });
    }
}
