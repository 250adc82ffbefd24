//! Comparing stored attribute values against filter operands.
//!
//! Filter operands are always text. Before comparing, the operand is coerced
//! to the kind of the stored value: strings are used as-is, numbers are
//! trimmed and parsed, versions and ranges are parsed strictly. An operand
//! that cannot be coerced never matches.

use std::cmp::Ordering;

use crate::{
    AttrValue, Predicate, Version, VersionRange,
    substring::compare_substring,
};

/// Test one stored value against a leaf predicate.
///
/// Lists match when any element matches. Only strings support wildcard
/// matching, and version ranges only support (in)equality.
pub fn compare(stored: &AttrValue, predicate: &Predicate<'_>) -> bool {
    if let Predicate::Present = predicate {
        return true;
    }

    match stored {
        AttrValue::List(items) => items.iter().any(|item| compare(item, predicate)),
        AttrValue::String(value) => compare_string(value, predicate),
        AttrValue::Long(value) => compare_ordered(value, predicate, coerce_long, i64::cmp),
        AttrValue::Double(value) => {
            compare_ordered(value, predicate, coerce_double, f64::total_cmp)
        }
        AttrValue::Version(value) => {
            compare_ordered(value, predicate, coerce_version, Version::cmp)
        }
        AttrValue::VersionRange(value) => match predicate {
            Predicate::Substring(_) | Predicate::Present => false,
            Predicate::Equal(raw)
            | Predicate::LessEqual(raw)
            | Predicate::GreaterEqual(raw)
            | Predicate::Approx(raw) => coerce_range(raw).is_some_and(|range| &range == value),
        },
    }
}

fn compare_string(value: &str, predicate: &Predicate<'_>) -> bool {
    match predicate {
        Predicate::Equal(raw) => value == *raw,
        Predicate::LessEqual(raw) => value <= *raw,
        Predicate::GreaterEqual(raw) => value >= *raw,
        Predicate::Approx(raw) => approximately_equal(value, raw),
        Predicate::Substring(pieces) => compare_substring(pieces, value),
        Predicate::Present => true,
    }
}

fn compare_ordered<T>(
    value: &T,
    predicate: &Predicate<'_>,
    coerce: fn(&str) -> Option<T>,
    order: fn(&T, &T) -> Ordering,
) -> bool {
    let raw = match predicate {
        Predicate::Equal(raw)
        | Predicate::LessEqual(raw)
        | Predicate::GreaterEqual(raw)
        | Predicate::Approx(raw) => *raw,
        Predicate::Substring(_) => return false,
        Predicate::Present => return true,
    };
    let Some(operand) = coerce(raw) else {
        return false;
    };

    let ordering = order(value, &operand);
    match predicate {
        Predicate::LessEqual(_) => ordering.is_le(),
        Predicate::GreaterEqual(_) => ordering.is_ge(),
        _ => ordering.is_eq(),
    }
}

/// Case-insensitive equality ignoring all whitespace.
fn approximately_equal(left: &str, right: &str) -> bool {
    let strip = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    strip(left) == strip(right)
}

pub(crate) fn coerce_long(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub(crate) fn coerce_double(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

pub(crate) fn coerce_version(raw: &str) -> Option<Version> {
    Version::parse(raw).ok()
}

pub(crate) fn coerce_range(raw: &str) -> Option<VersionRange> {
    VersionRange::parse(raw).ok()
}

/// Every typed reading of a textual operand, one per scalar kind that can
/// represent it. Used to probe per-value indexes for an equality operand.
pub fn coercions(raw: &str) -> Vec<AttrValue> {
    let mut values = vec![AttrValue::String(raw.to_string())];
    values.extend(coerce_long(raw).map(AttrValue::Long));
    values.extend(coerce_double(raw).map(AttrValue::Double));
    values.extend(coerce_version(raw).map(AttrValue::Version));
    values.extend(coerce_range(raw).map(AttrValue::VersionRange));
    values
}
