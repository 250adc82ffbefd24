//! Attribute values.
//!
//! Capabilities and requirements describe themselves with named attributes.
//! [`AttrValue`] is the closed set of shapes an attribute can take; any
//! collection is normalized to [`AttrValue::List`].

use std::{cmp::Ordering, fmt, hash::Hash};

use indexmap::IndexMap;

use crate::{Version, VersionRange};

/// Insertion-ordered attribute map. Order matters when attributes are turned
/// into a filter, so that the most selective attribute can come first.
pub type Attributes = IndexMap<String, AttrValue>;

/// A typed attribute value.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// A UTF-8 string
    String(String),
    /// A 64-bit signed integer
    Long(i64),
    /// A double-precision float
    Double(f64),
    /// A [`Version`]
    Version(Version),
    /// A [`VersionRange`]; requirements use these to bound version attributes
    VersionRange(VersionRange),
    /// A homogeneous list of values
    List(Vec<AttrValue>),
}

/// The kind of an [`AttrValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    String,
    Long,
    Double,
    Version,
    VersionRange,
    List,
}

impl AttrValue {
    /// The [`AttrKind`] of this value.
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrValue::String(_) => AttrKind::String,
            AttrValue::Long(_) => AttrKind::Long,
            AttrValue::Double(_) => AttrKind::Double,
            AttrValue::Version(_) => AttrKind::Version,
            AttrValue::VersionRange(_) => AttrKind::VersionRange,
            AttrValue::List(_) => AttrKind::List,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the version payload, if this is a version.
    pub fn as_version(&self) -> Option<&Version> {
        match self {
            AttrValue::Version(value) => Some(value),
            _ => None,
        }
    }

    /// Visit every scalar inside this value, descending into lists.
    pub fn scalars(&self) -> Vec<&AttrValue> {
        let mut scalars = Vec::new();
        collect_scalars(self, &mut scalars);
        scalars
    }
}

fn collect_scalars<'a>(value: &'a AttrValue, into: &mut Vec<&'a AttrValue>) {
    match value {
        AttrValue::List(items) => {
            for item in items {
                collect_scalars(item, into);
            }
        }
        scalar => into.push(scalar),
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::String(a), AttrValue::String(b)) => a == b,
            (AttrValue::Long(a), AttrValue::Long(b)) => a == b,
            (AttrValue::Double(a), AttrValue::Double(b)) => a.total_cmp(b) == Ordering::Equal,
            (AttrValue::Version(a), AttrValue::Version(b)) => a == b,
            (AttrValue::VersionRange(a), AttrValue::VersionRange(b)) => a == b,
            (AttrValue::List(a), AttrValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttrValue {}

impl Hash for AttrValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            AttrValue::String(value) => value.hash(state),
            AttrValue::Long(value) => value.hash(state),
            AttrValue::Double(value) => value.to_bits().hash(state),
            AttrValue::Version(value) => value.hash(state),
            AttrValue::VersionRange(value) => value.hash(state),
            AttrValue::List(values) => values.hash(state),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(value) => write!(f, "{value}"),
            AttrValue::Long(value) => write!(f, "{value}"),
            AttrValue::Double(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            AttrValue::Double(value) => write!(f, "{value}"),
            AttrValue::Version(value) => write!(f, "{value}"),
            AttrValue::VersionRange(value) => write!(f, "{value}"),
            AttrValue::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Long(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Double(value)
    }
}

impl From<Version> for AttrValue {
    fn from(value: Version) -> Self {
        AttrValue::Version(value)
    }
}

impl From<VersionRange> for AttrValue {
    fn from(value: VersionRange) -> Self {
        AttrValue::VersionRange(value)
    }
}

impl<T> From<Vec<T>> for AttrValue
where
    T: Into<AttrValue>,
{
    fn from(values: Vec<T>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_flattens_nested_lists_into_scalars() {
        let value = AttrValue::from(vec![
            AttrValue::from("a"),
            AttrValue::from(vec![1i64, 2]),
        ]);
        let scalars = value.scalars();
        assert_eq!(
            scalars,
            vec![
                &AttrValue::from("a"),
                &AttrValue::Long(1),
                &AttrValue::Long(2)
            ]
        );
    }

    #[test]
    fn it_renders_values_as_filter_text() {
        assert_eq!(AttrValue::Double(1.0).to_string(), "1.0");
        assert_eq!(AttrValue::Double(0.25).to_string(), "0.25");
        assert_eq!(AttrValue::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(AttrValue::from(Version::new(1, 2, 3)).to_string(), "1.2.3");
    }

    #[test]
    fn it_compares_doubles_by_bits() {
        assert_eq!(AttrValue::Double(f64::NAN), AttrValue::Double(f64::NAN));
        assert_ne!(AttrValue::Double(0.0), AttrValue::Double(-0.0));
        assert_ne!(AttrValue::Long(1), AttrValue::Double(1.0));
    }
}
