//! Typed attributes: `key:Type=value` on `Require-Capability` and
//! `Provide-Capability` clauses.

use capstan_filter::{AttrValue, Attributes, Version, VersionRange};
use capstan_resource::{attribute, parse_delimited};

use crate::{Clause, ManifestError};

const STRING: &str = "String";
const LIST: &str = "List";

/// Convert a clause's attributes to their declared types.
///
/// Untyped attributes stay strings, except that on requirements
/// (`version_as_range`) an untyped or `String` typed `version` becomes a
/// version range.
pub(crate) fn typed_attributes(
    clause: &Clause,
    version_as_range: bool,
    header: &'static str,
) -> Result<Attributes, ManifestError> {
    let mut attributes = Attributes::new();

    for (name, raw) in &clause.attributes {
        let kind = clause.types.get(name).map(String::as_str);
        let value = match kind {
            None | Some(STRING) if version_as_range && name == attribute::VERSION => {
                VersionRange::parse(raw)
                    .map(AttrValue::from)
                    .map_err(ManifestError::version(header))?
            }
            None => AttrValue::from(raw.as_str()),
            Some(kind) => typed_value(name, kind, raw)?,
        };
        attributes.insert(name.clone(), value);
    }

    Ok(attributes)
}

fn typed_value(name: &str, kind: &str, raw: &str) -> Result<AttrValue, ManifestError> {
    if let Some(value) = scalar(name, kind, raw)? {
        return Ok(value);
    }
    if !kind.starts_with(LIST) {
        return Err(ManifestError::UnknownAttributeType {
            attribute: name.to_string(),
            kind: kind.to_string(),
        });
    }

    let element = match (kind.find('<'), kind.find('>')) {
        (None, None) => STRING,
        (Some(open), Some(close)) if close > open => kind[open + 1..close].trim(),
        _ => {
            return Err(ManifestError::InvalidListType {
                attribute: name.to_string(),
                kind: kind.to_string(),
            });
        }
    };

    let mut values = Vec::new();
    for token in parse_delimited(raw, ",", false) {
        match scalar(name, element, &token)? {
            Some(value) => values.push(value),
            None => {
                return Err(ManifestError::UnknownAttributeType {
                    attribute: name.to_string(),
                    kind: kind.to_string(),
                });
            }
        }
    }
    Ok(AttrValue::List(values))
}

/// Convert `raw` to one of the scalar types, or `None` when `kind` is not a
/// scalar type name.
fn scalar(name: &str, kind: &str, raw: &str) -> Result<Option<AttrValue>, ManifestError> {
    let invalid = || ManifestError::InvalidAttributeValue {
        attribute: name.to_string(),
        kind: kind.to_string(),
        value: raw.to_string(),
    };

    let value = match kind {
        STRING => AttrValue::from(raw),
        "Long" => AttrValue::Long(raw.trim().parse().map_err(|_| invalid())?),
        "Double" => AttrValue::Double(raw.trim().parse().map_err(|_| invalid())?),
        "Version" => AttrValue::Version(Version::parse(raw.trim()).map_err(|_| invalid())?),
        _ => return Ok(None),
    };
    Ok(Some(value))
}
