//! Module versions.
//!
//! A [`Version`] is the four-part `major.minor.micro.qualifier` identifier
//! carried by bundle manifests and package exports. Versions order by their
//! numeric parts first and their qualifier (lexicographically) last.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::VersionError;

/// A `major.minor.micro[.qualifier]` version identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: String,
}

impl Version {
    /// The `0.0.0` version, used wherever a version is optional and omitted.
    pub const EMPTY: Version = Version {
        major: 0,
        minor: 0,
        micro: 0,
        qualifier: String::new(),
    };

    /// Create a version without a qualifier.
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Create a version with a qualifier, validating the qualifier characters.
    pub fn with_qualifier(
        major: u32,
        minor: u32,
        micro: u32,
        qualifier: impl Into<String>,
    ) -> Result<Self, VersionError> {
        let qualifier = qualifier.into();
        if let Some(invalid) = qualifier.chars().find(|c| !is_qualifier_char(*c)) {
            return Err(VersionError::InvalidVersion {
                version: format!("{major}.{minor}.{micro}.{qualifier}"),
                reason: format!("invalid character {invalid:?} in qualifier"),
            });
        }
        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }

    /// Strictly parse a version string.
    ///
    /// Surrounding whitespace is ignored and an empty string yields
    /// [`Version::EMPTY`]. Otherwise up to three dot-separated non-negative
    /// integers may be followed by a qualifier made of ASCII alphanumerics,
    /// `_` and `-`.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::EMPTY);
        }

        let invalid = |reason: &str| VersionError::InvalidVersion {
            version: input.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = trimmed.splitn(4, '.');
        let mut numbers = [0u32; 3];
        for (position, slot) in numbers.iter_mut().enumerate() {
            match parts.next() {
                Some(part) => {
                    *slot = parse_component(part).ok_or_else(|| {
                        invalid(&format!("non-numeric component {part:?}"))
                    })?;
                }
                None if position == 0 => return Err(invalid("missing major component")),
                None => break,
            }
        }

        let qualifier = parts.next().unwrap_or_default();
        if qualifier.is_empty() && trimmed.matches('.').count() >= 3 {
            return Err(invalid("empty qualifier"));
        }

        Self::with_qualifier(numbers[0], numbers[1], numbers[2], qualifier)
            .map_err(|_| invalid("invalid qualifier"))
    }

    /// Leniently interpret a loosely formatted version such as `1.2-SNAPSHOT`.
    ///
    /// Leading numeric components are kept, whatever follows the first
    /// separator after them becomes the qualifier (with characters that are
    /// not legal in a qualifier replaced by `_`). Input with no leading
    /// number becomes the qualifier of `0.0.0`.
    pub fn clean(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(version) = Self::parse(trimmed) {
            return version;
        }

        let mut numbers = [0u32; 3];
        let mut rest = trimmed;
        let mut parsed = 0;
        while parsed < 3 {
            let digits = rest.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                break;
            }
            let Some(number) = parse_component(&rest[..digits]) else {
                break;
            };
            numbers[parsed] = number;
            parsed += 1;
            rest = &rest[digits..];

            let continues = rest.starts_with('.')
                && rest[1..].chars().next().is_some_and(|c| c.is_ascii_digit());
            if parsed < 3 && continues {
                rest = &rest[1..];
            } else {
                break;
            }
        }

        let qualifier = match rest.chars().next() {
            _ if parsed == 0 => sanitize_qualifier(trimmed),
            None => String::new(),
            Some(separator) if !separator.is_ascii_alphanumeric() => {
                sanitize_qualifier(&rest[separator.len_utf8()..])
            }
            Some(_) => return Self::clean_fallback(trimmed),
        };

        Self {
            major: numbers[0],
            minor: numbers[1],
            micro: numbers[2],
            qualifier,
        }
    }

    fn clean_fallback(trimmed: &str) -> Self {
        Self {
            qualifier: sanitize_qualifier(trimmed),
            ..Self::EMPTY
        }
    }

    /// The major component.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// The minor component.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// The micro component.
    pub fn micro(&self) -> u32 {
        self.micro
    }

    /// The qualifier, empty when absent.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn is_qualifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn sanitize_qualifier(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_qualifier_char(c) { c } else { '_' })
        .collect()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(|error| serde::de::Error::custom(format!("{error}")))
    }
}
