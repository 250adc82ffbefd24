//! Version ranges.
//!
//! Ranges use interval notation: `[1.0,2.0)` includes `1.0` and excludes
//! `2.0`. A bare version such as `1.5` is the range of everything at or above
//! it, with no ceiling.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Version, VersionError};

/// An interval of versions with independently open or closed ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    floor: Version,
    open_floor: bool,
    ceiling: Option<Version>,
    open_ceiling: bool,
}

impl VersionRange {
    /// A range from `floor` (inclusive) with no upper bound.
    pub fn at_least(floor: Version) -> Self {
        Self {
            floor,
            open_floor: false,
            ceiling: None,
            open_ceiling: true,
        }
    }

    /// A bounded range.
    pub fn between(floor: Version, open_floor: bool, ceiling: Version, open_ceiling: bool) -> Self {
        Self {
            floor,
            open_floor,
            ceiling: Some(ceiling),
            open_ceiling,
        }
    }

    /// Parse interval notation or a bare version.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let invalid = || VersionError::InvalidRange(input.to_string());

        let Some(open_floor) = trimmed.chars().next().and_then(|c| match c {
            '[' => Some(false),
            '(' => Some(true),
            _ => None,
        }) else {
            return Ok(Self::at_least(Version::parse(trimmed)?));
        };

        let open_ceiling = match trimmed.chars().last() {
            Some(']') if trimmed.len() > 1 => false,
            Some(')') if trimmed.len() > 1 => true,
            _ => return Err(invalid()),
        };

        let body = &trimmed[1..trimmed.len() - 1];
        let (floor, ceiling) = body.split_once(',').ok_or_else(invalid)?;

        Ok(Self::between(
            Version::parse(floor)?,
            open_floor,
            Version::parse(ceiling)?,
            open_ceiling,
        ))
    }

    /// The lower bound.
    pub fn floor(&self) -> &Version {
        &self.floor
    }

    /// The upper bound, `None` when the range is unbounded above.
    pub fn ceiling(&self) -> Option<&Version> {
        self.ceiling.as_ref()
    }

    /// Whether the floor itself is excluded.
    pub fn is_open_floor(&self) -> bool {
        self.open_floor
    }

    /// Whether the ceiling itself is excluded. Unbounded ranges are open.
    pub fn is_open_ceiling(&self) -> bool {
        self.open_ceiling
    }

    /// Whether `version` lies inside this range.
    pub fn contains(&self, version: &Version) -> bool {
        let above_floor = if self.open_floor {
            version > &self.floor
        } else {
            version >= &self.floor
        };

        above_floor
            && match &self.ceiling {
                None => true,
                Some(ceiling) if self.open_ceiling => version < ceiling,
                Some(ceiling) => version <= ceiling,
            }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ceiling {
            None => write!(f, "{}", self.floor),
            Some(ceiling) => write!(
                f,
                "{}{},{}{}",
                if self.open_floor { '(' } else { '[' },
                self.floor,
                ceiling,
                if self.open_ceiling { ')' } else { ']' }
            ),
        }
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Version> for VersionRange {
    fn from(floor: Version) -> Self {
        Self::at_least(floor)
    }
}

impl Serialize for VersionRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(|error| serde::de::Error::custom(format!("{error}")))
    }
}
