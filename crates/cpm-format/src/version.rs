//! Format versions
//!
//! Provides [`VersionTag`], the ordered `major.minor.patch` value used to tag
//! migrations and to compare against a pack's declared `Format`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionParseError;

/// Semantic format version
///
/// Ordering is lexicographic over `(major, minor, patch)`, which the derive
/// gives us from field order.
///
/// # Examples
/// - `"1.7"` → `1.7.0`
/// - `"1.7.2"` → `1.7.2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag {
    major: u32,
    minor: u32,
    patch: u32,
}

impl VersionTag {
    /// Create a version from its components
    #[inline]
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Major component
    #[inline]
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Minor component
    #[inline]
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch component
    #[inline]
    #[must_use]
    pub const fn patch(&self) -> u32 {
        self.patch
    }

    /// Whether `self` is strictly newer than `other`
    #[inline]
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self > other
    }
}

impl Display for VersionTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionTag {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let parts: Vec<&str> = trimmed.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(VersionParseError::InvalidShape(trimmed.to_string()));
        }

        let components = parts
            .iter()
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionParseError::InvalidComponent(part.to_string()));
                }
                part.parse::<u32>()
                    .map_err(|_| VersionParseError::InvalidComponent(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            components[0],
            components[1],
            components.get(2).copied().unwrap_or(0),
        ))
    }
}

impl Serialize for VersionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
