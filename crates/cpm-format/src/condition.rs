//! Condition types
//!
//! The built-in token names a content pack can reference, with their
//! canonical spelling. Parsing ignores case.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::UnknownConditionError;

/// Built-in condition (token) name
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    Day,
    DayEvent,
    DayOfWeek,
    DaysPlayed,
    FarmCave,
    FarmhouseUpgrade,
    FarmName,
    FarmType,
    HasFile,
    HasFlag,
    HasMod,
    HasProfession,
    HasReadLetter,
    HasSeenEvent,
    HasValue,
    Hearts,
    IsMainPlayer,
    Language,
    PlayerGender,
    PlayerName,
    Relationship,
    Season,
    Spouse,
    Weather,
    Year,
}

impl ConditionType {
    /// Every condition type, in declaration order
    pub const ALL: [Self; 25] = [
        Self::Day,
        Self::DayEvent,
        Self::DayOfWeek,
        Self::DaysPlayed,
        Self::FarmCave,
        Self::FarmhouseUpgrade,
        Self::FarmName,
        Self::FarmType,
        Self::HasFile,
        Self::HasFlag,
        Self::HasMod,
        Self::HasProfession,
        Self::HasReadLetter,
        Self::HasSeenEvent,
        Self::HasValue,
        Self::Hearts,
        Self::IsMainPlayer,
        Self::Language,
        Self::PlayerGender,
        Self::PlayerName,
        Self::Relationship,
        Self::Season,
        Self::Spouse,
        Self::Weather,
        Self::Year,
    ];

    /// Canonical name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::DayEvent => "DayEvent",
            Self::DayOfWeek => "DayOfWeek",
            Self::DaysPlayed => "DaysPlayed",
            Self::FarmCave => "FarmCave",
            Self::FarmhouseUpgrade => "FarmhouseUpgrade",
            Self::FarmName => "FarmName",
            Self::FarmType => "FarmType",
            Self::HasFile => "HasFile",
            Self::HasFlag => "HasFlag",
            Self::HasMod => "HasMod",
            Self::HasProfession => "HasProfession",
            Self::HasReadLetter => "HasReadLetter",
            Self::HasSeenEvent => "HasSeenEvent",
            Self::HasValue => "HasValue",
            Self::Hearts => "Hearts",
            Self::IsMainPlayer => "IsMainPlayer",
            Self::Language => "Language",
            Self::PlayerGender => "PlayerGender",
            Self::PlayerName => "PlayerName",
            Self::Relationship => "Relationship",
            Self::Season => "Season",
            Self::Spouse => "Spouse",
            Self::Weather => "Weather",
            Self::Year => "Year",
        }
    }
}

impl Display for ConditionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = UnknownConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownConditionError(name.to_string()))
    }
}
