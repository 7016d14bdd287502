//! Content pack documents
//!
//! [`ContentConfig`] is the structured form of a pack's `content.json`: the
//! declared `Format` version and the ordered list of patches under
//! `Changes`. Only the fields migrations inspect, plus the common patch
//! strings that may contain tokens, are modelled; unknown keys are ignored.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::DocumentError;
use crate::version::VersionTag;

/// A content pack document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentConfig {
    /// Format version the author targets
    pub format: VersionTag,

    /// Patches, in file order
    #[serde(default)]
    pub changes: Vec<PatchConfig>,
}

impl ContentConfig {
    /// Create an empty document for a format version
    #[inline]
    #[must_use]
    pub fn new(format: VersionTag) -> Self {
        Self {
            format,
            changes: Vec::new(),
        }
    }

    /// Append a patch
    #[inline]
    #[must_use]
    pub fn with_patch(mut self, patch: PatchConfig) -> Self {
        self.changes.push(patch);
        self
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or doesn't match the document shape
    #[inline]
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(DocumentError::InvalidJson)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or doesn't match the document shape
    #[inline]
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        serde_yaml::from_str(yaml).map_err(DocumentError::InvalidYaml)
    }

    /// Read and parse a document, choosing the format by extension
    ///
    /// # Errors
    /// Returns error if the extension is unsupported, the file can't be read,
    /// or its content is invalid
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let parse: fn(&str) -> Result<Self, DocumentError> = match extension.as_str() {
            "json" => Self::from_json,
            "yaml" | "yml" => Self::from_yaml,
            _ => return Err(DocumentError::UnsupportedExtension(extension)),
        };

        let content =
            std::fs::read_to_string(path).map_err(|e| DocumentError::io_error(path, e))?;
        parse(&content)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    #[inline]
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::InvalidJson)
    }
}

/// A single patch record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatchConfig {
    /// Display name used in logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_name: Option<String>,

    /// Patch action (`Load`, `EditData`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Asset name to patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Source file in the pack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_file: Option<String>,

    /// Enabled flag, either a boolean or a tokenizable string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<JsonValue>,

    /// Conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<IndexMap<String, JsonValue>>,

    /// Data entries to add or replace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<IndexMap<String, JsonValue>>,

    /// Entry key → field index → value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, IndexMap<String, JsonValue>>>,
}

impl PatchConfig {
    /// Create an empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With action
    #[inline]
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// With target
    #[inline]
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// With source file
    #[inline]
    #[must_use]
    pub fn with_from_file(mut self, from_file: impl Into<String>) -> Self {
        self.from_file = Some(from_file.into());
        self
    }

    /// With a condition
    #[must_use]
    pub fn with_when(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.when
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), JsonValue::String(value.into()));
        self
    }

    /// With a data entry
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), JsonValue::String(value.into()));
        self
    }

    /// With a field edit under an entry key
    #[must_use]
    pub fn with_field(
        mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.fields
            .get_or_insert_with(IndexMap::new)
            .entry(key.into())
            .or_default()
            .insert(field.into(), JsonValue::String(value.into()));
        self
    }

    /// Keys of the `Fields` mapping
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().flat_map(|fields| fields.keys().map(String::as_str))
    }

    /// Every string of this patch that may contain tokens, in a stable order
    #[must_use]
    pub fn tokenizable_strings(&self) -> Vec<TokenizableString<'_>> {
        let mut out = Vec::new();

        let scalars = [
            (StringLocation::LogName, &self.log_name),
            (StringLocation::Action, &self.action),
            (StringLocation::Target, &self.target),
            (StringLocation::FromFile, &self.from_file),
        ];
        for (location, value) in scalars {
            if let Some(value) = value {
                out.push(TokenizableString::new(location, value));
            }
        }

        if let Some(enabled) = &self.enabled {
            collect_strings(StringLocation::Enabled, enabled, &mut out);
        }

        for (key, value) in self.when.iter().flatten() {
            out.push(TokenizableString::new(StringLocation::WhenKey, key));
            collect_strings(StringLocation::WhenValue, value, &mut out);
        }

        for (key, value) in self.entries.iter().flatten() {
            out.push(TokenizableString::new(StringLocation::EntryKey, key));
            collect_strings(StringLocation::EntryValue, value, &mut out);
        }

        for (key, fields) in self.fields.iter().flatten() {
            out.push(TokenizableString::new(StringLocation::FieldKey, key));
            for (field, value) in fields {
                out.push(TokenizableString::new(StringLocation::FieldName, field));
                collect_strings(StringLocation::FieldValue, value, &mut out);
            }
        }

        out
    }
}

/// Where in a patch a tokenizable string came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringLocation {
    /// `LogName`
    LogName,
    /// `Action`
    Action,
    /// `Target`
    Target,
    /// `FromFile`
    FromFile,
    /// `Enabled`
    Enabled,
    /// A `When` key
    WhenKey,
    /// A `When` value
    WhenValue,
    /// An `Entries` key
    EntryKey,
    /// An `Entries` value
    EntryValue,
    /// A `Fields` key
    FieldKey,
    /// A field index inside a `Fields` entry
    FieldName,
    /// A field value inside a `Fields` entry
    FieldValue,
}

impl StringLocation {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LogName => "LogName",
            Self::Action => "Action",
            Self::Target => "Target",
            Self::FromFile => "FromFile",
            Self::Enabled => "Enabled",
            Self::WhenKey => "When key",
            Self::WhenValue => "When value",
            Self::EntryKey => "Entries key",
            Self::EntryValue => "Entries value",
            Self::FieldKey => "Fields key",
            Self::FieldName => "Fields field",
            Self::FieldValue => "Fields value",
        }
    }
}

impl Display for StringLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A string borrowed from a patch, with its location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizableString<'a> {
    /// Where the string came from
    pub location: StringLocation,
    /// The raw string
    pub value: &'a str,
}

impl<'a> TokenizableString<'a> {
    #[inline]
    fn new(location: StringLocation, value: &'a str) -> Self {
        Self { location, value }
    }
}

/// Push every string leaf of a JSON value
fn collect_strings<'a>(
    location: StringLocation,
    value: &'a JsonValue,
    out: &mut Vec<TokenizableString<'a>>,
) {
    match value {
        JsonValue::String(s) => out.push(TokenizableString::new(location, s)),
        JsonValue::Array(items) => {
            for item in items {
                collect_strings(location, item, out);
            }
        }
        JsonValue::Object(map) => {
            for item in map.values() {
                collect_strings(location, item, out);
            }
        }
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => {}
    }
}
