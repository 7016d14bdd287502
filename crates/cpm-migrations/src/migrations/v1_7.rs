//! Format 1.7
//!
//! Adds the `HasReadLetter`, `HasValue` and `IsMainPlayer` tokens, nested
//! tokens inside token input, and tokens in `Fields` keys.

use cpm_format::{
    contains_token_marker, ConditionType, ContentConfig, FeatureSet, LexTokenToken, VersionTag,
};

use crate::error::MigrationResult;
use crate::migration::{ChainContext, Migration};

/// Migration to format version 1.7
#[derive(Debug, Clone)]
pub struct Migration1_7 {
    features: FeatureSet,
}

impl Migration1_7 {
    /// Version this migration represents
    pub const VERSION: VersionTag = VersionTag::new(1, 7, 0);

    /// Create the migration
    #[must_use]
    pub fn new() -> Self {
        Self {
            features: [
                ConditionType::HasReadLetter,
                ConditionType::HasValue,
                ConditionType::IsMainPlayer,
            ]
            .iter()
            .map(ConditionType::as_str)
            .collect(),
        }
    }
}

impl Default for Migration1_7 {
    fn default() -> Self {
        Self::new()
    }
}

impl Migration for Migration1_7 {
    #[inline]
    fn version(&self) -> VersionTag {
        Self::VERSION
    }

    #[inline]
    fn introduces(&self) -> &FeatureSet {
        &self.features
    }

    fn validate_token(&self, token: &LexTokenToken, _ctx: &ChainContext<'_>) -> MigrationResult {
        if token.has_nested_tokens() {
            return Err(self.noun_phrase_error(&format!(
                "using nested tokens like '{}'",
                token.text()
            )));
        }
        Ok(())
    }

    fn validate_document(&self, document: &ContentConfig, _ctx: &ChainContext<'_>) -> MigrationResult {
        let tokenized_key = document
            .changes
            .iter()
            .any(|patch| patch.field_keys().any(contains_token_marker));

        if tokenized_key {
            return Err(self.noun_phrase_error("using tokens in field keys"));
        }
        Ok(())
    }
}
