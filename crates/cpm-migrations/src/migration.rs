//! Migration trait and the generic feature-only migration
//!
//! Provides the [`Migration`] trait implemented by every format version.

use cpm_format::{ContentConfig, FeatureSet, LexTokenToken, VersionTag};

use crate::error::{MigrationResult, ValidationFailure};

/// One format version's validation rules
///
/// A migration rejects input that uses something first introduced at its
/// version. Migrations don't know about each other: the
/// [`MigrationChain`](crate::MigrationChain) runs them in ascending order and
/// only calls a migration once every earlier one accepted the input.
///
/// # Contract
/// - `introduces()` is fixed for the life of the migration
/// - validation is pure and deterministic
/// - a failure explains itself as a noun phrase, see [`Migration::noun_phrase_error`]
pub trait Migration: Send + Sync + std::fmt::Debug {
    /// Format version this migration represents
    fn version(&self) -> VersionTag;

    /// Feature names first valid at this version
    fn introduces(&self) -> &FeatureSet;

    /// Extra checks over a single token reference
    ///
    /// The chain has already rejected tokens named in [`Migration::introduces`].
    fn validate_token(&self, _token: &LexTokenToken, _ctx: &ChainContext<'_>) -> MigrationResult {
        Ok(())
    }

    /// Extra checks over a whole document
    fn validate_document(
        &self,
        _document: &ContentConfig,
        _ctx: &ChainContext<'_>,
    ) -> MigrationResult {
        Ok(())
    }

    /// Build a failure for something this version introduced
    ///
    /// `"using nested tokens"` becomes
    /// `"using nested tokens requires Format version 1.7.0 or later"`.
    fn noun_phrase_error(&self, noun_phrase: &str) -> ValidationFailure {
        ValidationFailure::new(format!(
            "{noun_phrase} requires Format version {} or later",
            self.version()
        ))
    }
}

/// What the chain knows when it calls a migration
#[derive(Debug, Clone, Copy)]
pub struct ChainContext<'a> {
    version: VersionTag,
    allowed_before: &'a FeatureSet,
}

impl<'a> ChainContext<'a> {
    /// Context for the migration at `version`
    #[inline]
    #[must_use]
    pub fn new(version: VersionTag, allowed_before: &'a FeatureSet) -> Self {
        Self {
            version,
            allowed_before,
        }
    }

    /// Version of the migration being run
    #[inline]
    #[must_use]
    pub fn version(&self) -> VersionTag {
        self.version
    }

    /// Features introduced by earlier migrations in the chain
    #[inline]
    #[must_use]
    pub fn allowed_before(&self) -> &'a FeatureSet {
        self.allowed_before
    }
}

/// A migration whose only change is new feature names
#[derive(Debug, Clone)]
pub struct FeatureMigration {
    version: VersionTag,
    features: FeatureSet,
}

impl FeatureMigration {
    /// Create from a version and the names it introduces
    #[must_use]
    pub fn new<I, S>(version: VersionTag, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            features: features.into_iter().collect(),
        }
    }
}

impl Migration for FeatureMigration {
    #[inline]
    fn version(&self) -> VersionTag {
        self.version
    }

    #[inline]
    fn introduces(&self) -> &FeatureSet {
        &self.features
    }
}
