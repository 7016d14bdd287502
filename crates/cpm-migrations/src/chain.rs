//! Ordered migration chain
//!
//! Provides [`MigrationChain`], which runs migrations in ascending version
//! order and stops at the first failure.
//!
//! # Construction checks
//! - at least one migration
//! - versions strictly increasing
//! - no feature introduced twice (case-insensitive)
//!
//! These are configuration errors, reported once by [`MigrationChain::new`]
//! and never per document.

use std::sync::Arc;

use cpm_format::{ContentConfig, FeatureSet, LexToken, LexTokenToken, VersionTag};

use crate::error::{ChainError, MigrationResult};
use crate::migration::{ChainContext, Migration};

/// A migration plus the features allowed before it
#[derive(Debug, Clone)]
struct ChainEntry {
    migration: Arc<dyn Migration>,
    allowed_before: FeatureSet,
}

/// Ordered, immutable collection of migrations
///
/// Cheap to clone; migrations are shared.
#[derive(Debug, Clone)]
pub struct MigrationChain {
    entries: Vec<ChainEntry>,
    allowed: FeatureSet,
}

impl MigrationChain {
    /// Build a chain from migrations in ascending version order
    ///
    /// # Errors
    /// Returns [`ChainError`] if the list is empty, versions don't strictly
    /// increase, or two migrations introduce the same feature
    pub fn new(migrations: Vec<Box<dyn Migration>>) -> Result<Self, ChainError> {
        Self::from_shared(migrations.into_iter().map(Arc::from).collect())
    }

    /// Build a chain from shared migrations
    ///
    /// # Errors
    /// Same as [`MigrationChain::new`]
    pub fn from_shared(migrations: Vec<Arc<dyn Migration>>) -> Result<Self, ChainError> {
        Self::check_order(&migrations)?;
        Self::check_features(&migrations)?;

        let chain = Self::assemble(migrations);
        tracing::debug!(
            "Built migration chain {:?} (max {}, {} features)",
            chain.versions().iter().map(ToString::to_string).collect::<Vec<_>>(),
            chain.max_version(),
            chain.allowed.len()
        );
        Ok(chain)
    }

    fn check_order(migrations: &[Arc<dyn Migration>]) -> Result<(), ChainError> {
        if migrations.is_empty() {
            return Err(ChainError::Empty);
        }

        for pair in migrations.windows(2) {
            let (previous, next) = (pair[0].version(), pair[1].version());
            if next <= previous {
                return Err(ChainError::NonIncreasingVersion { previous, next });
            }
        }

        Ok(())
    }

    /// Check each pair of feature sets for overlap
    fn check_features(migrations: &[Arc<dyn Migration>]) -> Result<(), ChainError> {
        for i in 0..migrations.len() {
            for j in (i + 1)..migrations.len() {
                let (first, second) = (&migrations[i], &migrations[j]);
                let overlap = first.introduces().intersection(second.introduces());
                let duplicate = overlap.iter().next().map(str::to_string);

                if let Some(feature) = duplicate {
                    return Err(ChainError::DuplicateFeature {
                        feature,
                        first: first.version(),
                        second: second.version(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Compute per-entry contexts for an already validated list
    fn assemble(migrations: Vec<Arc<dyn Migration>>) -> Self {
        let mut allowed = FeatureSet::new();
        let entries = migrations
            .into_iter()
            .map(|migration| {
                let allowed_before = allowed.clone();
                allowed = allowed.union(migration.introduces());
                ChainEntry {
                    migration,
                    allowed_before,
                }
            })
            .collect();

        Self { entries, allowed }
    }

    /// Newest version this chain understands
    #[inline]
    #[must_use]
    pub fn max_version(&self) -> VersionTag {
        // Construction guarantees at least one entry
        self.entries
            .last()
            .map_or(VersionTag::new(0, 0, 0), |entry| entry.migration.version())
    }

    /// Oldest migration version in the chain
    #[inline]
    #[must_use]
    pub fn min_version(&self) -> VersionTag {
        self.entries
            .first()
            .map_or(VersionTag::new(0, 0, 0), |entry| entry.migration.version())
    }

    /// Union of every migration's features
    #[inline]
    #[must_use]
    pub fn allowed_features(&self) -> &FeatureSet {
        &self.allowed
    }

    /// Migration versions, ascending
    #[must_use]
    pub fn versions(&self) -> Vec<VersionTag> {
        self.entries.iter().map(|e| e.migration.version()).collect()
    }

    /// Iterate migrations in order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Migration> {
        self.entries.iter().map(|e| &*e.migration)
    }

    /// Number of migrations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed chain
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a document declaring `requested` can be validated
    ///
    /// Anything newer than [`MigrationChain::max_version`] can't.
    #[inline]
    #[must_use]
    pub fn can_handle(&self, requested: VersionTag) -> bool {
        requested <= self.max_version()
    }

    /// The migrations strictly newer than `declared`, as their own chain
    ///
    /// Returns `None` when the declared version is already at or past every
    /// migration, so nothing needs checking.
    #[must_use]
    pub fn applicable_to(&self, declared: VersionTag) -> Option<Self> {
        let newer: Vec<Arc<dyn Migration>> = self
            .entries
            .iter()
            .filter(|e| e.migration.version().is_newer_than(&declared))
            .map(|e| Arc::clone(&e.migration))
            .collect();

        (!newer.is_empty()).then(|| Self::assemble(newer))
    }

    /// Run every migration's token checks, stopping at the first failure
    ///
    /// Each migration first rejects tokens it introduced, then applies its own
    /// checks. Nested tokens in the input are not visited; see
    /// [`MigrationChain::migrate_lex_token`].
    ///
    /// # Errors
    /// The first migration failure, unchanged
    pub fn migrate_token(&self, token: &LexTokenToken) -> MigrationResult {
        for entry in &self.entries {
            let migration = &*entry.migration;
            let ctx = ChainContext::new(migration.version(), &entry.allowed_before);

            let result = if migration.introduces().contains(token.name()) {
                Err(migration.noun_phrase_error(&format!("using the {} token", token.name())))
            } else {
                migration.validate_token(token, &ctx)
            };

            if let Err(failure) = result {
                tracing::debug!(
                    "Migration {} rejected token {}: {}",
                    migration.version(),
                    token.text(),
                    failure
                );
                return Err(failure);
            }
        }

        Ok(())
    }

    /// Validate a lexical part and every token nested inside it
    ///
    /// Literals always pass. A token is checked before its input's tokens.
    ///
    /// # Errors
    /// The first migration failure, unchanged
    pub fn migrate_lex_token(&self, part: &LexToken) -> MigrationResult {
        let LexToken::Token(token) = part else {
            return Ok(());
        };

        self.migrate_token(token)?;
        for nested in token.input().map(|i| i.parts()).unwrap_or_default() {
            self.migrate_lex_token(nested)?;
        }
        Ok(())
    }

    /// Run every migration's document checks, stopping at the first failure
    ///
    /// # Errors
    /// The first migration failure, unchanged
    pub fn migrate_document(&self, document: &ContentConfig) -> MigrationResult {
        for entry in &self.entries {
            let migration = &*entry.migration;
            let ctx = ChainContext::new(migration.version(), &entry.allowed_before);

            if let Err(failure) = migration.validate_document(document, &ctx) {
                tracing::debug!(
                    "Migration {} rejected document: {}",
                    migration.version(),
                    failure
                );
                return Err(failure);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::FeatureMigration;
    use crate::migrations::Migration1_7;
    use cpm_format::{lex, PatchConfig};

    fn v(major: u32, minor: u32, patch: u32) -> VersionTag {
        VersionTag::new(major, minor, patch)
    }

    fn feature(version: VersionTag, names: &[&str]) -> Box<dyn Migration> {
        Box::new(FeatureMigration::new(version, names.iter().copied()))
    }

    fn standard_pair() -> MigrationChain {
        MigrationChain::new(vec![feature(v(1, 6, 0), &[]), Box::new(Migration1_7::new())]).unwrap()
    }

    fn token(source: &str) -> LexTokenToken {
        lex(source).unwrap()[0].as_token().unwrap().clone()
    }

    #[test]
    fn rejects_empty_chain() {
        assert_eq!(MigrationChain::new(Vec::new()).unwrap_err(), ChainError::Empty);
    }

    #[test]
    fn rejects_out_of_order_versions() {
        let result = MigrationChain::new(vec![feature(v(1, 7, 0), &[]), feature(v(1, 6, 0), &[])]);
        assert_eq!(
            result.unwrap_err(),
            ChainError::NonIncreasingVersion {
                previous: v(1, 7, 0),
                next: v(1, 6, 0),
            }
        );
    }

    #[test]
    fn rejects_repeated_version() {
        let result = MigrationChain::new(vec![feature(v(1, 6, 0), &[]), feature(v(1, 6, 0), &[])]);
        assert!(matches!(result, Err(ChainError::NonIncreasingVersion { .. })));
    }

    #[test]
    fn accepts_ascending_versions() {
        let chain = standard_pair();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.versions(), vec![v(1, 6, 0), v(1, 7, 0)]);
        assert_eq!(chain.max_version(), v(1, 7, 0));
        assert_eq!(chain.min_version(), v(1, 6, 0));
    }

    #[test]
    fn rejects_duplicate_feature_ignoring_case() {
        let result = MigrationChain::new(vec![
            feature(v(1, 5, 0), &["Weather"]),
            feature(v(1, 6, 0), &["weather"]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ChainError::DuplicateFeature {
                feature: "Weather".to_string(),
                first: v(1, 5, 0),
                second: v(1, 6, 0),
            }
        );
    }

    #[test]
    fn allowed_features_is_union() {
        let chain = MigrationChain::new(vec![
            feature(v(1, 5, 0), &["Weather"]),
            Box::new(Migration1_7::new()),
        ])
        .unwrap();
        let allowed = chain.allowed_features();
        assert_eq!(allowed.len(), 4);
        assert!(allowed.contains("weather"));
        assert!(allowed.contains("HasValue"));
    }

    #[test]
    fn can_handle_boundary() {
        let chain = standard_pair();
        assert!(chain.can_handle(v(1, 7, 0)));
        assert!(!chain.can_handle(v(1, 8, 0)));
        assert!(!chain.can_handle(v(1, 7, 1)));
        assert!(chain.can_handle(v(1, 0, 0)));
    }

    #[test]
    fn rejects_introduced_token_name() {
        let chain = standard_pair();
        let err = chain.migrate_token(&token("{{hasvalue: {{x}}}}")).unwrap_err();
        // Name check runs before the migration's own nesting check
        assert_eq!(
            err.message(),
            "using the hasvalue token requires Format version 1.7.0 or later"
        );
    }

    #[test]
    fn earlier_migration_failure_wins() {
        let chain = MigrationChain::new(vec![
            feature(v(1, 6, 0), &["ItemName"]),
            Box::new(Migration1_7::new()),
        ])
        .unwrap();
        let err = chain
            .migrate_token(&token("{{ItemName: {{Season}}Crop}}"))
            .unwrap_err();
        assert!(err.message().contains("1.6.0"));
    }

    #[test]
    fn migrate_lex_token_descends_into_input() {
        let chain = MigrationChain::new(vec![feature(v(1, 8, 0), &["Random"])]).unwrap();
        let parts = lex("{{Hearts: {{Random: Abigail}}}}").unwrap();

        // The outer token alone is fine
        assert!(chain.migrate_token(parts[0].as_token().unwrap()).is_ok());

        let err = chain.migrate_lex_token(&parts[0]).unwrap_err();
        assert!(err.message().starts_with("using the Random token"));
    }

    #[test]
    fn literals_always_pass() {
        let chain = standard_pair();
        assert!(chain
            .migrate_lex_token(&LexToken::Literal("{{not a token".to_string()))
            .is_ok());
    }

    #[test]
    fn document_checks_run_in_order() {
        let chain = standard_pair();
        let document = ContentConfig::new(v(1, 6, 0))
            .with_patch(PatchConfig::new().with_field("{{Season}}", "0", "x"));
        let err = chain.migrate_document(&document).unwrap_err();
        assert!(err.message().contains("tokens in field keys"));
    }

    #[test]
    fn applicable_to_selects_newer_migrations() {
        let chain = MigrationChain::new(vec![
            feature(v(1, 5, 0), &["Weather"]),
            feature(v(1, 6, 0), &["Day"]),
            Box::new(Migration1_7::new()),
        ])
        .unwrap();

        let sub = chain.applicable_to(v(1, 5, 0)).unwrap();
        assert_eq!(sub.versions(), vec![v(1, 6, 0), v(1, 7, 0)]);
        assert!(!sub.allowed_features().contains("Weather"));

        let sub = chain.applicable_to(v(1, 0, 0)).unwrap();
        assert_eq!(sub.len(), 3);

        assert!(chain.applicable_to(v(1, 7, 0)).is_none());
    }

    /// Records the context it is called with
    #[derive(Debug)]
    struct RecordingMigration {
        version: VersionTag,
        features: FeatureSet,
        seen: std::sync::Mutex<Vec<(VersionTag, Vec<String>)>>,
    }

    impl RecordingMigration {
        fn record(&self, ctx: &ChainContext<'_>) {
            let allowed = ctx.allowed_before().iter().map(str::to_string).collect();
            self.seen.lock().unwrap().push((ctx.version(), allowed));
        }
    }

    impl Migration for RecordingMigration {
        fn version(&self) -> VersionTag {
            self.version
        }

        fn introduces(&self) -> &FeatureSet {
            &self.features
        }

        fn validate_token(&self, _token: &LexTokenToken, ctx: &ChainContext<'_>) -> MigrationResult {
            self.record(ctx);
            Ok(())
        }

        fn validate_document(&self, _document: &ContentConfig, ctx: &ChainContext<'_>) -> MigrationResult {
            self.record(ctx);
            Ok(())
        }
    }

    #[test]
    fn migrations_see_features_of_earlier_migrations() {
        let recording = Arc::new(RecordingMigration {
            version: v(1, 7, 0),
            features: ["HasValue"].into_iter().collect(),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let chain = MigrationChain::from_shared(vec![
            Arc::from(feature(v(1, 5, 0), &["Weather"])),
            Arc::from(feature(v(1, 6, 0), &["Day"])),
            Arc::clone(&recording) as Arc<dyn Migration>,
        ])
        .unwrap();

        chain.migrate_token(&token("{{Season}}")).unwrap();
        chain.migrate_document(&ContentConfig::new(v(1, 0, 0))).unwrap();

        let expected = (v(1, 7, 0), vec!["Weather".to_string(), "Day".to_string()]);
        assert_eq!(*recording.seen.lock().unwrap(), vec![expected.clone(), expected]);

        // A sub-chain only knows its own earlier migrations
        let sub = chain.applicable_to(v(1, 5, 0)).unwrap();
        recording.seen.lock().unwrap().clear();
        sub.migrate_token(&token("{{Season}}")).unwrap();
        assert_eq!(
            *recording.seen.lock().unwrap(),
            vec![(v(1, 7, 0), vec!["Day".to_string()])]
        );
    }
}
