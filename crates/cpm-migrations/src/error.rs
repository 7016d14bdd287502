//! Error types for migrations
//!
//! - [`ValidationFailure`]: the single validation outcome a migration reports
//! - [`ChainError`]: inconsistent chain configuration, raised at build time
//! - [`PackError`]: whole-pack validation failures

use cpm_format::{LexError, StringLocation, VersionTag};

const FALLBACK_MESSAGE: &str = "migration validation failed";

/// A migration rejected its input
///
/// Always carries a non-empty, author-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    message: String,
}

impl ValidationFailure {
    /// Create a failure with an explanation
    ///
    /// A blank explanation is replaced by a generic one.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        Self { message }
    }

    /// The explanation
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Chain configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// No migrations given
    #[error("migration chain is empty")]
    Empty,

    /// Versions are not strictly increasing
    #[error("migration {next} must be newer than the migration before it ({previous})")]
    NonIncreasingVersion {
        /// Version of the earlier migration
        previous: VersionTag,
        /// Version of the migration after it
        next: VersionTag,
    },

    /// Two migrations introduce the same feature
    #[error("feature '{feature}' is introduced by both {first} and {second}")]
    DuplicateFeature {
        /// Feature name, as the first migration spells it
        feature: String,
        /// First migration introducing it
        first: VersionTag,
        /// Later migration introducing it again
        second: VersionTag,
    },
}

/// Errors validating a whole content pack
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// The pack targets a format newer than any known migration
    #[error("unsupported format {declared} (latest supported format is {latest})")]
    UnsupportedFormat {
        /// Format the pack declares
        declared: VersionTag,
        /// Newest format the chain understands
        latest: VersionTag,
    },

    /// A tokenizable string could not be lexed
    #[error("Changes[{patch}] {location}: {source}")]
    Lex {
        /// Index into `Changes`
        patch: usize,
        /// Which string of the patch
        location: StringLocation,
        /// Lexer failure
        #[source]
        source: LexError,
    },

    /// A token in a patch was rejected
    #[error("Changes[{patch}] {location}: {source}")]
    TokenRejected {
        /// Index into `Changes`
        patch: usize,
        /// Which string of the patch
        location: StringLocation,
        /// Migration failure, unchanged
        #[source]
        source: ValidationFailure,
    },

    /// The document as a whole was rejected
    #[error("{0}")]
    DocumentRejected(#[from] ValidationFailure),
}

impl PackError {
    /// The migration failure, if this error is one
    #[must_use]
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::TokenRejected { source, .. } | Self::DocumentRejected(source) => Some(source),
            Self::UnsupportedFormat { .. } | Self::Lex { .. } => None,
        }
    }
}

/// Result type alias for migration checks
pub type MigrationResult = Result<(), ValidationFailure>;
