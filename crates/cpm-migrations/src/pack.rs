//! Whole-pack validation
//!
//! [`PackValidator`] ties the pieces together for a loaded document:
//!
//! ```text
//! Format ──can_handle──▶ applicable sub-chain ──▶ every token in every patch
//!                                              └─▶ document checks
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use cpm_format::{lex, ContentConfig, LexToken, StringLocation, TokenizableString, VersionTag};

use crate::chain::MigrationChain;
use crate::error::PackError;

/// Which checks [`PackValidator`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackValidatorConfig {
    /// Lex and check every tokenizable string
    pub check_tokens: bool,
    /// Run document-level checks
    pub check_document: bool,
}

impl PackValidatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With token checks on or off
    #[inline]
    #[must_use]
    pub fn with_check_tokens(mut self, enabled: bool) -> Self {
        self.check_tokens = enabled;
        self
    }

    /// With document checks on or off
    #[inline]
    #[must_use]
    pub fn with_check_document(mut self, enabled: bool) -> Self {
        self.check_document = enabled;
        self
    }
}

impl Default for PackValidatorConfig {
    fn default() -> Self {
        Self {
            check_tokens: true,
            check_document: true,
        }
    }
}

/// Summary of a successful validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackReport {
    /// Declared format
    pub format: VersionTag,
    /// Number of patches
    pub patches: usize,
    /// Token references checked, nested ones included
    pub tokens_checked: usize,
    /// Versions of the migrations that applied to this pack
    pub migrations_applied: Vec<VersionTag>,
}

/// Validates content packs against a migration chain
#[derive(Debug, Clone)]
pub struct PackValidator {
    chain: MigrationChain,
    config: PackValidatorConfig,
}

impl PackValidator {
    /// Create validator over a chain
    #[inline]
    #[must_use]
    pub fn new(chain: MigrationChain, config: PackValidatorConfig) -> Self {
        Self { chain, config }
    }

    /// The full chain
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &MigrationChain {
        &self.chain
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PackValidatorConfig {
        &self.config
    }

    /// Validate a pack
    ///
    /// # Workflow
    /// 1. Reject formats newer than the chain
    /// 2. Select the migrations newer than the declared format
    /// 3. Lex and check every tokenizable string, patch by patch
    /// 4. Run the document checks
    ///
    /// # Errors
    /// The first problem found, see [`PackError`]
    pub fn validate(&self, document: &ContentConfig) -> Result<PackReport, PackError> {
        let format = document.format;
        if !self.chain.can_handle(format) {
            return Err(PackError::UnsupportedFormat {
                declared: format,
                latest: self.chain.max_version(),
            });
        }

        let mut report = PackReport {
            format,
            patches: document.changes.len(),
            tokens_checked: 0,
            migrations_applied: Vec::new(),
        };

        let Some(chain) = self.chain.applicable_to(format) else {
            tracing::debug!("Format {} is current, nothing to migrate", format);
            return Ok(report);
        };
        report.migrations_applied = chain.versions();

        if self.config.check_tokens {
            report.tokens_checked = Self::check_tokens(&chain, document)?;
        }

        if self.config.check_document {
            chain.migrate_document(document)?;
        }

        tracing::info!(
            "Validated format {} pack: {} patches, {} tokens, {} migrations",
            format,
            report.patches,
            report.tokens_checked,
            report.migrations_applied.len()
        );
        Ok(report)
    }

    fn check_tokens(chain: &MigrationChain, document: &ContentConfig) -> Result<usize, PackError> {
        let mut checked = 0;

        for (patch, config) in document.changes.iter().enumerate() {
            for string in config.tokenizable_strings() {
                let parts = lex(&implied_braces(string)).map_err(|source| PackError::Lex {
                    patch,
                    location: string.location,
                    source,
                })?;

                for part in &parts {
                    chain
                        .migrate_lex_token(part)
                        .map_err(|source| PackError::TokenRejected {
                            patch,
                            location: string.location,
                            source,
                        })?;
                    checked += count_tokens(part);
                }
            }
        }

        Ok(checked)
    }
}

/// Condition keys name a token even when written without braces
///
/// `Hearts: {{Spouse}}` is the `Hearts` token with a nested input, so only a
/// key that is already exactly one token reference is left as written.
fn implied_braces(string: TokenizableString<'_>) -> Cow<'_, str> {
    if string.location == StringLocation::WhenKey && !is_single_token(string.value) {
        Cow::Owned(format!("{{{{{}}}}}", string.value))
    } else {
        Cow::Borrowed(string.value)
    }
}

fn is_single_token(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("{{")
        && text.ends_with("}}")
        && lex(text).is_ok_and(|parts| matches!(parts.as_slice(), [part] if part.is_token()))
}

fn count_tokens(part: &LexToken) -> usize {
    part.as_token().map_or(0, |token| {
        1 + token
            .input()
            .map_or(0, |input| input.parts().iter().map(count_tokens).sum())
    })
}
