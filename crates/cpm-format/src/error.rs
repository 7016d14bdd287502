//! Error types for the format model
//!
//! Covers:
//! - Version parsing
//! - Condition name lookup
//! - Lexing tokenizable strings
//! - Loading content pack documents

use std::path::PathBuf;

/// Errors parsing a [`VersionTag`](crate::VersionTag)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// Nothing to parse
    #[error("version is empty")]
    Empty,

    /// Not `major.minor` or `major.minor.patch`
    #[error("invalid version '{0}' (expected major.minor or major.minor.patch)")]
    InvalidShape(String),

    /// A component is not a non-negative integer
    #[error("invalid version component '{0}'")]
    InvalidComponent(String),
}

/// Unknown condition (token) name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown condition type: '{0}'")]
pub struct UnknownConditionError(pub String);

/// Errors lexing a tokenizable string
///
/// Offsets are byte offsets into the lexed text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// `{{` without a matching `}}`
    #[error("unterminated token starting at offset {offset}")]
    UnterminatedToken {
        /// Where the token opens
        offset: usize,
    },

    /// `}}` outside any token
    #[error("unexpected '}}}}' at offset {offset}")]
    UnexpectedClose {
        /// Where the `}}` starts
        offset: usize,
    },

    /// `{{}}` or `{{:input}}`
    #[error("token at offset {offset} has no name")]
    EmptyTokenName {
        /// Where the token opens
        offset: usize,
    },

    /// A token name containing another token
    #[error("token name contains a token at offset {offset}")]
    TokenizedName {
        /// Where the inner `{{` starts
        offset: usize,
    },

    /// Tokens nested past the lexer's limit
    #[error("token at offset {offset} is nested more than {limit} levels deep")]
    NestingTooDeep {
        /// Where the first token past the limit opens
        offset: usize,
        /// Deepest nesting allowed
        limit: usize,
    },
}

/// Errors loading a content pack document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// JSON syntax or shape error
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// YAML syntax or shape error
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[source] serde_yaml::Error),

    /// File extension is not json, yaml or yml
    #[error("unsupported document extension: '{0}'")]
    UnsupportedExtension(String),

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
