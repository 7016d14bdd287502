//! CPM Format Model
//!
//! The data a content pack migration inspects.
//!
//! # Core Concepts
//!
//! - [`VersionTag`]: ordered `major.minor.patch` format version
//! - [`FeatureSet`]: case-insensitive set of feature (token) names
//! - [`ConditionType`]: built-in token names
//! - [`LexToken`]: lexical parts of a tokenizable string, see [`lex`]
//! - [`ContentConfig`]: a pack document with its [`PatchConfig`] records
//!
//! # Example
//!
//! ```rust
//! use cpm_format::{lex, ContentConfig, VersionTag};
//!
//! let config = ContentConfig::from_json(r#"{ "Format": "1.7", "Changes": [] }"#).unwrap();
//! assert_eq!(config.format, VersionTag::new(1, 7, 0));
//!
//! let parts = lex("{{ItemName: {{Season}}Crop}}").unwrap();
//! assert!(parts[0].as_token().unwrap().has_nested_tokens());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod condition;
pub mod document;
pub mod error;
pub mod feature;
pub mod lexer;
pub mod version;

// Re-exports
pub use condition::ConditionType;
pub use document::{ContentConfig, PatchConfig, StringLocation, TokenizableString};
pub use error::{DocumentError, LexError, UnknownConditionError, VersionParseError};
pub use feature::FeatureSet;
pub use lexer::{
    contains_token_marker, lex, LexToken, LexTokenInput, LexTokenToken, MAX_TOKEN_DEPTH,
};
pub use version::VersionTag;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the format model
    pub use crate::{
        lex, ConditionType, ContentConfig, FeatureSet, LexToken, LexTokenInput, LexTokenToken,
        PatchConfig, VersionTag,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
