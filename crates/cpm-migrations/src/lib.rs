//! CPM Migrations
//!
//! Version-gated validation for content pack formats.
//!
//! # Core Concepts
//!
//! - [`Migration`]: one format version's rules (features it introduces, token
//!   and document checks)
//! - [`MigrationChain`]: migrations in ascending version order, first failure
//!   wins
//! - [`MigrationRegistry`]: the known migrations a chain is built from
//! - [`PackValidator`]: validates a whole [`ContentConfig`](cpm_format::ContentConfig)
//!
//! # Example
//!
//! ```rust
//! use cpm_format::{lex, VersionTag};
//! use cpm_migrations::MigrationRegistry;
//!
//! let chain = MigrationRegistry::standard().chain().unwrap();
//! assert!(chain.can_handle(VersionTag::new(1, 7, 0)));
//!
//! let parts = lex("{{ItemName: {{Season}}Crop}}").unwrap();
//! let err = chain.migrate_lex_token(&parts[0]).unwrap_err();
//! assert!(err.message().contains("nested tokens"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod chain;
mod error;
mod migration;
mod pack;
mod registry;

pub mod migrations;

// Re-exports
pub use chain::MigrationChain;
pub use error::{ChainError, MigrationResult, PackError, ValidationFailure};
pub use migration::{ChainContext, FeatureMigration, Migration};
pub use migrations::Migration1_7;
pub use pack::{PackReport, PackValidator, PackValidatorConfig};
pub use registry::MigrationRegistry;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running migrations
    pub use crate::{
        ChainContext, ChainError, FeatureMigration, Migration, MigrationChain, MigrationRegistry,
        PackError, PackValidator, PackValidatorConfig, ValidationFailure,
    };
    pub use cpm_format::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
