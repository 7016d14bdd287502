//! Migration registry
//!
//! Provides [`MigrationRegistry`], the list of known migrations a chain is
//! built from.

use std::sync::Arc;

use cpm_format::VersionTag;

use crate::chain::MigrationChain;
use crate::error::ChainError;
use crate::migration::Migration;
use crate::migrations::Migration1_7;

/// Known migrations, in registration order
#[derive(Debug, Default, Clone)]
pub struct MigrationRegistry {
    migrations: Vec<Arc<dyn Migration>>,
}

impl MigrationRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            migrations: Vec::new(),
        }
    }

    /// Create registry with the built-in migrations
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with_migration(Migration1_7::new())
    }

    /// Register a migration
    pub fn register(&mut self, migration: impl Migration + 'static) {
        self.migrations.push(Arc::new(migration));
    }

    /// Register a migration, builder style
    #[inline]
    #[must_use]
    pub fn with_migration(mut self, migration: impl Migration + 'static) -> Self {
        self.register(migration);
        self
    }

    /// Newest registered version
    #[must_use]
    pub fn latest_version(&self) -> Option<VersionTag> {
        self.migrations.iter().map(|m| m.version()).max()
    }

    /// Registered versions, in registration order
    #[must_use]
    pub fn versions(&self) -> Vec<VersionTag> {
        self.migrations.iter().map(|m| m.version()).collect()
    }

    /// Get number of registered migrations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Build the chain over every registered migration
    ///
    /// # Errors
    /// Returns [`ChainError`] if the registrations don't form a valid chain
    pub fn chain(&self) -> Result<MigrationChain, ChainError> {
        MigrationChain::from_shared(self.migrations.clone())
    }
}
