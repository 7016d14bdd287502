//! Testing utilities for CPM workspace
//!
//! Shared test helpers and fixtures.

#![allow(missing_docs)]

use cpm_format::{lex, ContentConfig, LexTokenToken, PatchConfig, VersionTag};
use cpm_migrations::{FeatureMigration, Migration, Migration1_7, MigrationChain};

pub const V1_6: VersionTag = VersionTag::new(1, 6, 0);
pub const V1_7: VersionTag = VersionTag::new(1, 7, 0);

/// The first token reference in `source`
pub fn token(source: &str) -> LexTokenToken {
    lex(source)
        .unwrap()
        .into_iter()
        .find_map(|part| part.as_token().cloned())
        .unwrap_or_else(|| panic!("no token in {source:?}"))
}

pub fn feature_migration(version: VersionTag, names: &[&str]) -> Box<dyn Migration> {
    Box::new(FeatureMigration::new(version, names.iter().copied()))
}

/// `[1.6.0 {}, 1.7.0]`
pub fn chain_1_6_1_7() -> MigrationChain {
    MigrationChain::new(vec![feature_migration(V1_6, &[]), Box::new(Migration1_7::new())]).unwrap()
}

/// A format 1.6 document with one patch editing `keys`
pub fn document_with_field_keys(keys: &[&str]) -> ContentConfig {
    let patch = keys
        .iter()
        .fold(PatchConfig::new().with_action("EditData").with_target("Data/Objects"), |patch, key| {
            patch.with_field(*key, "0", "value")
        });
    ContentConfig::new(V1_6).with_patch(patch)
}

/// A content.json body with the given format and patches (raw JSON objects)
pub fn pack_json(format: &str, patches: &[&str]) -> String {
    format!(
        r#"{{ "Format": "{format}", "Changes": [{}] }}"#,
        patches.join(", ")
    )
}
