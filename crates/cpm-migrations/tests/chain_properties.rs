use cpm_format::{LexToken, LexTokenInput, LexTokenToken, VersionTag};
use cpm_migrations::{FeatureMigration, Migration, Migration1_7, MigrationChain};
use cpm_test_utils::document_with_field_keys;
use proptest::prelude::*;
use std::sync::Arc;

const NAMES: [&str; 8] = [
    "Season", "Weather", "Day", "Hearts", "Spouse", "Random", "HasValue", "ItemName",
];

/// Feature migrations at 1.0.0, 1.1.0, ... followed by 1.7
fn migrations(owners: &[Option<usize>], count: usize) -> Vec<Arc<dyn Migration>> {
    let mut out: Vec<Arc<dyn Migration>> = (0..count)
        .map(|i| {
            let names = NAMES
                .iter()
                .zip(owners)
                .filter(|(_, owner)| **owner == Some(i))
                .map(|(name, _)| *name);
            Arc::new(FeatureMigration::new(
                VersionTag::new(1, u32::try_from(i).unwrap(), 0),
                names,
            )) as Arc<dyn Migration>
        })
        .collect();
    out.push(Arc::new(Migration1_7::new()));
    out
}

fn make_token(name: usize, nested: Option<usize>) -> LexTokenToken {
    let input = nested.map(|inner| {
        LexTokenInput::new(vec![LexToken::Token(LexTokenToken::new(NAMES[inner], None))])
    });
    LexTokenToken::new(NAMES[name], input)
}

proptest! {
    #[test]
    fn prop_appending_migrations_only_adds_rejections(
        count in 1usize..6,
        // HasValue belongs to 1.7, so feature migrations never own it
        owners in proptest::collection::vec(prop_oneof![Just(None), (0usize..6).prop_map(Some)], NAMES.len()),
        tokens in proptest::collection::vec((0usize..NAMES.len(), proptest::option::of(0usize..NAMES.len())), 1..20),
        keys in proptest::collection::vec(prop_oneof![Just("Name"), Just("{{Season}}Name"), Just("Description")], 1..4),
    ) {
        let owners: Vec<Option<usize>> = owners
            .into_iter()
            .enumerate()
            .map(|(i, owner)| if NAMES[i] == "HasValue" { None } else { owner.filter(|o| *o < count) })
            .collect();
        let all = migrations(&owners, count);
        let document = document_with_field_keys(&keys);

        let mut previous: Option<MigrationChain> = None;
        for len in 1..=all.len() {
            let chain = MigrationChain::from_shared(all[..len].to_vec()).unwrap();

            if let Some(shorter) = &previous {
                for (name, nested) in &tokens {
                    let part = LexToken::Token(make_token(*name, *nested));
                    if shorter.migrate_lex_token(&part).is_err() {
                        prop_assert!(chain.migrate_lex_token(&part).is_err());
                    }
                }
                if shorter.migrate_document(&document).is_err() {
                    prop_assert!(chain.migrate_document(&document).is_err());
                }
            }
            previous = Some(chain);
        }
    }

    #[test]
    fn prop_results_are_deterministic(
        name in 0usize..NAMES.len(),
        nested in proptest::option::of(0usize..NAMES.len()),
    ) {
        let chain = MigrationChain::from_shared(migrations(&[Some(0)], 1)).unwrap();
        let token = make_token(name, nested);
        prop_assert_eq!(chain.migrate_token(&token), chain.migrate_token(&token));
    }

    #[test]
    fn prop_feature_owned_twice_fails_construction(first in 0usize..4, gap in 1usize..3) {
        let second = first + gap;
        let chain = MigrationChain::new(vec![
            Box::new(FeatureMigration::new(VersionTag::new(1, u32::try_from(first).unwrap(), 0), ["Season"])),
            Box::new(FeatureMigration::new(VersionTag::new(1, u32::try_from(second).unwrap(), 0), ["SEASON"])),
        ]);
        prop_assert!(chain.is_err());
    }
}
