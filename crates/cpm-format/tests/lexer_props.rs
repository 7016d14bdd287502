use cpm_format::{lex, LexToken, VersionTag};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Token(String),
    TokenWithInput(String, String),
}

impl Piece {
    fn render(&self) -> String {
        match self {
            Piece::Text(text) => text.clone(),
            Piece::Token(name) => format!("{{{{{name}}}}}"),
            Piece::TokenWithInput(name, input) => format!("{{{{{name}: {input}}}}}"),
        }
    }
}

fn piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        "[a-z /._]{1,8}".prop_map(Piece::Text),
        "[A-Z][a-zA-Z]{0,8}".prop_map(Piece::Token),
        ("[A-Z][a-zA-Z]{0,8}", "[a-z]{1,6}").prop_map(|(n, i)| Piece::TokenWithInput(n, i)),
    ]
}

proptest! {
    #[test]
    fn prop_top_level_parts_reassemble_source(pieces in proptest::collection::vec(piece(), 0..10)) {
        let source: String = pieces.iter().map(Piece::render).collect();
        let parts = lex(&source).unwrap();

        let rebuilt: String = parts.iter().map(LexToken::text).collect();
        prop_assert_eq!(rebuilt, source);

        let expected_tokens = pieces.iter().filter(|p| !matches!(p, Piece::Text(_))).count();
        prop_assert_eq!(parts.iter().filter(|p| p.is_token()).count(), expected_tokens);
    }

    #[test]
    fn prop_brace_free_text_is_literal(text in "[^{}]{1,40}") {
        let parts = lex(&text).unwrap();
        prop_assert_eq!(parts, vec![LexToken::Literal(text)]);
    }

    #[test]
    fn prop_version_display_parses_back(major in 0u32..100, minor in 0u32..100, patch in 0u32..100) {
        let version = VersionTag::new(major, minor, patch);
        prop_assert_eq!(version.to_string().parse::<VersionTag>().unwrap(), version);
    }

    #[test]
    fn prop_version_order_matches_tuple_order(
        a in (0u32..5, 0u32..5, 0u32..5),
        b in (0u32..5, 0u32..5, 0u32..5),
    ) {
        let va = VersionTag::new(a.0, a.1, a.2);
        let vb = VersionTag::new(b.0, b.1, b.2);
        prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
    }
}

#[test]
fn nested_tokens_are_found_inside_input() {
    let parts = lex("prefix {{ItemName: {{Season}}Crop }} suffix").unwrap();
    let tokens: Vec<_> = parts.iter().filter_map(LexToken::as_token).collect();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].has_nested_tokens());
}
