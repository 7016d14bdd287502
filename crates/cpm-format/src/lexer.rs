//! Lexer for tokenizable strings
//!
//! Splits raw text into literal runs and token references. A token reference
//! is written `{{Name}}` or `{{Name: input}}`, and the input may itself contain
//! token references:
//!
//! ```text
//! "{{ItemName: {{Season}}Crop }}"
//!   Token ItemName
//!     └─ input: [Token Season, Literal "Crop"]
//! ```

use std::fmt::{self, Display, Formatter};

use crate::error::LexError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const INPUT_SEPARATOR: char = ':';

/// Deepest token nesting [`lex`] accepts
pub const MAX_TOKEN_DEPTH: usize = 64;

/// One lexical part of a tokenizable string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexToken {
    /// Plain text outside any token
    Literal(String),

    /// A `{{...}}` token reference
    Token(LexTokenToken),
}

impl LexToken {
    /// Source text of this part
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Token(token) => token.text(),
        }
    }

    /// Whether this part is a token reference
    #[inline]
    #[must_use]
    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    /// The token reference, if this part is one
    #[inline]
    #[must_use]
    pub fn as_token(&self) -> Option<&LexTokenToken> {
        match self {
            Self::Token(token) => Some(token),
            Self::Literal(_) => None,
        }
    }
}

impl Display for LexToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A token reference like `{{Season}}` or `{{ItemName: Crop}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexTokenToken {
    name: String,
    input: Option<LexTokenInput>,
    text: String,
}

impl LexTokenToken {
    /// Build a token reference without source text
    ///
    /// The text is rendered canonically as `{{Name}}` or `{{Name: input}}`.
    #[must_use]
    pub fn new(name: impl Into<String>, input: Option<LexTokenInput>) -> Self {
        let name = name.into();
        let text = match &input {
            Some(input) => format!("{OPEN}{name}: {input}{CLOSE}"),
            None => format!("{OPEN}{name}{CLOSE}"),
        };
        Self { name, input, text }
    }

    /// Token name, trimmed
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input argument, if any
    #[inline]
    #[must_use]
    pub fn input(&self) -> Option<&LexTokenInput> {
        self.input.as_ref()
    }

    /// Exact source text including braces
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the input argument contains a token reference
    #[inline]
    #[must_use]
    pub fn has_nested_tokens(&self) -> bool {
        self.input.as_ref().is_some_and(LexTokenInput::has_tokens)
    }
}

impl Display for LexTokenToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Input argument of a token reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexTokenInput {
    parts: Vec<LexToken>,
}

impl LexTokenInput {
    /// Create from parts
    #[inline]
    #[must_use]
    pub fn new(parts: Vec<LexToken>) -> Self {
        Self { parts }
    }

    /// Ordered parts
    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[LexToken] {
        &self.parts
    }

    /// Whether any part is a token reference
    #[inline]
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        self.parts.iter().any(LexToken::is_token)
    }
}

impl Display for LexTokenInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            f.write_str(part.text())?;
        }
        Ok(())
    }
}

/// Lex a tokenizable string into its top-level parts
///
/// # Errors
/// Returns [`LexError`] for an unterminated token, a stray `}}`, or a token
/// with an empty or tokenized name, or nesting deeper than
/// [`MAX_TOKEN_DEPTH`].
pub fn lex(text: &str) -> Result<Vec<LexToken>, LexError> {
    let mut lexer = Lexer {
        src: text,
        pos: 0,
        depth: 0,
    };
    lexer.parse_parts(false)
}

/// Whether the string contains a token-opening marker
#[inline]
#[must_use]
pub fn contains_token_marker(text: &str) -> bool {
    text.contains(OPEN)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Tokens currently open
    depth: usize,
}

impl<'a> Lexer<'a> {
    #[inline]
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    #[inline]
    fn advance_char(&mut self) {
        self.pos += self.rest().chars().next().map_or(1, char::len_utf8);
    }

    /// Parse parts until end of input, or until `}}` when inside a token
    fn parse_parts(&mut self, in_token: bool) -> Result<Vec<LexToken>, LexError> {
        let mut parts = Vec::new();
        let mut literal_start = self.pos;

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }

            if rest.starts_with(OPEN) {
                push_literal(&mut parts, &self.src[literal_start..self.pos]);
                let token = self.parse_token()?;
                parts.push(LexToken::Token(token));
                literal_start = self.pos;
            } else if rest.starts_with(CLOSE) {
                if in_token {
                    break;
                }
                return Err(LexError::UnexpectedClose { offset: self.pos });
            } else {
                self.advance_char();
            }
        }

        push_literal(&mut parts, &self.src[literal_start..self.pos]);
        Ok(parts)
    }

    fn parse_token(&mut self) -> Result<LexTokenToken, LexError> {
        let start = self.pos;
        if self.depth >= MAX_TOKEN_DEPTH {
            return Err(LexError::NestingTooDeep {
                offset: start,
                limit: MAX_TOKEN_DEPTH,
            });
        }
        self.pos += OPEN.len();

        let name_start = self.pos;
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(LexError::UnterminatedToken { offset: start });
            }
            if rest.starts_with(CLOSE) || rest.starts_with(INPUT_SEPARATOR) {
                break;
            }
            if rest.starts_with(OPEN) {
                return Err(LexError::TokenizedName { offset: self.pos });
            }
            self.advance_char();
        }

        let name = self.src[name_start..self.pos].trim();
        if name.is_empty() {
            return Err(LexError::EmptyTokenName { offset: start });
        }
        let name = name.to_string();

        let input = if self.rest().starts_with(INPUT_SEPARATOR) {
            self.pos += INPUT_SEPARATOR.len_utf8();
            self.depth += 1;
            let parts = self.parse_parts(true);
            self.depth -= 1;
            let parts = trim_input(parts?);
            (!parts.is_empty()).then(|| LexTokenInput::new(parts))
        } else {
            None
        };

        if !self.rest().starts_with(CLOSE) {
            return Err(LexError::UnterminatedToken { offset: start });
        }
        self.pos += CLOSE.len();

        Ok(LexTokenToken {
            name,
            input,
            text: self.src[start..self.pos].to_string(),
        })
    }
}

fn push_literal(parts: &mut Vec<LexToken>, text: &str) {
    if !text.is_empty() {
        parts.push(LexToken::Literal(text.to_string()));
    }
}

/// Trim whitespace around the input argument, dropping literals left empty
fn trim_input(mut parts: Vec<LexToken>) -> Vec<LexToken> {
    if let Some(LexToken::Literal(first)) = parts.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(LexToken::Literal(last)) = parts.last_mut() {
        *last = last.trim_end().to_string();
    }
    parts.retain(|part| !matches!(part, LexToken::Literal(text) if text.is_empty()));
    parts
}
