//! Tokenizers producing words with byte offsets into the original text
//!
//! [`WhitespaceTokenizer`] is the default. Any `Fn(&str) -> Vec<Token>` can
//! stand in for it through [`Tokenizer`].

use serde::{Deserialize, Serialize};

/// A word token. `start..end` is a byte range of the untransformed input,
/// so `&text[token.start..token.end] == token.text` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Splits text into tokens.
///
/// Implementations must return tokens in order, non-overlapping, with
/// `start..end` a byte range of the input on char boundaries.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<Token> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Vec<Token> {
        self(text)
    }
}

/// Splits on runs of Unicode whitespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenize(text)
    }
}

/// Split `text` on runs of Unicode whitespace.
///
/// Punctuation stays attached to its word and case is preserved; lowercasing
/// happens at comparison time only.
pub fn tokenize(text: &str) -> Vec<Token> {
    split_on(text, char::is_whitespace)
}

/// Split `text` on runs of characters matching `is_separator`
pub fn split_on(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        match (is_separator(c), start) {
            (true, Some(s)) => {
                tokens.push(make_token(text, s, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }

    if let Some(s) = start {
        tokens.push(make_token(text, s, text.len()));
    }

    tokens
}

/// Number of tokens `tokenize` would produce, without allocating them
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn make_token(text: &str, start: usize, end: usize) -> Token {
    Token {
        text: text[start..end].to_string(),
        start,
        end,
    }
}
