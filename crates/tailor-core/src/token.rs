//! Whitespace-run tokenizer for word-level diffing

/// The class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A maximal run of non-whitespace characters
    Word,
    /// A maximal run of whitespace characters
    Space,
}

impl TokenKind {
    fn of_char(ch: char) -> Self {
        if ch.is_whitespace() {
            TokenKind::Space
        } else {
            TokenKind::Word
        }
    }

    /// Classify a token by its first character. Empty input counts as a word.
    pub fn of(token: &str) -> Self {
        token
            .chars()
            .next()
            .map(Self::of_char)
            .unwrap_or(TokenKind::Word)
    }
}

/// True when `text` is non-empty and made only of whitespace
pub fn is_blank(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}

/// Split text into alternating word and whitespace runs.
///
/// Every token is non-empty, and joining the tokens gives back `text`.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenKind> = None;

    for (idx, ch) in text.char_indices() {
        let kind = TokenKind::of_char(ch);
        match current {
            Some(prev) if prev != kind => {
                tokens.push(&text[start..idx]);
                start = idx;
                current = Some(kind);
            }
            Some(_) => {}
            None => current = Some(kind),
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}
