//! Token-level view of C source text.

pub mod kind;
pub mod lexer;

use crate::text::{Extent, SourceText};

pub use kind::TokenKind;
pub use lexer::Lexer;

/// A non-trivia token with its spelling and inclusive source extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: Option<TokenKind>,
    pub spelling: String,
    pub extent: Extent,
}

/// Lex the text covered by `extent` and return its tokens in order.
///
/// Returns an empty list when the extent does not address text inside
/// `source`.
pub fn tokens_in(
    source: &SourceText,
    extent: &Extent,
) -> Vec<Token> {
    let Some(text) = source.slice(extent) else {
        return Vec::new();
    };

    let mut tokens = Vec::new();
    for (kind, spelling, span) in Lexer::new(&text) {
        if kind.is_some_and(TokenKind::is_trivia) {
            continue;
        }
        let (start_line, start_col) = position_at(&text, span.start, extent);
        let (end_line, end_col) = position_at(&text, span.end.saturating_sub(1), extent);
        tokens.push(Token {
            kind,
            spelling: spelling.to_owned(),
            extent: Extent::new(start_line, start_col, end_line, end_col),
        });
    }
    tokens
}

/// Delete a single-line `token` from `source` together with one space or tab
/// directly after it. Returns whether the text changed.
pub fn remove_token(
    source: &mut SourceText,
    token: &Token,
) -> bool {
    if !token.extent.is_single_line() {
        return false;
    }
    let line = token.extent.start_line;
    let mut end_col = token.extent.end_col;
    let followed_by_blank = source
        .line(line)
        .and_then(|content| content.as_bytes().get(end_col as usize))
        .is_some_and(|b| matches!(*b, b' ' | b'\t'));
    if followed_by_blank {
        end_col += 1;
    }
    source.remove_columns(line, token.extent.start_col, end_col)
}

/// Map a byte offset inside the sliced text back to a 1-based line/column.
fn position_at(
    text: &str,
    offset: usize,
    origin: &Extent,
) -> (u32, u32) {
    let before = &text[..offset.min(text.len())];
    let newlines = before.matches('\n').count() as u32;
    match before.rfind('\n') {
        Some(nl) => (origin.start_line + newlines, (offset - nl) as u32),
        None => (origin.start_line, origin.start_col + offset as u32),
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/tokens_tests.rs"]
mod tests;
