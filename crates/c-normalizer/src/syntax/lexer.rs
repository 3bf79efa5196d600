use std::ops::Range;

use logos::Logos;

use crate::syntax::kind::TokenKind;

/// A lexer that wraps `logos::Lexer` and yields each token with its byte span.
///
/// Unrecognized input is reported as `None` kind so callers can keep the
/// spelling rather than abort on stray bytes.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (Option<TokenKind>, &'a str, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let token_result = self.inner.next()?;
        let text = self.inner.slice();
        let span = self.inner.span();

        Some((token_result.ok(), text, span))
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/lexer_tests.rs"]
mod tests;
