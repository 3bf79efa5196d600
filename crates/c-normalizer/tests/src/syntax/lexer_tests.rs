use super::*;

fn lex(input: &str) -> Vec<(Option<TokenKind>, &str)> {
    Lexer::new(input).map(|(kind, text, _)| (kind, text)).collect()
}

#[test]
fn test_edited_keywords() {
    let tokens = lex("typedef static inline int");
    assert_eq!(
        tokens,
        vec![
            (Some(TokenKind::KwTypedef), "typedef"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::KwStatic), "static"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Ident), "inline"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Ident), "int"),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let tokens = lex("statics static_assert");
    assert_eq!(
        tokens,
        vec![
            (Some(TokenKind::Ident), "statics"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Ident), "static_assert"),
        ]
    );
}

#[test]
fn test_literals_and_comments() {
    let tokens = lex("x = 0x1Fu; /* c */ s = \"a\\\"b\"; // tail");
    assert_eq!(
        tokens,
        vec![
            (Some(TokenKind::Ident), "x"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Operator), "="),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Integer), "0x1Fu"),
            (Some(TokenKind::Semicolon), ";"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Comment), "/* c */"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Ident), "s"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Operator), "="),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::String), "\"a\\\"b\""),
            (Some(TokenKind::Semicolon), ";"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Comment), "// tail"),
        ]
    );
}

#[test]
fn test_operators() {
    let tokens = lex("a->b <<= c && d");
    assert_eq!(
        tokens,
        vec![
            (Some(TokenKind::Ident), "a"),
            (Some(TokenKind::Operator), "->"),
            (Some(TokenKind::Ident), "b"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Operator), "<<="),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Ident), "c"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Operator), "&&"),
            (Some(TokenKind::Whitespace), " "),
            (Some(TokenKind::Ident), "d"),
        ]
    );
}

#[test]
fn test_error_keeps_spelling() {
    let tokens = lex("@");
    assert_eq!(tokens, vec![(None, "@")]);
}
