use logos::Logos;

/// C token kinds recognized when slicing an AST node's extent into tokens.
///
/// Only `static` and `typedef` are split out; every other keyword lexes as
/// [`TokenKind::Ident`].
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f\v]+")]
    #[regex(r"\\\r?\n")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[token("##")]
    HashHash,
    #[token("#")]
    Hash,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,

    #[regex(r"->|\+\+|--|<<=|>>=|<<|>>|&&|\|\||\*=|[-+/%^&|~!=<>?:.]=?")]
    Operator,

    #[token("static")]
    KwStatic,
    #[token("typedef")]
    KwTypedef,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r#"[LuU]?'([^'\\\n]|\\[\s\S])*'"#)]
    Char,
    #[regex(r#"(u8|[LuU])?"([^"\\\n]|\\[\s\S])*""#)]
    String,
    #[regex(r"0[xX][0-9A-Fa-f]+([uUlL]+)?")]
    #[regex(r"[0-9]+([uUlL]+)?")]
    Integer,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    Float,
}

impl TokenKind {
    /// Whitespace and comments carry no spelling for extent queries.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}
