use logos::{Lexer as LogosLexer, Logos};
use logos_iter::{LogosIter, PeekableLexer};
use std::fmt;

pub type Lexer<'a> = PeekableLexer<'a, LogosLexer<'a, TokenKind>, TokenKind>;

pub fn lexer(s: &str) -> Lexer {
    TokenKind::lexer(s).peekable_lexer()
}

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[A-Za-z_][A-Za-z0-9_'\-]*")]
    Word,
    #[regex(r#""[^"\n]*""#)]
    Quoted,

    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    #[regex(r"#[^\n]*", logos::skip)]
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "<weight>",
            Self::Word => "<word>",
            Self::Quoted => "<quoted string>",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Error => "<error>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        TokenKind::lexer(s).collect()
    }

    #[test]
    fn test_lex_entries() {
        use TokenKind::*;
        assert_eq!(kinds("3 sword, 1: \"golden shield\""), [Integer, Word, Comma, Integer, Colon, Quoted]);
        assert_eq!(kinds("12 rusty-dagger # a comment\n4 bow"), [Integer, Word, Integer, Word]);
        assert_eq!(kinds("2 !"), [Integer, Error]);
    }
}
