use super::lexer::*;
use logos_iter::LogosIter;
use crate::common::{NonEmpty, Weight};
use crate::weighted::WeightedEntry;
use std::fmt;
use std::ops::Range;

type PResult<T> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    InvalidWeight(std::num::ParseIntError),
    EmptyTable,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found: Some(found), expected } => {
                write!(f, "unexpected token: found {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedToken { found: None, expected } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "expected ")?;
                fmt_expected(expected, f)
            }
            Self::InvalidWeight(why) => write!(f, "invalid weight: {}", why),
            Self::EmptyTable => write!(f, "a table needs at least one entry"),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [a] => f.write_str(a.as_str()),
        [a, b] => write!(f, "{} or {}", a, b),
        [init @ .., last] => {
            for exp in init {
                write!(f, "{}, ", exp)?;
            }
            write!(f, "or {}", last)
        }
    }
}

/// Parses table definitions such as `3 sword, 1: "golden shield"`.
///
/// Each entry is a weight followed by an optional `:` and a label, which is
/// either a bare word or a double-quoted string. Entries may be separated by
/// commas. `#` starts a comment that runs to the end of the line.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    const LABELS: &'static [TokenKind] = &[TokenKind::Word, TokenKind::Quoted];

    pub fn new(s: &'a str) -> Self {
        Self { lexer: lexer(s) }
    }

    pub fn parse(mut self) -> PResult<NonEmpty<WeightedEntry<String>>> {
        if self.lexer.peek().is_none() {
            return self.error(ParseErrorKind::EmptyTable);
        }

        let mut entries = NonEmpty::new(self.parse_entry()?);
        loop {
            if self.matches(TokenKind::Comma) {
                self.advance();
            }
            if self.lexer.peek().is_none() {
                break;
            }
            entries.push(self.parse_entry()?);
        }
        Ok(entries)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.lexer.next();
            Ok(())
        } else {
            self.unexpected_token(vec![expected])
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn unexpected_token<T>(&mut self, expected: Vec<TokenKind>) -> PResult<T> {
        let found = self.lexer.next();
        if matches!(found, Some(TokenKind::Error)) {
            self.error(ParseErrorKind::UnexpectedString { expected })
        } else {
            self.error(ParseErrorKind::UnexpectedToken { found, expected })
        }
    }

    fn parse_entry(&mut self) -> PResult<WeightedEntry<String>> {
        let weight = self.parse_weight()?;
        if self.matches(TokenKind::Colon) {
            self.advance();
        }
        let label = self.parse_label()?;
        Ok(WeightedEntry::new(weight, label))
    }

    fn parse_weight(&mut self) -> PResult<Weight> {
        self.consume(TokenKind::Integer)?;
        let parsed = self.lexer.slice().parse::<Weight>();
        match parsed {
            Ok(weight) => Ok(weight),
            Err(why) => self.error(ParseErrorKind::InvalidWeight(why)),
        }
    }

    fn parse_label(&mut self) -> PResult<String> {
        match self.lexer.peek().copied() {
            Some(TokenKind::Word) => {
                self.advance();
                Ok(self.lexer.slice().to_string())
            }
            Some(TokenKind::Quoted) => {
                self.advance();
                let slice = self.lexer.slice();
                Ok(slice[1..slice.len() - 1].to_string())
            }
            _ => self.unexpected_token(Self::LABELS.to_vec()),
        }
    }
}
