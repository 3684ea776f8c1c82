mod lexer;
mod parser;

pub use lexer::TokenKind;
pub use parser::{ParseError, ParseErrorKind};

use crate::common::NonEmpty;
use crate::weighted::WeightedEntry;

/// Parses a table definition into its entries, in the order they were written.
///
/// # Examples
/// ```
/// # use extra_random::parse_table;
///
/// let entries = parse_table("3 sword, 1 \"golden shield\"").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].payload, "golden shield");
/// ```
pub fn parse_table(s: &str) -> Result<NonEmpty<WeightedEntry<String>>, ParseError> {
    parser::Parser::new(s).parse()
}
