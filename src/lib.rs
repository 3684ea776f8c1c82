pub mod biased;
pub mod common;
mod error;
pub mod parse;
pub mod source;
pub mod weighted;

pub use biased::{BiasConfig, BiasedRandom};
pub use common::{Bias, Float, Int, Weight};
pub use error::RandomError;
pub use parse::parse_table;
pub use source::{RegularRandom, Source, UniformSource};
pub use weighted::{WeightedEntry, WeightedTable};

/// Builds a table from a definition, rolling with `source`.
///
/// See [parse_table] for the syntax.
pub fn table_with_source<S: UniformSource>(
    definition: &str,
    source: S,
) -> Result<WeightedTable<String, S>, RandomError> {
    let entries = parse_table(definition)?;
    Ok(WeightedTable::with_source_and_entries(source, entries.into_vec()))
}

impl std::str::FromStr for WeightedTable<String> {
    type Err = RandomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        table_with_source(s, RegularRandom::new())
    }
}
