mod entry;
mod table;

pub use entry::WeightedEntry;
pub use table::WeightedTable;
