use crate::common::{Float, Weight};
use std::fmt;

/// A payload together with how likely it is to be chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEntry<T> {
    pub weight: Weight,
    pub payload: T,
    pub(super) percentage: Float,
}

impl<T> WeightedEntry<T> {
    pub fn new(weight: Weight, payload: T) -> Self {
        Self {
            weight,
            payload,
            percentage: 0.0,
        }
    }

    /// This entry's share of its table's collective weight, from 0 to 100.
    ///
    /// Only meaningful once the owning table has recomputed it for the current
    /// weights; see [WeightedTable::percentages](super::WeightedTable::percentages).
    pub fn percentage(&self) -> Float {
        self.percentage
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> From<(Weight, T)> for WeightedEntry<T> {
    fn from((weight, payload): (Weight, T)) -> Self {
        Self::new(weight, payload)
    }
}

impl<T: fmt::Display> fmt::Display for WeightedEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - [{}] with {}% chance",
            self.payload, self.weight, self.percentage
        )
    }
}
