use std::fmt;
use std::str::FromStr;

pub type Int = i32;
pub type Float = f64;

/// Relative likelihood of a weighted entry.
pub type Weight = u32;
/// Sum of every weight in a table. Wider than [Weight] so it cannot overflow.
pub type CollectiveWeight = u64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Which extreme of a batch of rolls is kept.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Bias {
    #[default]
    Lower,
    Higher,
}

impl Bias {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Higher => "higher",
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bias {
    type Err = ParseBiasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lower" | "low" | "l" | "min" => Ok(Self::Lower),
            "higher" | "high" | "h" | "max" => Ok(Self::Higher),
            _ => Err(ParseBiasError(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[error("unknown bias {0:?}; expected 'lower' or 'higher'")]
pub struct ParseBiasError(String);
