use crate::common::{Bias, Float, Int};
use crate::error::RandomError;
use crate::source::{RegularRandom, UniformSource};
use std::fmt;
use std::num::NonZeroUsize;

/// How many samples make up one roll, and which extreme of them is kept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BiasConfig {
    roll_count: NonZeroUsize,
    bias: Bias,
}

impl BiasConfig {
    /// Fails with [RandomError::InvalidConfiguration] if `roll_count` is zero.
    pub fn new(roll_count: usize, bias: Bias) -> Result<Self, RandomError> {
        let roll_count = NonZeroUsize::new(roll_count)
            .ok_or_else(|| RandomError::invalid_configuration("roll count must be at least 1"))?;
        Ok(Self { roll_count, bias })
    }

    pub fn roll_count(&self) -> NonZeroUsize {
        self.roll_count
    }

    pub fn bias(&self) -> Bias {
        self.bias
    }
}

/// Rolls a uniform source several times and keeps the lowest or highest result.
///
/// Keeping the lowest of `n` rolls skews results towards the start of the
/// range (and the highest towards the end), much like rolling with
/// disadvantage or advantage.
#[derive(Debug, Clone)]
pub struct BiasedRandom<S = RegularRandom> {
    config: BiasConfig,
    source: S,
}

impl BiasedRandom {
    pub fn with_seed(seed: u64, roll_count: usize, bias: Bias) -> Result<Self, RandomError> {
        let config = BiasConfig::new(roll_count, bias)?;
        Ok(Self::new(config, RegularRandom::with_seed(seed)))
    }

    pub fn from_entropy(roll_count: usize, bias: Bias) -> Result<Self, RandomError> {
        let config = BiasConfig::new(roll_count, bias)?;
        Ok(Self::new(config, RegularRandom::new()))
    }
}

impl<S: UniformSource> BiasedRandom<S> {
    pub fn new(config: BiasConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> BiasConfig {
        self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Draws `roll_count` integers from `[min, max)` and returns the extreme picked by the bias.
    pub fn roll_int(&mut self, min: Int, max: Int) -> Int {
        self.roll_with(Int::MAX, Int::MIN, |source| source.next_int(min, max))
    }

    /// Draws `roll_count` floats from `[min, max)` and returns the extreme picked by the bias.
    pub fn roll_float(&mut self, min: Float, max: Float) -> Float {
        self.roll_with(Float::MAX, Float::MIN, |source| source.next_float(min, max))
    }

    fn roll_with<T>(&mut self, mut lowest: T, mut highest: T, mut sample: impl FnMut(&mut S) -> T) -> T
    where
        T: Copy + PartialOrd + fmt::Debug,
    {
        for _ in 0..self.config.roll_count.get() {
            let r = sample(&mut self.source);
            if r < lowest {
                lowest = r;
            }
            if r > highest {
                highest = r;
            }
        }

        tracing::trace!(?lowest, ?highest, bias = %self.config.bias, "biased roll");
        match self.config.bias {
            Bias::Lower => lowest,
            Bias::Higher => highest,
        }
    }
}

impl<S: UniformSource> UniformSource for BiasedRandom<S> {
    fn next_int(&mut self, min: Int, max: Int) -> Int {
        self.roll_int(min, max)
    }

    fn next_float(&mut self, min: Float, max: Float) -> Float {
        self.roll_float(min, max)
    }
}
