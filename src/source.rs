use crate::biased::BiasedRandom;
use crate::common::{Float, Int};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::Ordering;

/// A generator of uniformly distributed numbers over half-open ranges.
///
/// Every call advances the generator, so two consumers sharing one source
/// see values in the order they ask for them.
#[enum_dispatch::enum_dispatch]
pub trait UniformSource {
    /// Generates an integer in `[min, max)`. Returns `min` if the range is empty.
    fn next_int(&mut self, min: Int, max: Int) -> Int;

    /// Generates a float in `[min, max)`. Returns `min` if the range is empty.
    fn next_float(&mut self, min: Float, max: Float) -> Float;

    fn next_int_any(&mut self) -> Int {
        self.next_int(0, Int::MAX)
    }

    fn next_int_below(&mut self, max: Int) -> Int {
        self.next_int(0, max)
    }

    fn next_float_any(&mut self) -> Float {
        self.next_float(0.0, Float::MAX)
    }

    fn next_float_below(&mut self, max: Float) -> Float {
        self.next_float(0.0, max)
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_int(&mut self, min: Int, max: Int) -> Int {
        (**self).next_int(min, max)
    }

    fn next_float(&mut self, min: Float, max: Float) -> Float {
        (**self).next_float(min, max)
    }
}

/// Plain uniform generator over any [rand::Rng].
#[derive(Debug, Clone)]
pub struct RegularRandom<R = StdRng> {
    rng: R,
}

impl RegularRandom {
    /// Creates a generator seeded from operating system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates a generator whose output is fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for RegularRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RegularRandom<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> UniformSource for RegularRandom<R> {
    fn next_int(&mut self, min: Int, max: Int) -> Int {
        if max <= min {
            min
        } else {
            self.rng.gen_range(min..max)
        }
    }

    fn next_float(&mut self, min: Float, max: Float) -> Float {
        if max.partial_cmp(&min) != Some(Ordering::Greater) {
            return min;
        }
        if (max - min).is_finite() {
            self.rng.gen_range(min..max)
        } else {
            // The span overflows, so interpolate without computing it.
            let t: Float = self.rng.gen();
            min * (1.0 - t) + max * t
        }
    }
}

/// A source picked at runtime.
#[enum_dispatch::enum_dispatch(UniformSource)]
#[derive(Debug, Clone)]
pub enum Source {
    Regular(RegularRandom),
    Biased(BiasedRandom),
}

#[cfg(test)]
pub(crate) use sequence::SequenceSource;
