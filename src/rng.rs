//! Pluggable randomness for tie-breaks and common-event draws.
//!
//! Everything that draws a random number takes a [`RandomSource`], so tests
//! can pin the outcome with a seed or a scripted source.
//!
//! ```
//! use aftermath::{RandomSource, SelectionRng};
//!
//! let mut a = SelectionRng::new(7);
//! let mut b = SelectionRng::new(7);
//! assert_eq!(a.pick(10), b.pick(10));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniform indices.
pub trait RandomSource {
    /// Return an index in `0..len`, uniformly. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl dyn RandomSource + '_ {
    /// Choose one element of `items` uniformly, or `None` when it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.pick(items.len()))
    }
}

/// Seedable ChaCha8 generator, the default [`RandomSource`].
#[derive(Clone, Debug)]
pub struct SelectionRng {
    inner: ChaCha8Rng,
    seed: Option<u64>,
}

impl SelectionRng {
    /// Deterministic generator: the same seed yields the same draws.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// The seed this generator was created with, if it was seeded explicitly.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SelectionRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SelectionRng {
    fn pick(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}
