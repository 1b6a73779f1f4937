//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Forms that parse to nothing: separators, comments and discards.
const FILLERS: &[&str] = &[
    " ",
    ",",
    "\n",
    "\t",
    ", ,",
    "; a comment\n",
    ";\n",
    "#_ :gone ",
    "#_[1 (2) #{3}] ",
    "#_\"str ; not a comment\" ",
    "#_ #_ a b ",
];

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("EDN_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// A run of filler that yields no values (geometric length, α=0.5).
    ///
    /// Always ends on a separator, so it can sit directly before any form.
    pub fn filler(&mut self) -> String {
        let mut out = String::from(" ");
        for _ in 0..self.geometric(0.5) {
            out.push_str(FILLERS[self.rng.gen_range(0..FILLERS.len())]);
        }
        out
    }

    /// Split `text` into consecutive chunks at random character boundaries.
    ///
    /// Chunk lengths are geometric, so empty and one-character chunks are
    /// common.
    pub fn chunks<'a>(&mut self, text: &'a str) -> Vec<&'a str> {
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut chunks = Vec::new();
        let mut at = 0;
        while at + 1 < boundaries.len() {
            let step = self.geometric(0.7).min(boundaries.len() - 1 - at);
            let next = at + step;
            chunks.push(&text[boundaries[at]..boundaries[next]]);
            at = next;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.filler(), g2.filler());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_chunks_cover_input() {
        let mut gen = Gen::new(7);
        let text = "(héllo [1 2] \"wörld\")";
        for _ in 0..50 {
            assert_eq!(gen.chunks(text).concat(), text);
        }
    }
}
