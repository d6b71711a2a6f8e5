//! Parent-array generators for the tree shapes the tests and benches
//! care about: degenerate chains and stars, balanced trees, and random
//! attachments with controlled skew.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::tree::NO_PARENT;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TreeCase {
    Chain,
    Star,
    CompleteBinary,
    Caterpillar,
    Broom,
    RandomAttach,
    SkewedAttach,
}

impl TreeCase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::Star => "star",
            Self::CompleteBinary => "complete_binary",
            Self::Caterpillar => "caterpillar",
            Self::Broom => "broom",
            Self::RandomAttach => "random_attach",
            Self::SkewedAttach => "skewed_attach",
        }
    }
}

/// Parent array for `case` with `n` nodes, rooted at 0. Random cases are
/// deterministic per seed.
pub fn generate_parents(case: TreeCase, n: usize, seed: u64) -> Vec<usize> {
    let mut parents = vec![NO_PARENT; n];
    match case {
        TreeCase::Chain => {
            for i in 1..n {
                parents[i] = i - 1;
            }
        }
        TreeCase::Star => {
            for i in 1..n {
                parents[i] = 0;
            }
        }
        TreeCase::CompleteBinary => {
            for i in 1..n {
                parents[i] = (i - 1) / 2;
            }
        }
        TreeCase::Caterpillar => {
            // Spine on even ids, one leg hanging off each spine node.
            for i in 1..n {
                parents[i] = if i % 2 == 0 { i - 2 } else { i - 1 };
            }
        }
        TreeCase::Broom => {
            let handle = (n / 2).max(1);
            for i in 1..n {
                parents[i] = if i < handle { i - 1 } else { handle - 1 };
            }
        }
        TreeCase::RandomAttach => {
            let mut rng = StdRng::seed_from_u64(seed);
            for i in 1..n {
                parents[i] = rng.random_range(0..i);
            }
        }
        TreeCase::SkewedAttach => {
            let mut rng = StdRng::seed_from_u64(seed);
            for i in 1..n {
                parents[i] = rng.random_range(i.saturating_sub(4)..i);
            }
        }
    }
    parents
}
