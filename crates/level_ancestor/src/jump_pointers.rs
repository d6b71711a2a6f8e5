use crate::{BuildError, Complexity, LevelAncestor};
use crate::tree::{NO_PARENT, RootedTree};
use crate::util::ceil_log2_nonzero;

/// Builds the full binary-lifting table: `levels` entries per node, where
/// entry `i` is the `2^i`-th ancestor or [`NO_PARENT`]. Level-major within
/// each node (`up[v * levels + i]`).
pub(crate) fn lifting_table(tree: &RootedTree) -> (usize, Vec<usize>) {
    let n = tree.len();
    let levels = (ceil_log2_nonzero(n + 1) as usize).max(1);

    let mut up = vec![NO_PARENT; n * levels];
    for v in 0..n {
        up[v * levels] = tree.parent(v);
    }
    for i in 1..levels {
        for v in 0..n {
            let half = up[v * levels + i - 1];
            if half != NO_PARENT {
                up[v * levels + i] = up[half * levels + i - 1];
            }
        }
    }

    (levels, up)
}

/// Sparse `2^i`-th ancestor pointers on every node; queries peel the set
/// bits of the climb distance.
#[derive(Clone, Debug)]
pub struct JumpPointers {
    tree: RootedTree,
    levels: usize,
    up: Vec<usize>,
}

impl LevelAncestor for JumpPointers {
    const BUILD_COMPLEXITY: Complexity = Complexity::Linearithmic;
    const QUERY_COMPLEXITY: Complexity = Complexity::Logarithmic;

    fn from_tree(tree: RootedTree) -> Result<Self, BuildError> {
        let (levels, up) = lifting_table(&tree);
        Ok(Self { tree, levels, up })
    }

    fn tree(&self) -> &RootedTree {
        &self.tree
    }

    fn query(&self, v: usize, depth: usize) -> Option<usize> {
        if v >= self.tree.len() || depth > self.tree.depth(v) {
            return None;
        }
        let mut u = v;
        let mut steps = self.tree.depth(v) - depth;
        while steps > 0 {
            let bit = steps.trailing_zeros() as usize;
            u = self.up[u * self.levels + bit];
            debug_assert!(u != NO_PARENT);
            steps &= steps - 1;
        }
        Some(u)
    }
}
