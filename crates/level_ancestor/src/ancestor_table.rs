use crate::{BuildError, Complexity, LevelAncestor};
use crate::tree::RootedTree;

/// Full per-node ancestor rows: `row(v)[d]` is the ancestor of `v` at
/// depth `d`. Quadratic storage, so construction is capped by node count.
#[derive(Clone, Debug)]
pub struct AncestorTable {
    tree: RootedTree,
    row_offsets: Vec<usize>,
    table: Vec<usize>,
}

impl AncestorTable {
    pub const DEFAULT_NODE_CAP: usize = 1000;

    /// Builds with an explicit cap instead of [`Self::DEFAULT_NODE_CAP`].
    pub fn with_node_cap(tree: RootedTree, cap: usize) -> Result<Self, BuildError> {
        let n = tree.len();
        if n > cap {
            return Err(BuildError::CapacityExceeded { n, cap });
        }

        let mut row_offsets = Vec::with_capacity(n + 1);
        row_offsets.push(0);
        for v in 0..n {
            row_offsets.push(row_offsets[v] + tree.depth(v) + 1);
        }

        let mut table = vec![0_usize; row_offsets[n]];
        let root = tree.root();
        table[row_offsets[root]] = root;

        // Preorder guarantees the parent row is complete before it is
        // inherited by each child.
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            let row_len = tree.depth(v) + 1;
            for &c in tree.children(v) {
                let src = row_offsets[v];
                let dst = row_offsets[c];
                table.copy_within(src..src + row_len, dst);
                table[dst + row_len] = c;
                stack.push(c);
            }
        }

        Ok(Self {
            tree,
            row_offsets,
            table,
        })
    }
}

impl LevelAncestor for AncestorTable {
    const BUILD_COMPLEXITY: Complexity = Complexity::Quadratic;
    const QUERY_COMPLEXITY: Complexity = Complexity::Constant;

    fn from_tree(tree: RootedTree) -> Result<Self, BuildError> {
        Self::with_node_cap(tree, Self::DEFAULT_NODE_CAP)
    }

    fn tree(&self) -> &RootedTree {
        &self.tree
    }

    fn query(&self, v: usize, depth: usize) -> Option<usize> {
        if v >= self.tree.len() || depth > self.tree.depth(v) {
            return None;
        }
        Some(self.table[self.row_offsets[v] + depth])
    }
}

#[cfg(test)]
mod tests {
    use super::AncestorTable;
    use crate::{BuildError, LevelAncestor};
    use crate::tree::{NO_PARENT, RootedTree};

    #[test]
    fn rows_cover_every_prefix() {
        let la = AncestorTable::from_parents(&[NO_PARENT, 0, 0, 1, 1, 2, 3]).unwrap();
        assert_eq!(la.query(6, 0), Some(0));
        assert_eq!(la.query(6, 1), Some(1));
        assert_eq!(la.query(6, 2), Some(3));
        assert_eq!(la.query(6, 3), Some(6));
        assert_eq!(la.query(5, 1), Some(2));
        assert_eq!(la.query(5, 2), Some(5));
        assert_eq!(la.query(0, 1), None);
    }

    #[test]
    fn cap_is_enforced() {
        let parents: Vec<usize> = std::iter::once(NO_PARENT)
            .chain((1..12).map(|i| i - 1))
            .collect();
        let tree = RootedTree::from_parents(&parents).unwrap();
        assert_eq!(
            AncestorTable::with_node_cap(tree.clone(), 11).unwrap_err(),
            BuildError::CapacityExceeded { n: 12, cap: 11 }
        );
        let la = AncestorTable::with_node_cap(tree, 12).unwrap();
        assert_eq!(la.query(11, 4), Some(4));
    }
}
