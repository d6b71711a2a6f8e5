use crate::{BuildError, Complexity, LevelAncestor};
use crate::jump_pointers::lifting_table;
use crate::ladders::LadderSet;
use crate::tree::RootedTree;
use crate::util::floor_log2_nonzero;

/// Jump pointers combined with ladders: one power-of-two jump covers more
/// than half the climb, and the remainder stays inside the landing node's
/// ladder, one indexed read away.
#[derive(Clone, Debug)]
pub struct JumpLadder {
    tree: RootedTree,
    levels: usize,
    up: Vec<usize>,
    ladders: LadderSet,
}

impl LevelAncestor for JumpLadder {
    const BUILD_COMPLEXITY: Complexity = Complexity::Linearithmic;
    const QUERY_COMPLEXITY: Complexity = Complexity::Constant;

    fn from_tree(tree: RootedTree) -> Result<Self, BuildError> {
        let (levels, up) = lifting_table(&tree);
        let ladders = LadderSet::build(&tree);
        Ok(Self {
            tree,
            levels,
            up,
            ladders,
        })
    }

    fn tree(&self) -> &RootedTree {
        &self.tree
    }

    fn query(&self, v: usize, depth: usize) -> Option<usize> {
        if v >= self.tree.len() || depth > self.tree.depth(v) {
            return None;
        }
        let delta = self.tree.depth(v) - depth;
        if delta == 0 {
            return Some(v);
        }
        let b = floor_log2_nonzero(delta) as usize;
        let u = self.up[v * self.levels + b];
        Some(self.ladders.climb(&self.tree, u, delta - (1 << b)))
    }
}

#[cfg(test)]
mod tests {
    use super::JumpLadder;
    use crate::LevelAncestor;
    use crate::tree::NO_PARENT;

    #[test]
    fn jump_then_single_ladder_read() {
        let parents = [NO_PARENT, 0, 0, 1, 1, 2, 3, 6, 7, 8, 9];
        let la = JumpLadder::from_parents(&parents).unwrap();
        let tree = la.tree();
        for v in 0..parents.len() {
            for d in 0..=tree.depth(v) {
                let mut u = v;
                for _ in 0..(tree.depth(v) - d) {
                    u = tree.parent(u);
                }
                assert_eq!(la.query(v, d), Some(u), "v={v} d={d}");
            }
            assert_eq!(la.query(v, tree.depth(v) + 1), None);
        }
    }
}
