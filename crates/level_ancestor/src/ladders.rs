use crate::{BuildError, Complexity, LevelAncestor};
use crate::tree::{NO_PARENT, RootedTree};

/// Long-path decomposition with upward extensions.
///
/// Every node owns a position in exactly one ladder (its long path); the
/// ladder additionally carries up to one path-length of ancestors above
/// the path head. Each ladder is a vertical chain, so an ancestor inside
/// it is a single index subtraction.
#[derive(Clone, Debug)]
pub(crate) struct LadderSet {
    offsets: Vec<usize>,
    nodes: Vec<usize>,
    ladder_id: Vec<usize>,
    ladder_pos: Vec<usize>,
}

impl LadderSet {
    pub(crate) fn build(tree: &RootedTree) -> Self {
        let n = tree.len();

        // Tallest child, strict comparison, first encountered wins.
        let mut long_path_child = vec![NO_PARENT; n];
        for v in 0..n {
            let mut best = NO_PARENT;
            let mut best_height = 0;
            for &c in tree.children(v) {
                if tree.height(c) > best_height {
                    best = c;
                    best_height = tree.height(c);
                }
            }
            long_path_child[v] = best;
        }

        let mut ladder_id = vec![0_usize; n];
        let mut ladder_pos = vec![0_usize; n];
        let mut paths: Vec<Vec<usize>> = Vec::new();

        for head in 0..n {
            let p = tree.parent(head);
            if p != NO_PARENT && long_path_child[p] == head {
                continue;
            }
            let id = paths.len();
            let mut path = Vec::new();
            let mut v = head;
            loop {
                ladder_id[v] = id;
                ladder_pos[v] = path.len();
                path.push(v);
                if long_path_child[v] == NO_PARENT {
                    break;
                }
                v = long_path_child[v];
            }
            paths.push(path);
        }

        // Extend each path upward by its own length; positions of the
        // path's own members shift by the extension length.
        for path in &mut paths {
            let reach = path.len();
            let mut extension = Vec::new();
            let mut u = tree.parent(path[0]);
            while extension.len() < reach && u != NO_PARENT {
                extension.push(u);
                u = tree.parent(u);
            }
            if extension.is_empty() {
                continue;
            }
            extension.reverse();
            for &v in path.iter() {
                ladder_pos[v] += extension.len();
            }
            extension.extend_from_slice(path);
            *path = extension;
        }

        let mut offsets = Vec::with_capacity(paths.len() + 1);
        offsets.push(0);
        let mut nodes = Vec::new();
        for path in &paths {
            nodes.extend_from_slice(path);
            offsets.push(nodes.len());
        }

        Self {
            offsets,
            nodes,
            ladder_id,
            ladder_pos,
        }
    }

    #[cfg(test)]
    pub(crate) fn ladder_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[cfg(test)]
    pub(crate) fn total_len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn ladder(&self, id: usize) -> &[usize] {
        &self.nodes[self.offsets[id]..self.offsets[id + 1]]
    }

    #[cfg(test)]
    pub(crate) fn position(&self, v: usize) -> (usize, usize) {
        (self.ladder_id[v], self.ladder_pos[v])
    }

    /// Ancestor of `u` at depth `u_depth - climb`, hopping to the parent
    /// of the ladder top whenever the current ladder falls short.
    pub(crate) fn climb(&self, tree: &RootedTree, mut u: usize, climb: usize) -> usize {
        debug_assert!(tree.depth(u) >= climb);
        let target = tree.depth(u) - climb;
        loop {
            let start = self.offsets[self.ladder_id[u]];
            let top = self.nodes[start];
            let top_depth = tree.depth(top);
            if top_depth <= target {
                return self.nodes[start + (target - top_depth)];
            }
            u = tree.parent(top);
        }
    }
}

/// Ladder-only level ancestor: linear build, logarithmic climb. Each
/// ladder hop at least doubles the levels already covered.
#[derive(Clone, Debug)]
pub struct LadderDecomposition {
    tree: RootedTree,
    ladders: LadderSet,
}

impl LevelAncestor for LadderDecomposition {
    const BUILD_COMPLEXITY: Complexity = Complexity::Linear;
    const QUERY_COMPLEXITY: Complexity = Complexity::Logarithmic;

    fn from_tree(tree: RootedTree) -> Result<Self, BuildError> {
        let ladders = LadderSet::build(&tree);
        Ok(Self { tree, ladders })
    }

    fn tree(&self) -> &RootedTree {
        &self.tree
    }

    fn query(&self, v: usize, depth: usize) -> Option<usize> {
        if v >= self.tree.len() || depth > self.tree.depth(v) {
            return None;
        }
        let climb = self.tree.depth(v) - depth;
        Some(self.ladders.climb(&self.tree, v, climb))
    }
}

#[cfg(test)]
mod tests {
    use super::{LadderDecomposition, LadderSet};
    use crate::LevelAncestor;
    use crate::generator::{TreeCase, generate_parents};
    use crate::tree::{NO_PARENT, RootedTree};

    fn build(parents: &[usize]) -> (RootedTree, LadderSet) {
        let tree = RootedTree::from_parents(parents).unwrap();
        let ladders = LadderSet::build(&tree);
        (tree, ladders)
    }

    #[test]
    fn bushy_paths_and_extensions() {
        let (_, ladders) = build(&[NO_PARENT, 0, 0, 1, 1, 2, 3]);
        assert_eq!(ladders.ladder_count(), 3);
        assert_eq!(ladders.ladder(0), &[0, 1, 3, 6]);
        assert_eq!(ladders.ladder(1), &[0, 2, 5]);
        assert_eq!(ladders.ladder(2), &[1, 4]);
        assert_eq!(ladders.position(5), (1, 2));
        assert_eq!(ladders.position(4), (2, 1));
        assert_eq!(ladders.position(3), (0, 2));
    }

    #[test]
    fn ladders_are_vertical_chains() {
        for case in [
            TreeCase::Chain,
            TreeCase::Star,
            TreeCase::CompleteBinary,
            TreeCase::Caterpillar,
            TreeCase::RandomAttach,
        ] {
            let parents = generate_parents(case, 200, 0x1AD);
            let (tree, ladders) = build(&parents);
            for id in 0..ladders.ladder_count() {
                let rung = ladders.ladder(id);
                for w in rung.windows(2) {
                    assert_eq!(tree.parent(w[1]), w[0], "case={}", case.label());
                }
            }
        }
    }

    #[test]
    fn every_node_owns_one_position() {
        let parents = generate_parents(TreeCase::RandomAttach, 300, 0xB0B);
        let (_, ladders) = build(&parents);
        for v in 0..parents.len() {
            let (id, pos) = ladders.position(v);
            assert_eq!(ladders.ladder(id)[pos], v);
        }
    }

    #[test]
    fn total_length_at_most_twice_n() {
        for case in [
            TreeCase::Chain,
            TreeCase::Star,
            TreeCase::CompleteBinary,
            TreeCase::Caterpillar,
            TreeCase::Broom,
            TreeCase::RandomAttach,
            TreeCase::SkewedAttach,
        ] {
            for n in [1, 10, 128, 777] {
                let parents = generate_parents(case, n, 0xC0C0A);
                let (_, ladders) = build(&parents);
                assert!(
                    ladders.total_len() <= 2 * n,
                    "case={} n={n} len={}",
                    case.label(),
                    ladders.total_len()
                );
            }
        }
    }

    #[test]
    fn extension_covers_path_length_or_hits_root() {
        let parents = generate_parents(TreeCase::SkewedAttach, 400, 0xE47);
        let (tree, ladders) = build(&parents);
        for id in 0..ladders.ladder_count() {
            let rung = ladders.ladder(id);
            let own_len = rung
                .iter()
                .filter(|&&v| ladders.position(v).0 == id)
                .count();
            let extension_len = rung.len() - own_len;
            let head = rung[extension_len];
            assert_eq!(extension_len, own_len.min(tree.depth(head)));
            for &v in &rung[extension_len..] {
                assert_eq!(ladders.position(v).0, id);
            }
        }
    }

    #[test]
    fn climb_within_and_across_ladders() {
        let la = LadderDecomposition::from_parents(&[NO_PARENT, 0, 0, 1, 1, 2, 3]).unwrap();
        assert_eq!(la.query(5, 1), Some(2));
        assert_eq!(la.query(5, 0), Some(0));
        assert_eq!(la.query(4, 1), Some(1));
        assert_eq!(la.query(4, 0), Some(0));
        assert_eq!(la.query(6, 2), Some(3));
        assert_eq!(la.query(6, 5), None);
    }
}
