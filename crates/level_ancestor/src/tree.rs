use crate::BuildError;

/// Sentinel parent id of the root (the `-1` of parent-array input).
pub const NO_PARENT: usize = usize::MAX;

/// Immutable rooted tree over node ids `0..n`, with per-node metrics.
///
/// Child lists keep edge insertion order. Depth of the root is 0, height
/// of a leaf is 1, subtree size of a leaf is 1.
#[derive(Clone, Debug)]
pub struct RootedTree {
    root: usize,
    parent: Vec<usize>,
    child_offsets: Vec<usize>,
    child_list: Vec<usize>,
    depth: Vec<usize>,
    height: Vec<usize>,
    subtree_size: Vec<usize>,
}

impl RootedTree {
    /// Builds from a parent array with `parents[0] == NO_PARENT` and root 0.
    pub fn from_parents(parents: &[usize]) -> Result<Self, BuildError> {
        let mut builder = TreeBuilder::new(parents.len());
        for (child, &parent) in parents.iter().enumerate().skip(1) {
            if parent != NO_PARENT {
                builder.add_edge(parent, child)?;
            }
        }
        if !parents.is_empty() && parents[0] != NO_PARENT {
            return Err(BuildError::RootHasParent { root: 0 });
        }
        builder.build(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Parent of `v`, or [`NO_PARENT`] for the root.
    #[inline]
    pub fn parent(&self, v: usize) -> usize {
        self.parent[v]
    }

    #[inline]
    pub fn depth(&self, v: usize) -> usize {
        self.depth[v]
    }

    #[inline]
    pub fn height(&self, v: usize) -> usize {
        self.height[v]
    }

    #[inline]
    pub fn subtree_size(&self, v: usize) -> usize {
        self.subtree_size[v]
    }

    #[inline]
    pub fn children(&self, v: usize) -> &[usize] {
        &self.child_list[self.child_offsets[v]..self.child_offsets[v + 1]]
    }

    /// Nodes in breadth-first order from the root; every parent precedes
    /// its children.
    pub fn bfs_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len());
        order.push(self.root);
        let mut head = 0;
        while head < order.len() {
            let v = order[head];
            head += 1;
            order.extend_from_slice(self.children(v));
        }
        order
    }
}

/// Edge-collecting construction state; consumed by [`TreeBuilder::build`].
#[derive(Clone, Debug)]
pub struct TreeBuilder {
    parent: Vec<usize>,
    edges: Vec<(usize, usize)>,
}

impl TreeBuilder {
    pub fn new(n: usize) -> Self {
        Self {
            parent: vec![NO_PARENT; n],
            edges: Vec::with_capacity(n.saturating_sub(1)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Records the edge `parent -> child`. Each child accepts one parent.
    pub fn add_edge(&mut self, parent: usize, child: usize) -> Result<(), BuildError> {
        let n = self.parent.len();
        if parent >= n {
            return Err(BuildError::NodeOutOfRange { node: parent, n });
        }
        if child >= n {
            return Err(BuildError::NodeOutOfRange { node: child, n });
        }
        if self.parent[child] != NO_PARENT {
            return Err(BuildError::DuplicateParent { child });
        }
        self.parent[child] = parent;
        self.edges.push((parent, child));
        Ok(())
    }

    /// Finalizes the tree rooted at `root`, computing depth, height and
    /// subtree size. Fails if any node is unreachable from the root.
    pub fn build(self, root: usize) -> Result<RootedTree, BuildError> {
        let n = self.parent.len();
        if n == 0 {
            return Err(BuildError::EmptyTree);
        }
        if root >= n {
            return Err(BuildError::NodeOutOfRange { node: root, n });
        }
        if self.parent[root] != NO_PARENT {
            return Err(BuildError::RootHasParent { root });
        }

        let (child_offsets, child_list) = child_csr(n, &self.edges);

        let mut depth = vec![0_usize; n];
        let mut height = vec![0_usize; n];
        let mut subtree_size = vec![0_usize; n];
        let mut visited = vec![false; n];

        // Post-order with an explicit (node, processed) stack; recursion
        // would overflow on chain-shaped trees.
        let mut stack: Vec<(usize, bool)> = Vec::with_capacity(n);
        stack.push((root, false));
        visited[root] = true;
        while let Some((v, processed)) = stack.pop() {
            let child_range = child_offsets[v]..child_offsets[v + 1];
            if processed {
                let mut size = 1;
                let mut max_child_height = 0;
                for &c in &child_list[child_range] {
                    size += subtree_size[c];
                    max_child_height = max_child_height.max(height[c]);
                }
                subtree_size[v] = size;
                height[v] = 1 + max_child_height;
            } else {
                stack.push((v, true));
                for &c in &child_list[child_range] {
                    debug_assert!(!visited[c]);
                    visited[c] = true;
                    depth[c] = depth[v] + 1;
                    stack.push((c, false));
                }
            }
        }

        if let Some(node) = visited.iter().position(|&seen| !seen) {
            return Err(BuildError::Unreachable { node, root });
        }

        Ok(RootedTree {
            root,
            parent: self.parent,
            child_offsets,
            child_list,
            depth,
            height,
            subtree_size,
        })
    }
}

fn child_csr(n: usize, edges: &[(usize, usize)]) -> (Vec<usize>, Vec<usize>) {
    let mut out_deg = vec![0_usize; n];
    for &(parent, _) in edges {
        out_deg[parent] += 1;
    }

    let mut offsets = vec![0_usize; n + 1];
    for v in 0..n {
        offsets[v + 1] = offsets[v] + out_deg[v];
    }

    let mut child_list = vec![0_usize; edges.len()];
    let mut cursor = offsets[..n].to_vec();
    for &(parent, child) in edges {
        child_list[cursor[parent]] = child;
        cursor[parent] += 1;
    }

    (offsets, child_list)
}

#[cfg(test)]
mod tests {
    use super::{NO_PARENT, RootedTree, TreeBuilder};
    use crate::BuildError;

    #[test]
    fn chain_metrics() {
        let tree = RootedTree::from_parents(&[NO_PARENT, 0, 1, 2, 3]).unwrap();
        assert_eq!(tree.len(), 5);
        for v in 0..5 {
            assert_eq!(tree.depth(v), v);
            assert_eq!(tree.height(v), 5 - v);
            assert_eq!(tree.subtree_size(v), 5 - v);
        }
        assert_eq!(tree.parent(0), NO_PARENT);
        assert_eq!(tree.children(2), &[3]);
        assert_eq!(tree.children(4), &[] as &[usize]);
    }

    #[test]
    fn star_metrics() {
        let tree = RootedTree::from_parents(&[NO_PARENT, 0, 0, 0, 0]).unwrap();
        assert_eq!(tree.height(0), 2);
        assert_eq!(tree.subtree_size(0), 5);
        assert_eq!(tree.children(0), &[1, 2, 3, 4]);
        for v in 1..5 {
            assert_eq!(tree.depth(v), 1);
            assert_eq!(tree.height(v), 1);
            assert_eq!(tree.subtree_size(v), 1);
        }
    }

    #[test]
    fn bushy_metrics() {
        let tree = RootedTree::from_parents(&[NO_PARENT, 0, 0, 1, 1, 2, 3]).unwrap();
        assert_eq!(tree.subtree_size(0), 7);
        assert_eq!(tree.subtree_size(1), 4);
        assert_eq!(tree.subtree_size(2), 2);
        assert_eq!(tree.height(0), 4);
        assert_eq!(tree.height(1), 3);
        assert_eq!(tree.height(3), 2);
        assert_eq!(tree.depth(6), 3);
    }

    #[test]
    fn builder_matches_from_parents() {
        let mut builder = TreeBuilder::new(4);
        builder.add_edge(0, 2).unwrap();
        builder.add_edge(2, 1).unwrap();
        builder.add_edge(2, 3).unwrap();
        let tree = builder.build(0).unwrap();
        assert_eq!(tree.children(2), &[1, 3]);
        assert_eq!(tree.depth(1), 2);
        assert_eq!(tree.subtree_size(2), 3);
    }

    #[test]
    fn builder_rejects_out_of_range_and_duplicate() {
        let mut builder = TreeBuilder::new(3);
        assert_eq!(
            builder.add_edge(0, 3),
            Err(BuildError::NodeOutOfRange { node: 3, n: 3 })
        );
        assert_eq!(
            builder.add_edge(5, 1),
            Err(BuildError::NodeOutOfRange { node: 5, n: 3 })
        );
        builder.add_edge(0, 1).unwrap();
        assert_eq!(
            builder.add_edge(2, 1),
            Err(BuildError::DuplicateParent { child: 1 })
        );
    }

    #[test]
    fn build_rejects_disconnected_node() {
        let mut builder = TreeBuilder::new(3);
        builder.add_edge(0, 1).unwrap();
        assert_eq!(
            builder.build(0).unwrap_err(),
            BuildError::Unreachable { node: 2, root: 0 }
        );
    }

    #[test]
    fn build_rejects_cycle() {
        let mut builder = TreeBuilder::new(4);
        builder.add_edge(0, 1).unwrap();
        builder.add_edge(2, 3).unwrap();
        builder.add_edge(3, 2).unwrap();
        assert!(matches!(
            builder.build(0),
            Err(BuildError::Unreachable { .. })
        ));
    }

    #[test]
    fn build_rejects_rooted_parent_and_empty() {
        let mut builder = TreeBuilder::new(2);
        builder.add_edge(1, 0).unwrap();
        assert_eq!(
            builder.build(0).unwrap_err(),
            BuildError::RootHasParent { root: 0 }
        );

        assert_eq!(
            TreeBuilder::new(0).build(0).unwrap_err(),
            BuildError::EmptyTree
        );
        assert_eq!(
            RootedTree::from_parents(&[]).unwrap_err(),
            BuildError::EmptyTree
        );
    }

    #[test]
    fn from_parents_requires_sentinel_root() {
        assert_eq!(
            RootedTree::from_parents(&[0, 0]).unwrap_err(),
            BuildError::RootHasParent { root: 0 }
        );
    }

    #[test]
    fn non_zero_root_via_builder() {
        let mut builder = TreeBuilder::new(3);
        builder.add_edge(2, 0).unwrap();
        builder.add_edge(2, 1).unwrap();
        let tree = builder.build(2).unwrap();
        assert_eq!(tree.root(), 2);
        assert_eq!(tree.depth(2), 0);
        assert_eq!(tree.depth(0), 1);
    }

    #[test]
    fn single_node_tree() {
        let tree = RootedTree::from_parents(&[NO_PARENT]).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(0), 1);
        assert_eq!(tree.subtree_size(0), 1);
        assert_eq!(tree.bfs_order(), vec![0]);
    }

    #[test]
    fn bfs_order_parents_first() {
        let tree = RootedTree::from_parents(&[NO_PARENT, 0, 0, 1, 1, 2, 3]).unwrap();
        let order = tree.bfs_order();
        assert_eq!(order.len(), tree.len());
        let mut position = vec![0_usize; tree.len()];
        for (i, &v) in order.iter().enumerate() {
            position[v] = i;
        }
        for v in 0..tree.len() {
            if tree.parent(v) != NO_PARENT {
                assert!(position[tree.parent(v)] < position[v]);
            }
        }
    }
}
