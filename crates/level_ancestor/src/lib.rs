mod ancestor_table;
mod jump_ladder;
mod jump_pointers;
mod ladders;
mod macro_micro;
mod tree;
mod util;

pub mod generator;

use thiserror::Error;

pub use ancestor_table::AncestorTable;
pub use jump_ladder::JumpLadder;
pub use jump_pointers::JumpPointers;
pub use ladders::LadderDecomposition;
pub use macro_micro::MacroMicro;
pub use tree::{NO_PARENT, RootedTree, TreeBuilder};

/// Asymptotic class of a build or query routine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Complexity {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    SquareRoot,
}

impl Complexity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Constant => "O(1)",
            Self::Logarithmic => "O(log n)",
            Self::Linear => "O(n)",
            Self::Linearithmic => "O(n log n)",
            Self::Quadratic => "O(n^2)",
            Self::SquareRoot => "O(sqrt n)",
        }
    }
}

/// Construction failures. Query misuse is not an error: out-of-range
/// depths and node ids answer `None`.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuildError {
    #[error("node {node} is unreachable from root {root}")]
    Unreachable { node: usize, root: usize },
    #[error("{n} nodes exceed the ancestor table cap of {cap}")]
    CapacityExceeded { n: usize, cap: usize },
    #[error("node {node} is out of range for {n} nodes")]
    NodeOutOfRange { node: usize, n: usize },
    #[error("child {child} already has a parent")]
    DuplicateParent { child: usize },
    #[error("root {root} must not have a parent edge")]
    RootHasParent { root: usize },
    #[error("tree has no nodes")]
    EmptyTree,
}

/// Static level-ancestor structure over a [`RootedTree`].
///
/// `query(v, d)` answers the unique ancestor of `v` at depth `d`:
/// `Some(v)` when `d == depth(v)`, `None` when `d > depth(v)` or `v` is
/// not a node id. The query path never allocates.
pub trait LevelAncestor: Sized {
    const BUILD_COMPLEXITY: Complexity;
    const QUERY_COMPLEXITY: Complexity;

    fn from_tree(tree: RootedTree) -> Result<Self, BuildError>;

    fn from_parents(parents: &[usize]) -> Result<Self, BuildError> {
        Self::from_tree(RootedTree::from_parents(parents)?)
    }

    fn tree(&self) -> &RootedTree;

    fn query(&self, v: usize, depth: usize) -> Option<usize>;
}
