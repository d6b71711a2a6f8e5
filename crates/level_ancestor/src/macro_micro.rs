use std::collections::HashMap;

use crate::{BuildError, Complexity, LevelAncestor};
use crate::ladders::LadderSet;
use crate::tree::{NO_PARENT, RootedTree};
use crate::util::{ceil_log2_nonzero, floor_log2_nonzero};

const NONE: usize = usize::MAX;

/// Macro-micro level ancestor (Bender & Farach-Colton): linear build,
/// constant-time queries.
///
/// Nodes whose subtree fits under a logarithmic cutoff form micro trees
/// answered by tables shared per tree shape; the macro remainder is
/// answered by one jump-pointer step from a cached jump-node descendant
/// followed by one ladder read. Jump pointers exist only on macro nodes
/// whose children are all micro, which keeps them sparse enough for the
/// linear space bound.
#[derive(Clone, Debug)]
pub struct MacroMicro {
    tree: RootedTree,
    ladders: LadderSet,
    micro_root: Vec<usize>,
    jump_levels: usize,
    jump_row: Vec<usize>,
    jump_up: Vec<usize>,
    jump_desc: Vec<usize>,
    micro_tree_id: Vec<usize>,
    micro_index: Vec<usize>,
    micro_offsets: Vec<usize>,
    micro_nodes: Vec<usize>,
    micro_table_of: Vec<usize>,
    tables: Vec<MicroTable>,
}

#[derive(Clone, Debug)]
struct MicroTable {
    shape: u64,
    size: usize,
    at_depth: Vec<usize>,
}

/// Largest subtree size still considered micro: max(1, ⌊log₂(n+1)⌋ / 4).
fn micro_cutoff(n: usize) -> usize {
    ((floor_log2_nonzero(n + 1) as usize) / 4).max(1)
}

impl MacroMicro {
    fn partition(tree: &RootedTree, order: &[usize], cutoff: usize) -> Vec<usize> {
        let mut micro_root = vec![NONE; tree.len()];
        for &v in order {
            let p = tree.parent(v);
            if p != NO_PARENT && micro_root[p] != NONE {
                micro_root[v] = micro_root[p];
            } else if tree.subtree_size(v) <= cutoff {
                micro_root[v] = v;
            }
        }
        micro_root
    }

    fn build_jump_table(
        tree: &RootedTree,
        ladders: &LadderSet,
        micro_root: &[usize],
    ) -> (usize, Vec<usize>, Vec<usize>) {
        let n = tree.len();
        let levels = (ceil_log2_nonzero(n + 1) as usize).max(1);

        let mut jump_row = vec![NONE; n];
        let mut rows = 0;
        for v in 0..n {
            let is_jump = micro_root[v] == NONE
                && tree.children(v).iter().all(|&c| micro_root[c] != NONE);
            if is_jump {
                jump_row[v] = rows;
                rows += 1;
            }
        }

        let mut jump_up = vec![NONE; rows * levels];
        for v in 0..n {
            let row = jump_row[v];
            if row == NONE {
                continue;
            }
            jump_up[row * levels] = tree.parent(v);
            for i in 1..levels {
                let prev = jump_up[row * levels + i - 1];
                let step = 1_usize << (i - 1);
                if prev == NONE || tree.depth(prev) < step {
                    break;
                }
                jump_up[row * levels + i] = ladders.climb(tree, prev, step);
            }
        }

        (levels, jump_row, jump_up)
    }

    fn propagate_jump_descendants(
        tree: &RootedTree,
        order: &[usize],
        micro_root: &[usize],
        jump_row: &[usize],
    ) -> Vec<usize> {
        let mut jump_desc = vec![NONE; tree.len()];
        for &v in order.iter().rev() {
            if micro_root[v] != NONE {
                continue;
            }
            if jump_row[v] != NONE {
                jump_desc[v] = v;
                continue;
            }
            for &c in tree.children(v) {
                if jump_desc[c] != NONE {
                    jump_desc[v] = jump_desc[c];
                    break;
                }
            }
            debug_assert!(jump_desc[v] != NONE);
        }
        jump_desc
    }
}

impl LevelAncestor for MacroMicro {
    const BUILD_COMPLEXITY: Complexity = Complexity::Linear;
    const QUERY_COMPLEXITY: Complexity = Complexity::Constant;

    fn from_tree(tree: RootedTree) -> Result<Self, BuildError> {
        let n = tree.len();
        let cutoff = micro_cutoff(n);
        let order = tree.bfs_order();

        let micro_root = Self::partition(&tree, &order, cutoff);
        let ladders = LadderSet::build(&tree);
        let (jump_levels, jump_row, jump_up) =
            Self::build_jump_table(&tree, &ladders, &micro_root);
        let jump_desc =
            Self::propagate_jump_descendants(&tree, &order, &micro_root, &jump_row);

        let mut micro_tree_id = vec![NONE; n];
        let mut micro_index = vec![NONE; n];
        let mut micro_offsets = vec![0_usize];
        let mut micro_nodes = Vec::new();
        let mut micro_table_of = Vec::new();
        let mut tables: Vec<MicroTable> = Vec::new();
        let mut shape_index: HashMap<u64, usize> = HashMap::new();

        for &r in &order {
            if micro_root[r] != r {
                continue;
            }
            let id = micro_offsets.len() - 1;
            let start = micro_nodes.len();
            micro_tree_id[r] = id;
            micro_index[r] = 0;
            micro_nodes.push(r);

            // Euler-tour bits in preorder: 0 going down, 1 coming back,
            // nothing on the micro root itself.
            let mut shape = 0_u64;
            let mut bit = 0_u32;
            let mut stack: Vec<(usize, usize)> = vec![(r, 0)];
            while let Some(&mut (v, ref mut next)) = stack.last_mut() {
                let kids = tree.children(v);
                if *next < kids.len() {
                    let c = kids[*next];
                    *next += 1;
                    micro_tree_id[c] = id;
                    micro_index[c] = micro_nodes.len() - start;
                    micro_nodes.push(c);
                    bit += 1;
                    stack.push((c, 0));
                } else {
                    stack.pop();
                    if v != r {
                        shape |= 1_u64 << bit;
                        bit += 1;
                    }
                }
            }

            micro_offsets.push(micro_nodes.len());
            let table_of = match shape_index.get(&shape) {
                Some(&existing) => existing,
                None => {
                    let built = build_micro_table(
                        &tree,
                        shape,
                        &micro_nodes[start..],
                        &micro_index,
                    );
                    tables.push(built);
                    shape_index.insert(shape, tables.len() - 1);
                    tables.len() - 1
                }
            };
            micro_table_of.push(table_of);
        }

        Ok(Self {
            tree,
            ladders,
            micro_root,
            jump_levels,
            jump_row,
            jump_up,
            jump_desc,
            micro_tree_id,
            micro_index,
            micro_offsets,
            micro_nodes,
            micro_table_of,
            tables,
        })
    }

    fn tree(&self) -> &RootedTree {
        &self.tree
    }

    fn query(&self, v: usize, depth: usize) -> Option<usize> {
        let tree = &self.tree;
        if v >= tree.len() || depth > tree.depth(v) {
            return None;
        }

        let mut v = v;
        if self.micro_root[v] != NONE {
            let r = self.micro_root[v];
            let root_depth = tree.depth(r);
            if depth >= root_depth {
                let id = self.micro_tree_id[v];
                let table = &self.tables[self.micro_table_of[id]];
                let local =
                    table.at_depth[self.micro_index[v] * table.size + (depth - root_depth)];
                debug_assert!(local != NONE);
                return Some(self.micro_nodes[self.micro_offsets[id] + local]);
            }
            let p = tree.parent(r);
            if p == NO_PARENT {
                return None;
            }
            v = p;
        }

        if tree.depth(v) == depth {
            return Some(v);
        }

        let j = self.jump_desc[v];
        debug_assert!(j != NONE);
        let delta = tree.depth(j) - depth;
        let b = floor_log2_nonzero(delta) as usize;
        let u = self.jump_up[self.jump_row[j] * self.jump_levels + b];
        debug_assert!(u != NONE);
        if tree.depth(u) == depth {
            return Some(u);
        }
        Some(self.ladders.climb(tree, u, tree.depth(u) - depth))
    }
}

fn build_micro_table(
    tree: &RootedTree,
    shape: u64,
    nodes: &[usize],
    micro_index: &[usize],
) -> MicroTable {
    let size = nodes.len();
    let root_depth = tree.depth(nodes[0]);
    let mut at_depth = vec![NONE; size * size];
    for i in 0..size {
        let mut j = i;
        loop {
            let local_depth = tree.depth(nodes[j]) - root_depth;
            at_depth[i * size + local_depth] = j;
            if j == 0 {
                break;
            }
            j = micro_index[tree.parent(nodes[j])];
        }
    }
    MicroTable {
        shape,
        size,
        at_depth,
    }
}
