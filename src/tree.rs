//! Binary coalescent tree built from a single Newick line.
//!
//! # Overview
//! Every internal node is one coalescence event, every leaf one sampled lineage.
//! The two children of an internal node live in a single boxed pair, so a node
//! always has either zero or two children:
//! ```text
//!            root (t = 2.0)
//!           /    \
//!          A      node1 (t = 1.0)
//!                 /   \
//!                B     C
//! ```
//!
//! `branch_length` belongs to the edge *above* a node, exactly as it is written
//! after the node in the Newick string. `coalescence_time` is not parsed but
//! filled in by [`collect_coalescence_times`](crate::coalescence::collect_coalescence_times).

/// One node of a binary coalescent tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeNode {
    /// Left and right child, owned together.
    pub children: Option<Box<(TreeNode, TreeNode)>>,

    /// Length of the edge connecting this node to its parent (unused for the root).
    pub branch_length: f64,

    /// Absolute time of this coalescence; 0 for leaves.
    pub coalescence_time: f64,
}

impl TreeNode {
    /// A sampled lineage without children.
    pub fn leaf() -> Self {
        Self::default()
    }

    /// A coalescence event merging `left` and `right`.
    pub fn internal(left: TreeNode, right: TreeNode) -> Self {
        TreeNode {
            children: Some(Box::new((left, right))),
            ..Self::default()
        }
    }

    /// Sets the length of the edge above this node.
    pub fn with_branch_length(mut self, branch_length: f64) -> Self {
        self.branch_length = branch_length;
        self
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.children.as_deref().map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.children.as_deref().map(|(_, right)| right)
    }

    /// Number of sampled lineages below (and including) this node.
    pub fn num_leaves(&self) -> usize {
        match self.children.as_deref() {
            None => 1,
            Some((left, right)) => left.num_leaves() + right.num_leaves(),
        }
    }

    /// Number of coalescence events below (and including) this node.
    pub fn num_internal(&self) -> usize {
        match self.children.as_deref() {
            None => 0,
            Some((left, right)) => 1 + left.num_internal() + right.num_internal(),
        }
    }

    /// Depth of every internal node in pre-order, the root being at depth 0.
    pub fn internal_depths(&self) -> Vec<usize> {
        let mut depths = Vec::with_capacity(self.num_internal());
        self.push_internal_depths(0, &mut depths);
        depths
    }

    fn push_internal_depths(&self, depth: usize, depths: &mut Vec<usize>) {
        if let Some((left, right)) = self.children.as_deref() {
            depths.push(depth);
            left.push_internal_depths(depth + 1, depths);
            right.push_internal_depths(depth + 1, depths);
        }
    }
}
