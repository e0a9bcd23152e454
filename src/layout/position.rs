//! Abstract node positions.
//!
//! A positioner assigns every node a `breadth` (its place among the leaves)
//! and a `depth` (its distance from the root) inside an [`Extent`]. The
//! projector later turns these into screen coordinates.

use enum_dispatch::enum_dispatch;

use crate::config::TreeType;
use crate::tree::{Hierarchy, NodeIndex};

/// Size of the abstract coordinate space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub breadth: f64,
    pub depth: f64,
}

/// Abstract coordinates of one node
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Slot {
    pub breadth: f64,
    pub depth: f64,
}

/// Output of a positioner
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub slots: Vec<Slot>,
    /// Number of levels below the root, used for the ruler domain
    pub height: usize,
}

impl Placement {
    pub fn slot(&self, index: NodeIndex) -> Slot {
        self.slots[index.0]
    }
}

/// Hierarchical positioning primitive
#[enum_dispatch]
pub trait Position {
    fn position(&self, tree: &Hierarchy, extent: Extent) -> Placement;
}

/// Leaves at their own level; parents centered over their children
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tidy;

/// Every leaf aligned at the far edge of the depth extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cluster;

#[enum_dispatch(Position)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Positioner {
    Tidy(Tidy),
    Cluster(Cluster),
}

impl Positioner {
    /// The positioner each tree type is drawn with
    pub fn for_type(tree_type: TreeType) -> Self {
        match tree_type {
            TreeType::Tree | TreeType::Weighted => Positioner::Tidy(Tidy),
            TreeType::Dendrogram => Positioner::Cluster(Cluster),
        }
    }
}

impl Position for Tidy {
    fn position(&self, tree: &Hierarchy, extent: Extent) -> Placement {
        let mut slots = vec![Slot::default(); tree.len()];
        spread_breadth(tree, extent.breadth, &mut slots);

        let height = tree.height();
        for (index, node) in tree.iter() {
            slots[index.0].depth = level_fraction(node.level, height) * extent.depth;
        }

        Placement { slots, height }
    }
}

impl Position for Cluster {
    fn position(&self, tree: &Hierarchy, extent: Extent) -> Placement {
        let mut slots = vec![Slot::default(); tree.len()];
        spread_breadth(tree, extent.breadth, &mut slots);

        // Edges from each node down to its deepest leaf. Children always have
        // larger indices than their parent, so a reverse scan is post-order.
        let mut below = vec![0usize; tree.len()];
        for (index, node) in tree.iter().collect::<Vec<_>>().into_iter().rev() {
            below[index.0] = node
                .children
                .iter()
                .map(|child| below[child.0] + 1)
                .max()
                .unwrap_or(0);
        }

        let height = below[tree.root().0];
        for (index, _) in tree.iter() {
            slots[index.0].depth = level_fraction(height - below[index.0], height) * extent.depth;
        }

        Placement { slots, height }
    }
}

fn level_fraction(level: usize, height: usize) -> f64 {
    if height == 0 {
        0.0
    } else {
        level as f64 / height as f64
    }
}

/// Leaves take centered, evenly spaced slots; each parent sits midway between
/// its first and last child.
fn spread_breadth(tree: &Hierarchy, extent: f64, slots: &mut [Slot]) {
    let leaf_count = tree.leaf_count().max(1) as f64;
    for (order, leaf) in tree.leaves().enumerate() {
        slots[leaf.0].breadth = (order as f64 + 0.5) / leaf_count * extent;
    }

    let parents: Vec<NodeIndex> = tree
        .iter()
        .filter(|(_, node)| !node.is_leaf())
        .map(|(index, _)| index)
        .collect();
    for parent in parents.into_iter().rev() {
        let children = &tree.node(parent).children;
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            slots[parent.0].breadth = (slots[first.0].breadth + slots[last.0].breadth) / 2.0;
        }
    }
}
