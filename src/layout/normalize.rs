//! Cumulative branch distances, normalized to `[0, 1]`.

use crate::tree::{Hierarchy, NodeIndex};

/// Distance of every node from the root, raw and normalized
#[derive(Clone, Debug, PartialEq)]
pub struct Distances {
    cumulative: Vec<f64>,
    normalized: Vec<f64>,
    min: f64,
    max: f64,
}

impl Distances {
    /// Walk the tree once, parent before children.
    ///
    /// The root's own length is ignored (it has no parent branch), so the root
    /// sits at 0 and the farthest node at 1. A tree without any positive branch
    /// length normalizes to all zeros.
    pub fn compute(tree: &Hierarchy) -> Self {
        let mut cumulative = vec![0.0; tree.len()];
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for (index, node) in tree.iter() {
            let value = match node.parent {
                Some(parent) => cumulative[parent.0] + node.length_or_zero(),
                None => 0.0,
            };
            cumulative[index.0] = value;
            min = min.min(value);
            max = max.max(value);
        }

        let normalized = if max > 0.0 {
            cumulative.iter().map(|value| value / max).collect()
        } else {
            vec![0.0; cumulative.len()]
        };

        crate::log::debug!(nodes = tree.len(), min, max, "normalized branch distances");

        Self {
            cumulative,
            normalized,
            min,
            max,
        }
    }

    /// Sum of branch lengths from the root
    pub fn cumulative(&self, index: NodeIndex) -> f64 {
        self.cumulative[index.0]
    }

    /// Cumulative distance divided by the global maximum
    pub fn normalized(&self, index: NodeIndex) -> f64 {
        self.normalized[index.0]
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
