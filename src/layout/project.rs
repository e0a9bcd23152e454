//! Mapping abstract coordinates to screen space.

use std::f64::consts::TAU;

use glam::{DVec2, dvec2};

use crate::config::{Layout, Margins, TreeType, Viewport};
use crate::tree::{Hierarchy, NodeIndex};
use crate::types::Angle;

use super::normalize::Distances;
use super::position::{Extent, Placement};

/// Pixel budget and positioning extent for one layout in one viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub layout: Layout,
    /// Pixels spanned by a normalized distance of 1
    pub budget: f64,
    pub extent: Extent,
}

impl Frame {
    pub fn new(layout: Layout, viewport: Viewport, margins: &Margins) -> Self {
        let (width, height) = viewport.inner(margins);
        match layout {
            Layout::Horizontal => Self {
                layout,
                budget: width,
                extent: Extent {
                    breadth: height,
                    depth: width,
                },
            },
            Layout::Vertical => Self {
                layout,
                budget: height,
                extent: Extent {
                    breadth: width,
                    depth: height,
                },
            },
            Layout::Circular => {
                let radius = width.min(height) / 2.0;
                Self {
                    layout,
                    budget: radius,
                    extent: Extent {
                        breadth: TAU,
                        depth: radius,
                    },
                }
            }
        }
    }
}

/// Screen position for a `(breadth, depth)` pair.
///
/// Node markers, link endpoints and labels all go through this one function
/// so they can never disagree. Circular output is relative to the center.
pub fn project(layout: Layout, breadth: f64, depth: f64) -> DVec2 {
    match layout {
        Layout::Horizontal => dvec2(depth, breadth),
        Layout::Vertical => dvec2(breadth, depth),
        Layout::Circular => Angle(breadth).point_at(depth),
    }
}

/// Screen-space attributes of one node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub breadth: f64,
    /// Depth actually drawn: the weight for weighted trees, else the slot depth
    pub depth: f64,
    /// Budget times normalized distance
    pub weight: f64,
    pub point: DVec2,
}

/// Projected attributes for every node of a tree
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub frame: Frame,
    pub tree_type: TreeType,
    nodes: Vec<Projected>,
}

impl Projection {
    pub fn compute(
        tree: &Hierarchy,
        distances: &Distances,
        placement: &Placement,
        frame: Frame,
        tree_type: TreeType,
    ) -> Self {
        let nodes = tree
            .iter()
            .map(|(index, _)| {
                let slot = placement.slot(index);
                let weight = frame.budget * distances.normalized(index);
                let depth = match tree_type {
                    TreeType::Weighted => weight,
                    TreeType::Tree | TreeType::Dendrogram => slot.depth,
                };
                Projected {
                    breadth: slot.breadth,
                    depth,
                    weight,
                    point: project(frame.layout, slot.breadth, depth),
                }
            })
            .collect();

        Self {
            frame,
            tree_type,
            nodes,
        }
    }

    pub fn get(&self, index: NodeIndex) -> &Projected {
        &self.nodes[index.0]
    }

    pub fn layout(&self) -> Layout {
        self.frame.layout
    }
}
