//! Placement of node markers, node labels, and branch-length labels.

use std::fmt;

use glam::DVec2;

use crate::config::{Layout, LinkMode};
use crate::defaults;
use crate::layout::{Projected, project};
use crate::types::{Angle, chord_rotation, fmt_num, fmt_point};

/// SVG `text-anchor`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

impl fmt::Display for TextAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how a piece of text is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    pub at: DVec2,
    /// Degrees, clockwise
    pub rotate: f64,
    pub anchor: TextAnchor,
    /// Offset along the text direction
    pub dx: f64,
    /// Offset across the text direction
    pub dy: f64,
}

impl LabelPlacement {
    /// `translate(x,y) rotate(r)`
    pub fn transform(&self) -> String {
        format!("translate({}) rotate({})", fmt_point(self.at), fmt_num(self.rotate))
    }
}

/// `translate(x,y)` of a node marker
pub fn node_transform(node: &Projected) -> String {
    format!("translate({})", fmt_point(node.point))
}

/// Label next to a node, reading away from the root
pub fn node_label(layout: Layout, node: &Projected) -> LabelPlacement {
    let (rotate, anchor, dx) = match layout {
        Layout::Horizontal => (0.0, TextAnchor::Start, defaults::LABEL_OFFSET),
        Layout::Vertical => (90.0, TextAnchor::Start, defaults::LABEL_OFFSET),
        Layout::Circular => {
            let angle = Angle(node.breadth);
            if angle.is_flipped_half() {
                (angle.upright_rotation(), TextAnchor::End, -defaults::LABEL_OFFSET)
            } else {
                (angle.upright_rotation(), TextAnchor::Start, defaults::LABEL_OFFSET)
            }
        }
    };

    LabelPlacement {
        at: node.point,
        rotate,
        anchor,
        dx,
        dy: 0.0,
    }
}

/// Branch-length label for the link from `source` to `target`.
///
/// Curves and straight links carry it at their chord midpoint, laid along the
/// chord. Elbows carry it in the middle of their last segment, the one that
/// runs outward to the child.
pub fn link_label(layout: Layout, mode: LinkMode, source: &Projected, target: &Projected) -> LabelPlacement {
    let mid_depth = (source.depth + target.depth) / 2.0;

    let (at, rotate) = match (mode, layout) {
        (LinkMode::Smooth | LinkMode::Straight, _) => (
            (source.point + target.point) / 2.0,
            chord_rotation(source.point, target.point),
        ),
        (LinkMode::Square, Layout::Horizontal) => (project(layout, target.breadth, mid_depth), 0.0),
        (LinkMode::Square, Layout::Vertical) => (project(layout, target.breadth, mid_depth), 90.0),
        (LinkMode::Square, Layout::Circular) => (
            project(layout, target.breadth, mid_depth),
            Angle(target.breadth).upright_rotation(),
        ),
    };

    LabelPlacement {
        at,
        rotate,
        anchor: TextAnchor::Middle,
        dx: 0.0,
        dy: defaults::DISTANCE_LIFT,
    }
}
