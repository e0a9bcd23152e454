//! Link path generation.
//!
//! One function covers every layout × mode pair. The tree type only matters
//! through the depth already chosen by the projector, so it does not appear
//! here.

use glam::dvec2;

use crate::config::{Layout, LinkMode};
use crate::layout::{Projected, project};

use super::path::PathBuilder;

/// Path from a parent to one of its children
pub fn link_path(layout: Layout, mode: LinkMode, source: &Projected, target: &Projected) -> String {
    let (sb, sd) = (source.breadth, source.depth);
    let (tb, td) = (target.breadth, target.depth);
    let mid = (sd + td) / 2.0;

    match (layout, mode) {
        (Layout::Horizontal, LinkMode::Smooth) => PathBuilder::new()
            .move_to(dvec2(sd, sb))
            .cubic_to(dvec2(mid, sb), dvec2(mid, tb), dvec2(td, tb))
            .build(),
        (Layout::Horizontal, LinkMode::Square) => PathBuilder::new()
            .move_to(dvec2(sd, sb))
            .vertical_to(tb)
            .horizontal_to(td)
            .build(),
        (Layout::Vertical, LinkMode::Smooth) => PathBuilder::new()
            .move_to(dvec2(sb, sd))
            .cubic_to(dvec2(sb, mid), dvec2(tb, mid), dvec2(tb, td))
            .build(),
        (Layout::Vertical, LinkMode::Square) => PathBuilder::new()
            .move_to(dvec2(sb, sd))
            .horizontal_to(tb)
            .vertical_to(td)
            .build(),
        (Layout::Circular, LinkMode::Smooth) => PathBuilder::new()
            .move_to(project(layout, sb, sd))
            .cubic_to(project(layout, sb, mid), project(layout, tb, mid), project(layout, tb, td))
            .build(),
        (Layout::Circular, LinkMode::Square) => circular_elbow(sb, sd, tb, td),
        (_, LinkMode::Straight) => PathBuilder::new()
            .move_to(source.point)
            .line_to(target.point)
            .build(),
    }
}

/// Arc along the parent's radius to the child's angle, then a radial line out
/// to the child. Equal angles have no arc to draw, and emitting a zero-length
/// `A` command would be degenerate, so it is left out.
fn circular_elbow(sb: f64, sd: f64, tb: f64, td: f64) -> String {
    let mut path = PathBuilder::new().move_to(project(Layout::Circular, sb, sd));
    if tb != sb {
        path = path.arc_to(sd, tb > sb, project(Layout::Circular, tb, sd));
    }
    path.line_to(project(Layout::Circular, tb, td)).build()
}

/// Text shown on a branch: its length with three decimals
pub fn distance_text(length: Option<f64>) -> String {
    format!("{:.3}", length.unwrap_or(0.0))
}
