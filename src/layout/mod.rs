//! Tree geometry: distances, abstract positions, and screen projection
//!
//! - `normalize`: cumulative branch distances scaled to `[0, 1]`
//! - `position`: abstract `(breadth, depth)` slots from a positioner
//! - `project`: pixel budget and the screen-space mapping

pub mod normalize;
pub mod position;
pub mod project;

pub use normalize::Distances;
pub use position::{Cluster, Extent, Placement, Position, Positioner, Slot, Tidy};
pub use project::{Frame, Projected, Projection, project};
