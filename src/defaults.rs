//! Default sizes and settings (pixels and milliseconds)

use std::time::Duration;

pub const ANIMATION: Duration = Duration::from_millis(500);
pub const MARGIN: f64 = 50.0;
pub const NODE_RADIUS: f64 = 3.0;
pub const LEAF_RADIUS: f64 = 3.0;
pub const LABEL_SIZE: f64 = 12.0;
pub const DISTANCE_SIZE: f64 = 10.0;
/// Gap between a node and its label along the text direction
pub const LABEL_OFFSET: f64 = 5.0;
/// Lift of a distance label above its branch
pub const DISTANCE_LIFT: f64 = -3.0;
pub const RULER_TICKS: usize = 10;
