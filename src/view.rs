//! Pan/zoom transform of the whole drawing.

use std::fmt;

use glam::{DVec2, dvec2};

use crate::config::{Layout, Margins, Viewport};
use crate::types::fmt_num;

/// Scale `k` followed by a translation `(x, y)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0, y: 0.0 };

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// The resting view for a layout: the drawing starts at the top-left
    /// margin, or is centered for the circular layout.
    pub fn centered(layout: Layout, viewport: Viewport, margins: &Margins) -> Self {
        match layout {
            Layout::Horizontal | Layout::Vertical => Self::new(1.0, margins.left, margins.top),
            Layout::Circular => Self::new(1.0, viewport.width / 2.0, viewport.height / 2.0),
        }
    }

    /// Screen position of a drawing-space point
    pub fn apply(&self, p: DVec2) -> DVec2 {
        p * self.k + dvec2(self.x, self.y)
    }

    /// Drawing-space position of a screen point
    pub fn invert(&self, p: DVec2) -> DVec2 {
        (p - dvec2(self.x, self.y)) / self.k
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// SVG form, `translate(x,y) scale(k)`
impl fmt::Display for ViewTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({},{}) scale({})",
            fmt_num(self.x),
            fmt_num(self.y),
            fmt_num(self.k)
        )
    }
}
