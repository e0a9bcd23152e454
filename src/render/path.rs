//! SVG path-data writer.
//!
//! Commands are absolute and written without separating spaces, e.g.
//! `M0,0C50,0,50,100,100,100`. Every number goes through [`fmt_num`], so two
//! paths built from the same points are byte-identical.

use glam::DVec2;

use crate::types::{fmt_num, fmt_point};

/// Incremental builder for one path description
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    data: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a path at `p`
    pub fn move_to(mut self, p: DVec2) -> Self {
        self.push('M', &fmt_point(p));
        self
    }

    pub fn line_to(mut self, p: DVec2) -> Self {
        self.push('L', &fmt_point(p));
        self
    }

    /// Vertical line to the absolute `y`
    pub fn vertical_to(mut self, y: f64) -> Self {
        self.push('V', &fmt_num(y));
        self
    }

    /// Horizontal line to the absolute `x`
    pub fn horizontal_to(mut self, x: f64) -> Self {
        self.push('H', &fmt_num(x));
        self
    }

    /// Cubic Bézier through two control points
    pub fn cubic_to(mut self, c1: DVec2, c2: DVec2, p: DVec2) -> Self {
        let args = format!("{},{},{}", fmt_point(c1), fmt_point(c2), fmt_point(p));
        self.push('C', &args);
        self
    }

    /// Circular arc of `radius` to `p`; `clockwise` sets the sweep flag.
    /// Arcs drawn here never exceed half a turn, so the large-arc flag is 0.
    pub fn arc_to(mut self, radius: f64, clockwise: bool, p: DVec2) -> Self {
        let r = fmt_num(radius);
        let sweep = if clockwise { 1 } else { 0 };
        let args = format!("{r},{r},0,0,{sweep},{}", fmt_point(p));
        self.push('A', &args);
        self
    }

    pub fn build(self) -> String {
        self.data
    }

    fn push(&mut self, command: char, args: &str) {
        self.data.push(command);
        self.data.push_str(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn writes_compact_commands() {
        let path = PathBuilder::new()
            .move_to(dvec2(0.0, 0.0))
            .vertical_to(10.0)
            .horizontal_to(20.5)
            .build();
        assert_eq!(path, "M0,0V10H20.5");
    }

    #[test]
    fn writes_curves_and_arcs() {
        let path = PathBuilder::new()
            .move_to(dvec2(1.0, 2.0))
            .cubic_to(dvec2(3.0, 4.0), dvec2(5.0, 6.0), dvec2(7.0, 8.0))
            .arc_to(10.0, true, dvec2(-1.0, 0.0))
            .line_to(dvec2(0.0, 0.0))
            .build();
        assert_eq!(path, "M1,2C3,4,5,6,7,8A10,10,0,0,1,-1,0L0,0");
    }
}
