//! Small numeric primitives shared by the geometry modules.
//!
//! Angles in the circular layout are measured clockwise from "up" in
//! radians, so `Angle(0.0)` points to 12 o'clock and `Angle(PI / 2.0)` to
//! 3 o'clock. Screen coordinates are y-down.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use glam::{DVec2, dvec2};

/// An angle in radians, clockwise from 12 o'clock
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub fn radians(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// The angle wrapped into `[0, 2π)`
    #[inline]
    pub fn wrapped(self) -> Angle {
        Angle(self.0.rem_euclid(TAU))
    }

    /// True on the left half of the circle, where labels must be flipped to
    /// stay readable. Exactly π (6 o'clock) counts as the right half.
    #[inline]
    pub fn is_flipped_half(self) -> bool {
        self.wrapped().0 > PI
    }

    /// Rotation in degrees that keeps a radial label upright:
    /// `(degrees mod 180) - 90`.
    #[inline]
    pub fn upright_rotation(self) -> f64 {
        self.degrees().rem_euclid(180.0) - 90.0
    }

    /// Point at `radius` along this angle, relative to the circle's center.
    #[inline]
    pub fn point_at(self, radius: f64) -> DVec2 {
        let theta = self.0 - FRAC_PI_2;
        dvec2(radius * theta.cos(), radius * theta.sin())
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}rad", self.0)
    }
}

/// Fold a line's direction in degrees into `(-90, 90]` so text laid along it
/// never reads upside-down.
pub fn fold_upright(degrees: f64) -> f64 {
    let folded = (degrees + 90.0).rem_euclid(180.0) - 90.0;
    if folded == -90.0 { 90.0 } else { folded }
}

/// Rotation in degrees of the chord from `from` to `to`, folded upright.
/// A zero-length chord has no direction and yields 0.
pub fn chord_rotation(from: DVec2, to: DVec2) -> f64 {
    let delta = to - from;
    if delta.x == 0.0 && delta.y == 0.0 {
        return 0.0;
    }
    fold_upright(delta.y.atan2(delta.x).to_degrees())
}

/// Format a coordinate for path data and transforms: three decimals,
/// trailing zeros trimmed, never `-0`.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", rounded);
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}

/// Format a point as `x,y`
pub fn fmt_point(p: DVec2) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}
