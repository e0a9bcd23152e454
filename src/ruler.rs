//! Distance ruler kept in step with the view transform.

use glam::{DVec2, dvec2};

use crate::config::{Layout, Margins, TreeType, Viewport};
use crate::layout::{Distances, Frame};
use crate::tree::Hierarchy;
use crate::types::fmt_num;
use crate::view::ViewTransform;

/// Linear map from a value domain to a pixel range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Pixel offset of `value`. A collapsed domain maps everything to the
    /// start of the range.
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round step that cuts the domain into about `count` pieces
    pub fn tick_step(&self, count: usize) -> Option<f64> {
        let span = (self.domain.1 - self.domain.0).abs();
        if count == 0 || !span.is_finite() || span <= f64::EPSILON {
            return None;
        }
        let raw = span / count as f64;
        let base = 10f64.powf(raw.log10().floor());
        Some(
            [1.0, 2.0, 5.0, 10.0]
                .into_iter()
                .map(|m| m * base)
                .find(|step| *step >= raw)
                .unwrap_or(10.0 * base),
        )
    }

    /// Multiples of the tick step that fall inside the domain
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let Some(step) = self.tick_step(count) else {
            return Vec::new();
        };
        let (lo, hi) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        let decimals = (-step.log10().floor()).max(0.0) as usize;
        // Tolerance so that ends landing exactly on a multiple survive rounding
        let first = (lo / step - 1e-9).ceil() as i64;
        let last = (hi / step + 1e-9).floor() as i64;

        (first..=last)
            .map(|i| {
                let value = i as f64 * step;
                Tick {
                    value,
                    offset: self.scale(value),
                    label: format!("{value:.decimals$}"),
                }
            })
            .collect()
    }
}

/// One labelled mark on the ruler
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixels from the ruler origin
    pub offset: f64,
    pub label: String,
}

/// Screen edge the ruler runs along
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Under the drawing, ticks along x
    Bottom,
    /// Left of the drawing, ticks along y
    Left,
}

/// A visible ruler
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub edge: Edge,
    pub scale: LinearScale,
    pub ticks: Vec<Tick>,
    /// Where the ruler origin sits on screen
    pub origin: DVec2,
}

impl Axis {
    /// `translate(x,y)` of the ruler group
    pub fn transform(&self) -> String {
        format!("translate({},{})", fmt_num(self.origin.x), fmt_num(self.origin.y))
    }
}

/// The ruler as it should currently be drawn
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Ruler {
    /// Opacity 0, nothing computed
    #[default]
    Hidden,
    Shown(Axis),
}

impl Ruler {
    pub fn opacity(&self) -> f64 {
        match self {
            Ruler::Hidden => 0.0,
            Ruler::Shown(_) => 1.0,
        }
    }

    pub fn ticks(&self) -> &[Tick] {
        match self {
            Ruler::Hidden => &[],
            Ruler::Shown(axis) => &axis.ticks,
        }
    }

    pub fn axis(&self) -> Option<&Axis> {
        match self {
            Ruler::Hidden => None,
            Ruler::Shown(axis) => Some(axis),
        }
    }
}

/// Inputs the ruler depends on
#[derive(Clone, Copy, Debug)]
pub struct RulerInput<'a> {
    pub enabled: bool,
    pub layout: Layout,
    pub tree_type: TreeType,
    pub tree: &'a Hierarchy,
    pub distances: &'a Distances,
    pub viewport: Viewport,
    pub margins: &'a Margins,
    pub view: ViewTransform,
    pub ticks: usize,
}

/// Recompute the ruler for the current view
pub fn synchronize(input: RulerInput<'_>) -> Ruler {
    let edge = match (input.enabled, input.layout) {
        (false, _) | (_, Layout::Circular) => return Ruler::Hidden,
        (true, Layout::Horizontal) => Edge::Bottom,
        (true, Layout::Vertical) => Edge::Left,
    };

    let domain = match input.tree_type {
        TreeType::Weighted => (input.distances.min(), input.distances.max()),
        TreeType::Tree | TreeType::Dendrogram => (0.0, input.tree.height() as f64),
    };
    let frame = Frame::new(input.layout, input.viewport, input.margins);
    let k = if input.view.k > 0.0 { input.view.k } else { 1.0 };
    let scale = LinearScale::new(domain, (0.0, frame.budget / k));

    let (_, inner_height) = input.viewport.inner(input.margins);
    let origin = match edge {
        Edge::Bottom => dvec2(input.view.x, input.margins.top + inner_height),
        Edge::Left => dvec2(input.margins.left, input.view.y),
    };

    Ruler::Shown(Axis {
        edge,
        ticks: scale.ticks(input.ticks),
        scale,
        origin,
    })
}
