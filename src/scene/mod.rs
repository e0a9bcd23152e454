//! In-memory retained scene.
//!
//! Visuals are keyed by layer and node key, so a node keeps its visuals from
//! one redraw to the next and only what changed is animated. Attribute values
//! are sampled against the scene clock.

mod interpolate;
mod reconcile;
mod transition;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::tree::{NodeClass, NodeKey};

pub use interpolate::{ease_cubic_in_out, interpolate, interpolate_string};
pub use reconcile::{LayerReport, ReconcileReport, Scene, VisualSpec};
pub use transition::{RedrawToken, Tween};

/// Visual layers, in the order they are reconciled
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Links,
    LinkLabels,
    Nodes,
    NodeLabels,
}

impl Layer {
    pub const ORDER: [Layer; 4] = [Layer::Links, Layer::LinkLabels, Layer::Nodes, Layer::NodeLabels];

    pub(crate) fn index(self) -> usize {
        match self {
            Layer::Links => 0,
            Layer::LinkLabels => 1,
            Layer::Nodes => 2,
            Layer::NodeLabels => 3,
        }
    }

    /// Layers whose entering visuals grow out of their parent's position
    pub fn grows_from_parent(self) -> bool {
        matches!(self, Layer::Nodes | Layer::NodeLabels)
    }
}

/// Attribute of a visual
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attr {
    Path,
    Transform,
    Opacity,
    Radius,
    FontSize,
    Text,
    TextAnchor,
    Dx,
    Dy,
    Display,
}

impl Attr {
    /// SVG attribute name
    pub fn name(self) -> &'static str {
        match self {
            Attr::Path => "d",
            Attr::Transform => "transform",
            Attr::Opacity => "opacity",
            Attr::Radius => "r",
            Attr::FontSize => "font-size",
            Attr::Text => "text",
            Attr::TextAnchor => "text-anchor",
            Attr::Dx => "dx",
            Attr::Dy => "dy",
            Attr::Display => "display",
        }
    }

    /// Whether the attribute moves gradually. Label text, anchors and
    /// display switch at the start of a transition.
    pub fn is_tweened(self) -> bool {
        !matches!(self, Attr::Text | Attr::TextAnchor | Attr::Display)
    }
}

/// Value of one attribute
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(n) => f.write_str(&crate::types::fmt_num(*n)),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

pub type Attrs = BTreeMap<Attr, AttrValue>;

/// Where a visual is in its life
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lifecycle {
    /// Fading in; live once the clock passes `until`
    Entering { until: Duration },
    Live,
    /// Fading out; removed once the clock passes `until`
    Exiting { until: Duration },
}

/// One rendered element
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub key: NodeKey,
    pub layer: Layer,
    pub class: NodeClass,
    /// Key of the parent node, if any
    pub parent: Option<NodeKey>,
    pub lifecycle: Lifecycle,
    /// Values the visual is heading to
    target: Attrs,
    tweens: BTreeMap<Attr, Tween>,
}

impl Visual {
    /// Attribute values at time `now`
    pub fn sample_all(&self, now: Duration) -> Attrs {
        self.target
            .keys()
            .filter_map(|attr| self.sample(*attr, now).map(|value| (*attr, value)))
            .collect()
    }

    /// One attribute at time `now`
    pub fn sample(&self, attr: Attr, now: Duration) -> Option<AttrValue> {
        match self.tweens.get(&attr) {
            Some(tween) => Some(tween.sample(now)),
            None => self.target.get(&attr).cloned(),
        }
    }

    /// Final value of an attribute, once every transition has run
    pub fn target(&self, attr: Attr) -> Option<&AttrValue> {
        self.target.get(&attr)
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Exiting { .. })
    }

    /// Whether any attribute is still moving at `now`
    pub fn is_animating(&self, now: Duration) -> bool {
        self.tweens.values().any(|tween| !tween.is_done(now))
    }
}
