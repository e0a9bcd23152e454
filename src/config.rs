//! Display configuration.
//!
//! Every enumerated option parses from its lowercase name and rejects
//! anything else with a [`ConfigError`], so a bad value can never reach the
//! geometry code.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::defaults;
use crate::errors::ConfigError;
use crate::tree::NodeClass;

/// Overall geometric arrangement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// Root on the left, depth grows to the right
    #[default]
    Horizontal,
    /// Root on top, depth grows downwards
    Vertical,
    /// Root at the center, depth grows as radius, leaves spread by angle
    Circular,
}

/// How branch lengths are interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TreeType {
    /// Topological depth, leaves at their own level
    #[default]
    Tree,
    /// Depth proportional to cumulative branch length
    Weighted,
    /// Topological depth with every leaf aligned at the far edge
    Dendrogram,
}

/// How a parent is connected to a child
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LinkMode {
    #[default]
    Smooth,
    Square,
    Straight,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Horizontal, Layout::Vertical, Layout::Circular];

    pub fn name(self) -> &'static str {
        match self {
            Layout::Horizontal => "horizontal",
            Layout::Vertical => "vertical",
            Layout::Circular => "circular",
        }
    }
}

impl TreeType {
    pub const ALL: [TreeType; 3] = [TreeType::Tree, TreeType::Weighted, TreeType::Dendrogram];

    pub fn name(self) -> &'static str {
        match self {
            TreeType::Tree => "tree",
            TreeType::Weighted => "weighted",
            TreeType::Dendrogram => "dendrogram",
        }
    }
}

impl LinkMode {
    pub const ALL: [LinkMode; 3] = [LinkMode::Smooth, LinkMode::Square, LinkMode::Straight];

    pub fn name(self) -> &'static str {
        match self {
            LinkMode::Smooth => "smooth",
            LinkMode::Square => "square",
            LinkMode::Straight => "straight",
        }
    }
}

impl FromStr for Layout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name() == s)
            .ok_or_else(|| ConfigError::UnknownLayout { name: s.to_string() })
    }
}

impl FromStr for TreeType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TreeType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ConfigError::UnknownType { name: s.to_string() })
    }
}

impl FromStr for LinkMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ConfigError::UnknownMode { name: s.to_string() })
    }
}

/// A value accepted by an option setter: the option itself, or its name
pub trait Choice<T> {
    fn choose(self) -> Result<T, ConfigError>;
}

impl<T: FromStr<Err = ConfigError>> Choice<T> for &str {
    fn choose(self) -> Result<T, ConfigError> {
        self.parse()
    }
}

impl Choice<Layout> for Layout {
    fn choose(self) -> Result<Layout, ConfigError> {
        Ok(self)
    }
}

impl Choice<TreeType> for TreeType {
    fn choose(self) -> Result<TreeType, ConfigError> {
        Ok(self)
    }
}

impl Choice<LinkMode> for LinkMode {
    fn choose(self) -> Result<LinkMode, ConfigError> {
        Ok(self)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A toggle held separately for branch (internal) nodes and leaves
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerClass<T> {
    pub branch: T,
    pub leaf: T,
}

impl<T: Copy> PerClass<T> {
    pub const fn both(value: T) -> Self {
        Self {
            branch: value,
            leaf: value,
        }
    }

    pub fn get(&self, class: NodeClass) -> T {
        match class {
            NodeClass::Branch => self.branch,
            NodeClass::Leaf => self.leaf,
        }
    }

    pub fn set(&mut self, class: NodeClass, value: T) {
        match class {
            NodeClass::Branch => self.branch = value,
            NodeClass::Leaf => self.leaf = value,
        }
    }
}

/// What is drawn for each node class
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visibility {
    pub nodes: PerClass<bool>,
    pub labels: PerClass<bool>,
    pub distances: PerClass<bool>,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            nodes: PerClass {
                branch: false,
                leaf: true,
            },
            labels: PerClass {
                branch: false,
                leaf: true,
            },
            distances: PerClass::both(false),
        }
    }
}

/// Marker radii and font sizes for each node class
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sizes {
    pub nodes: PerClass<f64>,
    pub labels: PerClass<f64>,
    pub distances: f64,
}

impl Default for Sizes {
    fn default() -> Self {
        Self {
            nodes: PerClass {
                branch: defaults::NODE_RADIUS,
                leaf: defaults::LEAF_RADIUS,
            },
            labels: PerClass::both(defaults::LABEL_SIZE),
            distances: defaults::DISTANCE_SIZE,
        }
    }
}

/// Space kept free around the drawing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.top, self.right, self.bottom, self.left] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMargin { value });
            }
        }
        Ok(())
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(defaults::MARGIN)
    }
}

/// Container size in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Drawing area left once the margins are taken off, never negative
    pub fn inner(&self, margins: &Margins) -> (f64, f64) {
        (
            (self.width - margins.left - margins.right).max(0.0),
            (self.height - margins.top - margins.bottom).max(0.0),
        )
    }
}

/// Everything that decides how a tree is drawn
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub layout: Layout,
    pub tree_type: TreeType,
    pub mode: LinkMode,
    pub visibility: Visibility,
    pub sizes: Sizes,
    pub duration: Duration,
    pub margins: Margins,
    pub ruler: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            tree_type: TreeType::default(),
            mode: LinkMode::default(),
            visibility: Visibility::default(),
            sizes: Sizes::default(),
            duration: defaults::ANIMATION,
            margins: Margins::default(),
            ruler: true,
        }
    }
}

/// Reject sizes that cannot be drawn
pub(crate) fn check_size(what: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidSize { what, value })
    }
}
