//! The engine façade: owns the tree, the configuration and the scene.

use std::collections::BTreeMap;
use std::time::Duration;

use glam::DVec2;

use crate::config::{Choice, DisplayConfig, Layout, LinkMode, Margins, TreeType, Viewport, check_size};
use crate::defaults;
use crate::errors::{ConfigError, DataError, Result, SceneError};
use crate::events::{DrawSummary, Hooks, NodeInfo};
use crate::layout::{Distances, Frame, Position, Positioner, Projection};
use crate::log::{debug, warn};
use crate::render::{display, scene_specs};
use crate::ruler::{self, Ruler, RulerInput};
use crate::scene::{Attr, AttrValue, Attrs, Layer, ReconcileReport, RedrawToken, Scene, Visual};
use crate::tree::{Hierarchy, Node, NodeClass, NodeIndex, NodeKey};
use crate::view::ViewTransform;

/// A validated tree and its normalized distances
#[derive(Clone, Debug)]
struct TreeData {
    tree: Hierarchy,
    distances: Distances,
}

/// Draws one tree into one retained scene and keeps it up to date.
///
/// Nothing is drawn until [`TreeView::attach`] supplies a viewport. From then
/// on every data or option change reconciles the scene against the previous
/// drawing, animating over the configured duration. The clock only moves
/// when [`TreeView::tick`] or [`TreeView::advance_to`] is called.
#[derive(Debug, Default)]
pub struct TreeView {
    config: DisplayConfig,
    data: Option<TreeData>,
    projection: Option<Projection>,
    viewport: Option<Viewport>,
    view: ViewTransform,
    ruler: Ruler,
    scene: Scene,
    last_report: Option<ReconcileReport>,
    hooks: Hooks,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a custom configuration
    pub fn with_config(config: DisplayConfig) -> Result<Self> {
        config.margins.validate()?;
        for (what, value) in [
            ("branch node size", config.sizes.nodes.branch),
            ("leaf node size", config.sizes.nodes.leaf),
            ("branch label size", config.sizes.labels.branch),
            ("leaf label size", config.sizes.labels.leaf),
            ("distance label size", config.sizes.distances),
        ] {
            check_size(what, value)?;
        }
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.data.as_ref().map(|data| &data.tree)
    }

    pub fn distances(&self) -> Option<&Distances> {
        self.data.as_ref().map(|data| &data.distances)
    }

    /// Projection used by the latest redraw
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn ruler(&self) -> &Ruler {
        &self.ruler
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn last_report(&self) -> Option<&ReconcileReport> {
        self.last_report.as_ref()
    }

    pub fn is_rendered(&self) -> bool {
        self.viewport.is_some()
    }

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// Replace the tree. Invalid input leaves the current tree in place.
    pub fn set_data(&mut self, root: &Node) -> Result<()> {
        let tree = Hierarchy::from_root(root)?;
        self.set_hierarchy(tree)
    }

    pub fn set_hierarchy(&mut self, tree: Hierarchy) -> Result<()> {
        if tree.is_empty() {
            return Err(DataError::Empty.into());
        }
        let distances = Distances::compute(&tree);
        debug!(nodes = tree.len(), leaves = tree.leaf_count(), "tree replaced");
        self.data = Some(TreeData { tree, distances });
        self.redraw_if_rendered()
    }

    // ------------------------------------------------------------------
    // Enumerated options
    // ------------------------------------------------------------------

    /// Switch layout and move the view to the new layout's resting place
    pub fn set_layout(&mut self, layout: impl Choice<Layout>) -> Result<()> {
        let layout = checked(layout.choose())?;
        self.config.layout = layout;
        if let Some(viewport) = self.viewport {
            self.view = ViewTransform::centered(layout, viewport, &self.config.margins);
        }
        self.redraw_if_rendered()
    }

    pub fn set_type(&mut self, tree_type: impl Choice<TreeType>) -> Result<()> {
        self.config.tree_type = checked(tree_type.choose())?;
        self.redraw_if_rendered()
    }

    pub fn set_mode(&mut self, mode: impl Choice<LinkMode>) -> Result<()> {
        self.config.mode = checked(mode.choose())?;
        self.redraw_if_rendered()
    }

    // ------------------------------------------------------------------
    // Styling, applied to existing visuals without re-projecting
    // ------------------------------------------------------------------

    pub fn set_node_visibility(&mut self, class: NodeClass, visible: bool) {
        self.config.visibility.nodes.set(class, visible);
        self.restyle_class(Layer::Nodes, Attr::Display, class, display(visible).into());
    }

    pub fn set_label_visibility(&mut self, class: NodeClass, visible: bool) {
        self.config.visibility.labels.set(class, visible);
        self.restyle_class(Layer::NodeLabels, Attr::Display, class, display(visible).into());
    }

    /// Show or hide branch-length labels on branches leading to `class` nodes
    pub fn set_distance_visibility(&mut self, class: NodeClass, visible: bool) {
        self.config.visibility.distances.set(class, visible);
        self.restyle_class(Layer::LinkLabels, Attr::Display, class, display(visible).into());
    }

    /// Marker radius
    pub fn set_node_size(&mut self, class: NodeClass, size: f64) -> Result<()> {
        let size = check_size("node size", size)?;
        self.config.sizes.nodes.set(class, size);
        self.restyle_class(Layer::Nodes, Attr::Radius, class, size.into());
        Ok(())
    }

    /// Font size of node labels
    pub fn set_label_size(&mut self, class: NodeClass, size: f64) -> Result<()> {
        let size = check_size("label size", size)?;
        self.config.sizes.labels.set(class, size);
        self.restyle_class(Layer::NodeLabels, Attr::FontSize, class, size.into());
        Ok(())
    }

    /// Font size of branch-length labels
    pub fn set_distance_size(&mut self, size: f64) -> Result<()> {
        let size = check_size("distance label size", size)?;
        self.config.sizes.distances = size;
        if self.is_rendered() {
            self.scene
                .restyle(Layer::LinkLabels, Attr::FontSize, self.config.duration, |_| Some(size.into()));
        }
        Ok(())
    }

    pub fn set_ruler_visible(&mut self, visible: bool) {
        self.config.ruler = visible;
        self.sync_ruler();
    }

    /// Duration of every later transition; zero applies changes at once
    pub fn set_animation(&mut self, duration: Duration) {
        self.config.duration = duration;
    }

    /// Margins change the pixel budget, so the tree is projected again
    pub fn set_margins(&mut self, margins: Margins) -> Result<()> {
        checked(margins.validate())?;
        self.config.margins = margins;
        self.redraw_if_rendered()
    }

    fn restyle_class(&mut self, layer: Layer, attr: Attr, class: NodeClass, value: AttrValue) {
        if !self.is_rendered() {
            return;
        }
        let _changed = self.scene.restyle(layer, attr, self.config.duration, |visual| {
            (visual.class == class).then(|| value.clone())
        });
        debug!(?layer, ?attr, ?class, changed = _changed, "restyled visuals");
    }

    // ------------------------------------------------------------------
    // Render target and drawing
    // ------------------------------------------------------------------

    /// Establish the render target, center the view and draw
    pub fn attach(&mut self, viewport: Viewport) -> Result<RedrawToken> {
        check_viewport(viewport)?;
        self.viewport = Some(viewport);
        self.view = ViewTransform::centered(self.config.layout, viewport, &self.config.margins);
        self.redraw()
    }

    /// New container size; the view keeps its current transform
    pub fn resize(&mut self, viewport: Viewport) -> Result<RedrawToken> {
        if !self.is_rendered() {
            return Err(SceneError::NotRendered.into());
        }
        check_viewport(viewport)?;
        self.viewport = Some(viewport);
        self.redraw()
    }

    /// Recompute every visual from the current tree and configuration and
    /// reconcile the scene against it. Transitions still running from an
    /// earlier redraw are cancelled and continue from where they are.
    pub fn redraw(&mut self) -> Result<RedrawToken> {
        let viewport = self.viewport.ok_or(SceneError::NotRendered)?;

        let (desired, projection) = match &self.data {
            Some(data) => {
                let frame = Frame::new(self.config.layout, viewport, &self.config.margins);
                let placement = Positioner::for_type(self.config.tree_type).position(&data.tree, frame.extent);
                let projection =
                    Projection::compute(&data.tree, &data.distances, &placement, frame, self.config.tree_type);
                (scene_specs(&data.tree, &projection, &self.config), Some(projection))
            }
            None => (BTreeMap::new(), None),
        };

        let report = self.scene.reconcile(&desired, self.config.duration);
        let token = report.token;
        self.projection = projection;
        self.sync_ruler();

        debug!(
            %token,
            layout = %self.config.layout,
            tree_type = %self.config.tree_type,
            mode = %self.config.mode,
            "redraw"
        );

        if let Some(data) = &self.data {
            let root = data.tree.root();
            if let Some(info) = self.info_at(root) {
                let summary = DrawSummary {
                    token,
                    root: info,
                    entered: report.entered(),
                    updated: report.updated(),
                    exited: report.exited(),
                };
                self.hooks.draw(&summary);
            }
        }
        self.last_report = Some(report);
        Ok(token)
    }

    fn redraw_if_rendered(&mut self) -> Result<()> {
        if self.is_rendered() {
            self.redraw()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Reset the view to the layout's resting place
    pub fn recenter(&mut self) -> Result<ViewTransform> {
        let viewport = self.viewport.ok_or(SceneError::NotRendered)?;
        self.view = ViewTransform::centered(self.config.layout, viewport, &self.config.margins);
        self.sync_ruler();
        Ok(self.view)
    }

    /// Apply a pan/zoom gesture
    pub fn zoom(&mut self, view: ViewTransform) -> Result<()> {
        if !view.k.is_finite() || view.k <= 0.0 {
            return Err(ConfigError::InvalidSize {
                what: "zoom scale",
                value: view.k,
            }
            .into());
        }
        self.view = view;
        self.sync_ruler();
        Ok(())
    }

    fn sync_ruler(&mut self) {
        self.ruler = match (&self.data, self.viewport) {
            (Some(data), Some(viewport)) => ruler::synchronize(RulerInput {
                enabled: self.config.ruler,
                layout: self.config.layout,
                tree_type: self.config.tree_type,
                tree: &data.tree,
                distances: &data.distances,
                viewport,
                margins: &self.config.margins,
                view: self.view,
                ticks: defaults::RULER_TICKS,
            }),
            _ => Ruler::Hidden,
        };
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.scene.now()
    }

    pub fn tick(&mut self, dt: Duration) {
        self.scene.tick(dt);
    }

    pub fn advance_to(&mut self, t: Duration) {
        self.scene.advance_to(t);
    }

    /// Whether a later redraw interrupted the transitions of `token`
    pub fn is_cancelled(&self, token: RedrawToken) -> bool {
        self.scene.is_cancelled(token)
    }

    /// Whether the transitions of `token` ran to completion
    pub fn is_settled(&self, token: RedrawToken) -> bool {
        self.scene.is_settled(token)
    }

    pub fn is_animating(&self) -> bool {
        self.scene.is_animating()
    }

    // ------------------------------------------------------------------
    // Pointer routing and events
    // ------------------------------------------------------------------

    pub fn on_draw(&mut self, f: impl FnMut(&DrawSummary) + 'static) {
        self.hooks.set_draw(f);
    }

    pub fn on_tooltip_show(&mut self, f: impl FnMut(&NodeInfo) + 'static) {
        self.hooks.set_tooltip_show(f);
    }

    pub fn on_tooltip_hide(&mut self, f: impl FnMut(&NodeInfo) + 'static) {
        self.hooks.set_tooltip_hide(f);
    }

    pub fn on_context_menu(&mut self, f: impl FnMut(&NodeInfo) + 'static) {
        self.hooks.set_context_menu(f);
    }

    /// Pointer entered a node: fires the tooltip-show callback
    pub fn hover(&mut self, key: &NodeKey) -> Result<()> {
        let info = self.node_info(key)?;
        self.hooks.tooltip_show(&info);
        Ok(())
    }

    /// Pointer left a node: fires the tooltip-hide callback
    pub fn unhover(&mut self, key: &NodeKey) -> Result<()> {
        let info = self.node_info(key)?;
        self.hooks.tooltip_hide(&info);
        Ok(())
    }

    /// Secondary click on a node: fires the context-menu callback
    pub fn context_menu(&mut self, key: &NodeKey) -> Result<()> {
        let info = self.node_info(key)?;
        self.hooks.context_menu(&info);
        Ok(())
    }

    /// What the callbacks would receive for `key`
    pub fn node_info(&self, key: &NodeKey) -> Result<NodeInfo> {
        if !self.is_rendered() {
            return Err(SceneError::NotRendered.into());
        }
        let index = self
            .hierarchy()
            .and_then(|tree| tree.get(key))
            .ok_or_else(|| SceneError::UnknownNode { key: key.clone() })?;
        self.info_at(index)
            .ok_or_else(|| SceneError::UnknownNode { key: key.clone() }.into())
    }

    fn info_at(&self, index: NodeIndex) -> Option<NodeInfo> {
        let data = self.data.as_ref()?;
        let node = data.tree.node(index);
        let point = self
            .projection
            .as_ref()
            .map_or(DVec2::ZERO, |projection| projection.get(index).point);
        Some(NodeInfo {
            key: node.key.clone(),
            name: node.name.clone(),
            length: node.length,
            class: node.class(),
            level: node.level,
            distance: data.distances.cumulative(index),
            point,
        })
    }

    // ------------------------------------------------------------------
    // Per-visual access
    // ------------------------------------------------------------------

    /// Visit every visual of a layer with its current attribute values
    pub fn for_each_visual(&self, layer: Layer, mut f: impl FnMut(&Visual, &Attrs)) -> Result<()> {
        if !self.is_rendered() {
            return Err(SceneError::NotRendered.into());
        }
        let now = self.scene.now();
        for visual in self.scene.visuals(layer) {
            f(visual, &visual.sample_all(now));
        }
        Ok(())
    }

    /// Set one attribute on every visual of a layer for which `style`
    /// returns a value, animated over the configured duration
    pub fn style(
        &mut self,
        layer: Layer,
        attr: Attr,
        style: impl FnMut(&Visual) -> Option<AttrValue>,
    ) -> Result<usize> {
        if !self.is_rendered() {
            return Err(SceneError::NotRendered.into());
        }
        Ok(self.scene.restyle(layer, attr, self.config.duration, style))
    }

    /// Current value of one attribute of one visual
    pub fn sample(&self, layer: Layer, key: &NodeKey, attr: Attr) -> Option<AttrValue> {
        self.scene.sample(layer, key, attr)
    }
}

/// Log a rejected option before handing the error back
fn checked<T>(result: std::result::Result<T, ConfigError>) -> Result<T> {
    result.map_err(|err| {
        warn!(error = %err, "rejected configuration change");
        err.into()
    })
}

fn check_viewport(viewport: Viewport) -> Result<()> {
    check_size("viewport width", viewport.width)?;
    check_size("viewport height", viewport.height)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample_tree() -> Node {
        Node::new("root")
            .with_child(Node::leaf("A", 1.0))
            .with_child(Node::new("inner").with_length(1.0).with_children([Node::leaf("B", 1.0), Node::leaf("C", 2.0)]))
    }

    fn attached() -> TreeView {
        let mut view = TreeView::new();
        view.set_animation(Duration::ZERO);
        view.set_data(&sample_tree()).unwrap();
        view.attach(Viewport::new(500.0, 300.0)).unwrap();
        view
    }

    #[test]
    fn nothing_is_drawn_before_attach() {
        let mut view = TreeView::new();
        view.set_data(&sample_tree()).unwrap();
        assert!(view.scene().is_empty());
        assert_eq!(view.redraw(), Err(SceneError::NotRendered.into()));
        assert_eq!(view.recenter(), Err(SceneError::NotRendered.into()));
        assert!(view.for_each_visual(Layer::Nodes, |_, _| {}).is_err());
        assert!(view.hover(&"A".into()).is_err());
    }

    #[test]
    fn attach_draws_everything() {
        let view = attached();
        assert_eq!(view.scene().len(Layer::Nodes), 5);
        assert_eq!(view.scene().len(Layer::Links), 4);
        assert_eq!(view.view(), ViewTransform::new(1.0, 50.0, 50.0));
        let report = view.last_report().unwrap();
        assert_eq!(report.entered(), 18);
    }

    #[test]
    fn invalid_option_leaves_state_untouched() {
        let mut view = attached();
        let token = view.scene().token();
        let err = view.set_layout("radial").unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::UnknownLayout { .. })));
        assert!(view.set_type("cladogram").is_err());
        assert!(view.set_mode("curvy").is_err());
        assert_eq!(view.config(), &DisplayConfig { duration: Duration::ZERO, ..DisplayConfig::default() });
        assert_eq!(view.scene().token(), token);
    }

    #[test]
    fn layout_change_recenters() {
        let mut view = attached();
        view.set_layout(Layout::Circular).unwrap();
        assert_eq!(view.view(), ViewTransform::new(1.0, 250.0, 150.0));
        assert_eq!(view.ruler(), &Ruler::Hidden);

        view.set_layout("vertical").unwrap();
        assert_eq!(view.recenter(), Ok(ViewTransform::new(1.0, 50.0, 50.0)));
        assert!(view.ruler().axis().is_some());
    }

    #[test]
    fn visibility_restyles_without_redrawing() {
        let mut view = attached();
        let token = view.scene().token();
        view.set_node_visibility(NodeClass::Branch, true);
        assert_eq!(view.scene().token(), token);
        assert_eq!(
            view.sample(Layer::Nodes, &"inner".into(), Attr::Display),
            Some(AttrValue::from("inline"))
        );

        view.set_node_size(NodeClass::Leaf, 6.0).unwrap();
        assert_eq!(view.sample(Layer::Nodes, &"A".into(), Attr::Radius), Some(AttrValue::Number(6.0)));
        assert_eq!(view.sample(Layer::Nodes, &"inner".into(), Attr::Radius), Some(AttrValue::Number(3.0)));
        assert!(view.set_label_size(NodeClass::Leaf, -1.0).is_err());
    }

    #[test]
    fn pointer_events_reach_the_hooks() {
        let mut view = attached();
        let log = Rc::new(RefCell::new(Vec::new()));

        let shown = log.clone();
        view.on_tooltip_show(move |node| shown.borrow_mut().push(format!("show {}", node.key)));
        let hidden = log.clone();
        view.on_tooltip_hide(move |node| hidden.borrow_mut().push(format!("hide {}", node.key)));
        let menu = log.clone();
        view.on_context_menu(move |node| menu.borrow_mut().push(format!("menu {} {}", node.key, node.distance)));

        view.hover(&"B".into()).unwrap();
        view.unhover(&"B".into()).unwrap();
        view.context_menu(&"C".into()).unwrap();
        assert_eq!(*log.borrow(), ["show B", "hide B", "menu C 3"]);

        assert_eq!(
            view.hover(&"nope".into()),
            Err(SceneError::UnknownNode { key: "nope".into() }.into())
        );
    }

    #[test]
    fn draw_hook_receives_the_root() {
        let mut view = attached();
        let roots = Rc::new(RefCell::new(Vec::new()));
        let seen = roots.clone();
        view.on_draw(move |summary| seen.borrow_mut().push(summary.root.key.clone()));
        view.redraw().unwrap();
        assert_eq!(*roots.borrow(), [NodeKey::from("root")]);
    }

    #[test]
    fn zoom_moves_the_ruler() {
        let mut view = attached();
        let before = view.ruler().axis().unwrap().scale.range.1;
        view.zoom(ViewTransform::new(2.0, 10.0, 0.0)).unwrap();
        let axis = view.ruler().axis().unwrap();
        assert_eq!(axis.scale.range.1, before / 2.0);
        assert_eq!(axis.origin.x, 10.0);
        assert!(view.zoom(ViewTransform::new(0.0, 0.0, 0.0)).is_err());

        view.set_ruler_visible(false);
        assert_eq!(view.ruler(), &Ruler::Hidden);
    }

    #[test]
    fn invalid_data_keeps_the_old_tree() {
        let mut view = attached();
        let bad = Node::new("x").with_child(Node::leaf("x", 1.0));
        assert!(view.set_data(&bad).is_err());
        assert_eq!(view.hierarchy().map(Hierarchy::len), Some(5));
    }
}
