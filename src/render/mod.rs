//! Turning projected coordinates into visual attributes.
//!
//! Everything here is a pure function of the hierarchy, its projection and
//! the display configuration; the scene decides what actually changes.

pub mod labels;
pub mod links;
pub mod path;

use std::collections::BTreeMap;

use crate::config::DisplayConfig;
use crate::layout::Projection;
use crate::scene::{Attr, Layer, VisualSpec};
use crate::tree::{Hierarchy, NodeClass, NodeKey};

pub use labels::{LabelPlacement, TextAnchor, link_label, node_label, node_transform};
pub use links::{distance_text, link_path};
pub use path::PathBuilder;

/// `display` value for a visibility toggle
pub fn display(visible: bool) -> &'static str {
    if visible { "inline" } else { "none" }
}

/// Every visual the current tree and configuration call for, per layer.
///
/// Links and their labels are keyed by the child node, the branch they
/// stand for. Hidden visuals are still produced with `display: none` so that
/// toggling them back keeps their identity.
pub fn scene_specs(
    tree: &Hierarchy,
    projection: &Projection,
    config: &DisplayConfig,
) -> BTreeMap<Layer, Vec<VisualSpec>> {
    let layout = config.layout;
    let mode = config.mode;
    let visibility = &config.visibility;
    let sizes = &config.sizes;

    let mut links = Vec::with_capacity(tree.len());
    let mut link_labels = Vec::with_capacity(tree.len());
    for (parent, child) in tree.edges() {
        let node = tree.node(child);
        let parent_key = Some(tree.node(parent).key.clone());
        let (source, target) = (projection.get(parent), projection.get(child));

        links.push(
            VisualSpec::new(node.key.clone(), node.class(), parent_key.clone())
                .with(Attr::Path, link_path(layout, mode, source, target))
                .with(Attr::Opacity, 1.0),
        );

        let placement = link_label(layout, mode, source, target);
        link_labels.push(
            label_spec(node.key.clone(), node.class(), parent_key, &placement)
                .with(Attr::Text, distance_text(node.length))
                .with(Attr::FontSize, sizes.distances)
                .with(Attr::Display, display(visibility.distances.get(node.class()))),
        );
    }

    let mut nodes = Vec::with_capacity(tree.len());
    let mut node_labels = Vec::with_capacity(tree.len());
    for (index, node) in tree.iter() {
        let class = node.class();
        let parent_key = node.parent.map(|parent| tree.node(parent).key.clone());
        let projected = projection.get(index);

        nodes.push(
            VisualSpec::new(node.key.clone(), class, parent_key.clone())
                .with(Attr::Transform, node_transform(projected))
                .with(Attr::Radius, sizes.nodes.get(class))
                .with(Attr::Opacity, 1.0)
                .with(Attr::Display, display(visibility.nodes.get(class))),
        );

        let text = node.name.clone().unwrap_or_else(|| node.key.to_string());
        node_labels.push(
            label_spec(node.key.clone(), class, parent_key, &node_label(layout, projected))
                .with(Attr::Text, text)
                .with(Attr::FontSize, sizes.labels.get(class))
                .with(Attr::Display, display(visibility.labels.get(class))),
        );
    }

    BTreeMap::from([
        (Layer::Links, links),
        (Layer::LinkLabels, link_labels),
        (Layer::Nodes, nodes),
        (Layer::NodeLabels, node_labels),
    ])
}

fn label_spec(
    key: NodeKey,
    class: NodeClass,
    parent: Option<NodeKey>,
    placement: &LabelPlacement,
) -> VisualSpec {
    VisualSpec::new(key, class, parent)
        .with(Attr::Transform, placement.transform())
        .with(Attr::TextAnchor, placement.anchor.as_str())
        .with(Attr::Dx, placement.dx)
        .with(Attr::Dy, placement.dy)
        .with(Attr::Opacity, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Margins, Viewport};
    use crate::layout::{Distances, Frame, Position, Positioner};
    use crate::scene::AttrValue;
    use crate::tree::Node;

    fn specs(config: &DisplayConfig) -> BTreeMap<Layer, Vec<VisualSpec>> {
        let root = Node::new("root")
            .with_child(Node::leaf("A", 1.0))
            .with_child(Node::new("inner").with_children([Node::leaf("B", 1.0), Node::leaf("C", 2.0)]));
        let tree = Hierarchy::from_root(&root).unwrap();
        let distances = Distances::compute(&tree);
        let frame = Frame::new(config.layout, Viewport::new(400.0, 300.0), &Margins::uniform(0.0));
        let placement = Positioner::for_type(config.tree_type).position(&tree, frame.extent);
        let projection = Projection::compute(&tree, &distances, &placement, frame, config.tree_type);
        scene_specs(&tree, &projection, config)
    }

    fn find<'a>(specs: &'a BTreeMap<Layer, Vec<VisualSpec>>, layer: Layer, key: &str) -> &'a VisualSpec {
        specs[&layer].iter().find(|s| s.key.as_str() == key).unwrap()
    }

    #[test]
    fn one_link_per_branch_and_one_node_per_node() {
        let specs = specs(&DisplayConfig::default());
        assert_eq!(specs[&Layer::Links].len(), 4);
        assert_eq!(specs[&Layer::LinkLabels].len(), 4);
        assert_eq!(specs[&Layer::Nodes].len(), 5);
        assert_eq!(specs[&Layer::NodeLabels].len(), 5);

        let link = find(&specs, Layer::Links, "B");
        assert_eq!(link.parent, Some(NodeKey::from("inner")));
        assert!(link.attrs[&Attr::Path].as_text().is_some_and(|d| d.starts_with('M')));
    }

    #[test]
    fn default_visibility_shows_leaves_only() {
        let specs = specs(&DisplayConfig::default());
        let shown = |layer, key| find(&specs, layer, key).attrs[&Attr::Display].clone();
        assert_eq!(shown(Layer::Nodes, "A"), AttrValue::from("inline"));
        assert_eq!(shown(Layer::Nodes, "inner"), AttrValue::from("none"));
        assert_eq!(shown(Layer::NodeLabels, "C"), AttrValue::from("inline"));
        assert_eq!(shown(Layer::LinkLabels, "C"), AttrValue::from("none"));
    }

    #[test]
    fn labels_fall_back_to_keys() {
        let specs = specs(&DisplayConfig::default());
        assert_eq!(find(&specs, Layer::NodeLabels, "inner").attrs[&Attr::Text], AttrValue::from("inner"));
        assert_eq!(find(&specs, Layer::LinkLabels, "inner").attrs[&Attr::Text], AttrValue::from("0.000"));
        assert_eq!(find(&specs, Layer::LinkLabels, "C").attrs[&Attr::Text], AttrValue::from("2.000"));
    }
}
