use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use arbor_view::layout::{Projected, project};
use arbor_view::render::{TextAnchor, link_path, node_label};
use arbor_view::{
    Attr, AttrValue, ConfigError, DataError, Error, Hierarchy, Layer, Layout, LinkMode, Node, NodeKey, TreeType,
    TreeView, Viewport,
};

const FULL: Duration = Duration::from_millis(500);
const HALF: Duration = Duration::from_millis(250);

/// root ─ A
///      └ n1 ─ B
///            └ n2 ─ C
///                  └ D
fn caterpillar() -> Node {
    Node::new("root").with_child(Node::leaf("A", 1.0)).with_child(
        Node::new("n1").with_length(1.0).with_child(Node::leaf("B", 1.0)).with_child(
            Node::new("n2")
                .with_length(1.0)
                .with_children([Node::leaf("C", 1.0), Node::leaf("D", 1.0)]),
        ),
    )
}

fn text(view: &TreeView, layer: Layer, key: &str, attr: Attr) -> String {
    view.sample(layer, &key.into(), attr)
        .and_then(|v| v.as_text().map(str::to_string))
        .unwrap_or_default()
}

#[test]
fn caterpillar_vertical_weighted_straight() {
    let mut view = TreeView::new();
    view.set_animation(Duration::ZERO);
    view.set_data(&caterpillar()).unwrap();
    view.set_layout("vertical").unwrap();
    view.set_type("weighted").unwrap();
    view.set_mode("straight").unwrap();
    view.attach(Viewport::new(500.0, 400.0)).unwrap();

    let tree = view.hierarchy().unwrap();
    let projection = view.projection().unwrap();
    let budget = projection.frame.budget;
    assert_eq!(budget, 300.0);

    let root = projection.get(tree.root());
    assert_eq!(root.weight, 0.0);
    assert_eq!(root.point.y, 0.0);

    // C and D are three branches deep: the farthest nodes
    for deepest in ["C", "D"] {
        let p = projection.get(tree.get(&deepest.into()).unwrap());
        assert_eq!(p.weight, budget);
        assert_eq!(p.point.y, budget);
    }
    let b = projection.get(tree.get(&"B".into()).unwrap());
    assert_eq!(b.weight, 200.0);

    // Straight links run from the parent's point to the child's
    let path = text(&view, Layer::Links, "B", Attr::Path);
    assert!(path.starts_with('M') && path.contains('L') && !path.contains('C'), "{path}");

    // Vertical labels are turned a quarter
    assert!(text(&view, Layer::NodeLabels, "D", Attr::Transform).ends_with("rotate(90)"));
}

/// root ─ A
///      └ n1 ─ B
///            └ C
///
/// Cumulative distances A:1, B:2, C:3
fn three_leaf_caterpillar() -> Node {
    Node::new("root").with_child(Node::leaf("A", 1.0)).with_child(
        Node::new("n1")
            .with_length(1.0)
            .with_children([Node::leaf("B", 1.0), Node::leaf("C", 2.0)]),
    )
}

#[test]
fn three_leaf_caterpillar_vertical_weighted_straight() {
    let mut view = TreeView::new();
    view.set_animation(Duration::ZERO);
    view.set_data(&three_leaf_caterpillar()).unwrap();
    view.set_layout("vertical").unwrap();
    view.set_type("weighted").unwrap();
    view.set_mode("straight").unwrap();
    view.attach(Viewport::new(500.0, 400.0)).unwrap();

    let tree = view.hierarchy().unwrap();
    let distances = view.distances().unwrap();
    let projection = view.projection().unwrap();
    let budget = projection.frame.budget;
    let weight = |key: &str| projection.get(tree.get(&key.into()).unwrap()).weight;

    assert_eq!(distances.normalized(tree.get(&"C".into()).unwrap()), 1.0);
    assert_eq!(weight("C"), budget);
    assert_eq!(weight("root"), 0.0);
    assert!((weight("A") - budget / 3.0).abs() < 1e-9);
    assert!((weight("B") - budget * 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn renamed_labels_switch_instead_of_counting() {
    let tree = |name: &str, length: f64| {
        Node::new("root").with_child(Node::new("a").with_name(name).with_length(length))
    };
    let mut view = TreeView::new();
    view.set_data(&tree("seq10", 1.0)).unwrap();
    view.attach(Viewport::new(600.0, 400.0)).unwrap();
    view.tick(FULL);

    view.set_data(&tree("seq20", 3.0)).unwrap();
    view.tick(HALF);
    assert_eq!(text(&view, Layer::NodeLabels, "a", Attr::Text), "seq20");
    assert_eq!(text(&view, Layer::LinkLabels, "a", Attr::Text), "3.000");
}

#[test]
fn adding_one_leaf_enters_only_its_visuals() {
    let mut view = TreeView::new();
    view.set_data(&caterpillar()).unwrap();
    view.attach(Viewport::new(600.0, 400.0)).unwrap();
    view.tick(FULL);

    let grown = caterpillar().with_child(Node::leaf("E", 0.5));
    view.set_data(&grown).unwrap();
    let report = view.last_report().unwrap();
    for layer in Layer::ORDER {
        assert_eq!(report.layer(layer).entered, vec![NodeKey::from("E")], "{layer:?}");
        assert!(report.layer(layer).exited.is_empty());
    }
}

#[test]
fn redraw_mid_flight_supersedes() {
    let mut view = TreeView::new();
    view.set_data(&caterpillar()).unwrap();
    let first = view.attach(Viewport::new(600.0, 400.0)).unwrap();
    view.tick(FULL);
    assert!(view.is_settled(first));

    let at_rest = text(&view, Layer::Nodes, "D", Attr::Transform);
    view.set_layout(Layout::Vertical).unwrap();
    let moving = view.scene().token().unwrap();
    view.tick(HALF);
    let halfway = text(&view, Layer::Nodes, "D", Attr::Transform);
    assert_ne!(halfway, at_rest);
    assert!(!view.is_settled(moving));

    // A new redraw freezes the node where it is and carries on from there
    view.set_layout(Layout::Horizontal).unwrap();
    assert!(view.is_cancelled(moving));
    assert_eq!(text(&view, Layer::Nodes, "D", Attr::Transform), halfway);

    view.tick(FULL);
    assert_eq!(text(&view, Layer::Nodes, "D", Attr::Transform), at_rest);
    assert!(!view.is_animating());
}

#[test]
fn removed_nodes_fade_out() {
    let mut view = TreeView::new();
    view.set_data(&caterpillar()).unwrap();
    view.attach(Viewport::new(600.0, 400.0)).unwrap();
    view.tick(FULL);

    let pruned = Node::new("root").with_child(Node::leaf("A", 1.0));
    view.set_data(&pruned).unwrap();
    assert_eq!(view.last_report().unwrap().layer(Layer::Nodes).exited.len(), 5);

    view.tick(HALF);
    assert_eq!(
        view.sample(Layer::Nodes, &"D".into(), Attr::Opacity),
        Some(AttrValue::Number(0.5))
    );
    view.tick(HALF);
    assert_eq!(view.scene().len(Layer::Nodes), 2);
}

#[test]
fn rejected_options_change_nothing() {
    let mut view = TreeView::new();
    view.set_data(&caterpillar()).unwrap();
    view.attach(Viewport::new(600.0, 400.0)).unwrap();
    let config = view.config().clone();
    let token = view.scene().token();

    assert_eq!(
        view.set_mode("wavy"),
        Err(Error::Config(ConfigError::UnknownMode { name: "wavy".into() }))
    );
    assert!(view.set_type("Weighted").is_err());
    assert!(view.set_layout("").is_err());

    assert_eq!(view.config(), &config);
    assert_eq!(view.scene().token(), token);
}

#[test]
fn malformed_parent_tables_are_rejected() {
    let empty: Vec<(&str, Option<&str>, Option<f64>)> = Vec::new();
    assert_eq!(Hierarchy::from_parent_links(empty), Err(DataError::Empty));

    let two_roots = [("a", None, None), ("b", None, None)];
    assert!(matches!(
        Hierarchy::from_parent_links(two_roots),
        Err(DataError::MultipleRoots { .. })
    ));

    let cycle = [("r", None, None), ("a", Some("b"), None), ("b", Some("a"), None)];
    assert!(matches!(
        Hierarchy::from_parent_links(cycle),
        Err(DataError::Unreachable { .. })
    ));

    let mut view = TreeView::new();
    let negative = Node::new("r").with_child(Node::leaf("a", -1.0));
    assert!(matches!(
        view.set_data(&negative),
        Err(Error::Data(DataError::InvalidLength { .. }))
    ));
}

#[test]
fn circular_elbow_between_equal_angles_has_no_arc() {
    let at = |breadth, depth| Projected {
        breadth,
        depth,
        weight: depth,
        point: project(Layout::Circular, breadth, depth),
    };
    let path = link_path(Layout::Circular, LinkMode::Square, &at(0.75, 20.0), &at(0.75, 60.0));
    assert!(!path.contains('A'), "{path}");
}

#[test]
fn bottom_of_the_circle_reads_forwards() {
    let at_pi = Projected {
        breadth: PI,
        depth: 100.0,
        weight: 100.0,
        point: project(Layout::Circular, PI, 100.0),
    };
    let label = node_label(Layout::Circular, &at_pi);
    assert_eq!(label.anchor, TextAnchor::Start);
    assert_eq!(label.dx, 5.0);
}

#[test]
fn dendrogram_aligns_every_leaf() {
    let mut view = TreeView::new();
    view.set_animation(Duration::ZERO);
    view.set_type(TreeType::Dendrogram).unwrap();
    view.set_data(&caterpillar()).unwrap();
    view.attach(Viewport::new(600.0, 400.0)).unwrap();

    let tree = view.hierarchy().unwrap();
    let projection = view.projection().unwrap();
    let depths: Vec<f64> = tree.leaves().map(|leaf| projection.get(leaf).depth).collect();
    assert!(depths.iter().all(|d| *d == projection.frame.budget), "{depths:?}");
}

#[test]
fn draw_hook_fires_on_every_redraw() {
    let mut view = TreeView::new();
    let draws = Rc::new(RefCell::new(0));
    let count = draws.clone();
    view.on_draw(move |summary| {
        assert_eq!(summary.root.key.as_str(), "root");
        *count.borrow_mut() += 1;
    });

    view.set_data(&caterpillar()).unwrap();
    assert_eq!(*draws.borrow(), 0);
    view.attach(Viewport::new(600.0, 400.0)).unwrap();
    view.set_mode(LinkMode::Square).unwrap();
    view.redraw().unwrap();
    assert_eq!(*draws.borrow(), 3);
}
