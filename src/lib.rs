//! Layout and incremental redraw for interactive tree diagrams.
//!
//! A [`TreeView`] takes a rooted tree with optional branch lengths and keeps
//! a retained scene of links, nodes and labels in step with it:
//!
//! ```
//! use arbor_view::{Node, TreeView, Viewport, Layer};
//!
//! let tree = Node::new("root")
//!     .with_child(Node::leaf("A", 1.0))
//!     .with_child(Node::leaf("B", 2.0));
//!
//! let mut view = TreeView::new();
//! view.set_data(&tree)?;
//! view.attach(Viewport::new(600.0, 400.0))?;
//! view.set_layout("circular")?;
//! view.tick(std::time::Duration::from_millis(500));
//!
//! assert_eq!(view.scene().len(Layer::Nodes), 3);
//! # Ok::<(), arbor_view::Error>(())
//! ```
//!
//! Every geometric step is also available on its own: [`layout`] computes
//! distances and screen coordinates, [`render`] turns them into path data
//! and label placements, [`scene`] reconciles keyed visuals over time.

pub mod config;
pub mod defaults;
pub mod engine;
pub mod errors;
pub mod events;
pub mod layout;
pub mod log;
pub mod render;
pub mod ruler;
pub mod scene;
pub mod tree;
pub mod types;
pub mod view;

pub use config::{DisplayConfig, Layout, LinkMode, Margins, TreeType, Viewport};
pub use engine::TreeView;
pub use errors::{ConfigError, DataError, Error, Result, SceneError};
pub use events::{DrawSummary, NodeInfo};
pub use ruler::Ruler;
pub use scene::{Attr, AttrValue, Layer, RedrawToken};
pub use tree::{Hierarchy, Node, NodeClass, NodeKey};
pub use view::ViewTransform;
