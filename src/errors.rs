//! Error types with diagnostic codes using miette
//!
//! Every error is raised synchronously by the call that violates its contract.
//! None of them is transient: they report programming errors to fix.

use miette::Diagnostic;
use thiserror::Error;

use crate::tree::NodeKey;

/// Convenience alias used throughout the engine
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// Data Errors
// ============================================================================

/// The tree handed to the engine is missing or malformed
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("tree has no nodes")]
    #[diagnostic(code(arbor_view::data::empty))]
    Empty,

    #[error("node key `{key}` appears more than once")]
    #[diagnostic(
        code(arbor_view::data::duplicate_key),
        help("node keys identify rendered visuals and must be unique within a tree")
    )]
    DuplicateKey { key: NodeKey },

    #[error("tree has no root")]
    #[diagnostic(
        code(arbor_view::data::no_root),
        help("exactly one node must have no parent")
    )]
    NoRoot,

    #[error("tree has more than one root: `{first}` and `{second}`")]
    #[diagnostic(code(arbor_view::data::multiple_roots))]
    MultipleRoots { first: NodeKey, second: NodeKey },

    #[error("node `{key}` names unknown parent `{parent}`")]
    #[diagnostic(code(arbor_view::data::unknown_parent))]
    UnknownParent { key: NodeKey, parent: NodeKey },

    #[error("node `{key}` is not reachable from the root")]
    #[diagnostic(
        code(arbor_view::data::unreachable),
        help("parent links must not form a cycle")
    )]
    Unreachable { key: NodeKey },

    #[error("node `{key}` has invalid branch length {length}")]
    #[diagnostic(
        code(arbor_view::data::invalid_length),
        help("branch lengths must be finite and non-negative")
    )]
    InvalidLength { key: NodeKey, length: f64 },

    #[error("distance from the root to `{key}` is not finite")]
    #[diagnostic(
        code(arbor_view::data::distance_overflow),
        help("the branch lengths along this path sum past the range of f64")
    )]
    DistanceOverflow { key: NodeKey },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// A display option was set to a value outside its valid set
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown layout: {name}")]
    #[diagnostic(
        code(arbor_view::config::unknown_layout),
        help("valid layouts are: horizontal, vertical, circular")
    )]
    UnknownLayout { name: String },

    #[error("unknown tree type: {name}")]
    #[diagnostic(
        code(arbor_view::config::unknown_type),
        help("valid types are: tree, weighted, dendrogram")
    )]
    UnknownType { name: String },

    #[error("unknown link mode: {name}")]
    #[diagnostic(
        code(arbor_view::config::unknown_mode),
        help("valid modes are: smooth, square, straight")
    )]
    UnknownMode { name: String },

    #[error("invalid {what}: {value}")]
    #[diagnostic(
        code(arbor_view::config::invalid_size),
        help("sizes must be finite and non-negative")
    )]
    InvalidSize { what: &'static str, value: f64 },

    #[error("invalid margin: {value}")]
    #[diagnostic(
        code(arbor_view::config::invalid_margin),
        help("margins must be finite and non-negative")
    )]
    InvalidMargin { value: f64 },
}

// ============================================================================
// Scene Errors
// ============================================================================

/// An operation needed a rendered scene that does not exist
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("no render target has been attached")]
    #[diagnostic(
        code(arbor_view::scene::not_rendered),
        help("call `TreeView::attach` with a viewport before drawing")
    )]
    NotRendered,

    #[error("no node with key `{key}` is rendered")]
    #[diagnostic(code(arbor_view::scene::unknown_node))]
    UnknownNode { key: NodeKey },
}

// ============================================================================
// Aggregate
// ============================================================================

/// Any error the engine can raise
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scene(#[from] SceneError),
}
