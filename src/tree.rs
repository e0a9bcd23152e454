//! Tree input and the engine-owned node arena.
//!
//! Callers hand the engine a nested [`Node`] (or a parent table). The engine
//! flattens it once into a [`Hierarchy`] whose nodes are addressed by
//! [`NodeIndex`]; everything computed later lives in side arenas indexed the
//! same way, so the caller's tree is never mutated.

use std::collections::HashMap;
use std::fmt;

use crate::errors::DataError;

/// Stable identity of a node, unique within a tree
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A node of an already-parsed tree, as supplied by the caller
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub key: NodeKey,
    pub name: Option<String>,
    /// Branch length to the parent. Absent means 0.
    pub length: Option<f64>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(key: impl Into<NodeKey>) -> Self {
        Self {
            key: key.into(),
            name: None,
            length: None,
            children: Vec::new(),
        }
    }

    /// Leaf whose name doubles as its key
    pub fn leaf(name: &str, length: f64) -> Self {
        Self::new(name).with_name(name).with_length(length)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Index of a node inside a [`Hierarchy`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

/// Whether a node is an internal branch point or a leaf
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Branch,
    Leaf,
}

/// A flattened node
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub key: NodeKey,
    pub name: Option<String>,
    pub length: Option<f64>,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    /// Number of edges between the root and this node
    pub level: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn class(&self) -> NodeClass {
        if self.is_leaf() {
            NodeClass::Leaf
        } else {
            NodeClass::Branch
        }
    }

    /// Branch length with absent treated as 0
    pub fn length_or_zero(&self) -> f64 {
        self.length.unwrap_or(0.0)
    }
}

/// A validated rooted tree stored in pre-order.
///
/// Index 0 is always the root, and every parent precedes its children, so a
/// forward scan is a parent-before-children traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
    by_key: HashMap<NodeKey, NodeIndex>,
}

impl Hierarchy {
    /// Flatten a nested tree.
    pub fn from_root(root: &Node) -> Result<Self, DataError> {
        let mut hierarchy = Self {
            nodes: Vec::new(),
            by_key: HashMap::new(),
        };

        // Explicit stack keeps deep caterpillar trees off the call stack.
        // Children are pushed in reverse so they pop in their original order.
        let mut stack: Vec<(&Node, Option<NodeIndex>, usize)> = vec![(root, None, 0)];
        while let Some((node, parent, level)) = stack.pop() {
            let index = hierarchy.push(node.key.clone(), node.name.clone(), node.length, parent, level)?;
            for child in node.children.iter().rev() {
                stack.push((child, Some(index), level + 1));
            }
        }

        hierarchy.link_children();
        hierarchy.check_distances()?;
        Ok(hierarchy)
    }

    /// Build from a parent table of `(key, parent key, length)` rows.
    ///
    /// Row order determines sibling order. Exactly one row must have no
    /// parent, and every other row must be reachable from it.
    pub fn from_parent_links<I, K>(rows: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (K, Option<K>, Option<f64>)>,
        K: Into<NodeKey>,
    {
        let rows: Vec<(NodeKey, Option<NodeKey>, Option<f64>)> = rows
            .into_iter()
            .map(|(key, parent, length)| (key.into(), parent.map(Into::into), length))
            .collect();
        if rows.is_empty() {
            return Err(DataError::Empty);
        }

        let mut row_of: HashMap<&NodeKey, usize> = HashMap::with_capacity(rows.len());
        for (row, (key, _, _)) in rows.iter().enumerate() {
            if row_of.insert(key, row).is_some() {
                return Err(DataError::DuplicateKey { key: key.clone() });
            }
        }

        let mut root = None;
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
        for (row, (key, parent, _)) in rows.iter().enumerate() {
            match parent {
                None => match root {
                    None => root = Some(row),
                    Some(first) => {
                        return Err(DataError::MultipleRoots {
                            first: rows[first].0.clone(),
                            second: key.clone(),
                        });
                    }
                },
                Some(parent) => {
                    let Some(&parent_row) = row_of.get(parent) else {
                        return Err(DataError::UnknownParent {
                            key: key.clone(),
                            parent: parent.clone(),
                        });
                    };
                    children[parent_row].push(row);
                }
            }
        }
        let root = root.ok_or(DataError::NoRoot)?;

        let mut hierarchy = Self {
            nodes: Vec::with_capacity(rows.len()),
            by_key: HashMap::with_capacity(rows.len()),
        };
        let mut stack = vec![(root, None, 0usize)];
        while let Some((row, parent, level)) = stack.pop() {
            let (key, _, length) = &rows[row];
            let name = Some(key.as_str().to_string());
            let index = hierarchy.push(key.clone(), name, *length, parent, level)?;
            for &child in children[row].iter().rev() {
                stack.push((child, Some(index), level + 1));
            }
        }

        if hierarchy.nodes.len() != rows.len() {
            // Rows caught in a parent cycle never hang off the root.
            let key = rows
                .iter()
                .map(|(key, _, _)| key)
                .find(|key| !hierarchy.by_key.contains_key(*key))
                .cloned()
                .ok_or(DataError::NoRoot)?;
            return Err(DataError::Unreachable { key });
        }

        hierarchy.link_children();
        hierarchy.check_distances()?;
        Ok(hierarchy)
    }

    fn push(
        &mut self,
        key: NodeKey,
        name: Option<String>,
        length: Option<f64>,
        parent: Option<NodeIndex>,
        level: usize,
    ) -> Result<NodeIndex, DataError> {
        if let Some(length) = length {
            if !length.is_finite() || length < 0.0 {
                return Err(DataError::InvalidLength { key, length });
            }
        }
        let index = NodeIndex(self.nodes.len());
        if self.by_key.insert(key.clone(), index).is_some() {
            return Err(DataError::DuplicateKey { key });
        }
        self.nodes.push(TreeNode {
            key,
            name,
            length,
            parent,
            children: Vec::new(),
            level,
        });
        Ok(index)
    }

    /// Lengths are finite one by one but can still sum to infinity
    fn check_distances(&self) -> Result<(), DataError> {
        let mut cumulative = vec![0.0; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(parent) = node.parent else { continue };
            cumulative[index] = cumulative[parent.0] + node.length_or_zero();
            if !cumulative[index].is_finite() {
                return Err(DataError::DistanceOverflow { key: node.key.clone() });
            }
        }
        Ok(())
    }

    fn link_children(&mut self) {
        for index in 1..self.nodes.len() {
            if let Some(parent) = self.nodes[index].parent {
                self.nodes[parent.0].children.push(NodeIndex(index));
            }
        }
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: construction rejects empty trees
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index.0]
    }

    pub fn get(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.by_key.get(key).copied()
    }

    /// Nodes in parent-before-children order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeIndex(index), node))
    }

    /// Leaves in left-to-right order
    pub fn leaves(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(index, _)| index)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Largest level of any node (the root alone has height 0)
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|node| node.level).max().unwrap_or(0)
    }

    /// Non-root nodes, each standing for the branch to its parent
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.iter()
            .filter_map(|(index, node)| node.parent.map(|parent| (parent, index)))
    }
}
