use ahash::HashMap;

use crate::engine::{assets::AssetError, transform::Transform};

pub type NodeIndex = u32;

/// Parent index of the root node.
pub const NODE_SENTINEL: NodeIndex = NodeIndex::MAX;

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    /// Index of the parent node, [NODE_SENTINEL] for the root.
    pub parent: NodeIndex,
    /// Local rest transform, relative to the parent.
    pub transform: Transform,
    /// Indices of child nodes, filled in when the hierarchy is built.
    pub children: Vec<NodeIndex>,
}

impl Node {
    pub fn new(name: impl Into<String>, parent: NodeIndex, transform: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            transform,
            children: Vec::new(),
        }
    }
}

/// A single-rooted, acyclic tree of named nodes. Built once at import time
/// and immutable afterwards.
///
/// The traversal order is computed here, breadth-first from the root, so a
/// parent always comes before its children no matter how the source file
/// ordered its node array.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    root: NodeIndex,
    traversal: Vec<NodeIndex>,
    name_lookup: HashMap<String, NodeIndex>,
}

impl Hierarchy {
    pub fn from_nodes(mut nodes: Vec<Node>) -> Result<Self, AssetError> {
        if nodes.is_empty() {
            return Err(AssetError::InvalidHierarchy("no nodes".to_string()));
        }

        for node in nodes.iter_mut() {
            node.children.clear();
        }

        let mut root = None;
        for index in 0..nodes.len() {
            let parent = nodes[index].parent;
            if parent == NODE_SENTINEL {
                if let Some(previous) = root {
                    return Err(AssetError::InvalidHierarchy(format!(
                        "multiple roots: {previous} and {index}"
                    )));
                }
                root = Some(index);
            } else {
                if parent as usize >= nodes.len() {
                    return Err(AssetError::InvalidHierarchy(format!(
                        "node {index} has out of range parent {parent}"
                    )));
                }
                if parent as usize == index {
                    return Err(AssetError::InvalidHierarchy(format!(
                        "node {index} is its own parent"
                    )));
                }
                nodes[parent as usize].children.push(index as NodeIndex);
            }
        }

        let Some(root) = root else {
            return Err(AssetError::InvalidHierarchy("no root node".to_string()));
        };
        let root = root as NodeIndex;

        // Breadth-first walk from the root. Any node the walk doesn't reach
        // hangs off a cycle.
        let mut traversal = Vec::with_capacity(nodes.len());
        traversal.push(root);
        let mut cursor = 0;
        while cursor < traversal.len() {
            let index = traversal[cursor];
            cursor += 1;
            traversal.extend_from_slice(&nodes[index as usize].children);
        }

        if traversal.len() != nodes.len() {
            return Err(AssetError::InvalidHierarchy(format!(
                "{} of {} nodes unreachable from root",
                nodes.len() - traversal.len(),
                nodes.len()
            )));
        }

        let name_lookup = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.name.clone(), index as NodeIndex))
            .collect();

        Ok(Self {
            nodes,
            root,
            traversal,
            name_lookup,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index as usize]
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Node indices in parent-before-child order.
    pub fn traversal_order(&self) -> &[NodeIndex] {
        &self.traversal
    }

    pub fn index_by_name(&self, name: &str) -> Option<NodeIndex> {
        self.name_lookup.get(name).copied()
    }
}
