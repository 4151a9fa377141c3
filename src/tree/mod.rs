use serde::Deserialize;
use thiserror::Error;

pub mod builtin;
pub mod layout;
pub mod painter;
pub mod scene_graph;

pub type NodeId = usize;

/// Errors that abort a render before anything is drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("tree has no root node")]
    EmptyInput,

    #[error("invalid tree: {reason}")]
    InvalidTree { reason: String },

    #[error("invalid render configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl RenderError {
    pub(crate) fn invalid_tree(reason: impl Into<String>) -> Self {
        RenderError::InvalidTree {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        RenderError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Nested, literal form of a tree: a name plus ordered children.
///
/// This mirrors the way hierarchies are usually written down by hand and is
/// also the JSON shape accepted on the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// Hierarchy stored as an explicit node list.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub label: Option<String>,
    pub root: Option<NodeId>,
    pub nodes: Vec<TreeNode>,
}

/// Node within a tree. Children are kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A node visited by [`Tree::preorder`], with its distance from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub id: NodeId,
    pub depth: usize,
}

impl Tree {
    /// Tree without any nodes. Rendering it fails with [`RenderError::EmptyInput`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a tree from raw parts without checking them.
    ///
    /// Structural problems are reported later by [`Tree::preorder`].
    pub fn from_parts(label: Option<String>, root: Option<NodeId>, nodes: Vec<TreeNode>) -> Self {
        Self { label, root, nodes }
    }

    /// Flatten a nested literal into a tree, assigning ids in pre-order.
    pub fn from_spec(spec: &NodeSpec) -> Self {
        fn push(spec: &NodeSpec, parent: Option<NodeId>, nodes: &mut Vec<TreeNode>) -> NodeId {
            let id = nodes.len();
            let mut node = TreeNode::new(id, spec.name.clone());
            node.parent = parent;
            nodes.push(node);

            for child in &spec.children {
                let child_id = push(child, Some(id), nodes);
                nodes[id].children.push(child_id);
            }
            id
        }

        let mut nodes = Vec::new();
        let root = push(spec, None, &mut nodes);
        Self {
            label: Some(spec.name.clone()),
            root: Some(root),
            nodes,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.and_then(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Depth-first, pre-order walk from the root.
    ///
    /// This is also the structural validation of the tree: the walk fails on
    /// a missing root, dangling or repeated child ids, parent links that
    /// disagree with child lists, and nodes that the root cannot reach.
    pub fn preorder(&self) -> RenderResult<Vec<Visit>> {
        let root_id = self.root.ok_or(RenderError::EmptyInput)?;
        if self.nodes.is_empty() {
            return Err(RenderError::EmptyInput);
        }
        if let Some((index, node)) = self
            .nodes
            .iter()
            .enumerate()
            .find(|(index, node)| node.id != *index)
        {
            return Err(RenderError::invalid_tree(format!(
                "node '{}' at index {index} carries id {}",
                node.name, node.id
            )));
        }
        let root = self.nodes.get(root_id).ok_or_else(|| {
            RenderError::invalid_tree(format!("root id {root_id} does not name a node"))
        })?;
        if root.parent.is_some() {
            return Err(RenderError::invalid_tree(format!(
                "root node '{}' has a parent",
                root.name
            )));
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Visit {
            id: root_id,
            depth: 0,
        }];

        while let Some(visit) = stack.pop() {
            if visited[visit.id] {
                return Err(RenderError::invalid_tree(format!(
                    "node '{}' is reachable more than once (cycle or shared child)",
                    self.nodes[visit.id].name
                )));
            }
            visited[visit.id] = true;
            order.push(visit);

            let node = &self.nodes[visit.id];
            // Reverse so that the first child is popped first.
            for &child_id in node.children.iter().rev() {
                let child = self.nodes.get(child_id).ok_or_else(|| {
                    RenderError::invalid_tree(format!(
                        "node '{}' lists missing child id {child_id}",
                        node.name
                    ))
                })?;
                if child.parent != Some(visit.id) {
                    return Err(RenderError::invalid_tree(format!(
                        "node '{}' is listed as a child of '{}' but its parent link disagrees",
                        child.name, node.name
                    )));
                }
                stack.push(Visit {
                    id: child_id,
                    depth: visit.depth + 1,
                });
            }
        }

        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return Err(RenderError::invalid_tree(format!(
                "node '{}' is not reachable from the root",
                self.nodes[orphan].name
            )));
        }

        Ok(order)
    }

    /// Every parent-child pair, in pre-order of the child.
    pub fn links(&self) -> RenderResult<Vec<(NodeId, NodeId)>> {
        let order = self.preorder()?;
        Ok(order
            .iter()
            .filter_map(|visit| self.nodes[visit.id].parent.map(|parent| (parent, visit.id)))
            .collect())
    }

    pub fn max_depth(&self) -> RenderResult<usize> {
        let order = self.preorder()?;
        Ok(order.iter().map(|visit| visit.depth).max().unwrap_or(0))
    }

    /// Number of leaf descendants of each node; a leaf counts itself.
    ///
    /// Expects a tree that passed [`Tree::preorder`].
    pub(crate) fn clade_sizes(&self, order: &[Visit]) -> Vec<usize> {
        let mut sizes = vec![0usize; self.nodes.len()];
        // Children always follow their parent in pre-order, so a reverse walk
        // sees every child before its parent.
        for visit in order.iter().rev() {
            let node = &self.nodes[visit.id];
            sizes[visit.id] = if node.is_leaf() {
                1
            } else {
                node.children.iter().map(|&child| sizes[child]).sum()
            };
        }
        sizes
    }
}
