//! Assembly of a flat node listing into a parent/child forest.
//!
//! [`Forest::build`] takes ownership of the nodes and records the hierarchy
//! as index lists next to them, so the input entities are never mutated and
//! a forest can be rebuilt from a fresh listing at any time.
//!
//! Assembly rules:
//! - a node with no parent is a root, in input order;
//! - a node whose parent is in the input is appended to that parent's
//!   children, in input order (`sort_order` is not re-applied);
//! - a node whose parent is not in the input is dropped, together with
//!   everything below it.
//!
//! Traversal always starts from the roots. A node on a parent cycle can
//! never be reached from a root, so every walk over the forest terminates.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::node::TreeNode;
use crate::types::DbId;

/// A set of root nodes with their descendants attached.
#[derive(Debug, Clone)]
pub struct Forest {
    nodes: Vec<TreeNode>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    reachable: usize,
}

/// Summary figures for a forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForestStats {
    pub root_count: usize,
    pub node_count: usize,
    pub max_depth: usize,
    pub dropped_count: usize,
}

impl Forest {
    /// Build the forest in two passes: index by id, then attach.
    pub fn build(nodes: Vec<TreeNode>) -> Self {
        let mut index_by_id: HashMap<DbId, usize> = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(id) = node.id {
                index_by_id.insert(id, idx);
            }
        }

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (idx, node) in nodes.iter().enumerate() {
            match node.parent_id {
                None => roots.push(idx),
                Some(parent_id) => {
                    if let Some(&parent_idx) = index_by_id.get(&parent_id) {
                        children[parent_idx].push(idx);
                    }
                }
            }
        }

        let mut forest = Self {
            nodes,
            children,
            roots,
            reachable: 0,
        };
        forest.reachable = forest.preorder().count();
        forest
    }

    /// Root nodes in input order.
    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&index| NodeRef {
            forest: self,
            index,
        })
    }

    /// All input nodes, reachable or not, in input order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Find a reachable node by id.
    pub fn get(&self, id: DbId) -> Option<NodeRef<'_>> {
        self.preorder()
            .map(|(_, node)| node)
            .find(|node| node.node().id == Some(id))
    }

    /// Depth-first, pre-order walk yielding `(depth, node)`; roots are depth 0.
    pub fn preorder(&self) -> Preorder<'_> {
        let stack = self.roots.iter().rev().map(|&idx| (idx, 0)).collect();
        Preorder { forest: self, stack }
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of nodes reachable from a root.
    pub fn node_count(&self) -> usize {
        self.reachable
    }

    /// Number of input nodes that are not reachable from any root.
    pub fn dropped_count(&self) -> usize {
        self.nodes.len() - self.reachable
    }

    /// Longest root-to-leaf path counted in edges. A lone root has depth 0,
    /// as does an empty forest.
    pub fn max_depth(&self) -> usize {
        self.preorder().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn stats(&self) -> ForestStats {
        ForestStats {
            root_count: self.root_count(),
            node_count: self.node_count(),
            max_depth: self.max_depth(),
            dropped_count: self.dropped_count(),
        }
    }

    /// Fail with [`CoreError::MalformedHierarchy`] when the input held nodes
    /// but none of them is a root. An empty input is not an error.
    pub fn ensure_rooted(&self, tree_id: DbId) -> Result<(), CoreError> {
        if !self.nodes.is_empty() && self.roots.is_empty() {
            return Err(CoreError::MalformedHierarchy {
                tree_id,
                node_count: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Owned nested view, for serialization.
    pub fn to_nested(&self) -> Vec<NestedNode> {
        self.roots().map(|root| root.to_nested()).collect()
    }
}

/// A borrowed handle to one node inside a [`Forest`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    index: usize,
}

impl<'a> NodeRef<'a> {
    pub fn node(&self) -> &'a TreeNode {
        &self.forest.nodes[self.index]
    }

    /// Position of this node in the input listing.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Direct children in attachment order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let forest = self.forest;
        forest.children[self.index]
            .iter()
            .map(move |&index| NodeRef { forest, index })
    }

    pub fn has_children(&self) -> bool {
        !self.forest.children[self.index].is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.forest.children[self.index].len()
    }

    fn to_nested(self) -> NestedNode {
        NestedNode {
            node: self.node().clone(),
            children: self.children().map(NodeRef::to_nested).collect(),
        }
    }
}

/// Iterator returned by [`Forest::preorder`].
pub struct Preorder<'a> {
    forest: &'a Forest,
    stack: Vec<(usize, usize)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let children = &self.forest.children[index];
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((
            depth,
            NodeRef {
                forest: self.forest,
                index,
            },
        ))
    }
}

/// A node with its children nested inline.
#[derive(Debug, Clone, Serialize)]
pub struct NestedNode {
    #[serde(flatten)]
    pub node: TreeNode,
    pub children: Vec<NestedNode>,
}
