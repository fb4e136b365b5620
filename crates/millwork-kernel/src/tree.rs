//! The resolved assembly tree.
//!
//! Nodes live in a flat arena indexed by [`NodeIndex`]; parent and child
//! links are indices, so the tree can be walked in either direction without
//! shared ownership. Interior nodes are stored in pre-order; external
//! panels follow them, so use [`ResolvedTree::preorder`] for document order.

use millwork_ir::ComponentClass;
use millwork_math::{BoundingBox, Transform};
use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::error::{NodePath, ResolveError};
use crate::part::Part;

/// Handle to a node in a [`ResolvedTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

/// A named sub-volume produced by a carcass or divider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell name (`interior`, `cell_0`, or a declared name).
    pub name: String,
    /// Box in the owning node's local frame.
    pub bbox: BoundingBox,
    /// Component occupying the cell, if any.
    pub child: Option<NodeIndex>,
}

/// A resolved component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNode {
    /// Schema id.
    pub id: String,
    /// Schema type tag.
    pub tag: String,
    /// Component class.
    pub class: ComponentClass,
    /// Ancestor ids, root first, ending with this node.
    pub path: NodePath,
    /// Box in the parent's frame.
    pub bbox: BoundingBox,
    /// Local-to-world transform.
    pub transform: Transform,
    /// Parts owned by this node, in world coordinates.
    pub parts: Vec<Part>,
    /// Features requested on neighbouring panels, in world coordinates.
    pub annotations: Vec<Annotation>,
    /// Sub-volumes, in declaration order.
    pub cells: Vec<Cell>,
    /// External panels declared on this node.
    pub externals: Vec<NodeIndex>,
    /// Parent node; `None` for the root.
    pub parent: Option<NodeIndex>,
}

impl ResolvedNode {
    /// Box in world coordinates.
    pub fn world_box(&self) -> BoundingBox {
        crate::frame::world_box(&self.bbox, &self.transform)
    }

    /// Cell by name.
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name == name)
    }

    /// World box of a cell.
    pub fn cell_world_box(&self, name: &str) -> Option<BoundingBox> {
        self.cell(name).map(|c| self.transform.apply_box(&c.bbox))
    }
}

/// Arena of resolved nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTree {
    pub(crate) nodes: Vec<ResolvedNode>,
    pub(crate) root: NodeIndex,
}

impl ResolvedTree {
    /// Root node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Node by index.
    pub fn get(&self, idx: NodeIndex) -> Option<&ResolvedNode> {
        self.nodes.get(idx.0)
    }

    /// All nodes in storage order: interior nodes in pre-order, then externals.
    pub fn nodes(&self) -> &[ResolvedNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node index by schema id.
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| n.id == id).map(NodeIndex)
    }

    /// Occupied cells of a node as `(cell name, child)` pairs, then its externals
    /// under their own ids.
    pub fn children(&self, idx: NodeIndex) -> Vec<(&str, NodeIndex)> {
        let Some(node) = self.get(idx) else {
            return Vec::new();
        };
        let cells = node
            .cells
            .iter()
            .filter_map(|c| c.child.map(|child| (c.name.as_str(), child)));
        let externals = node
            .externals
            .iter()
            .filter_map(|&e| self.get(e).map(|n| (n.id.as_str(), e)));
        cells.chain(externals).collect()
    }

    /// Depth-first pre-order walk: node, cell children, then externals.
    pub fn preorder(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            for (_, child) in self.children(idx).into_iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Transforms from the root down to `idx`, inclusive.
    pub fn transform_chain(&self, idx: NodeIndex) -> Vec<&Transform> {
        let mut chain = Vec::new();
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let Some(node) = self.get(i) else { break };
            chain.push(&node.transform);
            cur = node.parent;
        }
        chain.reverse();
        chain
    }

    /// Total number of parts held by all nodes.
    pub fn part_count(&self) -> usize {
        self.nodes.iter().map(|n| n.parts.len()).sum()
    }
}

/// Result of resolving a document.
///
/// In strict mode `errors` is always empty; in partial mode it lists the
/// subtrees that were skipped, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved tree.
    pub tree: ResolvedTree,
    /// Errors recorded for skipped subtrees.
    pub errors: Vec<ResolveError>,
}

impl Resolution {
    /// Whether every node resolved.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
