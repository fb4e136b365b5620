//! Read-only navigation view of a resolved tree.
//!
//! The outline is recomputed from the tree on demand and never edited; a UI
//! panel listing components, their cells and part counts renders it directly.

use millwork_ir::ComponentClass;
use millwork_math::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::error::NodePath;
use crate::tree::{NodeIndex, ResolvedTree};

/// What an outline entry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineKind {
    /// A resolved component.
    Component(ComponentClass),
    /// A cell nothing occupies.
    EmptyCell,
}

/// One row of the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Component id, or cell name for empty cells.
    pub label: String,
    /// Entry kind.
    pub kind: OutlineKind,
    /// Component path; for empty cells, the owner's path plus the cell name.
    pub path: NodePath,
    /// Box in world coordinates.
    pub world_box: BoundingBox,
    /// Parts owned directly.
    pub part_count: usize,
    /// Parts owned by this entry and everything below it.
    pub total_parts: usize,
    /// Cells in order, then externals.
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    /// Entries depth-first with their depth, starting at 0 for `self`.
    pub fn walk(&self) -> Vec<(usize, &OutlineEntry)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, self)];
        while let Some((depth, entry)) = stack.pop() {
            out.push((depth, entry));
            for child in entry.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

/// Outline of the whole tree.
pub fn outline(tree: &ResolvedTree) -> Option<OutlineEntry> {
    entry(tree, tree.root())
}

fn entry(tree: &ResolvedTree, idx: NodeIndex) -> Option<OutlineEntry> {
    let node = tree.get(idx)?;
    let mut children = Vec::with_capacity(node.cells.len() + node.externals.len());
    for cell in &node.cells {
        match cell.child.and_then(|c| entry(tree, c)) {
            Some(child) => children.push(child),
            None => children.push(OutlineEntry {
                label: cell.name.clone(),
                kind: OutlineKind::EmptyCell,
                path: node.path.child(&cell.name),
                world_box: node.transform.apply_box(&cell.bbox),
                part_count: 0,
                total_parts: 0,
                children: Vec::new(),
            }),
        }
    }
    children.extend(node.externals.iter().filter_map(|&e| entry(tree, e)));

    let total_parts = node.parts.len() + children.iter().map(|c| c.total_parts).sum::<usize>();
    Some(OutlineEntry {
        label: node.id.clone(),
        kind: OutlineKind::Component(node.class),
        path: node.path.clone(),
        world_box: node.world_box(),
        part_count: node.parts.len(),
        total_parts,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolver;
    use millwork_ir::{Document, SchemaNode};
    use serde_json::json;

    #[test]
    fn outline_counts_parts_and_empty_cells() {
        let split = SchemaNode::new("divider", "split")
            .with_parameters(json!({ "axis": "x", "positions": [0.5] }))
            .with_child(SchemaNode::new("shelves", "left").with_parameters(json!({ "count": 2 })));
        let root = SchemaNode::new("carcass", "base")
            .with_parameters(json!({
                "exterior": { "origin": [0.0, 0.0, 0.0], "dimensions": [600.0, 600.0, 870.0] }
            }))
            .with_child(split)
            .with_external(
                SchemaNode::new("door", "door")
                    .with_parameters(json!({ "target": "base", "face": "front" })),
            );
        let tree = Resolver::default()
            .resolve_document(&Document::new(root))
            .unwrap()
            .tree;
        let view = outline(&tree).unwrap();

        assert_eq!(view.label, "base");
        assert_eq!(view.part_count, 5);
        assert_eq!(view.total_parts, 5 + 1 + 2 + 1);
        let rows: Vec<_> = view
            .walk()
            .into_iter()
            .map(|(depth, e)| (depth, e.label.as_str(), e.kind))
            .collect();
        assert_eq!(
            rows,
            [
                (0, "base", OutlineKind::Component(ComponentClass::Carcass)),
                (1, "split", OutlineKind::Component(ComponentClass::Divider)),
                (2, "left", OutlineKind::Component(ComponentClass::TerminalFill)),
                (2, "cell_1", OutlineKind::EmptyCell),
                (1, "door", OutlineKind::Component(ComponentClass::External)),
            ]
        );
        let empty = &view.children[0].children[1];
        assert_eq!(empty.path.to_string(), "base/split/cell_1");
        assert_eq!(empty.world_box.origin.x, 19.0 + 290.5);
    }
}
