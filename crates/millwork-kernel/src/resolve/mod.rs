//! Recursive component resolution.
//!
//! Resolution runs in two phases. The interior pass walks the schema tree
//! from the carcass down, handing each node the box of the cell it occupies
//! and collecting the panels and cells its generator produces. Sibling cells
//! are independent, so with [`ResolveSettings::parallel`] they resolve on the
//! rayon pool. The pending tree is then flattened into the arena in
//! pre-order. The external pass runs last, so a door may reference any
//! component or cell in the document.

mod carcass;
mod divider;
mod drawers;
mod external;
mod shelves;

use std::collections::HashMap;

use millwork_ir::{Component, ComponentClass, Document, Fill, SchemaNode};
use millwork_math::{BoundingBox, GeometryError, Tolerance, Transform};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::annotation::Annotation;
use crate::error::{Fault, NodePath, ResolveError, Result};
use crate::frame;
use crate::part::{Panel, Part};
use crate::settings::ResolveSettings;
use crate::tree::{Cell, NodeIndex, Resolution, ResolvedNode, ResolvedTree};

/// What a generator produces for one node, in the node's local frame.
#[derive(Debug, Default)]
pub(crate) struct Generated {
    pub panels: Vec<Panel>,
    pub cells: Vec<(String, BoundingBox)>,
    pub annotations: Vec<Annotation>,
}

/// Reject a length parameter that is negative or not finite.
pub(crate) fn non_negative(name: &str, value: f64) -> std::result::Result<(), Fault> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Fault::InvalidParameters(format!(
            "{name} must be a non-negative length, got {value}"
        )))
    }
}

/// Where a subtree sits when it is resolved on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveContext {
    /// Path of the node that owns the inherited cell.
    pub path: NodePath,
    /// Material inherited from that node.
    pub material_ref: Option<String>,
}

/// Resolves schema trees into [`ResolvedTree`]s.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    settings: ResolveSettings,
}

/// A resolved node not yet moved into the arena.
struct Pending<'a> {
    schema: &'a SchemaNode,
    class: ComponentClass,
    path: NodePath,
    bbox: BoundingBox,
    transform: Transform,
    material: Option<String>,
    parts: Vec<Part>,
    annotations: Vec<Annotation>,
    cells: Vec<PendingCell<'a>>,
}

struct PendingCell<'a> {
    name: String,
    bbox: BoundingBox,
    slot: Slot<'a>,
}

enum Slot<'a> {
    Empty,
    Node(Box<Pending<'a>>),
    Failed(ResolveError),
}

/// Arena under construction, with the schema and material of every node.
struct Arena<'a> {
    nodes: Vec<ResolvedNode>,
    schemas: Vec<&'a SchemaNode>,
    materials: Vec<Option<String>>,
    errors: Vec<ResolveError>,
}

impl Resolver {
    /// Create a resolver.
    pub fn new(settings: ResolveSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &ResolveSettings {
        &self.settings
    }

    fn tol(&self) -> Tolerance {
        self.settings.tol()
    }

    /// Resolve a whole document. The root must be a carcass; its exterior
    /// box is the root box and the world frame is the carcass frame's parent.
    pub fn resolve_document(&self, document: &Document) -> Result<Resolution> {
        let root = &document.root;
        let path = NodePath::default().child(&root.id);
        let exterior = match root
            .component()
            .map_err(|e| ResolveError::from_schema(e, &path))?
        {
            Component::Carcass(params) => params.exterior,
            other => {
                return Err(ResolveError::structure(
                    &path,
                    format!("document root must be a carcass, found {:?}", other.class()),
                ))
            }
        };
        self.resolve(root, &exterior, &Transform::identity())
    }

    /// Resolve `node` into the box `inherited` of its parent's frame, where
    /// `world` is the parent's world transform.
    pub fn resolve(
        &self,
        node: &SchemaNode,
        inherited: &BoundingBox,
        world: &Transform,
    ) -> Result<Resolution> {
        self.resolve_with(node, inherited, world, &ResolveContext::default())
    }

    /// Like [`resolve`](Self::resolve), for a subtree whose ancestors are
    /// described by `ctx`. Part ids and materials match a full-tree pass.
    pub fn resolve_with(
        &self,
        node: &SchemaNode,
        inherited: &BoundingBox,
        world: &Transform,
        ctx: &ResolveContext,
    ) -> Result<Resolution> {
        let root_path = ctx.path.child(&node.id);
        info!(
            root = %root_path,
            partial = self.settings.partial,
            parallel = self.settings.parallel,
            "resolving assembly"
        );

        let dups = node.duplicate_ids();
        if !dups.is_empty() {
            return Err(ResolveError::structure(
                &root_path,
                format!("duplicate ids: {}", dups.join(", ")),
            ));
        }

        let pending = self.build(
            node,
            inherited,
            world,
            &ctx.path,
            ctx.material_ref.clone(),
            ctx.path.ids().is_empty(),
        )?;

        let mut arena = Arena {
            nodes: Vec::new(),
            schemas: Vec::new(),
            materials: Vec::new(),
            errors: Vec::new(),
        };
        let root = arena.flatten(pending, None);
        self.resolve_externals(&mut arena)?;

        let tree = ResolvedTree {
            nodes: arena.nodes,
            root,
        };
        info!(
            nodes = tree.len(),
            parts = tree.part_count(),
            errors = arena.errors.len(),
            "resolution finished"
        );
        Ok(Resolution {
            tree,
            errors: arena.errors,
        })
    }

    fn build<'a>(
        &self,
        node: &'a SchemaNode,
        bbox: &BoundingBox,
        parent_world: &Transform,
        parent_path: &NodePath,
        inherited_material: Option<String>,
        is_root: bool,
    ) -> Result<Pending<'a>> {
        let path = parent_path.child(&node.id);
        let tol = self.tol();
        let component = node
            .component()
            .map_err(|e| ResolveError::from_schema(e, &path))?;
        let world = frame::compose(parent_world, bbox, node.mirror)
            .map_err(|e| ResolveError::geometry(&path, e))?;
        if bbox.is_degenerate(&tol) {
            return Err(ResolveError::OverConstrained {
                path,
                message: "cell has no usable volume".to_string(),
            });
        }
        let material = node.material_ref.clone().or(inherited_material);
        let local = bbox.local();

        let generated = match &component {
            Component::Carcass(params) => {
                if !is_root {
                    return Err(ResolveError::structure(
                        &path,
                        "a carcass can only be the assembly root",
                    ));
                }
                carcass::generate(params, &local, material.as_deref(), &tol)
            }
            Component::Divider(params) => {
                divider::generate(params, &local, material.as_deref(), &tol)
            }
            Component::Fill(Fill::Shelves(params)) => {
                shelves::generate(params, &local, material.as_deref(), &tol)
            }
            Component::Fill(Fill::DrawerStack(params)) => {
                drawers::generate(params, &local, material.as_deref(), &tol)
            }
            Component::External(role, _) => {
                return Err(ResolveError::structure(
                    &path,
                    format!("{} must be declared under externals", role.tag()),
                ))
            }
        }
        .map_err(|f| f.at(&path))?;

        if node.children.len() > generated.cells.len() {
            return Err(ResolveError::structure(
                &path,
                format!(
                    "{} children declared but only {} cells produced",
                    node.children.len(),
                    generated.cells.len()
                ),
            ));
        }

        let parts: Vec<Part> = generated
            .panels
            .into_iter()
            .map(|panel| panel.place(&path, &world))
            .collect();
        let annotations: Vec<Annotation> = generated
            .annotations
            .iter()
            .map(|a| a.place(&world))
            .collect();

        let resolve_cell = |(i, (name, cell_box)): (usize, &(String, BoundingBox))| {
            let slot = match node.children.get(i).and_then(Option::as_ref) {
                None => Slot::Empty,
                Some(child) => match self.build(
                    child,
                    cell_box,
                    &world,
                    &path,
                    material.clone(),
                    false,
                ) {
                    Ok(pending) => Slot::Node(Box::new(pending)),
                    Err(err) if self.settings.partial => Slot::Failed(err),
                    Err(err) => return Err(err),
                },
            };
            Ok(PendingCell {
                name: name.clone(),
                bbox: *cell_box,
                slot,
            })
        };
        let cells: Vec<Result<PendingCell<'a>>> = if self.settings.parallel {
            generated
                .cells
                .par_iter()
                .enumerate()
                .map(resolve_cell)
                .collect()
        } else {
            generated.cells.iter().enumerate().map(resolve_cell).collect()
        };
        let cells = cells.into_iter().collect::<Result<Vec<_>>>()?;

        debug!(
            path = %path,
            class = ?component.class(),
            parts = parts.len(),
            cells = cells.len(),
            "resolved node"
        );

        Ok(Pending {
            schema: node,
            class: component.class(),
            path,
            bbox: *bbox,
            transform: world,
            material,
            parts,
            annotations,
            cells,
        })
    }

    fn resolve_externals(&self, arena: &mut Arena<'_>) -> Result<()> {
        let mut ids: HashMap<String, NodeIndex> = arena
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), NodeIndex(i)))
            .collect();

        let interior = arena.nodes.len();
        for i in 0..interior {
            let schema = arena.schemas[i];
            for ext in &schema.externals {
                match self.resolve_external(ext, NodeIndex(i), arena, &ids) {
                    Ok(node) => {
                        let idx = NodeIndex(arena.nodes.len());
                        debug!(path = %node.path, parts = node.parts.len(), "resolved external");
                        ids.insert(node.id.clone(), idx);
                        arena.nodes[i].externals.push(idx);
                        arena.nodes.push(node);
                        arena.schemas.push(ext);
                        arena.materials.push(None);
                    }
                    Err(err) if self.settings.partial => {
                        warn!(error = %err, "skipping external");
                        arena.errors.push(err);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }

    fn resolve_external(
        &self,
        ext: &SchemaNode,
        declaring: NodeIndex,
        arena: &Arena<'_>,
        ids: &HashMap<String, NodeIndex>,
    ) -> Result<ResolvedNode> {
        let owner = &arena.nodes[declaring.0];
        let path = owner.path.child(&ext.id);
        let (role, params) = match ext
            .component()
            .map_err(|e| ResolveError::from_schema(e, &path))?
        {
            Component::External(role, params) => (role, params),
            other => {
                return Err(ResolveError::structure(
                    &path,
                    format!("{:?} cannot be declared as an external", other.class()),
                ))
            }
        };
        if !ext.children.is_empty() || !ext.externals.is_empty() {
            return Err(ResolveError::structure(
                &path,
                "external panels cannot have children",
            ));
        }

        let unknown = || ResolveError::UnknownFaceReference {
            external: ext.id.clone(),
            path: path.clone(),
            target: params.target.clone(),
            cell: params.cell.clone(),
            face: params.face,
        };
        let target = ids
            .get(&params.target)
            .and_then(|&t| arena.nodes.get(t.0))
            .ok_or_else(unknown)?;
        let target_box = match &params.cell {
            Some(cell) => target.cell_world_box(cell).ok_or_else(unknown)?,
            None => target.world_box(),
        };

        let tol = self.tol();
        let material = ext
            .material_ref
            .clone()
            .or_else(|| arena.materials[declaring.0].clone());
        let (world_box, panel) =
            external::generate(role, &params, &target_box, material, &tol).map_err(|f| f.at(&path))?;

        let inverse = owner.transform.inverse().ok_or_else(|| {
            ResolveError::geometry(
                &path,
                GeometryError::NotFinite {
                    what: "declaring node transform",
                },
            )
        })?;
        let bbox = inverse.apply_box(&world_box);
        // Faces and hinge sides are world directions; the owner's reflections
        // do not apply to the panel frame.
        let transform = frame::compose(&Transform::identity(), &world_box, ext.mirror)
            .map_err(|e| ResolveError::geometry(&path, e))?;
        let part = panel.place(&path, &transform);

        Ok(ResolvedNode {
            id: ext.id.clone(),
            tag: ext.tag.clone(),
            class: ComponentClass::External,
            path,
            bbox,
            transform,
            parts: vec![part],
            annotations: Vec::new(),
            cells: Vec::new(),
            externals: Vec::new(),
            parent: Some(declaring),
        })
    }
}

impl<'a> Arena<'a> {
    /// Move a pending subtree into the arena in pre-order, recording the
    /// errors of skipped cells as they are met.
    fn flatten(&mut self, pending: Pending<'a>, parent: Option<NodeIndex>) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len());
        let Pending {
            schema,
            class,
            path,
            bbox,
            transform,
            material,
            parts,
            annotations,
            cells,
        } = pending;

        let mut slots = Vec::with_capacity(cells.len());
        let cells = cells
            .into_iter()
            .map(|c| {
                slots.push(c.slot);
                Cell {
                    name: c.name,
                    bbox: c.bbox,
                    child: None,
                }
            })
            .collect();

        self.nodes.push(ResolvedNode {
            id: schema.id.clone(),
            tag: schema.tag.clone(),
            class,
            path,
            bbox,
            transform,
            parts,
            annotations,
            cells,
            externals: Vec::new(),
            parent,
        });
        self.schemas.push(schema);
        self.materials.push(material);

        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Slot::Empty => {}
                Slot::Node(child) => {
                    let child_idx = self.flatten(*child, Some(idx));
                    self.nodes[idx.0].cells[i].child = Some(child_idx);
                }
                Slot::Failed(err) => {
                    warn!(error = %err, "skipping subtree");
                    self.errors.push(err);
                }
            }
        }
        idx
    }
}

/// Resolve a document with default settings and return its tree.
pub fn resolve(document: &Document) -> Result<ResolvedTree> {
    Resolver::default()
        .resolve_document(document)
        .map(|resolution| resolution.tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use millwork_math::{Axis, Point3, Vec3};
    use serde_json::json;

    fn carcass() -> SchemaNode {
        SchemaNode::new("carcass", "base")
            .with_parameters(json!({
                "exterior": { "origin": [0.0, 0.0, 0.0], "dimensions": [600.0, 600.0, 870.0] },
                "thickness": 19.0
            }))
            .with_material("birch")
    }

    fn split(positions: serde_json::Value) -> SchemaNode {
        SchemaNode::new("divider", "split")
            .with_parameters(json!({ "axis": "x", "positions": positions }))
    }

    fn shelves(id: &str, count: usize) -> SchemaNode {
        SchemaNode::new("shelves", id).with_parameters(json!({ "count": count }))
    }

    fn strict() -> Resolver {
        Resolver::default()
    }

    fn partial() -> Resolver {
        Resolver::new(ResolveSettings {
            partial: true,
            ..ResolveSettings::default()
        })
    }

    #[test]
    fn carcass_and_divider_scenario() {
        let doc = Document::new(carcass().with_child(split(json!([0.5]))));
        let tree = strict().resolve_document(&doc).unwrap().tree;

        let base = tree.get(tree.root()).unwrap();
        let interior = base.cell("interior").unwrap();
        assert_eq!(interior.bbox.origin, Point3::new(19.0, 19.0, 19.0));
        assert_eq!(interior.bbox.dimensions, Vec3::new(562.0, 581.0, 832.0));

        let idx = tree.find("split").unwrap();
        let node = tree.get(idx).unwrap();
        assert_eq!(node.parent, Some(tree.root()));
        assert_eq!(node.path.to_string(), "base/split");
        assert_eq!(node.transform.origin(), Point3::new(19.0, 19.0, 19.0));
        for cell in &node.cells {
            assert_eq!(cell.bbox.dimensions, Vec3::new(271.5, 581.0, 832.0));
        }
        let divider = &node.parts[0];
        assert_eq!(divider.id, "base/split/divider_0");
        assert_eq!(divider.dimensions, Vec3::new(19.0, 581.0, 832.0));
        assert_eq!(divider.position, Point3::new(290.5, 19.0, 19.0));
        assert_eq!(divider.material_ref.as_deref(), Some("birch"));
        assert_eq!(tree.children(tree.root()), vec![("interior", idx)]);
        assert_eq!(tree.transform_chain(idx).len(), 2);
    }

    #[test]
    fn invalid_split_aborts_strict_pass() {
        let doc = Document::new(carcass().with_child(split(json!([1.2]))));
        let err = strict().resolve_document(&doc).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidSplit { .. }));
        assert_eq!(err.path().to_string(), "base/split");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn partial_mode_skips_failing_subtree() {
        let bad = split(json!([1.2])).with_child(shelves("never", 1));
        let doc = Document::new(carcass().with_child(bad));
        let resolution = partial().resolve_document(&doc).unwrap();
        assert_eq!(resolution.errors.len(), 1);
        assert!(!resolution.is_complete());
        let tree = resolution.tree;
        assert!(tree.find("split").is_none());
        assert!(tree.find("never").is_none());
        assert_eq!(tree.part_count(), 5);
        assert_eq!(tree.get(tree.root()).unwrap().cells[0].child, None);
    }

    #[test]
    fn over_constrained_shelves() {
        let short = SchemaNode::new("divider", "rows")
            .with_parameters(json!({ "axis": "z", "positions": [200.0], "units": "absolute" }))
            .with_child(shelves("crowded", 5));
        let doc = Document::new(carcass().with_child(short));
        let err = strict().resolve_document(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OverConstrained);
        assert_eq!(err.path().to_string(), "base/rows/crowded");

        let resolution = partial().resolve_document(&doc).unwrap();
        assert_eq!(resolution.errors.len(), 1);
        assert!(resolution.tree.find("rows").is_some());
    }

    #[test]
    fn errors_are_collected_in_document_order() {
        let doc = Document::new(
            carcass().with_child(
                SchemaNode::new("divider", "split")
                    .with_parameters(json!({ "axis": "x", "cells": 2 }))
                    .with_child(SchemaNode::new("cupboard", "first"))
                    .with_child(shelves("second", 40)),
            ),
        );
        let err = strict().resolve_document(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownComponentType);

        let resolution = partial().resolve_document(&doc).unwrap();
        let paths: Vec<String> = resolution.errors.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, ["base/split/first", "base/split/second"]);
    }

    #[test]
    fn structural_errors() {
        let too_many = carcass()
            .with_child(shelves("a", 1))
            .with_child(shelves("b", 1));
        let err = strict().resolve_document(&Document::new(too_many)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidStructure { .. }));

        let dup = carcass().with_child(split(json!([0.5])).with_child(shelves("split", 1)));
        let err = strict().resolve_document(&Document::new(dup)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidStructure { .. }));

        let door_as_child = carcass().with_child(
            SchemaNode::new("door", "door").with_parameters(json!({ "target": "base", "face": "front" })),
        );
        let err = strict().resolve_document(&Document::new(door_as_child)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidStructure { .. }));

        let err = strict()
            .resolve_document(&Document::new(shelves("root", 1)))
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidStructure { .. }));
    }

    #[test]
    fn malformed_parameters() {
        let bad = SchemaNode::new("divider", "split").with_parameters(json!({ "axis": "x", "positons": [0.5] }));
        let err = strict()
            .resolve_document(&Document::new(carcass().with_child(bad)))
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidParameters { .. }));
    }

    #[test]
    fn externals_reference_cells_anywhere() {
        let doc = Document::new(
            carcass()
                .with_child(split(json!([0.5])))
                .with_external(SchemaNode::new("door", "left_door").with_parameters(json!({
                    "target": "split", "cell": "cell_0", "face": "front", "hinge_side": "left"
                }))),
        );
        let tree = strict().resolve_document(&doc).unwrap().tree;
        let idx = tree.find("left_door").unwrap();
        let door = tree.get(idx).unwrap();
        assert_eq!(door.class, ComponentClass::External);
        assert_eq!(door.parent, Some(tree.root()));
        assert_eq!(door.path.to_string(), "base/left_door");
        let part = &door.parts[0];
        assert_eq!(part.id, "base/left_door/door");
        assert_eq!(part.position, Point3::new(19.0, 600.0, 19.0));
        assert_eq!(part.dimensions, Vec3::new(271.5, 19.0, 832.0));
        assert_eq!(part.machining.len(), 2);
        assert_eq!(tree.get(tree.root()).unwrap().externals, vec![idx]);
        assert_eq!(*tree.preorder().last().unwrap(), idx);
    }

    #[test]
    fn mirrored_external_moves_hinge_cups() {
        let door = |mirror: Option<Axis>| {
            let mut node = SchemaNode::new("door", "door").with_parameters(json!({
                "target": "base", "face": "front", "hinge_side": "left"
            }));
            node.mirror = mirror;
            let doc = Document::new(carcass().with_external(node));
            let tree = strict().resolve_document(&doc).unwrap().tree;
            tree.get(tree.find("door").unwrap()).unwrap().parts[0].clone()
        };
        let plain = door(None);
        let mirrored = door(Some(Axis::X));
        assert_eq!(plain.position, mirrored.position);
        let across = |p: &Part| match &p.machining[0] {
            crate::part::MachiningOp::Drill { at, .. } => at.y,
            other => panic!("unexpected op {other:?}"),
        };
        assert!((across(&plain) - 22.5).abs() < 1e-9);
        assert!((across(&mirrored) - 577.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_face_reference() {
        for params in [
            json!({ "target": "missing", "face": "front" }),
            json!({ "target": "split", "cell": "cell_9", "face": "front" }),
        ] {
            let doc = Document::new(
                carcass()
                    .with_child(split(json!([0.5])))
                    .with_external(SchemaNode::new("door", "door").with_parameters(params)),
            );
            let err = strict().resolve_document(&doc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownFaceReference);
            assert_eq!(err.path().to_string(), "base/door");

            let resolution = partial().resolve_document(&doc).unwrap();
            assert_eq!(resolution.errors.len(), 1);
            assert!(resolution.tree.find("door").is_none());
        }
    }

    #[test]
    fn materials_are_inherited() {
        let doc = Document::new(
            carcass().with_child(
                split(json!([0.5]))
                    .with_child(shelves("left", 1).with_material("oak"))
                    .with_child(shelves("right", 1)),
            ),
        );
        let tree = strict().resolve_document(&doc).unwrap().tree;
        let material = |id: &str| {
            let node = tree.get(tree.find(id).unwrap()).unwrap();
            node.parts[0].material_ref.clone()
        };
        assert_eq!(material("left").as_deref(), Some("oak"));
        assert_eq!(material("right").as_deref(), Some("birch"));
    }

    #[test]
    fn mirrored_subtree_keeps_its_box() {
        let plain = Document::new(carcass().with_child(split(json!([0.25]))));
        let mirrored = Document::new(carcass().with_child(split(json!([0.25])).with_mirror(Axis::X)));
        let a = strict().resolve_document(&plain).unwrap().tree;
        let b = strict().resolve_document(&mirrored).unwrap().tree;
        let node = |t: &ResolvedTree| t.get(t.find("split").unwrap()).unwrap().clone();
        let tol = Tolerance::DEFAULT;
        assert!(node(&a).world_box().approx_eq(&node(&b).world_box(), &tol));
        // The divider moves to the mirrored position.
        let xa = node(&a).parts[0].position.x;
        let xb = node(&b).parts[0].position.x;
        assert!(tol.equal(xa + 19.0, 600.0 - xb));
    }

    #[test]
    fn parallel_matches_sequential() {
        let doc = Document::new(
            carcass().with_child(
                SchemaNode::new("divider", "split")
                    .with_parameters(json!({ "axis": "x", "cells": 3 }))
                    .with_child(shelves("a", 2))
                    .with_child(
                        SchemaNode::new("drawer_stack", "b").with_parameters(json!({ "count": 3 })),
                    )
                    .with_child(shelves("c", 1)),
            ),
        );
        let sequential = strict().resolve_document(&doc).unwrap();
        let parallel = Resolver::new(ResolveSettings {
            parallel: true,
            ..ResolveSettings::default()
        })
        .resolve_document(&doc)
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn subtree_resolves_in_isolation() {
        let doc = Document::new(carcass().with_child(split(json!([0.5])).with_child(shelves("s", 2))));
        let full = strict().resolve_document(&doc).unwrap().tree;
        let base = full.get(full.root()).unwrap();
        let interior = base.cell("interior").unwrap();

        let subtree = doc.root.find("split").unwrap();
        let ctx = ResolveContext {
            path: base.path.clone(),
            material_ref: Some("birch".to_string()),
        };
        let alone = strict()
            .resolve_with(subtree, &interior.bbox, &base.transform, &ctx)
            .unwrap()
            .tree;
        let parts = |t: &ResolvedTree| -> Vec<Part> {
            t.preorder()
                .into_iter()
                .filter_map(|i| t.get(i))
                .filter(|n| n.path.ids().contains(&"split".to_string()))
                .flat_map(|n| n.parts.clone())
                .collect()
        };
        assert_eq!(parts(&full), parts(&alone));
    }

    #[test]
    fn crowded_divider_is_over_constrained() {
        let doc = Document::new(carcass().with_child(
            SchemaNode::new("divider", "split")
                .with_parameters(json!({ "axis": "x", "cells": 2, "thickness": 600.0 }))
                .with_child(shelves("s", 1)),
        ));
        let err = strict().resolve_document(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OverConstrained);
    }

    #[test]
    fn flat_inherited_box_is_over_constrained() {
        let flat = BoundingBox::new(Point3::origin(), Vec3::new(562.0, 0.0, 832.0));
        let err = strict()
            .resolve(&split(json!([0.5])), &flat, &Transform::identity())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OverConstrained);
        assert_eq!(err.path().ids(), ["split"]);
    }

    #[test]
    fn free_function_uses_defaults() {
        let doc = Document::new(carcass());
        let tree = resolve(&doc).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.part_count(), 5);
    }
}
