//! Property-based tests for resolution and extraction.
//!
//! Run with: cargo test -p millwork-kernel --test properties

use millwork_ir::{Document, SchemaNode};
use millwork_kernel::{
    extract_with, frame, DedupPolicy, Part, ResolveContext, ResolveSettings, ResolvedTree, Resolver,
};
use millwork_math::{Axis, BoundingBox, Point3, Tolerance, Transform, Vec3};
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone)]
struct Cabinet {
    width: f64,
    depth: f64,
    height: f64,
    thickness: f64,
    split: f64,
    shelves: usize,
    drawers: usize,
}

fn arb_cabinet() -> impl Strategy<Value = Cabinet> {
    (
        300.0..1200.0f64,
        300.0..800.0f64,
        400.0..2000.0f64,
        12.0..25.0f64,
        0.3..0.7f64,
        1..=3usize,
        1..=3usize,
    )
        .prop_map(
            |(width, depth, height, thickness, split, shelves, drawers)| Cabinet {
                width,
                depth,
                height,
                thickness,
                split,
                shelves,
                drawers,
            },
        )
}

fn document(c: &Cabinet) -> Document {
    let split = SchemaNode::new("divider", "split")
        .with_parameters(json!({
            "axis": "x",
            "positions": [c.split],
            "thickness": c.thickness
        }))
        .with_child(
            SchemaNode::new("shelves", "shelves")
                .with_parameters(json!({ "count": c.shelves, "thickness": c.thickness })),
        )
        .with_child(
            SchemaNode::new("drawer_stack", "drawers").with_parameters(json!({ "count": c.drawers })),
        );
    let root = SchemaNode::new("carcass", "base")
        .with_parameters(json!({
            "exterior": {
                "origin": [0.0, 0.0, 0.0],
                "dimensions": [c.width, c.depth, c.height]
            },
            "thickness": c.thickness
        }))
        .with_material("birch")
        .with_child(split)
        .with_external(SchemaNode::new("door", "door").with_parameters(json!({
            "target": "split", "cell": "cell_0", "face": "front", "overlay": -2.0
        })));
    Document::new(root)
}

fn settings(dedup: DedupPolicy) -> ResolveSettings {
    ResolveSettings {
        dedup,
        ..ResolveSettings::default()
    }
}

/// Parts match in everything but id, name, path and position. Under
/// `CutSize` the comparison is on cut size rather than world extents.
fn same_except_placement(a: &Part, b: &Part, policy: DedupPolicy, tol: &Tolerance) -> bool {
    let shape = match policy {
        DedupPolicy::CutSize => tol.vecs_equal(&a.cut_size(), &b.cut_size()),
        _ => tol.vecs_equal(&a.dimensions, &b.dimensions) && a.rotation == b.rotation,
    };
    shape
        && a.material_ref == b.material_ref
        && a.edge_treatment == b.edge_treatment
        && a.grain_direction == b.grain_direction
        && a.machining.len() == b.machining.len()
        && a.machining.iter().zip(&b.machining).all(|(x, y)| x.approx_eq(y, tol))
}

fn resolve(doc: &Document) -> ResolvedTree {
    Resolver::default()
        .resolve_document(doc)
        .expect("generated cabinets always resolve")
        .tree
}

// =============================================================================
// Property Tests: Divider
// =============================================================================

proptest! {
    /// Cells plus divider panels exactly fill the split extent.
    #[test]
    fn divider_cells_fill_extent(
        widths in prop::collection::vec(10.0..200.0f64, 2..6),
        thickness in 3.0..25.0f64,
    ) {
        let mut centres = Vec::new();
        let mut at = 0.0;
        for w in &widths[..widths.len() - 1] {
            at += w;
            centres.push(at + thickness / 2.0);
            at += thickness;
        }
        let extent = at + widths[widths.len() - 1];
        let node = SchemaNode::new("divider", "split").with_parameters(json!({
            "axis": "z",
            "positions": centres,
            "units": "absolute",
            "thickness": thickness
        }));
        let cell = BoundingBox::from_dimensions(Vec3::new(500.0, 400.0, extent));
        let tree = Resolver::default()
            .resolve(&node, &cell, &Transform::identity())
            .unwrap()
            .tree;
        let root = tree.get(tree.root()).unwrap();

        prop_assert_eq!(root.cells.len(), widths.len());
        let sum: f64 = root.cells.iter().map(|c| c.bbox.extent(Axis::Z)).sum();
        let panels = (root.cells.len() - 1) as f64 * thickness;
        prop_assert!((sum + panels - extent).abs() < 1e-6, "{} + {} != {}", sum, panels, extent);
        for (cell, w) in root.cells.iter().zip(&widths) {
            prop_assert!((cell.bbox.extent(Axis::Z) - w).abs() < 1e-6);
        }
    }
}

// =============================================================================
// Property Tests: Resolution
// =============================================================================

proptest! {
    /// Every emitted part has positive extents.
    #[test]
    fn parts_have_positive_dimensions(c in arb_cabinet()) {
        let parts = extract_with(&resolve(&document(&c)), &settings(DedupPolicy::Off)).parts;
        prop_assert!(!parts.is_empty());
        for part in &parts {
            for axis in Axis::ALL {
                prop_assert!(part.dimensions[axis.index()] > 0.0, "{} has {:?}", part.id, part.dimensions);
            }
        }
    }

    /// Resolving the same document twice yields the same part list.
    #[test]
    fn resolution_is_deterministic(c in arb_cabinet()) {
        let doc = document(&c);
        let s = settings(DedupPolicy::Exact);
        let first = extract_with(&resolve(&doc), &s);
        let second = extract_with(&resolve(&doc), &s);
        prop_assert_eq!(first, second);
    }

    /// A subtree resolved on its own, under its parent's frame, places its
    /// parts where the full pass does.
    #[test]
    fn subtree_matches_full_tree(c in arb_cabinet()) {
        let doc = document(&c);
        let full = resolve(&doc);
        let base = full.get(full.root()).unwrap();
        let interior = base.cell("interior").unwrap();
        let ctx = ResolveContext {
            path: base.path.clone(),
            material_ref: Some("birch".to_string()),
        };
        let subtree = doc.root.find("split").unwrap();
        let alone = Resolver::default()
            .resolve_with(subtree, &interior.bbox, &base.transform, &ctx)
            .unwrap()
            .tree;

        let interior_parts = |t: &ResolvedTree| -> Vec<Part> {
            t.preorder()
                .into_iter()
                .filter_map(|i| t.get(i))
                .filter(|n| n.path.ids().iter().any(|id| id == "split"))
                .flat_map(|n| n.parts.clone())
                .collect()
        };
        let tol = Tolerance::DEFAULT;
        let a = interior_parts(&full);
        let b = interior_parts(&alone);
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(&x.id, &y.id);
            prop_assert!(tol.points_equal(&x.position, &y.position));
        }
    }

    /// A mirrored frame keeps the node inside its own box.
    #[test]
    fn mirror_preserves_box(
        origin in prop::array::uniform3(-500.0..500.0f64),
        dims in prop::array::uniform3(1.0..800.0f64),
        axis in prop::sample::select(vec![Axis::X, Axis::Y, Axis::Z]),
    ) {
        let bbox = BoundingBox::new(
            Point3::new(origin[0], origin[1], origin[2]),
            Vec3::new(dims[0], dims[1], dims[2]),
        );
        let world = frame::compose(&Transform::identity(), &bbox, Some(axis)).unwrap();
        prop_assert!(world.flips(axis));
        prop_assert!(frame::world_box(&bbox, &world).approx_eq(&bbox, &Tolerance::new(1e-9)));
    }
}

// =============================================================================
// Property Tests: Dedup
// =============================================================================

proptest! {
    /// Merging never loses pieces, and expanding a merged part gives back
    /// the pieces it absorbed, differing only in identity and placement.
    #[test]
    fn dedup_is_lossless(c in arb_cabinet()) {
        let tol = Tolerance::DEFAULT;
        let tree = resolve(&document(&c));
        let all = extract_with(&tree, &settings(DedupPolicy::Off)).parts;
        for policy in [DedupPolicy::Exact, DedupPolicy::CutSize] {
            let merged = extract_with(&tree, &settings(policy)).parts;
            prop_assert!(merged.len() <= all.len());

            // Each original belongs to the first merged entry that accepts it.
            let mut groups: Vec<Vec<&Part>> = vec![Vec::new(); merged.len()];
            for original in &all {
                let slot = merged.iter().position(|m| m.same_piece(original, policy, &tol));
                prop_assert!(slot.is_some(), "{} was lost", original.id);
                groups[slot.unwrap()].push(original);
            }

            for (part, group) in merged.iter().zip(&groups) {
                prop_assert_eq!(&part.id, &group[0].id);
                prop_assert_eq!(part.quantity as usize, group.len());
                let copies = part.expand();
                prop_assert_eq!(copies.len(), group.len());
                for (copy, original) in copies.iter().zip(group) {
                    prop_assert_eq!(copy.quantity, 1);
                    prop_assert!(
                        same_except_placement(copy, original, policy, &tol),
                        "{} does not match {}",
                        copy.id,
                        original.id
                    );
                }
            }
        }
    }

    /// Merged parts keep their first-occurrence order.
    #[test]
    fn dedup_preserves_order(c in arb_cabinet()) {
        let tree = resolve(&document(&c));
        let all = extract_with(&tree, &settings(DedupPolicy::Off)).parts;
        let merged = extract_with(&tree, &settings(DedupPolicy::Exact)).parts;
        let positions: Vec<usize> = merged
            .iter()
            .map(|m| all.iter().position(|p| p.id == m.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
