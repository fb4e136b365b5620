//! Part list extraction.
//!
//! Walks a resolved tree in pre-order, hands annotated features to the parts
//! lying on their planes, then merges identical parts.

use millwork_math::{Point2D, Point3, Tolerance};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annotation::{Annotation, Feature};
use crate::error::NodePath;
use crate::part::{MachiningOp, Part, PanelFace};
use crate::settings::{DedupPolicy, ResolveSettings};
use crate::tree::ResolvedTree;

/// A feature no part could receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unattached {
    /// Node that requested the feature.
    pub requested_by: NodePath,
    /// The feature, in world coordinates.
    pub feature: Feature,
}

/// Extraction output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extraction {
    /// Parts in canonical order.
    pub parts: Vec<Part>,
    /// Features that did not land on any part.
    pub unattached: Vec<Unattached>,
}

/// Extract the part list with default settings.
pub fn extract(tree: &ResolvedTree) -> Vec<Part> {
    extract_with(tree, &ResolveSettings::default()).parts
}

/// Extract the part list and report features that found no part.
pub fn extract_with(tree: &ResolvedTree, settings: &ResolveSettings) -> Extraction {
    let tol = settings.tol();
    let order = tree.preorder();
    let mut parts: Vec<Part> = order
        .iter()
        .filter_map(|&idx| tree.get(idx))
        .flat_map(|node| node.parts.iter().cloned())
        .collect();

    let mut unattached = Vec::new();
    for node in order.iter().filter_map(|&idx| tree.get(idx)) {
        for ann in &node.annotations {
            for feature in &ann.features {
                let target = parts.iter_mut().find_map(|p| {
                    receiving_face(p, ann, feature, &tol).map(|face| (p, face))
                });
                match target {
                    Some((part, face)) => {
                        let op = to_face(part, feature, face);
                        part.machining.push(op);
                    }
                    None => {
                        warn!(node = %node.path, plane = ann.plane, "feature has no receiving part");
                        unattached.push(Unattached {
                            requested_by: node.path.clone(),
                            feature: feature.clone(),
                        });
                    }
                }
            }
        }
    }

    let parts = dedup(parts, settings.dedup, &tol);
    Extraction { parts, unattached }
}

/// The face of `part` that lies on the annotation plane and covers every
/// anchor point of `feature`.
fn receiving_face(
    part: &Part,
    ann: &Annotation,
    feature: &Feature,
    tol: &Tolerance,
) -> Option<PanelFace> {
    let (_, _, t) = part.rotation.axes();
    if t != ann.normal {
        return None;
    }
    let bbox = part.world_box();
    let face = if ann.outward > 0.0 {
        tol.equal(bbox.min_along(t), ann.plane).then_some(PanelFace::Lower)
    } else {
        tol.equal(bbox.max_along(t), ann.plane).then_some(PanelFace::Upper)
    }?;
    feature
        .anchor_points()
        .iter()
        .all(|p| bbox.contains_point(p, tol))
        .then_some(face)
}

fn to_face(part: &Part, feature: &Feature, face: PanelFace) -> MachiningOp {
    let (l, w, _) = part.rotation.axes();
    let uv = |p: &Point3| {
        Point2D::new(
            p[l.index()] - part.position[l.index()],
            p[w.index()] - part.position[w.index()],
        )
    };
    match feature {
        Feature::Drill {
            at,
            diameter,
            depth,
        } => MachiningOp::Drill {
            face,
            at: uv(at),
            diameter: *diameter,
            depth: *depth,
        },
        Feature::Dado {
            from,
            to,
            width,
            depth,
        } => MachiningOp::Dado {
            face,
            from: uv(from),
            to: uv(to),
            width: *width,
            depth: *depth,
        },
    }
}

/// Merge parts that are the same piece under `policy`, keeping the first
/// occurrence's position in the list and summing quantities.
pub fn dedup(parts: Vec<Part>, policy: DedupPolicy, tol: &Tolerance) -> Vec<Part> {
    if policy == DedupPolicy::Off {
        return parts;
    }
    let mut out: Vec<Part> = Vec::with_capacity(parts.len());
    for part in parts {
        match out.iter_mut().find(|e| e.same_piece(&part, policy, tol)) {
            Some(existing) => {
                debug!(kept = %existing.id, merged = %part.id, "merging identical part");
                existing.quantity += part.quantity;
            }
            None => out.push(part),
        }
    }
    out
}
