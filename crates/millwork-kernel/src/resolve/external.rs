//! External panels applied to a face of a resolved box.

use millwork_ir::{ExternalParams, ExternalRole, HingeSide};
use millwork_math::{Axis, BoundingBox, Face, Orientation, Point2D, Tolerance};

use crate::error::Fault;
use crate::part::{EdgeBanding, GrainDirection, MachiningOp, Panel, PanelFace};

/// Hinge cup bore diameter.
pub(crate) const CUP_DIAMETER: f64 = 35.0;
/// Hinge cup bore depth.
pub(crate) const CUP_DEPTH: f64 = 13.0;
/// Cup centre distance from the hinge edge.
pub(crate) const CUP_EDGE_OFFSET: f64 = 22.5;
/// Cup centre distance from each end of the hinge edge.
pub(crate) const CUP_END_OFFSET: f64 = 100.0;
/// Hinge edges longer than this get a third cup.
pub(crate) const THIRD_CUP_OVER: f64 = 900.0;

fn orientation(face: Face) -> Orientation {
    match face.normal_axis() {
        Axis::Y => Orientation::Zxy,
        Axis::X => Orientation::Zyx,
        Axis::Z => Orientation::Xyz,
    }
}

/// World box of the panel: the face footprint grown by the overlay in
/// plane and extruded outward by the thickness, less the inset.
fn panel_box(params: &ExternalParams, target: &BoundingBox) -> BoundingBox {
    let face = params.face;
    let normal = face.normal_axis();
    let mut out = target.face_footprint(face);
    for axis in Axis::ALL {
        if axis != normal {
            out = out.grown(axis, params.overlay);
        }
    }
    let plane = out.min_along(normal);
    let start = if face.is_max() {
        plane - params.inset
    } else {
        plane + params.inset - params.thickness
    };
    out.slab(normal, start - plane, params.thickness)
}

fn hinge_cups(
    side: HingeSide,
    o: Orientation,
    size: (f64, f64),
    face: PanelFace,
) -> Result<Vec<MachiningOp>, Fault> {
    let (hinge_axis, at_max) = match side {
        HingeSide::Left => (Axis::X, false),
        HingeSide::Right => (Axis::X, true),
        HingeSide::Bottom => (Axis::Z, false),
        HingeSide::Top => (Axis::Z, true),
    };
    let (l, w, _) = o.axes();
    let (length, width) = size;
    // Across: distance from the hinge edge; run: along it.
    let (across_len, run_len, hinge_on_length) = if hinge_axis == l {
        (length, width, true)
    } else if hinge_axis == w {
        (width, length, false)
    } else {
        return Err(Fault::InvalidParameters(format!(
            "hinge side {side:?} is not an edge of this panel"
        )));
    };
    if run_len < 2.0 * CUP_END_OFFSET || across_len < 2.0 * CUP_EDGE_OFFSET {
        return Err(Fault::OverConstrained(format!(
            "{run_len} mm hinge edge is too short for two hinges"
        )));
    }

    let across = if at_max {
        across_len - CUP_EDGE_OFFSET
    } else {
        CUP_EDGE_OFFSET
    };
    let mut runs = vec![CUP_END_OFFSET, run_len - CUP_END_OFFSET];
    if run_len > THIRD_CUP_OVER {
        runs.insert(1, run_len / 2.0);
    }
    Ok(runs
        .into_iter()
        .map(|r| {
            let at = if hinge_on_length {
                Point2D::new(across, r)
            } else {
                Point2D::new(r, across)
            };
            MachiningOp::Drill {
                face,
                at,
                diameter: CUP_DIAMETER,
                depth: CUP_DEPTH,
            }
        })
        .collect())
}

/// The panel's world box and the panel itself in its own local frame.
pub(crate) fn generate(
    role: ExternalRole,
    params: &ExternalParams,
    target: &BoundingBox,
    material: Option<String>,
    tol: &Tolerance,
) -> Result<(BoundingBox, Panel), Fault> {
    if !tol.is_positive(params.thickness) {
        return Err(Fault::InvalidParameters(format!(
            "thickness {} must be positive",
            params.thickness
        )));
    }
    if params.hinge_side.is_some() && role != ExternalRole::Door {
        return Err(Fault::InvalidParameters(format!(
            "only doors take a hinge_side, not {}",
            role.tag()
        )));
    }

    let world = panel_box(params, target);
    if world.is_degenerate(tol) {
        return Err(Fault::OverConstrained(format!(
            "overlay {} leaves no panel on the {} face",
            params.overlay, params.face
        )));
    }

    let o = orientation(params.face);
    let mut panel = Panel::new(
        role.tag(),
        world.local(),
        o,
        GrainDirection::Length,
        material,
    )
    .with_edges(EdgeBanding::all(params.edge_band.clone()));

    if let Some(side) = params.hinge_side {
        // The inner face looks back at the target.
        let inner = if params.face.is_max() {
            PanelFace::Lower
        } else {
            PanelFace::Upper
        };
        let cut = panel.cut_size();
        for op in hinge_cups(side, o, (cut.x, cut.y), inner)? {
            panel = panel.with_op(op);
        }
    }
    Ok((world, panel))
}
