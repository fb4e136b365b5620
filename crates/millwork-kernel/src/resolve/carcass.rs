//! Carcass shell: sides full height, top and bottom between the sides, back
//! between top and bottom.

use millwork_ir::CarcassParams;
use millwork_math::{Axis, BoundingBox, Orientation, Point2D, Point3, Tolerance, Vec3};

use super::Generated;
use crate::error::Fault;
use crate::part::{EdgeBanding, GrainDirection, MachiningOp, Panel, PanelFace};

/// Name of the single cell a carcass produces.
pub(crate) const INTERIOR: &str = "interior";

pub(crate) fn generate(
    params: &CarcassParams,
    bbox: &BoundingBox,
    material: Option<&str>,
    tol: &Tolerance,
) -> Result<Generated, Fault> {
    let t = params.thickness;
    let bt = params.back_thickness();
    if !tol.is_positive(t) || !tol.is_positive(bt) {
        return Err(Fault::InvalidParameters(
            "panel thicknesses must be positive".into(),
        ));
    }
    if params.back_inset < 0.0 || params.back_inset >= t {
        return Err(Fault::InvalidParameters(format!(
            "back_inset {} must be in [0, {t})",
            params.back_inset
        )));
    }
    if params.nailers && !tol.is_positive(params.nailer_width) {
        return Err(Fault::InvalidParameters(
            "nailer_width must be positive".into(),
        ));
    }

    let (w, d, h) = (bbox.extent(Axis::X), bbox.extent(Axis::Y), bbox.extent(Axis::Z));
    let bottom_t = if params.include_bottom { t } else { 0.0 };
    let top_t = if params.include_top { t } else { 0.0 };
    let span = w - 2.0 * t;
    let rise = h - top_t - bottom_t;
    if !tol.is_positive(span) || !tol.is_positive(rise) {
        return Err(Fault::OverConstrained(format!(
            "exterior {w}x{d}x{h} leaves no room between {t} mm panels"
        )));
    }

    let back_y = if params.nailers { t } else { 0.0 };
    let back_depth = if params.include_back { bt } else { 0.0 };
    let interior_y = back_y + back_depth;
    if !tol.is_positive(d - interior_y) {
        return Err(Fault::OverConstrained(format!(
            "depth {d} leaves no room in front of the back"
        )));
    }
    if params.nailers && 2.0 * params.nailer_width > rise + tol.linear {
        return Err(Fault::OverConstrained(format!(
            "two {} mm nailers do not fit in {rise} mm",
            params.nailer_width
        )));
    }

    let mat = || material.map(str::to_string);
    let front_band =
        |o: Orientation| EdgeBanding::on_max_edge(o, Axis::Y, params.edge_band.clone());

    let side_box = BoundingBox::new(Point3::origin(), Vec3::new(t, d, h));
    let mut left = Panel::new("left_side", side_box, Orientation::Zyx, GrainDirection::Length, mat())
        .with_edges(front_band(Orientation::Zyx));
    let mut right = Panel::new(
        "right_side",
        side_box.translated(&Vec3::new(w - t, 0.0, 0.0)),
        Orientation::Zyx,
        GrainDirection::Length,
        mat(),
    )
    .with_edges(front_band(Orientation::Zyx));

    if params.include_back && params.back_inset > 0.0 {
        // Stopped groove over the back's height, on each side's inner face.
        let v = back_y + bt / 2.0;
        let groove = |face| MachiningOp::Dado {
            face,
            from: Point2D::new(bottom_t, v),
            to: Point2D::new(h - top_t, v),
            width: bt,
            depth: params.back_inset,
        };
        left = left.with_op(groove(PanelFace::Upper));
        right = right.with_op(groove(PanelFace::Lower));
    }

    let mut panels = vec![left, right];
    let plate = BoundingBox::new(Point3::new(t, 0.0, 0.0), Vec3::new(span, d, t));
    if params.include_bottom {
        panels.push(
            Panel::new("bottom", plate, Orientation::Xyz, GrainDirection::Width, mat())
                .with_edges(front_band(Orientation::Xyz)),
        );
    }
    if params.include_top {
        panels.push(
            Panel::new(
                "top",
                plate.translated(&Vec3::new(0.0, 0.0, h - t)),
                Orientation::Xyz,
                GrainDirection::Width,
                mat(),
            )
            .with_edges(front_band(Orientation::Xyz)),
        );
    }
    if params.nailers {
        let strip = BoundingBox::new(
            Point3::new(t, 0.0, bottom_t),
            Vec3::new(span, t, params.nailer_width),
        );
        panels.push(Panel::new(
            "bottom_nailer",
            strip,
            Orientation::Xzy,
            GrainDirection::Length,
            mat(),
        ));
        panels.push(Panel::new(
            "top_nailer",
            strip.translated(&Vec3::new(0.0, 0.0, rise - params.nailer_width)),
            Orientation::Xzy,
            GrainDirection::Length,
            mat(),
        ));
    }
    if params.include_back {
        let inset = params.back_inset;
        panels.push(Panel::new(
            "back",
            BoundingBox::new(
                Point3::new(t - inset, back_y, bottom_t),
                Vec3::new(span + 2.0 * inset, bt, rise),
            ),
            Orientation::Xzy,
            GrainDirection::Width,
            params.back_material_ref.clone().or_else(mat),
        ));
    }

    let interior = BoundingBox::new(
        Point3::new(t, interior_y, bottom_t),
        Vec3::new(span, d - interior_y, rise),
    );
    Ok(Generated {
        panels,
        cells: vec![(INTERIOR.to_string(), interior)],
        annotations: Vec::new(),
    })
}
