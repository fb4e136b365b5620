//! Drawer stack fill: one five-piece box per opening, bottom to top.

use millwork_ir::DrawerStackParams;
use millwork_math::{Axis, BoundingBox, Orientation, Point2D, Point3, Tolerance, Vec3};

use super::{non_negative, Generated};
use crate::error::Fault;
use crate::part::{GrainDirection, MachiningOp, Panel, PanelFace};

/// Height of the bottom groove above the underside of each box.
pub(crate) const GROOVE_OFFSET: f64 = 10.0;

fn openings(params: &DrawerStackParams, h: f64, tol: &Tolerance) -> Result<Vec<f64>, Fault> {
    let heights = match (params.heights.is_empty(), params.count) {
        (false, Some(c)) if c != params.heights.len() => {
            return Err(Fault::InvalidParameters(format!(
                "count {c} does not match {} heights",
                params.heights.len()
            )))
        }
        (false, _) => params.heights.clone(),
        (true, Some(n)) if n > 0 => vec![h / n as f64; n],
        (true, _) => {
            return Err(Fault::InvalidParameters(
                "heights or a positive count is required".into(),
            ))
        }
    };
    if let Some(bad) = heights.iter().find(|&&x| !tol.is_positive(x) || !x.is_finite()) {
        return Err(Fault::InvalidParameters(format!(
            "opening height {bad} must be positive"
        )));
    }
    let total: f64 = heights.iter().sum();
    if total > h + tol.linear {
        return Err(Fault::OverConstrained(format!(
            "openings total {total} mm, cell is {h} mm"
        )));
    }
    Ok(heights)
}

pub(crate) fn generate(
    params: &DrawerStackParams,
    bbox: &BoundingBox,
    material: Option<&str>,
    tol: &Tolerance,
) -> Result<Generated, Fault> {
    let st = params.side_thickness;
    let bt = params.bottom_thickness;
    let dd = params.bottom_dado_depth;
    if !tol.is_positive(st) || !tol.is_positive(bt) {
        return Err(Fault::InvalidParameters(
            "side and bottom thickness must be positive".into(),
        ));
    }
    if dd < 0.0 || dd >= st {
        return Err(Fault::InvalidParameters(format!(
            "bottom_dado_depth {dd} must be in [0, {st})"
        )));
    }
    non_negative("slide_clearance", params.slide_clearance)?;
    non_negative("rear_clearance", params.rear_clearance)?;
    non_negative("top_clearance", params.top_clearance)?;
    non_negative("bottom_clearance", params.bottom_clearance)?;

    let (w, d, h) = (bbox.extent(Axis::X), bbox.extent(Axis::Y), bbox.extent(Axis::Z));
    let heights = openings(params, h, tol)?;

    let bw = w - 2.0 * params.slide_clearance;
    let bd = d - params.rear_clearance;
    let inner_w = bw - 2.0 * st;
    let inner_d = bd - 2.0 * st;
    if !tol.is_positive(inner_w) || !tol.is_positive(inner_d) {
        return Err(Fault::OverConstrained(format!(
            "drawer box {bw} x {bd} mm has no room inside {st} mm sides"
        )));
    }

    let material = params
        .box_material_ref
        .as_deref()
        .or(material)
        .map(str::to_string);
    let groove_v = GROOVE_OFFSET + bt / 2.0;
    let groove = |face, run: f64| MachiningOp::Dado {
        face,
        from: Point2D::new(0.0, groove_v),
        to: Point2D::new(run, groove_v),
        width: bt,
        depth: dd,
    };
    let piece = |name: String, origin: Point3, dims: Vec3, o: Orientation, grain| {
        Panel::new(name, BoundingBox::new(origin, dims), o, grain, material.clone())
    };

    let mut panels = Vec::with_capacity(heights.len() * 5);
    let mut z0 = 0.0;
    for (i, &opening) in heights.iter().enumerate() {
        let bh = opening - params.top_clearance - params.bottom_clearance;
        if bh <= GROOVE_OFFSET + bt + tol.linear {
            return Err(Fault::OverConstrained(format!(
                "drawer {i}: opening {opening} mm leaves a {bh} mm box"
            )));
        }
        let (x, y, z) = (params.slide_clearance, d - bd, z0 + params.bottom_clearance);

        panels.push(
            piece(
                format!("drawer_{i}_left"),
                Point3::new(x, y, z),
                Vec3::new(st, bd, bh),
                Orientation::Yzx,
                GrainDirection::Length,
            )
            .with_op(groove(PanelFace::Upper, bd)),
        );
        panels.push(
            piece(
                format!("drawer_{i}_right"),
                Point3::new(x + bw - st, y, z),
                Vec3::new(st, bd, bh),
                Orientation::Yzx,
                GrainDirection::Length,
            )
            .with_op(groove(PanelFace::Lower, bd)),
        );
        panels.push(
            piece(
                format!("drawer_{i}_front"),
                Point3::new(x + st, y + bd - st, z),
                Vec3::new(inner_w, st, bh),
                Orientation::Xzy,
                GrainDirection::Length,
            )
            .with_op(groove(PanelFace::Lower, inner_w)),
        );
        panels.push(
            piece(
                format!("drawer_{i}_back"),
                Point3::new(x + st, y, z),
                Vec3::new(inner_w, st, bh),
                Orientation::Xzy,
                GrainDirection::Length,
            )
            .with_op(groove(PanelFace::Upper, inner_w)),
        );
        panels.push(piece(
            format!("drawer_{i}_bottom"),
            Point3::new(x + st - dd, y + st - dd, z + GROOVE_OFFSET),
            Vec3::new(inner_w + 2.0 * dd, inner_d + 2.0 * dd, bt),
            Orientation::Xyz,
            GrainDirection::Unspecified,
        ));

        z0 += opening;
    }

    Ok(Generated {
        panels,
        cells: Vec::new(),
        annotations: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn run(params: serde_json::Value) -> Result<Generated, Fault> {
        let p: DrawerStackParams = serde_json::from_value(params).unwrap();
        let cell = BoundingBox::from_dimensions(Vec3::new(562.0, 581.0, 600.0));
        generate(&p, &cell, Some("birch"), &Tolerance::DEFAULT)
    }

    #[test]
    fn three_equal_drawers() {
        let g = run(json!({ "count": 3, "box_material_ref": "baltic" })).unwrap();
        assert_eq!(g.panels.len(), 15);
        let names: Vec<_> = g.panels[..5].iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["drawer_0_left", "drawer_0_right", "drawer_0_front", "drawer_0_back", "drawer_0_bottom"]
        );
        assert!(g.panels.iter().all(|p| p.material_ref.as_deref() == Some("baltic")));

        // Box: 537 wide, 571 deep, 200 - 30 = 170 high.
        let left = &g.panels[0];
        assert_eq!(left.bbox.origin, Point3::new(12.5, 10.0, 10.0));
        assert_eq!(left.cut_size(), Vec3::new(571.0, 170.0, 12.0));
        let right = &g.panels[1];
        assert_relative_eq!(right.bbox.origin.x, 12.5 + 537.0 - 12.0);
        let front = &g.panels[2];
        assert_relative_eq!(front.bbox.origin.y, 10.0 + 571.0 - 12.0);
        assert_eq!(front.cut_size(), Vec3::new(513.0, 170.0, 12.0));
        let bottom = &g.panels[4];
        assert_eq!(bottom.cut_size(), Vec3::new(525.0, 559.0, 6.0));
        assert_relative_eq!(bottom.bbox.origin.z, 20.0);

        let second = &g.panels[5];
        assert_relative_eq!(second.bbox.origin.z, 210.0);
    }

    #[test]
    fn grooves_face_inward() {
        let g = run(json!({ "heights": [300.0] })).unwrap();
        let faces: Vec<_> = g.panels[..4].iter().map(|p| p.machining[0].face()).collect();
        assert_eq!(
            faces,
            [PanelFace::Upper, PanelFace::Lower, PanelFace::Lower, PanelFace::Upper]
        );
        match &g.panels[0].machining[0] {
            MachiningOp::Dado { from, to, width, depth, .. } => {
                assert_eq!(*from, Point2D::new(0.0, 13.0));
                assert_eq!(*to, Point2D::new(571.0, 13.0));
                assert_relative_eq!(*width, 6.0);
                assert_relative_eq!(*depth, 6.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(g.panels[4].material_ref.as_deref(), Some("birch"));
    }

    #[test]
    fn overfull_stack() {
        let err = run(json!({ "heights": [300.0, 350.0] })).unwrap_err();
        assert!(matches!(err, Fault::OverConstrained(_)));
        let err = run(json!({ "heights": [40.0] })).unwrap_err();
        assert!(matches!(err, Fault::OverConstrained(_)));
    }

    #[test]
    fn invalid_inputs() {
        assert!(matches!(run(json!({})), Err(Fault::InvalidParameters(_))));
        assert!(matches!(
            run(json!({ "heights": [200.0], "count": 2 })),
            Err(Fault::InvalidParameters(_))
        ));
        assert!(matches!(
            run(json!({ "count": 1, "bottom_dado_depth": 12.0 })),
            Err(Fault::InvalidParameters(_))
        ));
    }

    #[test]
    fn negative_clearances_rejected() {
        for key in ["slide_clearance", "rear_clearance", "top_clearance", "bottom_clearance"] {
            let mut params = json!({ "count": 1 });
            params[key] = json!(-50.0);
            assert!(
                matches!(run(params), Err(Fault::InvalidParameters(_))),
                "{key} accepted a negative value"
            );
        }
    }
}
