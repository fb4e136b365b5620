//! Shelf fill: fixed or adjustable shelves in one cell.
//!
//! Adjustable shelves request pin holes on the planes bounding the cell's
//! left and right; fixed shelves with a dado depth request housing grooves
//! there instead. The holes belong to whatever panels end up on those planes,
//! so they travel as annotations until extraction.

use millwork_ir::ShelfParams;
use millwork_math::{Axis, BoundingBox, Orientation, Point3, Tolerance, Vec3};

use super::{non_negative, Generated};
use crate::annotation::{Annotation, Feature};
use crate::error::Fault;
use crate::part::{EdgeBanding, GrainDirection, Panel};

/// Bottom heights of each shelf above the cell floor.
fn heights(params: &ShelfParams, h: f64, tol: &Tolerance) -> Result<Vec<f64>, Fault> {
    let t = params.thickness;
    let n = if params.positions.is_empty() {
        params.count.unwrap_or(0)
    } else {
        match params.count {
            Some(c) if c != params.positions.len() => {
                return Err(Fault::InvalidParameters(format!(
                    "count {c} does not match {} positions",
                    params.positions.len()
                )))
            }
            _ => params.positions.len(),
        }
    };
    if n == 0 {
        return Err(Fault::InvalidParameters(
            "at least one shelf is required".into(),
        ));
    }

    let needed = (n + 1) as f64 * params.min_clearance + n as f64 * t;
    if needed > h + tol.linear {
        return Err(Fault::OverConstrained(format!(
            "{n} shelves with {} mm clearance need {needed} mm, cell is {h} mm",
            params.min_clearance
        )));
    }

    if params.positions.is_empty() {
        let gap = (h - n as f64 * t) / (n + 1) as f64;
        return Ok((0..n).map(|i| gap * (i + 1) as f64 + t * i as f64).collect());
    }

    let mut floor = 0.0;
    for (i, &z) in params.positions.iter().enumerate() {
        if !z.is_finite() || z < floor - tol.linear {
            return Err(Fault::InvalidParameters(format!(
                "shelf positions must be increasing (shelf {i} at {z})"
            )));
        }
        if z - floor < params.min_clearance - tol.linear {
            return Err(Fault::OverConstrained(format!(
                "opening below shelf {i} is {} mm, minimum is {}",
                z - floor,
                params.min_clearance
            )));
        }
        floor = z + t;
    }
    if h - floor < params.min_clearance - tol.linear {
        return Err(Fault::OverConstrained(format!(
            "opening above the top shelf is {} mm, minimum is {}",
            h - floor,
            params.min_clearance
        )));
    }
    Ok(params.positions.clone())
}

pub(crate) fn generate(
    params: &ShelfParams,
    bbox: &BoundingBox,
    material: Option<&str>,
    tol: &Tolerance,
) -> Result<Generated, Fault> {
    let t = params.thickness;
    if !tol.is_positive(t) {
        return Err(Fault::InvalidParameters(format!(
            "shelf thickness {t} must be positive"
        )));
    }
    non_negative("min_clearance", params.min_clearance)?;
    non_negative("setback", params.setback)?;
    non_negative("side_gap", params.side_gap)?;
    non_negative("dado_depth", params.dado_depth)?;
    non_negative("pin_inset", params.pin_inset)?;
    let pins_sized = tol.is_positive(params.pin_diameter) && tol.is_positive(params.pin_depth);
    if params.adjustable && !pins_sized {
        return Err(Fault::InvalidParameters(format!(
            "pin holes must have a positive size, got {} x {} mm",
            params.pin_diameter, params.pin_depth
        )));
    }
    let (w, d, h) = (bbox.extent(Axis::X), bbox.extent(Axis::Y), bbox.extent(Axis::Z));
    let zs = heights(params, h, tol)?;

    let depth = d - params.setback;
    let (x0, length) = if params.adjustable {
        (params.side_gap, w - 2.0 * params.side_gap)
    } else {
        (-params.dado_depth, w + 2.0 * params.dado_depth)
    };
    if !tol.is_positive(depth) || !tol.is_positive(length) {
        return Err(Fault::OverConstrained(format!(
            "shelf would be {length} x {depth} mm"
        )));
    }

    let panels = zs
        .iter()
        .enumerate()
        .map(|(i, &z)| {
            Panel::new(
                format!("shelf_{i}"),
                BoundingBox::new(Point3::new(x0, 0.0, z), Vec3::new(length, depth, t)),
                Orientation::Xyz,
                GrainDirection::Length,
                material.map(str::to_string),
            )
            .with_edges(EdgeBanding::on_max_edge(
                Orientation::Xyz,
                Axis::Y,
                params.edge_band.clone(),
            ))
        })
        .collect();

    let mut annotations = Vec::new();
    if params.adjustable {
        if d <= 2.0 * params.pin_inset + tol.linear {
            return Err(Fault::OverConstrained(format!(
                "cell depth {d} leaves no room for pins {} mm from front and back",
                params.pin_inset
            )));
        }
        for (x, outward) in [(0.0, -1.0), (w, 1.0)] {
            let mut ann = Annotation::on_plane(Axis::X, x, outward);
            for &z in &zs {
                let zc = z - params.pin_diameter / 2.0;
                for y in [params.pin_inset, d - params.pin_inset] {
                    ann.features.push(Feature::Drill {
                        at: Point3::new(x, y, zc),
                        diameter: params.pin_diameter,
                        depth: params.pin_depth,
                    });
                }
            }
            annotations.push(ann);
        }
    } else if params.dado_depth > 0.0 {
        for (x, outward) in [(0.0, -1.0), (w, 1.0)] {
            let mut ann = Annotation::on_plane(Axis::X, x, outward);
            for &z in &zs {
                let zc = z + t / 2.0;
                ann.features.push(Feature::Dado {
                    from: Point3::new(x, 0.0, zc),
                    to: Point3::new(x, depth, zc),
                    width: t,
                    depth: params.dado_depth,
                });
            }
            annotations.push(ann);
        }
    }

    Ok(Generated {
        panels,
        cells: Vec::new(),
        annotations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn run(cell: Vec3, params: serde_json::Value) -> Result<Generated, Fault> {
        let p: ShelfParams = serde_json::from_value(params).unwrap();
        generate(&p, &BoundingBox::from_dimensions(cell), None, &Tolerance::DEFAULT)
    }

    #[test]
    fn evenly_spaced_adjustable() {
        let g = run(Vec3::new(562.0, 581.0, 832.0), json!({ "count": 2 })).unwrap();
        assert_eq!(g.panels.len(), 2);
        assert!(g.cells.is_empty());
        let gap = (832.0 - 38.0) / 3.0;
        assert_relative_eq!(g.panels[0].bbox.origin.z, gap);
        assert_relative_eq!(g.panels[1].bbox.origin.z, 2.0 * gap + 19.0);
        assert_eq!(g.panels[0].cut_size(), Vec3::new(560.0, 581.0, 19.0));
        assert_relative_eq!(g.panels[0].bbox.origin.x, 1.0);

        assert_eq!(g.annotations.len(), 2);
        let left = &g.annotations[0];
        assert_eq!(left.normal, Axis::X);
        assert_relative_eq!(left.outward, -1.0);
        assert_eq!(left.features.len(), 4);
        assert_relative_eq!(g.annotations[1].plane, 562.0);
        match &left.features[1] {
            Feature::Drill { at, diameter, .. } => {
                assert_relative_eq!(at.y, 581.0 - 37.0);
                assert_relative_eq!(at.z, gap - 2.5);
                assert_relative_eq!(*diameter, 5.0);
            }
            other => panic!("unexpected feature {other:?}"),
        }
    }

    #[test]
    fn too_many_shelves() {
        let err = run(
            Vec3::new(562.0, 581.0, 200.0),
            json!({ "count": 5, "min_clearance": 50.0 }),
        )
        .unwrap_err();
        assert!(matches!(err, Fault::OverConstrained(_)));
    }

    #[test]
    fn fixed_shelves_with_dados() {
        let g = run(
            Vec3::new(562.0, 581.0, 832.0),
            json!({ "positions": [300.0], "adjustable": false, "dado_depth": 6.0, "setback": 20.0 }),
        )
        .unwrap();
        let shelf = &g.panels[0];
        assert_eq!(shelf.bbox.origin, Point3::new(-6.0, 0.0, 300.0));
        assert_eq!(shelf.cut_size(), Vec3::new(574.0, 561.0, 19.0));
        match &g.annotations[1].features[0] {
            Feature::Dado { from, to, width, depth } => {
                assert_eq!(*from, Point3::new(562.0, 0.0, 309.5));
                assert_eq!(*to, Point3::new(562.0, 561.0, 309.5));
                assert_relative_eq!(*width, 19.0);
                assert_relative_eq!(*depth, 6.0);
            }
            other => panic!("unexpected feature {other:?}"),
        }
    }

    #[test]
    fn butt_jointed_fixed_shelves_need_no_annotations() {
        let g = run(
            Vec3::new(562.0, 581.0, 832.0),
            json!({ "count": 1, "adjustable": false }),
        )
        .unwrap();
        assert!(g.annotations.is_empty());
        assert_relative_eq!(g.panels[0].cut_size().x, 562.0);
    }

    #[test]
    fn explicit_positions_checked() {
        let cell = Vec3::new(562.0, 581.0, 832.0);
        assert!(matches!(
            run(cell, json!({ "positions": [30.0] })),
            Err(Fault::OverConstrained(_))
        ));
        assert!(matches!(
            run(cell, json!({ "positions": [400.0, 200.0] })),
            Err(Fault::InvalidParameters(_))
        ));
        assert!(matches!(
            run(cell, json!({ "positions": [200.0], "count": 2 })),
            Err(Fault::InvalidParameters(_))
        ));
        assert!(matches!(run(cell, json!({})), Err(Fault::InvalidParameters(_))));
    }

    #[test]
    fn negative_sizes_rejected() {
        let cell = Vec3::new(562.0, 581.0, 832.0);
        for (key, value) in [
            ("side_gap", -30.0),
            ("pin_inset", -10.0),
            ("pin_diameter", -5.0),
            ("pin_depth", 0.0),
            ("setback", -1.0),
            ("min_clearance", -50.0),
        ] {
            let mut params = json!({ "count": 1 });
            params[key] = json!(value);
            assert!(
                matches!(run(cell, params), Err(Fault::InvalidParameters(_))),
                "{key} = {value} was accepted"
            );
        }
        assert!(matches!(
            run(cell, json!({ "count": 1, "adjustable": false, "dado_depth": -6.0 })),
            Err(Fault::InvalidParameters(_))
        ));
    }

    #[test]
    fn shallow_cell_has_no_room_for_pins() {
        let err = run(Vec3::new(562.0, 60.0, 832.0), json!({ "count": 1 })).unwrap_err();
        assert!(matches!(err, Fault::OverConstrained(_)));
    }
}
