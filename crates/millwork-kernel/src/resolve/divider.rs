//! Dividers: split a cell into named cells separated by panels.

use millwork_ir::{DividerParams, SplitUnits};
use millwork_math::{Axis, BoundingBox, Orientation, Tolerance};

use super::Generated;
use crate::error::Fault;
use crate::part::{EdgeBanding, GrainDirection, Panel};

/// Absolute centre offsets of each divider panel along the split axis.
fn centres(params: &DividerParams, extent: f64, tol: &Tolerance) -> Result<Vec<f64>, Fault> {
    let t = params.thickness;
    match (params.positions.is_empty(), params.cells) {
        (false, Some(_)) => Err(Fault::InvalidParameters(
            "give either positions or cells, not both".into(),
        )),
        (true, None) => Err(Fault::InvalidParameters(
            "one of positions or cells is required".into(),
        )),
        (true, Some(0)) => Err(Fault::InvalidParameters("cells must be at least 1".into())),
        (true, Some(n)) => {
            let cell = (extent - (n - 1) as f64 * t) / n as f64;
            if !tol.is_positive(cell) {
                return Err(Fault::OverConstrained(format!(
                    "{n} cells do not fit in {extent} mm with {t} mm dividers"
                )));
            }
            Ok((0..n - 1)
                .map(|i| cell * (i + 1) as f64 + t * i as f64 + t / 2.0)
                .collect())
        }
        (false, None) => {
            let scale = match params.units {
                SplitUnits::Fraction => extent,
                SplitUnits::Absolute => 1.0,
            };
            let mut out = Vec::with_capacity(params.positions.len());
            for &raw in &params.positions {
                let p = raw * scale;
                if !p.is_finite() || p <= tol.linear || p >= extent - tol.linear {
                    return Err(Fault::InvalidSplit(format!(
                        "position {raw} is outside (0, {extent})"
                    )));
                }
                if let Some(&prev) = out.last() {
                    if p <= prev + tol.linear {
                        return Err(Fault::InvalidSplit(format!(
                            "positions must be strictly increasing ({prev} then {p})"
                        )));
                    }
                }
                out.push(p);
            }
            Ok(out)
        }
    }
}

pub(crate) fn generate(
    params: &DividerParams,
    bbox: &BoundingBox,
    material: Option<&str>,
    tol: &Tolerance,
) -> Result<Generated, Fault> {
    let axis = params.axis;
    let orientation = match axis {
        Axis::X => Orientation::Zyx,
        Axis::Z => Orientation::Xyz,
        Axis::Y => {
            return Err(Fault::InvalidParameters(
                "dividers split along x or z".into(),
            ))
        }
    };
    let t = params.thickness;
    if !tol.is_positive(t) {
        return Err(Fault::InvalidParameters(format!(
            "thickness {t} must be positive"
        )));
    }

    let extent = bbox.extent(axis);
    let centres = centres(params, extent, tol)?;
    let count = centres.len() + 1;
    if !params.names.is_empty() && params.names.len() != count {
        return Err(Fault::InvalidParameters(format!(
            "{} names given for {count} cells",
            params.names.len()
        )));
    }
    let name = |i: usize| {
        params
            .names
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("cell_{i}"))
    };

    let mut cells = Vec::with_capacity(count);
    let mut panels = Vec::with_capacity(centres.len());
    let mut start = 0.0;
    for (i, &c) in centres.iter().enumerate() {
        let len = c - t / 2.0 - start;
        if !tol.is_positive(len) {
            return Err(Fault::OverConstrained(format!(
                "cell {i} has no room before the divider at {c}"
            )));
        }
        cells.push((name(i), bbox.slab(axis, start, len)));
        panels.push(
            Panel::new(
                format!("divider_{i}"),
                bbox.slab(axis, c - t / 2.0, t),
                orientation,
                GrainDirection::Length,
                material.map(str::to_string),
            )
            .with_edges(EdgeBanding::on_max_edge(
                orientation,
                Axis::Y,
                params.edge_band.clone(),
            )),
        );
        start = c + t / 2.0;
    }
    let last = extent - start;
    if !tol.is_positive(last) {
        return Err(Fault::OverConstrained(format!(
            "last cell has no room after the divider ending at {start}"
        )));
    }
    cells.push((name(count - 1), bbox.slab(axis, start, last)));

    Ok(Generated {
        panels,
        cells,
        annotations: Vec::new(),
    })
}
