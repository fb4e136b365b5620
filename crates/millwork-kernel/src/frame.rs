//! Coordinate frame composition.
//!
//! Every resolved node carries the transform from its local frame to world.
//! A child's frame is its parent's, moved to the child box origin and
//! optionally mirrored within the child box, so a child never needs to know
//! where its parent sits.

use millwork_math::{Axis, BoundingBox, GeometryError, Transform};

/// World transform of a node whose box is `local_box` in its parent's frame.
///
/// The mirror, if any, is applied within the node's own extent before the
/// translation, so the node still occupies exactly `local_box`.
pub fn compose(
    parent: &Transform,
    local_box: &BoundingBox,
    mirror: Option<Axis>,
) -> Result<Transform, GeometryError> {
    if !parent.is_finite() {
        return Err(GeometryError::NotFinite {
            what: "parent transform",
        });
    }
    local_box.validate()?;

    let mut local = Transform::translate_by(&local_box.origin.coords);
    if let Some(axis) = mirror {
        local = local.then(&Transform::mirror_within(axis, local_box.extent(axis)));
    }
    Ok(parent.then(&local))
}

/// World box of a node given its parent-frame box and composed transform.
pub fn world_box(local_box: &BoundingBox, world: &Transform) -> BoundingBox {
    world.apply_box(&local_box.local())
}
