//! Machining requests a component makes on panels it does not own.
//!
//! A shelf fill knows where its pin holes go but the holes are bored into the
//! carcass sides or dividers that bound its cell. The fill records them as an
//! [`Annotation`] on a plane of its own box; the extractor later hands each
//! feature to the part lying on that plane.

use millwork_math::{Axis, Point3, Transform};
use serde::{Deserialize, Serialize};

/// A feature requested on a bounding plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum Feature {
    /// Round hole whose centre lies on the plane.
    Drill {
        /// Hole centre.
        at: Point3,
        /// Hole diameter.
        diameter: f64,
        /// Hole depth.
        depth: f64,
    },
    /// Straight groove along the plane.
    Dado {
        /// Groove centre line start.
        from: Point3,
        /// Groove centre line end.
        to: Point3,
        /// Groove width.
        width: f64,
        /// Groove depth.
        depth: f64,
    },
}

impl Feature {
    /// Points that must lie on the receiving panel's face.
    pub fn anchor_points(&self) -> Vec<Point3> {
        match self {
            Feature::Drill { at, .. } => vec![*at],
            Feature::Dado { from, to, .. } => vec![*from, *to],
        }
    }

    fn placed(&self, world: &Transform) -> Self {
        match self {
            Feature::Drill {
                at,
                diameter,
                depth,
            } => Feature::Drill {
                at: world.apply_point(at),
                diameter: *diameter,
                depth: *depth,
            },
            Feature::Dado {
                from,
                to,
                width,
                depth,
            } => Feature::Dado {
                from: world.apply_point(from),
                to: world.apply_point(to),
                width: *width,
                depth: *depth,
            },
        }
    }
}

/// Features on the plane `normal = plane`.
///
/// `outward` is `+1.0` when the receiving panel lies on the positive side of
/// the plane and `-1.0` when it lies on the negative side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Plane normal axis.
    pub normal: Axis,
    /// Plane coordinate along `normal`.
    pub plane: f64,
    /// Side of the plane the receiving panel is on.
    pub outward: f64,
    /// Requested features.
    pub features: Vec<Feature>,
}

impl Annotation {
    /// An empty annotation on a plane.
    pub fn on_plane(normal: Axis, plane: f64, outward: f64) -> Self {
        Self {
            normal,
            plane,
            outward,
            features: Vec::new(),
        }
    }

    /// Map into another frame.
    pub fn place(&self, world: &Transform) -> Annotation {
        let mut on_plane = Point3::origin();
        on_plane[self.normal.index()] = self.plane;
        let plane = world.apply_point(&on_plane)[self.normal.index()];
        let outward = if world.flips(self.normal) {
            -self.outward
        } else {
            self.outward
        };
        Annotation {
            normal: self.normal,
            plane,
            outward,
            features: self.features.iter().map(|f| f.placed(world)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn place_moves_plane_and_points() {
        let mut ann = Annotation::on_plane(Axis::X, 0.0, -1.0);
        ann.features.push(Feature::Drill {
            at: Point3::new(0.0, 37.0, 200.0),
            diameter: 5.0,
            depth: 10.0,
        });
        let placed = ann.place(&Transform::translation(19.0, 19.0, 19.0));
        assert_relative_eq!(placed.plane, 19.0);
        assert_relative_eq!(placed.outward, -1.0);
        assert_eq!(
            placed.features[0].anchor_points(),
            vec![Point3::new(19.0, 56.0, 219.0)]
        );
    }

    #[test]
    fn mirror_flips_outward() {
        let ann = Annotation::on_plane(Axis::X, 0.0, -1.0);
        let placed = ann.place(&Transform::mirror_within(Axis::X, 500.0));
        assert_relative_eq!(placed.plane, 500.0);
        assert_relative_eq!(placed.outward, 1.0);
    }
}
