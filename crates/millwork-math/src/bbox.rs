//! Corner-origin axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{Axis, Face, GeometryError, Point3, Tolerance, Vec3};

/// Axis-aligned volume with a back-bottom-left origin.
///
/// `origin` is expressed in the owning frame; `dimensions` are the extents
/// along X (width), Y (depth) and Z (height) and are never negative once
/// [`BoundingBox::validate`] has passed. A zero extent is a legal but
/// degenerate volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Back-bottom-left corner.
    pub origin: Point3,
    /// Extents along X, Y and Z.
    pub dimensions: Vec3,
}

impl BoundingBox {
    /// Create a box from its origin and dimensions.
    pub fn new(origin: Point3, dimensions: Vec3) -> Self {
        Self { origin, dimensions }
    }

    /// A box at the frame origin with the given dimensions.
    pub fn from_dimensions(dimensions: Vec3) -> Self {
        Self::new(Point3::origin(), dimensions)
    }

    /// Create a box spanning two corners (`min` must not exceed `max`).
    pub fn from_corners(min: Point3, max: Point3) -> Self {
        Self::new(min, max - min)
    }

    /// The front-top-right corner.
    pub fn max(&self) -> Point3 {
        self.origin + self.dimensions
    }

    /// Extent along `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.dimensions[axis.index()]
    }

    /// Minimum coordinate along `axis`.
    pub fn min_along(&self, axis: Axis) -> f64 {
        self.origin[axis.index()]
    }

    /// Maximum coordinate along `axis`.
    pub fn max_along(&self, axis: Axis) -> f64 {
        self.origin[axis.index()] + self.dimensions[axis.index()]
    }

    /// The same box re-expressed in its own frame (origin at zero).
    pub fn local(&self) -> Self {
        Self::from_dimensions(self.dimensions)
    }

    /// Reject non-finite values and negative extents.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.origin.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NotFinite { what: "box origin" });
        }
        if !self.dimensions.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NotFinite {
                what: "box dimensions",
            });
        }
        for axis in Axis::ALL {
            let value = self.extent(axis);
            if value < 0.0 {
                return Err(GeometryError::NegativeDimension { axis, value });
            }
        }
        Ok(())
    }

    /// Whether any extent is zero within tolerance.
    pub fn is_degenerate(&self, tol: &Tolerance) -> bool {
        Axis::ALL.iter().any(|&a| !tol.is_positive(self.extent(a)))
    }

    /// The same box moved by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Self {
        Self::new(self.origin + *offset, self.dimensions)
    }

    /// A slab of this box along `axis`, starting `start` from the box origin
    /// and `length` long. The other two extents are unchanged.
    pub fn slab(&self, axis: Axis, start: f64, length: f64) -> Self {
        let mut out = *self;
        out.origin[axis.index()] += start;
        out.dimensions[axis.index()] = length;
        out
    }

    /// Zero-thickness box covering one face.
    pub fn face_footprint(&self, face: Face) -> Self {
        let axis = face.normal_axis();
        let start = if face.is_max() { self.extent(axis) } else { 0.0 };
        self.slab(axis, start, 0.0)
    }

    /// Grow (or shrink, if negative) the box by `amount` on both ends of `axis`.
    pub fn grown(&self, axis: Axis, amount: f64) -> Self {
        let mut out = *self;
        out.origin[axis.index()] -= amount;
        out.dimensions[axis.index()] += 2.0 * amount;
        out
    }

    /// Whether `p` lies inside or on the boundary, within tolerance.
    pub fn contains_point(&self, p: &Point3, tol: &Tolerance) -> bool {
        Axis::ALL.iter().all(|&a| {
            let v = p[a.index()];
            v >= self.min_along(a) - tol.linear && v <= self.max_along(a) + tol.linear
        })
    }

    /// Whether both boxes match within tolerance.
    pub fn approx_eq(&self, other: &BoundingBox, tol: &Tolerance) -> bool {
        tol.points_equal(&self.origin, &other.origin)
            && tol.vecs_equal(&self.dimensions, &other.dimensions)
    }
}
