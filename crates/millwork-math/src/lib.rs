#![warn(missing_docs)]

//! Math types for the millwork resolution engine.
//!
//! Thin wrappers around nalgebra providing the domain types every other
//! millwork crate speaks: points, vectors, axis-aligned transforms,
//! bounding boxes, face and orientation enums, and tolerance constants.
//!
//! All lengths are millimeters.

mod axis;
mod bbox;

pub use axis::{Axis, Face, Orientation};
pub use bbox::BoundingBox;

use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Invalid geometric input (non-finite values or negative extents).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate or dimension is NaN or infinite.
    #[error("{what} is not finite")]
    NotFinite {
        /// Which quantity was rejected.
        what: &'static str,
    },
    /// A dimension is below zero.
    #[error("negative {axis} dimension: {value}")]
    NegativeDimension {
        /// Axis of the offending dimension.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },
}

/// A 2D point on a panel face, `x` along the panel length and `y` along its width.
///
/// Kept separate from nalgebra's `Point2` so machining records stay plain
/// serde structs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Coordinate along the panel length.
    pub x: f64,
    /// Coordinate along the panel width.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// A 4x4 affine transformation matrix.
///
/// Millwork frames only ever combine translations and axis reflections, so
/// every transform built here maps axis-aligned boxes to axis-aligned boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Translation by a vector.
    pub fn translate_by(v: &Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    /// Reflection across `axis` that maps the span `[0, extent]` onto itself.
    pub fn mirror_within(axis: Axis, extent: f64) -> Self {
        let mut m = Matrix4::identity();
        let i = axis.index();
        m[(i, i)] = -1.0;
        m[(i, 3)] = extent;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Map an axis-aligned box into the target frame.
    ///
    /// Both corners are transformed and re-sorted, so reflections still
    /// yield a box with a back-bottom-left origin and non-negative extents.
    pub fn apply_box(&self, b: &BoundingBox) -> BoundingBox {
        let a = self.apply_point(&b.origin);
        let c = self.apply_point(&b.max());
        let min = Point3::new(a.x.min(c.x), a.y.min(c.y), a.z.min(c.z));
        let max = Point3::new(a.x.max(c.x), a.y.max(c.y), a.z.max(c.z));
        BoundingBox::from_corners(min, max)
    }

    /// The translation component of this transform.
    pub fn origin(&self) -> Point3 {
        Point3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Whether this transform reverses the direction of `axis`.
    pub fn flips(&self, axis: Axis) -> bool {
        let i = axis.index();
        self.matrix[(i, i)] < 0.0
    }

    /// Whether every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default millwork tolerance (1e-6 mm).
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Create a tolerance with the given linear threshold.
    pub fn new(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if two scalars are equal within tolerance.
    pub fn equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.linear
    }

    /// Check if a scalar is strictly positive beyond tolerance.
    pub fn is_positive(&self, d: f64) -> bool {
        d > self.linear
    }

    /// Check if two points are coincident within tolerance (per component).
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        self.equal(a.x, b.x) && self.equal(a.y, b.y) && self.equal(a.z, b.z)
    }

    /// Check if two vectors are equal within tolerance (per component).
    pub fn vecs_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        self.equal(a.x, b.x) && self.equal(a.y, b.y) && self.equal(a.z, b.z)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
