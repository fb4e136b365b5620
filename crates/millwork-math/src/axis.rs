//! Axis, face and panel orientation enums.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Vec3;

/// One of the three world axes.
///
/// X runs left to right (width), Y back to front (depth), Z bottom to top
/// (height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Width axis.
    X,
    /// Depth axis.
    Y,
    /// Height axis.
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1, 2).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(s)
    }
}

/// One of the six faces of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// Y max.
    Front,
    /// Y min.
    Back,
    /// X min.
    Left,
    /// X max.
    Right,
    /// Z max.
    Top,
    /// Z min.
    Bottom,
}

impl Face {
    /// Axis the face normal runs along.
    pub fn normal_axis(self) -> Axis {
        match self {
            Face::Left | Face::Right => Axis::X,
            Face::Front | Face::Back => Axis::Y,
            Face::Top | Face::Bottom => Axis::Z,
        }
    }

    /// Whether the face lies at the maximum of its normal axis.
    pub fn is_max(self) -> bool {
        matches!(self, Face::Front | Face::Right | Face::Top)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Top => "top",
            Face::Bottom => "bottom",
        };
        f.write_str(s)
    }
}

/// Axis-aligned orientation of a rectangular panel.
///
/// Panels are modeled flat with length, width and thickness; the variant
/// letters name the world axes carrying length, width and thickness, in that
/// order. `Zyx` is an upright side panel, `Xyz` a shelf, `Xzy` a back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Length X, width Y, thickness Z.
    Xyz,
    /// Length X, width Z, thickness Y.
    Xzy,
    /// Length Y, width X, thickness Z.
    Yxz,
    /// Length Y, width Z, thickness X.
    Yzx,
    /// Length Z, width X, thickness Y.
    Zxy,
    /// Length Z, width Y, thickness X.
    Zyx,
}

impl Orientation {
    /// World axes carrying `(length, width, thickness)`.
    pub fn axes(self) -> (Axis, Axis, Axis) {
        use Axis::{X, Y, Z};
        match self {
            Orientation::Xyz => (X, Y, Z),
            Orientation::Xzy => (X, Z, Y),
            Orientation::Yxz => (Y, X, Z),
            Orientation::Yzx => (Y, Z, X),
            Orientation::Zxy => (Z, X, Y),
            Orientation::Zyx => (Z, Y, X),
        }
    }

    /// Cut size `(length, width, thickness)` of a panel with the given world extents.
    pub fn cut_size(self, extents: &Vec3) -> Vec3 {
        let (l, w, t) = self.axes();
        Vec3::new(extents[l.index()], extents[w.index()], extents[t.index()])
    }
}
