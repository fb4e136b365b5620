//! Physical parts: the terminal output of resolution.
//!
//! Generators describe panels in their node's local frame ([`Panel`]);
//! [`Panel::place`] snapshots them into world-frame [`Part`]s. Part face
//! coordinates are always measured from the part's world-min corner, so a
//! panel placed through a mirrored frame has its machining and edge labels
//! reflected to match.

use millwork_math::{Axis, BoundingBox, Orientation, Point2D, Point3, Tolerance, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::NodePath;
use crate::settings::DedupPolicy;

/// Grain direction relative to the panel's own axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainDirection {
    /// Grain runs along the panel length.
    Length,
    /// Grain runs along the panel width.
    Width,
    /// No grain constraint.
    Unspecified,
}

/// One of a panel's two large faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelFace {
    /// Face at the thickness maximum.
    Upper,
    /// Face at the thickness minimum.
    Lower,
}

impl PanelFace {
    /// The other face.
    pub fn flipped(self) -> Self {
        match self {
            PanelFace::Upper => PanelFace::Lower,
            PanelFace::Lower => PanelFace::Upper,
        }
    }
}

/// Machining on a panel face, in face coordinates (`x` along length, `y` along width).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MachiningOp {
    /// Round hole.
    Drill {
        /// Face drilled into.
        face: PanelFace,
        /// Hole centre.
        at: Point2D,
        /// Hole diameter.
        diameter: f64,
        /// Hole depth.
        depth: f64,
    },
    /// Straight groove.
    Dado {
        /// Face grooved.
        face: PanelFace,
        /// Groove centre line start.
        from: Point2D,
        /// Groove centre line end.
        to: Point2D,
        /// Groove width.
        width: f64,
        /// Groove depth.
        depth: f64,
    },
    /// Rectangular pocket.
    Pocket {
        /// Face pocketed.
        face: PanelFace,
        /// Pocket corner nearest the face origin.
        origin: Point2D,
        /// Extent along the panel length.
        length: f64,
        /// Extent along the panel width.
        width: f64,
        /// Pocket depth.
        depth: f64,
    },
}

impl MachiningOp {
    /// Face the operation is on.
    pub fn face(&self) -> PanelFace {
        match self {
            MachiningOp::Drill { face, .. }
            | MachiningOp::Dado { face, .. }
            | MachiningOp::Pocket { face, .. } => *face,
        }
    }

    /// Reflect the operation within a panel of cut size `size`.
    ///
    /// `along_length` / `along_width` mirror the face coordinates;
    /// `through` swaps the face.
    fn reflected(&self, size: &Vec3, along_length: bool, along_width: bool, through: bool) -> Self {
        let flip = |p: &Point2D| {
            Point2D::new(
                if along_length { size.x - p.x } else { p.x },
                if along_width { size.y - p.y } else { p.y },
            )
        };
        let side = |f: PanelFace| if through { f.flipped() } else { f };
        match self {
            MachiningOp::Drill {
                face,
                at,
                diameter,
                depth,
            } => MachiningOp::Drill {
                face: side(*face),
                at: flip(at),
                diameter: *diameter,
                depth: *depth,
            },
            MachiningOp::Dado {
                face,
                from,
                to,
                width,
                depth,
            } => MachiningOp::Dado {
                face: side(*face),
                from: flip(from),
                to: flip(to),
                width: *width,
                depth: *depth,
            },
            MachiningOp::Pocket {
                face,
                origin,
                length,
                width,
                depth,
            } => {
                let far = Point2D::new(origin.x + length, origin.y + width);
                let (a, b) = (flip(origin), flip(&far));
                MachiningOp::Pocket {
                    face: side(*face),
                    origin: Point2D::new(a.x.min(b.x), a.y.min(b.y)),
                    length: *length,
                    width: *width,
                    depth: *depth,
                }
            }
        }
    }

    /// Whether both operations match, with coordinates compared within `tol`.
    pub fn approx_eq(&self, other: &MachiningOp, tol: &Tolerance) -> bool {
        let pt = |a: &Point2D, b: &Point2D| tol.equal(a.x, b.x) && tol.equal(a.y, b.y);
        match (self, other) {
            (
                MachiningOp::Drill {
                    face: f1,
                    at: a1,
                    diameter: d1,
                    depth: z1,
                },
                MachiningOp::Drill {
                    face: f2,
                    at: a2,
                    diameter: d2,
                    depth: z2,
                },
            ) => f1 == f2 && pt(a1, a2) && tol.equal(*d1, *d2) && tol.equal(*z1, *z2),
            (
                MachiningOp::Dado {
                    face: f1,
                    from: a1,
                    to: b1,
                    width: w1,
                    depth: z1,
                },
                MachiningOp::Dado {
                    face: f2,
                    from: a2,
                    to: b2,
                    width: w2,
                    depth: z2,
                },
            ) => {
                f1 == f2
                    && pt(a1, a2)
                    && pt(b1, b2)
                    && tol.equal(*w1, *w2)
                    && tol.equal(*z1, *z2)
            }
            (
                MachiningOp::Pocket {
                    face: f1,
                    origin: o1,
                    length: l1,
                    width: w1,
                    depth: z1,
                },
                MachiningOp::Pocket {
                    face: f2,
                    origin: o2,
                    length: l2,
                    width: w2,
                    depth: z2,
                },
            ) => {
                f1 == f2
                    && pt(o1, o2)
                    && tol.equal(*l1, *l2)
                    && tol.equal(*w1, *w2)
                    && tol.equal(*z1, *z2)
            }
            _ => false,
        }
    }
}

/// Edge treatment for the four in-plane edges; `None` leaves an edge raw.
///
/// `length_1` / `length_2` are the long edges at width 0 / width max;
/// `width_1` / `width_2` the short edges at length 0 / length max.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeBanding {
    /// Long edge at width 0.
    pub length_1: Option<String>,
    /// Long edge at width max.
    pub length_2: Option<String>,
    /// Short edge at length 0.
    pub width_1: Option<String>,
    /// Short edge at length max.
    pub width_2: Option<String>,
}

impl EdgeBanding {
    /// No banding on any edge.
    pub fn none() -> Self {
        Self::default()
    }

    /// The same treatment on all four edges.
    pub fn all(band: Option<String>) -> Self {
        Self {
            length_1: band.clone(),
            length_2: band.clone(),
            width_1: band.clone(),
            width_2: band,
        }
    }

    /// Band the edge facing the maximum of world `axis`, given the panel orientation.
    ///
    /// Does nothing when `axis` is the panel's thickness axis.
    pub fn on_max_edge(orientation: Orientation, axis: Axis, band: Option<String>) -> Self {
        let (l, w, _) = orientation.axes();
        let mut edges = Self::none();
        if axis == w {
            edges.length_2 = band;
        } else if axis == l {
            edges.width_2 = band;
        }
        edges
    }

    /// Number of banded edges.
    pub fn banded_count(&self) -> usize {
        [&self.length_1, &self.length_2, &self.width_1, &self.width_2]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }

    fn swap_length_edges(&mut self) {
        std::mem::swap(&mut self.length_1, &mut self.length_2);
    }

    fn swap_width_edges(&mut self) {
        std::mem::swap(&mut self.width_1, &mut self.width_2);
    }
}

/// A panel described in its node's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Name, unique within the node (e.g. `"left_side"`).
    pub name: String,
    /// Occupied volume in the node frame.
    pub bbox: BoundingBox,
    /// How length, width and thickness map to axes.
    pub orientation: Orientation,
    /// Grain relative to the panel.
    pub grain: GrainDirection,
    /// Material reference.
    pub material_ref: Option<String>,
    /// Edge treatment.
    pub edges: EdgeBanding,
    /// Machining in local face coordinates.
    pub machining: Vec<MachiningOp>,
}

impl Panel {
    /// A plain panel with no banding or machining.
    pub fn new(
        name: impl Into<String>,
        bbox: BoundingBox,
        orientation: Orientation,
        grain: GrainDirection,
        material_ref: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bbox,
            orientation,
            grain,
            material_ref,
            edges: EdgeBanding::none(),
            machining: Vec::new(),
        }
    }

    /// Set the edge treatment.
    pub fn with_edges(mut self, edges: EdgeBanding) -> Self {
        self.edges = edges;
        self
    }

    /// Append a machining operation.
    pub fn with_op(mut self, op: MachiningOp) -> Self {
        self.machining.push(op);
        self
    }

    /// Cut size `(length, width, thickness)`.
    pub fn cut_size(&self) -> Vec3 {
        self.orientation.cut_size(&self.bbox.dimensions)
    }

    /// Snapshot this panel into a world-frame part owned by `path`.
    pub fn place(self, path: &NodePath, world: &Transform) -> Part {
        let world_box = world.apply_box(&self.bbox);
        let (l, w, t) = self.orientation.axes();
        let (fl, fw, ft) = (world.flips(l), world.flips(w), world.flips(t));

        let mut edges = self.edges;
        if fl {
            edges.swap_width_edges();
        }
        if fw {
            edges.swap_length_edges();
        }

        let size = self.orientation.cut_size(&self.bbox.dimensions);
        let machining = if fl || fw || ft {
            self.machining
                .iter()
                .map(|op| op.reflected(&size, fl, fw, ft))
                .collect()
        } else {
            self.machining
        };

        Part {
            id: format!("{}/{}", path, self.name),
            name: self.name,
            path: path.ids().to_vec(),
            dimensions: world_box.dimensions,
            position: world_box.origin,
            rotation: self.orientation,
            material_ref: self.material_ref,
            edge_treatment: edges,
            grain_direction: self.grain,
            machining,
            quantity: 1,
        }
    }
}

/// A physical, manufacturable panel in the world frame.
///
/// Parts are immutable snapshots: they hold the owning component path but no
/// reference into the resolved tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Stable path-based id (`base/split/divider_0`).
    pub id: String,
    /// Name within the owning component.
    pub name: String,
    /// Owning component path, root first.
    pub path: Vec<String>,
    /// World-axis extents.
    pub dimensions: Vec3,
    /// World position of the back-bottom-left corner.
    pub position: Point3,
    /// Axis-aligned orientation.
    pub rotation: Orientation,
    /// Material reference.
    pub material_ref: Option<String>,
    /// Edge treatment.
    pub edge_treatment: EdgeBanding,
    /// Grain direction.
    pub grain_direction: GrainDirection,
    /// Machining operations, in application order.
    pub machining: Vec<MachiningOp>,
    /// Number of identical pieces this record stands for.
    pub quantity: u32,
}

impl Part {
    /// Cut size `(length, width, thickness)`.
    pub fn cut_size(&self) -> Vec3 {
        self.rotation.cut_size(&self.dimensions)
    }

    /// World-frame box.
    pub fn world_box(&self) -> BoundingBox {
        BoundingBox::new(self.position, self.dimensions)
    }

    /// Whether `other` can be merged into this part under `policy`.
    pub fn same_piece(&self, other: &Part, policy: DedupPolicy, tol: &Tolerance) -> bool {
        let shape = match policy {
            DedupPolicy::Off => return false,
            DedupPolicy::Exact => tol.vecs_equal(&self.dimensions, &other.dimensions),
            DedupPolicy::CutSize => {
                tol.vecs_equal(&self.cut_size(), &other.cut_size())
                    && self.grain_direction == other.grain_direction
            }
        };
        shape
            && self.material_ref == other.material_ref
            && self.edge_treatment == other.edge_treatment
            && self.machining.len() == other.machining.len()
            && self
                .machining
                .iter()
                .zip(&other.machining)
                .all(|(a, b)| a.approx_eq(b, tol))
    }

    /// Undo a merge: `quantity` single parts with generated ids `<id>#<n>`.
    ///
    /// A part with quantity 1 expands to a copy of itself.
    pub fn expand(&self) -> Vec<Part> {
        if self.quantity <= 1 {
            return vec![Part {
                quantity: 1,
                ..self.clone()
            }];
        }
        (1..=self.quantity)
            .map(|n| Part {
                id: format!("{}#{}", self.id, n),
                quantity: 1,
                ..self.clone()
            })
            .collect()
    }
}
