//! Typed component parameters.
//!
//! A [`SchemaNode`](crate::SchemaNode) carries its parameters as an untyped
//! mapping; [`Component`] is the closed set of component classes those
//! mappings decode into. Adding a class means adding a variant here, never
//! registering one at runtime.

use millwork_math::{Axis, BoundingBox, Face};
use serde::{Deserialize, Serialize};

/// The four component classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentClass {
    /// Root shell.
    Carcass,
    /// Splits volume into cells.
    Divider,
    /// Occupies a cell, terminates subdivision.
    TerminalFill,
    /// Attached to a face.
    External,
}

/// A schema node's decoded parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Outer shell of the assembly.
    Carcass(CarcassParams),
    /// Vertical or horizontal split.
    Divider(DividerParams),
    /// Geometry that fills one cell.
    Fill(Fill),
    /// Panel applied to a face.
    External(ExternalRole, ExternalParams),
}

impl Component {
    /// The class this component belongs to.
    pub fn class(&self) -> ComponentClass {
        match self {
            Component::Carcass(_) => ComponentClass::Carcass,
            Component::Divider(_) => ComponentClass::Divider,
            Component::Fill(_) => ComponentClass::TerminalFill,
            Component::External(..) => ComponentClass::External,
        }
    }
}

/// Terminal fill generators.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Fixed or adjustable shelves.
    Shelves(ShelfParams),
    /// Stack of drawer boxes.
    DrawerStack(DrawerStackParams),
}

/// What an external panel is for. Only affects naming and hinge boring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalRole {
    /// Hinged door.
    Door,
    /// Applied drawer front.
    DrawerFront,
    /// Finished end panel on an exposed side.
    FinishedEnd,
    /// Any other applied panel.
    AppliedPanel,
}

impl ExternalRole {
    /// Schema tag for this role.
    pub fn tag(self) -> &'static str {
        match self {
            ExternalRole::Door => "door",
            ExternalRole::DrawerFront => "drawer_front",
            ExternalRole::FinishedEnd => "finished_end",
            ExternalRole::AppliedPanel => "applied_panel",
        }
    }

    /// Parse a schema tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "door" => Some(ExternalRole::Door),
            "drawer_front" => Some(ExternalRole::DrawerFront),
            "finished_end" => Some(ExternalRole::FinishedEnd),
            "applied_panel" => Some(ExternalRole::AppliedPanel),
            _ => None,
        }
    }
}

mod defaults {
    pub fn panel_thickness() -> f64 {
        19.0
    }
    pub fn yes() -> bool {
        true
    }
    pub fn nailer_width() -> f64 {
        100.0
    }
    pub fn min_clearance() -> f64 {
        50.0
    }
    pub fn side_gap() -> f64 {
        1.0
    }
    pub fn pin_inset() -> f64 {
        37.0
    }
    pub fn pin_diameter() -> f64 {
        5.0
    }
    pub fn pin_depth() -> f64 {
        10.0
    }
    pub fn drawer_side() -> f64 {
        12.0
    }
    pub fn drawer_bottom() -> f64 {
        6.0
    }
    pub fn slide_clearance() -> f64 {
        12.5
    }
    pub fn top_clearance() -> f64 {
        20.0
    }
    pub fn bottom_clearance() -> f64 {
        10.0
    }
    pub fn rear_clearance() -> f64 {
        10.0
    }
    pub fn bottom_dado() -> f64 {
        6.0
    }
}

/// Carcass construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarcassParams {
    /// Exterior box of the whole carcass.
    pub exterior: BoundingBox,
    /// Side, top and bottom panel thickness.
    #[serde(default = "defaults::panel_thickness")]
    pub thickness: f64,
    /// Back panel thickness; defaults to `thickness`.
    #[serde(default)]
    pub back_thickness: Option<f64>,
    /// Depth of the dado the back sits in on each side.
    #[serde(default)]
    pub back_inset: f64,
    /// Add top and bottom nailers behind the back.
    #[serde(default)]
    pub nailers: bool,
    /// Height of each nailer strip.
    #[serde(default = "defaults::nailer_width")]
    pub nailer_width: f64,
    /// Build a top panel.
    #[serde(default = "defaults::yes")]
    pub include_top: bool,
    /// Build a bottom panel.
    #[serde(default = "defaults::yes")]
    pub include_bottom: bool,
    /// Build a back panel.
    #[serde(default = "defaults::yes")]
    pub include_back: bool,
    /// Banding applied to front edges.
    #[serde(default)]
    pub edge_band: Option<String>,
    /// Material for the back, if it differs from the carcass.
    #[serde(default)]
    pub back_material_ref: Option<String>,
}

impl CarcassParams {
    /// Effective back thickness.
    pub fn back_thickness(&self) -> f64 {
        self.back_thickness.unwrap_or(self.thickness)
    }
}

/// How divider positions are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitUnits {
    /// Fractions of the extent along the split axis.
    #[default]
    Fraction,
    /// Millimeter offsets from the cell origin.
    Absolute,
}

/// Divider parameters.
///
/// Each position is the centre line of one divider panel. Either
/// `positions` or `cells` must be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DividerParams {
    /// Split axis: `x` for vertical dividers, `z` for horizontal ones.
    pub axis: Axis,
    /// Split positions, strictly increasing.
    #[serde(default)]
    pub positions: Vec<f64>,
    /// Units of `positions`.
    #[serde(default)]
    pub units: SplitUnits,
    /// Number of equal cells, instead of explicit positions.
    #[serde(default)]
    pub cells: Option<usize>,
    /// Divider panel thickness.
    #[serde(default = "defaults::panel_thickness")]
    pub thickness: f64,
    /// Cell names, left to right or bottom to top.
    #[serde(default)]
    pub names: Vec<String>,
    /// Banding applied to the front edge of each divider.
    #[serde(default)]
    pub edge_band: Option<String>,
}

/// Shelf fill parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShelfParams {
    /// Number of shelves (may be omitted when `positions` is given).
    #[serde(default)]
    pub count: Option<usize>,
    /// Explicit shelf bottom heights above the cell floor.
    #[serde(default)]
    pub positions: Vec<f64>,
    /// Shelf thickness.
    #[serde(default = "defaults::panel_thickness")]
    pub thickness: f64,
    /// Minimum clear height of every opening.
    #[serde(default = "defaults::min_clearance")]
    pub min_clearance: f64,
    /// Adjustable shelves sit on pins; fixed shelves span the full width.
    #[serde(default = "defaults::yes")]
    pub adjustable: bool,
    /// Gap on each end of an adjustable shelf.
    #[serde(default = "defaults::side_gap")]
    pub side_gap: f64,
    /// Distance the shelf front sits back from the cell front.
    #[serde(default)]
    pub setback: f64,
    /// Pin hole distance from the cell front and back.
    #[serde(default = "defaults::pin_inset")]
    pub pin_inset: f64,
    /// Pin hole diameter.
    #[serde(default = "defaults::pin_diameter")]
    pub pin_diameter: f64,
    /// Pin hole depth.
    #[serde(default = "defaults::pin_depth")]
    pub pin_depth: f64,
    /// Dado depth for fixed shelves (0 = butt joint).
    #[serde(default)]
    pub dado_depth: f64,
    /// Banding applied to the shelf front edge.
    #[serde(default)]
    pub edge_band: Option<String>,
}

/// Drawer stack parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawerStackParams {
    /// Opening heights, bottom to top.
    #[serde(default)]
    pub heights: Vec<f64>,
    /// Number of equal openings, instead of explicit heights.
    #[serde(default)]
    pub count: Option<usize>,
    /// Drawer box side, front and back thickness.
    #[serde(default = "defaults::drawer_side")]
    pub side_thickness: f64,
    /// Drawer bottom thickness.
    #[serde(default = "defaults::drawer_bottom")]
    pub bottom_thickness: f64,
    /// Slide clearance on each side.
    #[serde(default = "defaults::slide_clearance")]
    pub slide_clearance: f64,
    /// Clearance above each box inside its opening.
    #[serde(default = "defaults::top_clearance")]
    pub top_clearance: f64,
    /// Clearance below each box inside its opening.
    #[serde(default = "defaults::bottom_clearance")]
    pub bottom_clearance: f64,
    /// Clearance behind each box.
    #[serde(default = "defaults::rear_clearance")]
    pub rear_clearance: f64,
    /// Depth of the groove holding the bottom.
    #[serde(default = "defaults::bottom_dado")]
    pub bottom_dado_depth: f64,
    /// Material for the drawer boxes, if it differs from the fill.
    #[serde(default)]
    pub box_material_ref: Option<String>,
}

/// Edge a door is hinged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HingeSide {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

/// Parameters shared by all external panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalParams {
    /// Id of the component whose box carries the face.
    pub target: String,
    /// Cell of the target to use instead of its own box.
    #[serde(default)]
    pub cell: Option<String>,
    /// Face the panel is applied to.
    pub face: Face,
    /// Panel thickness.
    #[serde(default = "defaults::panel_thickness")]
    pub thickness: f64,
    /// Growth of the panel beyond the face on every edge; negative for a reveal.
    #[serde(default)]
    pub overlay: f64,
    /// Distance the panel is pushed behind the face.
    #[serde(default)]
    pub inset: f64,
    /// Banding applied to all four edges.
    #[serde(default)]
    pub edge_band: Option<String>,
    /// Hinge edge, doors only.
    #[serde(default)]
    pub hinge_side: Option<HingeSide>,
}
