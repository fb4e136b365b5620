//! Cut list generation.
//!
//! A cut list is what the saw operator needs: how many pieces of each size,
//! in which material, with which grain. Machining and edge banding are
//! downstream steps, so parts that differ only in those share a row.

use std::collections::BTreeMap;
use std::io::Write;

use millwork_kernel::{GrainDirection, Part};
use millwork_math::{Tolerance, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One line of a cut list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutListRow {
    /// Material reference, if any.
    pub material: Option<String>,
    /// Panel length in mm.
    pub length: f64,
    /// Panel width in mm.
    pub width: f64,
    /// Panel thickness in mm.
    pub thickness: f64,
    /// Grain direction.
    pub grain: GrainDirection,
    /// Number of pieces to cut.
    pub quantity: u32,
    /// Ids of the parts this row covers, in part-list order.
    pub part_ids: Vec<String>,
}

impl CutListRow {
    fn matches(&self, part: &Part, size: &Vec3, tol: &Tolerance) -> bool {
        self.material == part.material_ref
            && self.grain == part.grain_direction
            && tol.equal(self.length, size.x)
            && tol.equal(self.width, size.y)
            && tol.equal(self.thickness, size.z)
    }

    /// Face area of all pieces in this row, in m².
    pub fn area_m2(&self) -> f64 {
        self.length * self.width * self.quantity as f64 / 1.0e6
    }
}

/// A cut list for one assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutList {
    /// Assembly name.
    pub name: String,
    /// Rows in first-occurrence order.
    pub rows: Vec<CutListRow>,
}

impl CutList {
    /// Group parts by material, cut size and grain.
    pub fn from_parts(name: impl Into<String>, parts: &[Part], tol: &Tolerance) -> Self {
        let mut rows: Vec<CutListRow> = Vec::new();
        for part in parts {
            let size = part.cut_size();
            match rows.iter_mut().find(|r| r.matches(part, &size, tol)) {
                Some(row) => {
                    row.quantity += part.quantity;
                    row.part_ids.push(part.id.clone());
                }
                None => rows.push(CutListRow {
                    material: part.material_ref.clone(),
                    length: size.x,
                    width: size.y,
                    thickness: size.z,
                    grain: part.grain_direction,
                    quantity: part.quantity,
                    part_ids: vec![part.id.clone()],
                }),
            }
        }
        let name = name.into();
        debug!(name = %name, parts = parts.len(), rows = rows.len(), "grouped cut list");
        Self { name, rows }
    }

    /// Total pieces to cut.
    pub fn total_pieces(&self) -> u32 {
        self.rows.iter().map(|r| r.quantity).sum()
    }

    /// Sheet area needed per material, in m². Parts without a material are
    /// listed under an empty key.
    pub fn area_by_material(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        for row in &self.rows {
            let key = row.material.clone().unwrap_or_default();
            *out.entry(key).or_insert(0.0) += row.area_m2();
        }
        out
    }

    /// Write the cut list as CSV.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for line in self.csv_lines() {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    /// The cut list as a CSV string.
    pub fn to_csv(&self) -> String {
        self.csv_lines().fold(String::new(), |mut out, line| {
            out.push_str(&line);
            out.push('\n');
            out
        })
    }

    fn csv_lines(&self) -> impl Iterator<Item = String> + '_ {
        let header =
            "Material,Length (mm),Width (mm),Thickness (mm),Grain,Quantity,Parts".to_string();
        std::iter::once(header).chain(self.rows.iter().map(|row| {
            format!(
                "{},{:.1},{:.1},{:.1},{},{},{}",
                escape_csv(row.material.as_deref().unwrap_or("")),
                row.length,
                row.width,
                row.thickness,
                grain_label(row.grain),
                row.quantity,
                escape_csv(&row.part_ids.join(" ")),
            )
        }))
    }
}

fn grain_label(grain: GrainDirection) -> &'static str {
    match grain {
        GrainDirection::Length => "length",
        GrainDirection::Width => "width",
        GrainDirection::Unspecified => "",
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
