#![warn(missing_docs)]

//! millwork: resolve cabinet assemblies into part lists.
//!
//! A millwork [`Document`] describes a carcass, the dividers that split it
//! and the fills and external panels that occupy it. [`Assembly`] resolves
//! it into world-positioned parts and builds a [`CutList`] from them.
//!
//! # Example
//!
//! ```
//! use millwork::Assembly;
//!
//! let json = r#"{
//!   "version": "0.1",
//!   "root": {
//!     "type": "carcass", "id": "base", "material_ref": "birch-19",
//!     "parameters": { "exterior": { "origin": [0, 0, 0], "dimensions": [600, 600, 870] } },
//!     "children": [
//!       { "type": "shelves", "id": "shelves", "parameters": { "count": 2 } }
//!     ],
//!     "externals": [
//!       { "type": "door", "id": "door", "parameters": { "target": "base", "face": "front" } }
//!     ]
//!   }
//! }"#;
//!
//! let assembly = Assembly::from_json(json).unwrap();
//! let parts = assembly.parts().unwrap();
//! assert!(parts.iter().any(|p| p.id == "base/door/door"));
//!
//! let cut_list = assembly.cut_list().unwrap();
//! assert_eq!(cut_list.total_pieces() as usize, 5 + 2 + 1);
//! ```

pub mod cutlist;

use thiserror::Error;
use tracing::info;

pub use millwork_ir as ir;
pub use millwork_kernel as kernel;
pub use millwork_math as math;

pub use cutlist::{CutList, CutListRow};
pub use millwork_ir::{Document, MaterialDef, SchemaNode};
pub use millwork_kernel::{
    DedupPolicy, EdgeBanding, Extraction, GrainDirection, MachiningOp, OutlineEntry, Part,
    Resolution, ResolveError, ResolveSettings, ResolvedTree, SettingsError,
};

/// Errors returned by the millwork facade.
#[derive(Error, Debug)]
pub enum MillworkError {
    /// The document is not valid JSON for the schema model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, MillworkError>;

/// A document paired with the settings used to resolve it.
#[derive(Debug, Clone)]
pub struct Assembly {
    document: Document,
    settings: ResolveSettings,
}

impl Assembly {
    /// Wrap a document with default settings.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            settings: ResolveSettings::default(),
        }
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Document::from_json(json)?))
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: ResolveSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the settings with ones parsed from TOML.
    pub fn with_settings_toml(self, text: &str) -> Result<Self> {
        let settings = ResolveSettings::from_toml_str(text)?;
        Ok(self.with_settings(settings))
    }

    /// The underlying document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Settings in use.
    pub fn settings(&self) -> &ResolveSettings {
        &self.settings
    }

    /// Resolve the document into a tree.
    pub fn resolve(&self) -> Result<Resolution> {
        let resolver = kernel::Resolver::new(self.settings.clone());
        Ok(resolver.resolve_document(&self.document)?)
    }

    /// Resolve and extract, reporting features that found no part.
    pub fn extraction(&self) -> Result<Extraction> {
        let resolution = self.resolve()?;
        Ok(kernel::extract_with(&resolution.tree, &self.settings))
    }

    /// Resolve and extract the part list.
    pub fn parts(&self) -> Result<Vec<Part>> {
        Ok(self.extraction()?.parts)
    }

    /// Navigation outline of the resolved tree.
    pub fn outline(&self) -> Result<Option<OutlineEntry>> {
        Ok(kernel::outline(&self.resolve()?.tree))
    }

    /// Cut list grouped by material, cut size and grain.
    pub fn cut_list(&self) -> Result<CutList> {
        let parts = self.parts()?;
        let name = self
            .document
            .name
            .clone()
            .unwrap_or_else(|| self.document.root.id.clone());
        let list = CutList::from_parts(name, &parts, &self.settings.tol());
        info!(rows = list.rows.len(), pieces = list.total_pieces(), "built cut list");
        Ok(list)
    }
}
