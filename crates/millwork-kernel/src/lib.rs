#![warn(missing_docs)]

//! Component assembly resolution for millwork.
//!
//! Turns a [`Document`](millwork_ir::Document) into a [`ResolvedTree`] of
//! boxes and world transforms, and that tree into a flat list of [`Part`]s
//! ready for a cut list.
//!
//! # Example
//!
//! ```
//! use millwork_ir::{Document, SchemaNode};
//! use millwork_kernel::{extract, Resolver, ResolveSettings};
//! use serde_json::json;
//!
//! let root = SchemaNode::new("carcass", "base")
//!     .with_parameters(json!({
//!         "exterior": { "origin": [0.0, 0.0, 0.0], "dimensions": [600.0, 600.0, 870.0] }
//!     }))
//!     .with_child(
//!         SchemaNode::new("divider", "split")
//!             .with_parameters(json!({ "axis": "x", "positions": [0.5] })),
//!     );
//! let resolution = Resolver::new(ResolveSettings::default())
//!     .resolve_document(&Document::new(root))
//!     .unwrap();
//! let parts = extract(&resolution.tree);
//! assert!(parts.iter().any(|p| p.id == "base/split/divider_0"));
//! ```

mod annotation;
pub mod error;
mod extract;
pub mod frame;
mod outline;
mod part;
mod resolve;
mod settings;
mod tree;

pub use annotation::{Annotation, Feature};
pub use error::{ErrorKind, NodePath, ResolveError, Result, SettingsError};
pub use extract::{dedup, extract, extract_with, Extraction, Unattached};
pub use outline::{outline, OutlineEntry, OutlineKind};
pub use part::{EdgeBanding, GrainDirection, MachiningOp, Panel, PanelFace, Part};
pub use resolve::{resolve, ResolveContext, Resolver};
pub use settings::{DedupPolicy, ResolveSettings};
pub use tree::{Cell, NodeIndex, Resolution, ResolvedNode, ResolvedTree};
