#![warn(missing_docs)]

//! Schema document model for millwork assemblies.
//!
//! A document is a strict tree of [`SchemaNode`]s rooted at a carcass. Each
//! node is the mapping-based structure a JSON parser produces (`type`, `id`,
//! `parameters`, `children`, `externals`); [`SchemaNode::component`] decodes
//! the untyped parameters into the closed [`Component`] set.
//!
//! The model is purely declarative: no geometry is computed here. Resolution
//! into boxes and parts is handled by `millwork-kernel`.

mod component;
pub mod error;

pub use component::{
    CarcassParams, Component, ComponentClass, DividerParams, DrawerStackParams, ExternalParams,
    ExternalRole, Fill, HingeSide, ShelfParams, SplitUnits,
};
pub use error::{Result, SchemaError};

use millwork_math::Axis;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Sheet material definition.
///
/// The engine stores material references on parts but never interprets them;
/// these entries exist for downstream consumers such as cut lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Human-readable description (e.g. "Baltic birch 18mm").
    #[serde(default)]
    pub description: Option<String>,
    /// Nominal sheet thickness in mm.
    #[serde(default)]
    pub thickness: Option<f64>,
    /// Whether the sheet has a visible grain.
    #[serde(default)]
    pub grained: bool,
}

/// One node of the assembly tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Component type tag (e.g. `"divider"`).
    #[serde(rename = "type")]
    pub tag: String,
    /// Unique identifier within the document.
    pub id: String,
    /// Per-type parameters.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    /// Material reference; inherited from the nearest ancestor when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_ref: Option<String>,
    /// Mirror this node's contents across its own box along an axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<Axis>,
    /// Child nodes assigned to produced cells, in cell order. `None` leaves a cell empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Option<SchemaNode>>,
    /// Externals attached by this node, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub externals: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Create a node with no parameters or children.
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
            parameters: Map::new(),
            material_ref: None,
            mirror: None,
            children: Vec::new(),
            externals: Vec::new(),
        }
    }

    /// Replace the parameters with the entries of a JSON object.
    ///
    /// Non-object values leave the parameters empty.
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Set the material reference.
    pub fn with_material(mut self, material_ref: impl Into<String>) -> Self {
        self.material_ref = Some(material_ref.into());
        self
    }

    /// Mirror this node along `axis`.
    pub fn with_mirror(mut self, axis: Axis) -> Self {
        self.mirror = Some(axis);
        self
    }

    /// Assign the next cell to `child`.
    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(Some(child));
        self
    }

    /// Leave the next cell empty.
    pub fn with_empty_cell(mut self) -> Self {
        self.children.push(None);
        self
    }

    /// Attach an external.
    pub fn with_external(mut self, external: SchemaNode) -> Self {
        self.externals.push(external);
        self
    }

    /// Decode the parameters into a typed [`Component`].
    pub fn component(&self) -> Result<Component> {
        let component = match self.tag.as_str() {
            "carcass" => Component::Carcass(self.decode()?),
            "divider" => Component::Divider(self.decode()?),
            "shelves" => Component::Fill(Fill::Shelves(self.decode()?)),
            "drawer_stack" => Component::Fill(Fill::DrawerStack(self.decode()?)),
            tag => match ExternalRole::from_tag(tag) {
                Some(role) => Component::External(role, self.decode()?),
                None => {
                    return Err(SchemaError::UnknownComponentType {
                        id: self.id.clone(),
                        tag: tag.to_string(),
                    })
                }
            },
        };
        Ok(component)
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.parameters.clone())).map_err(|e| {
            SchemaError::InvalidParameters {
                id: self.id.clone(),
                message: e.to_string(),
            }
        })
    }

    /// This node and all descendants (children, then externals) in pre-order.
    pub fn descendants(&self) -> Vec<&SchemaNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            for ext in node.externals.iter().rev() {
                stack.push(ext);
            }
            for child in node.children.iter().rev().flatten() {
                stack.push(child);
            }
        }
        out
    }

    /// First node with the given id in pre-order.
    pub fn find(&self, id: &str) -> Option<&SchemaNode> {
        self.descendants().into_iter().find(|n| n.id == id)
    }

    /// Ids that occur more than once in this subtree, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for node in self.descendants() {
            if !seen.insert(node.id.as_str()) && !dups.contains(&node.id.as_str()) {
                dups.push(node.id.as_str());
            }
        }
        dups
    }
}

/// A millwork document: the assembly tree plus material definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Optional assembly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Material definitions, keyed by reference.
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDef>,
    /// Root node; a carcass.
    pub root: SchemaNode,
}

impl Document {
    /// Create a document around a root node.
    pub fn new(root: SchemaNode) -> Self {
        Self {
            version: "0.1".to_string(),
            name: None,
            materials: BTreeMap::new(),
            root,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
