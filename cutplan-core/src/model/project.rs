//! Project definitions: items to cut and manually added accessories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::template::EdgeFlags;

/// A concrete, manually entered rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPiece {
    /// Piece id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Board material reference.
    pub material_id: String,
    /// Board thickness in mm.
    #[serde(default)]
    pub thickness: f64,
    /// Length in mm.
    pub length: f64,
    /// Width in mm.
    pub width: f64,
    /// Quantity. Positive; zero/negative values are rejected upstream.
    pub qty: f64,
    /// Edge band reference.
    #[serde(default)]
    pub edge_band_id: Option<String>,
    /// Which edges receive banding.
    #[serde(default)]
    pub edges: EdgeFlags,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// One entry in a project: a template instantiation or a manual piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProjectItem {
    /// A template instantiated with parameter overrides.
    Template {
        /// Item id.
        id: String,
        /// Referenced template.
        template_id: String,
        /// Parameter overrides; template defaults fill the rest.
        #[serde(default)]
        params: BTreeMap<String, f64>,
        /// Number of module instances. Positive; rejected upstream otherwise.
        qty: u32,
    },
    /// A fully concrete manual piece.
    Piece {
        /// Item id.
        id: String,
        /// The piece itself.
        piece: ManualPiece,
    },
}

impl ProjectItem {
    /// The item's own id.
    pub fn id(&self) -> &str {
        match self {
            ProjectItem::Template { id, .. } => id,
            ProjectItem::Piece { id, .. } => id,
        }
    }
}

/// A manually added accessory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAccessory {
    /// Accessory reference.
    pub accessory_id: String,
    /// Quantity, taken verbatim.
    pub qty: f64,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A project: the list of items to cut plus manual accessory lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Items to cut, in user order.
    #[serde(default)]
    pub items: Vec<ProjectItem>,
    /// Manually added accessories.
    #[serde(default)]
    pub manual_accessories: Vec<ManualAccessory>,
}
