//! Parametric module templates: expression-driven pieces and accessory rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which edges of a rectangular piece receive banding.
///
/// `l1`/`l2` are the two length edges, `w1`/`w2` the two width edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeFlags {
    pub l1: bool,
    pub l2: bool,
    pub w1: bool,
    pub w2: bool,
}

impl EdgeFlags {
    /// No edges banded.
    pub fn none() -> Self {
        Self::default()
    }

    /// All four edges banded.
    pub fn all() -> Self {
        Self {
            l1: true,
            l2: true,
            w1: true,
            w2: true,
        }
    }

    /// Linear mm of banding for one piece of the given dimensions.
    pub fn banded_length(&self, length: f64, width: f64) -> f64 {
        let mut total = 0.0;
        if self.l1 {
            total += length;
        }
        if self.l2 {
            total += length;
        }
        if self.w1 {
            total += width;
        }
        if self.w2 {
            total += width;
        }
        total
    }
}

/// A parametric piece inside a template.
///
/// Dimensions and quantity are expressions evaluated against the merged
/// template parameters at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePiece {
    /// Piece id, unique within the template.
    pub id: String,
    /// Display name (e.g. "Lateral", "Base").
    pub name: String,
    /// Board material reference.
    pub material_id: String,
    /// Length expression in mm.
    pub expr_length: String,
    /// Width expression in mm.
    pub expr_width: String,
    /// Per-module quantity expression.
    #[serde(default = "default_qty_expr")]
    pub expr_qty: String,
    /// Edge band reference, if any edge is banded.
    #[serde(default)]
    pub edge_band_id: Option<String>,
    /// Which edges receive banding.
    #[serde(default)]
    pub edges: EdgeFlags,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

fn default_qty_expr() -> String {
    "1".to_string()
}

/// Accessory quantity rule attached to a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryRule {
    /// Rule id, unique within the template.
    pub id: String,
    /// Accessory reference.
    pub accessory_id: String,
    /// Per-module quantity expression.
    pub expr_qty: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A parametric furniture module definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Default parameter values (e.g. ANCHO, ALTO, PROF, ESPESOR, HOLGURA).
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Parametric pieces.
    #[serde(default)]
    pub pieces: Vec<TemplatePiece>,
    /// Accessory quantity rules.
    #[serde(default)]
    pub accessory_rules: Vec<AccessoryRule>,
}

impl Template {
    /// Merge the template defaults with per-item overrides; overrides win.
    pub fn merged_params(&self, overrides: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
        let mut merged = self.params.clone();
        for (key, value) in overrides {
            merged.insert(key.clone(), *value);
        }
        merged
    }
}
