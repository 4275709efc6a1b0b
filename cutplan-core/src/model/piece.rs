//! Resolved pieces: the concrete rectangles produced by piece resolution.

use serde::{Deserialize, Serialize};

use super::template::EdgeFlags;

/// A concrete rectangle ready for banding, nesting and costing.
///
/// Produced fresh on every summary build and never mutated after
/// creation. Quantities may be fractional or non-positive when an
/// expression misbehaves; validation flags those, resolution does not
/// drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPiece {
    /// Derived id: `{item_id}-{piece_id}` for template pieces.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Board material reference.
    pub material_id: String,
    /// Board thickness in mm.
    pub thickness: f64,
    /// Length in mm.
    pub length: f64,
    /// Width in mm.
    pub width: f64,
    /// Total quantity (per-module quantity times instance quantity).
    pub qty: f64,
    /// Edge band reference.
    pub edge_band_id: Option<String>,
    /// Which edges receive banding.
    pub edges: EdgeFlags,
    /// Free-form notes.
    pub notes: String,
    /// Where the piece came from: the template name or "Manual".
    pub source: String,
}

impl ResolvedPiece {
    /// Face area of one unit in mm².
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}
