//! Catalog entries: boards, edge bands and accessories.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_SHEET_HEIGHT, DEFAULT_SHEET_WIDTH};

/// A purchasable sheet size for a board, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetSize {
    /// Sheet width in mm.
    pub width: f64,
    /// Sheet height in mm.
    pub height: f64,
}

impl SheetSize {
    /// Create a new sheet size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Sheet area in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl Default for SheetSize {
    /// The standard melamine sheet, used when a board lists no sizes.
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_WIDTH, DEFAULT_SHEET_HEIGHT)
    }
}

/// A stock board material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Purchasable sheet sizes; the first entry is the default.
    pub sizes: Vec<SheetSize>,
    /// Board thickness in mm.
    pub thickness: f64,
    /// Cost per sheet.
    pub cost: f64,
    /// Purchase-side overage percentage (0-100).
    #[serde(default)]
    pub waste_pct: f64,
}

impl Board {
    /// The default sheet size (first listed), if any.
    pub fn default_size(&self) -> Option<&SheetSize> {
        self.sizes.first()
    }
}

/// Edge banding material, costed per linear meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBand {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Band width in mm.
    pub width: f64,
    /// Cost per linear meter.
    pub cost_per_m: f64,
    /// Waste percentage applied on the total length (0-100).
    #[serde(default)]
    pub waste_pct: f64,
}

/// A hardware accessory (hinges, slides, screws...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit label for rendering quantities (e.g. "u", "pair").
    pub unit: String,
    /// Cost per unit.
    pub cost: f64,
}

/// The full material catalog passed into every summary build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Stock boards.
    #[serde(default)]
    pub boards: Vec<Board>,
    /// Edge banding materials.
    #[serde(default)]
    pub edgebands: Vec<EdgeBand>,
    /// Hardware accessories.
    #[serde(default)]
    pub accessories: Vec<Accessory>,
}

impl Catalog {
    /// Look up a board by id.
    pub fn find_board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// Look up an edge band by id.
    pub fn find_edgeband(&self, id: &str) -> Option<&EdgeBand> {
        self.edgebands.iter().find(|e| e.id == id)
    }

    /// Look up an accessory by id.
    pub fn find_accessory(&self, id: &str) -> Option<&Accessory> {
        self.accessories.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_size_area() {
        assert_eq!(SheetSize::new(2750.0, 1830.0).area(), 5_032_500.0);
    }

    #[test]
    fn test_sheet_size_default_is_standard_sheet() {
        assert_eq!(SheetSize::default(), SheetSize::new(2750.0, 1830.0));
    }

    #[test]
    fn test_board_default_size() {
        let board = Board {
            id: "board-1".into(),
            name: "Melamine white 18".into(),
            sizes: vec![SheetSize::new(2750.0, 1830.0), SheetSize::new(2600.0, 1830.0)],
            thickness: 18.0,
            cost: 45.0,
            waste_pct: 8.0,
        };
        assert_eq!(board.default_size(), Some(&SheetSize::new(2750.0, 1830.0)));
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = Catalog {
            boards: vec![Board {
                id: "board-1".into(),
                name: "MDF".into(),
                sizes: vec![SheetSize::new(2750.0, 1830.0)],
                thickness: 18.0,
                cost: 40.0,
                waste_pct: 0.0,
            }],
            edgebands: vec![EdgeBand {
                id: "edge-1".into(),
                name: "PVC 22".into(),
                width: 22.0,
                cost_per_m: 0.5,
                waste_pct: 5.0,
            }],
            accessories: vec![],
        };
        assert!(catalog.find_board("board-1").is_some());
        assert!(catalog.find_board("board-9").is_none());
        assert!(catalog.find_edgeband("edge-1").is_some());
        assert!(catalog.find_accessory("acc-1").is_none());
    }
}
