//! Deterministic shelf nesting of rectangular pieces onto stock sheets.
//!
//! This is a first-fit decreasing shelf heuristic, not an optimal
//! packer: units are sorted by descending area (stable on ties, so
//! equal-area units keep their input order) and placed left-to-right
//! into horizontal shelves, opening new shelves and sheets as needed.
//! The sort key and placement order are part of the output contract:
//! identical inputs always produce identical placements, which keeps
//! golden-output tests valid. Do not "improve" the tie-breaks.

use serde::{Deserialize, Serialize};

use crate::model::{ResolvedPiece, SheetSize};

/// A placed unit on a sheet. Width and height are the chosen orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Display name of the source piece.
    pub name: String,
    /// Left edge, mm from the sheet origin.
    pub x: f64,
    /// Bottom edge, mm from the sheet origin.
    pub y: f64,
    /// Placed width in mm.
    pub width: f64,
    /// Placed height in mm.
    pub height: f64,
}

/// One sheet instance with its placements and waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Placements in placement order.
    pub placements: Vec<Placement>,
    /// Sum of placed unit areas in mm².
    pub used_area: f64,
    /// Waste percentage of this sheet.
    pub waste_pct: f64,
}

/// Units that could not be placed, grouped by piece and dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedGroup {
    /// Source piece id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit length in mm.
    pub length: f64,
    /// Unit width in mm.
    pub width: f64,
    /// Number of units that did not fit.
    pub qty: u32,
}

/// Result of nesting one material's pieces onto one sheet size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestResult {
    /// Sheets in creation order.
    pub sheets: Vec<SheetLayout>,
    /// Number of sheets used.
    pub total_sheets: usize,
    /// Area of one sheet in mm².
    pub sheet_area: f64,
    /// Number of units that fit no sheet.
    pub unplaced_count: usize,
    /// Unplaced units grouped by piece id and dimensions.
    pub unplaced: Vec<UnplacedGroup>,
}

/// One physical copy of a resolved piece, the unit fed to the packer.
#[derive(Debug, Clone)]
struct Unit {
    id: String,
    name: String,
    length: f64,
    width: f64,
}

/// A horizontal band on a sheet holding left-to-right placements.
#[derive(Debug)]
struct Shelf {
    y: f64,
    height: f64,
    used_width: f64,
}

#[derive(Debug, Default)]
struct OpenSheet {
    placements: Vec<Placement>,
    shelves: Vec<Shelf>,
    used_height: f64,
}

/// A candidate orientation: (width, height) on the sheet.
fn orientations(unit: &Unit, allow_rotate: bool) -> Vec<(f64, f64)> {
    // Natural orientation first: height = length, width = width.
    let mut out = vec![(unit.width, unit.length)];
    if allow_rotate && unit.width != unit.length {
        out.push((unit.length, unit.width));
    }
    out
}

fn try_place_in_shelf(
    unit: &Unit,
    shelf: &mut Shelf,
    sheet: SheetSize,
    kerf: f64,
    allow_rotate: bool,
) -> Option<Placement> {
    for (width, height) in orientations(unit, allow_rotate) {
        // Kerf gap only once the shelf has content.
        let extra = if shelf.used_width > 0.0 { kerf } else { 0.0 };
        let next_x = shelf.used_width + extra;
        if next_x + width <= sheet.width && height <= shelf.height {
            shelf.used_width = next_x + width;
            return Some(Placement {
                name: unit.name.clone(),
                x: next_x,
                y: shelf.y,
                width,
                height,
            });
        }
    }
    None
}

fn try_open_shelf(
    unit: &Unit,
    state: &mut OpenSheet,
    sheet: SheetSize,
    kerf: f64,
    allow_rotate: bool,
) -> Option<Placement> {
    let y = if state.used_height == 0.0 {
        0.0
    } else {
        state.used_height + kerf
    };
    for (width, height) in orientations(unit, allow_rotate) {
        if width <= sheet.width && y + height <= sheet.height {
            state.shelves.push(Shelf {
                y,
                height,
                used_width: width,
            });
            state.used_height = y + height;
            return Some(Placement {
                name: unit.name.clone(),
                x: 0.0,
                y,
                width,
                height,
            });
        }
    }
    None
}

fn try_place_in_sheet(
    unit: &Unit,
    state: &mut OpenSheet,
    sheet: SheetSize,
    kerf: f64,
    allow_rotate: bool,
) -> bool {
    for shelf in &mut state.shelves {
        if let Some(placement) = try_place_in_shelf(unit, shelf, sheet, kerf, allow_rotate) {
            state.placements.push(placement);
            return true;
        }
    }
    if let Some(placement) = try_open_shelf(unit, state, sheet, kerf, allow_rotate) {
        state.placements.push(placement);
        return true;
    }
    false
}

/// Pack one material's pieces onto sheets of the given size.
///
/// Pieces with non-positive length, width or quantity are excluded from
/// packing (validation reports them); quantities are rounded to whole
/// units before expansion.
pub fn nest_pieces(
    pieces: &[ResolvedPiece],
    sheet: SheetSize,
    kerf: f64,
    allow_rotate: bool,
) -> NestResult {
    let mut units = Vec::new();
    for piece in pieces {
        if piece.length <= 0.0 || piece.width <= 0.0 || piece.qty <= 0.0 {
            continue;
        }
        let count = piece.qty.round() as u32;
        for _ in 0..count {
            units.push(Unit {
                id: piece.id.clone(),
                name: piece.name.clone(),
                length: piece.length,
                width: piece.width,
            });
        }
    }

    // Largest-first; stable, so equal areas keep input order.
    units.sort_by(|a, b| {
        let area_a = a.length * a.width;
        let area_b = b.length * b.width;
        area_b
            .partial_cmp(&area_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut open_sheets: Vec<OpenSheet> = Vec::new();
    let mut unplaced_units: Vec<Unit> = Vec::new();

    for unit in &units {
        let mut placed = false;
        for state in &mut open_sheets {
            if try_place_in_sheet(unit, state, sheet, kerf, allow_rotate) {
                placed = true;
                break;
            }
        }
        if !placed {
            let mut state = OpenSheet::default();
            if try_place_in_sheet(unit, &mut state, sheet, kerf, allow_rotate) {
                open_sheets.push(state);
            } else {
                // Does not fit even an empty sheet in any allowed orientation.
                unplaced_units.push(unit.clone());
            }
        }
    }

    let sheet_area = sheet.area();
    let sheets: Vec<SheetLayout> = open_sheets
        .into_iter()
        .map(|state| {
            let used_area: f64 = state.placements.iter().map(|p| p.width * p.height).sum();
            let waste_pct = if sheet_area > 0.0 {
                (sheet_area - used_area) / sheet_area * 100.0
            } else {
                0.0
            };
            SheetLayout {
                placements: state.placements,
                used_area,
                waste_pct,
            }
        })
        .collect();

    NestResult {
        total_sheets: sheets.len(),
        sheet_area,
        unplaced_count: unplaced_units.len(),
        unplaced: summarize_unplaced(&unplaced_units),
        sheets,
    }
}

fn summarize_unplaced(units: &[Unit]) -> Vec<UnplacedGroup> {
    let mut groups: Vec<UnplacedGroup> = Vec::new();
    for unit in units {
        match groups
            .iter_mut()
            .find(|g| g.id == unit.id && g.length == unit.length && g.width == unit.width)
        {
            Some(group) => group.qty += 1,
            None => groups.push(UnplacedGroup {
                id: unit.id.clone(),
                name: unit.name.clone(),
                length: unit.length,
                width: unit.width,
                qty: 1,
            }),
        }
    }
    groups
}
