//! Labor and cost aggregation.

use serde::{Deserialize, Serialize};

use crate::config::{LaborMode, Settings, MM2_PER_M2};
use crate::model::ResolvedPiece;

/// Labor cost in the selected mode.
///
/// `units` is square meters in area mode and hours in time mode; the
/// mode tells callers which unit label to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborCost {
    /// Charging mode.
    pub mode: LaborMode,
    /// Billed units (m² or hours).
    pub units: f64,
    /// Labor cost.
    pub cost: f64,
}

/// Full cost breakdown of a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Board purchase cost.
    pub boards: f64,
    /// Edge banding cost.
    pub edgebands: f64,
    /// Accessory cost.
    pub accessories: f64,
    /// Labor line.
    pub labor: LaborCost,
    /// boards + edgebands + accessories.
    pub materials: f64,
    /// materials + labor.
    pub subtotal: f64,
    /// subtotal with margin applied.
    pub total: f64,
}

/// Compute the labor line from the resolved pieces and settings.
pub fn labor_cost(pieces: &[ResolvedPiece], module_count: u32, settings: &Settings) -> LaborCost {
    match settings.labor_mode {
        LaborMode::Area => {
            let area_mm2: f64 = pieces.iter().map(|p| p.area() * p.qty).sum();
            let area_m2 = area_mm2 / MM2_PER_M2;
            LaborCost {
                mode: LaborMode::Area,
                units: area_m2,
                cost: area_m2 * settings.labor_rate_per_m2,
            }
        }
        LaborMode::Time => {
            let piece_units: f64 = pieces.iter().map(|p| p.qty).sum();
            let minutes = piece_units * settings.labor_time_per_piece_min
                + module_count as f64 * settings.labor_time_per_module_min;
            let hours = minutes / 60.0;
            LaborCost {
                mode: LaborMode::Time,
                units: hours,
                cost: hours * settings.labor_rate_per_hour,
            }
        }
    }
}

/// Combine material and labor costs, applying the margin.
pub fn cost_breakdown(
    boards: f64,
    edgebands: f64,
    accessories: f64,
    labor: LaborCost,
    margin_pct: f64,
) -> CostBreakdown {
    let materials = boards + edgebands + accessories;
    let subtotal = materials + labor.cost;
    let total = subtotal * (1.0 + margin_pct / 100.0);
    CostBreakdown {
        boards,
        edgebands,
        accessories,
        labor,
        materials,
        subtotal,
        total,
    }
}
