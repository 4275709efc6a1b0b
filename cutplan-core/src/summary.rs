//! The summary pipeline: resolve, aggregate, nest and price a project.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{accessory_totals, edgeband_totals, AccessoryTotals, EdgeBandTotal};
use crate::costs::{cost_breakdown, labor_cost, CostBreakdown};
use crate::error::{Diagnostic, Result, SummaryError};
use crate::model::{Board, Project, ProjectData, ResolvedPiece, SheetSize};
use crate::nesting::{nest_pieces, NestResult};
use crate::resolve::resolve_pieces;

/// Per-call options for a summary build.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Index into each board's `sizes` list; missing entries default to
    /// the board's first size.
    pub board_size_by_material: BTreeMap<String, usize>,
    /// Overrides `Settings::allow_rotate` when set.
    pub allow_rotate: Option<bool>,
}

/// Nesting outcome for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialNesting {
    /// The board this group was nested on.
    pub board: Board,
    /// The chosen sheet size.
    pub size: SheetSize,
    /// Packing result.
    pub result: NestResult,
    /// Sheets to buy after applying the board's purchase waste.
    pub purchase_sheets: u32,
    /// Purchase cost for this material.
    pub cost: f64,
}

/// The priced cutting plan: a pure projection of project, catalog and
/// settings. Built on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Resolved pieces in project order.
    pub pieces: Vec<ResolvedPiece>,
    /// Sum of template instance quantities.
    pub module_count: u32,
    /// Edge banding totals per band type.
    pub edgebands: Vec<EdgeBandTotal>,
    /// Accessory totals and detail lines.
    pub accessories: AccessoryTotals,
    /// Nesting results per material, in first-seen material order.
    pub nesting: Vec<MaterialNesting>,
    /// Cost breakdown.
    pub costs: CostBreakdown,
    /// Accumulated soft problems; empty on a clean build.
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the full priced summary for a project.
///
/// A pure, total function of its inputs: identical inputs yield
/// identical output, nesting placements included. Per-piece and
/// per-rule problems accumulate in `diagnostics` instead of aborting;
/// the only hard failure is a board-less catalog with a non-empty
/// project.
pub fn build_summary(
    project: &Project,
    data: &ProjectData,
    options: &SummaryOptions,
) -> Result<Summary> {
    if data.catalog.boards.is_empty() && !project.items.is_empty() {
        return Err(SummaryError::EmptyCatalog);
    }

    let resolution = resolve_pieces(project, data);
    let mut diagnostics = resolution.diagnostics;

    let (edgebands, band_diagnostics) = edgeband_totals(&resolution.pieces, &data.catalog);
    diagnostics.extend(band_diagnostics);

    let (accessories, accessory_diagnostics) = accessory_totals(project, data);
    diagnostics.extend(accessory_diagnostics);

    // Group pieces by material in first-seen order.
    let mut groups: Vec<(String, Vec<ResolvedPiece>)> = Vec::new();
    for piece in &resolution.pieces {
        if piece.material_id.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(id, _)| *id == piece.material_id) {
            Some((_, group)) => group.push(piece.clone()),
            None => groups.push((piece.material_id.clone(), vec![piece.clone()])),
        }
    }

    let allow_rotate = options.allow_rotate.unwrap_or(data.settings.allow_rotate);
    let mut nesting = Vec::new();
    let mut boards_cost = 0.0;

    for (material_id, group) in &groups {
        let Some(board) = data.catalog.find_board(material_id) else {
            // Resolution already reported the missing material for
            // template pieces; manual pieces get their own diagnostic.
            if !diagnostics
                .iter()
                .any(|d| d.message.contains(&format!("material '{}' not found", material_id)))
            {
                diagnostics.push(Diagnostic::missing_reference(
                    material_id.clone(),
                    format!("material '{}' not found in catalog", material_id),
                ));
            }
            continue;
        };
        let size_index = options
            .board_size_by_material
            .get(material_id)
            .copied()
            .unwrap_or(0);
        let size = match board.sizes.get(size_index).or_else(|| board.default_size()) {
            Some(size) => *size,
            None => {
                let fallback = SheetSize::default();
                diagnostics.push(Diagnostic::missing_reference(
                    board.id.clone(),
                    format!(
                        "board '{}' has no sheet size, using {}x{}",
                        board.id, fallback.width, fallback.height
                    ),
                ));
                fallback
            }
        };

        let result = nest_pieces(group, size, data.settings.kerf, allow_rotate);
        let purchase_sheets =
            (result.total_sheets as f64 * (1.0 + board.waste_pct / 100.0)).ceil() as u32;
        let cost = purchase_sheets as f64 * board.cost;
        boards_cost += cost;

        tracing::debug!(
            material = %board.id,
            sheets = result.total_sheets,
            purchase = purchase_sheets,
            unplaced = result.unplaced_count,
            "nested material group"
        );

        nesting.push(MaterialNesting {
            board: board.clone(),
            size,
            result,
            purchase_sheets,
            cost,
        });
    }

    let edgebands_cost: f64 = edgebands.iter().map(|e| e.cost).sum();
    let accessories_cost: f64 = accessories.summary.iter().map(|a| a.cost).sum();
    let labor = labor_cost(&resolution.pieces, resolution.module_count, &data.settings);
    let costs = cost_breakdown(
        boards_cost,
        edgebands_cost,
        accessories_cost,
        labor,
        data.settings.margin_pct,
    );

    Ok(Summary {
        pieces: resolution.pieces,
        module_count: resolution.module_count,
        edgebands,
        accessories,
        nesting,
        costs,
        diagnostics,
    })
}
