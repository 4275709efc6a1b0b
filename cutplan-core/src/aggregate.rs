//! Edge banding and accessory aggregation.

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::expr;
use crate::model::{Catalog, Project, ProjectData, ProjectItem, ResolvedPiece};

/// Aggregated totals for one edge band type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBandTotal {
    /// Edge band id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Band width in mm.
    pub width: f64,
    /// Total linear meters, waste included.
    pub meters: f64,
    /// Cost per linear meter.
    pub cost_per_m: f64,
    /// Total cost.
    pub cost: f64,
    /// Waste percentage applied.
    pub waste_pct: f64,
}

/// Aggregated totals for one accessory type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryTotal {
    /// Accessory id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit label.
    pub unit: String,
    /// Total quantity.
    pub qty: f64,
    /// Cost per unit.
    pub cost_unit: f64,
    /// Total cost.
    pub cost: f64,
}

/// One unaggregated accessory line, kept for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryDetail {
    /// Accessory id.
    pub accessory_id: String,
    /// Display name.
    pub name: String,
    /// Quantity contributed by this line.
    pub qty: f64,
    /// Unit label.
    pub unit: String,
    /// Cost of this line.
    pub cost: f64,
    /// How the quantity was computed, e.g. `"2*PUERTAS x 3"` or `"Manual"`.
    pub calc: String,
    /// Template name or "Manual".
    pub source: String,
}

/// Accessory aggregation output: per-accessory summary plus detail lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessoryTotals {
    /// Aggregated by accessory id.
    pub summary: Vec<AccessoryTotal>,
    /// One line per rule or manual entry, in encounter order.
    pub details: Vec<AccessoryDetail>,
}

/// Sum banding meters and cost per edge band type.
///
/// Each piece contributes its flagged edge lengths times its quantity;
/// totals are converted mm to m and inflated by the band's waste
/// percentage. Unknown band references are reported once and omitted
/// from the totals. Output order is first-seen band order.
pub fn edgeband_totals(
    pieces: &[ResolvedPiece],
    catalog: &Catalog,
) -> (Vec<EdgeBandTotal>, Vec<Diagnostic>) {
    use crate::config::MM_PER_M;

    // (band_id, raw meters) in first-seen order
    let mut raw: Vec<(String, f64)> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut reported_missing: Vec<String> = Vec::new();

    for piece in pieces {
        let Some(band_id) = &piece.edge_band_id else {
            continue;
        };
        if catalog.find_edgeband(band_id).is_none() {
            if !reported_missing.contains(band_id) {
                diagnostics.push(Diagnostic::missing_reference(
                    piece.id.clone(),
                    format!("edge band '{}' not found in catalog", band_id),
                ));
                reported_missing.push(band_id.clone());
            }
            continue;
        }
        let perimeter = piece.edges.banded_length(piece.length, piece.width);
        let meters = perimeter * piece.qty / MM_PER_M;
        match raw.iter_mut().find(|(id, _)| id == band_id) {
            Some((_, total)) => *total += meters,
            None => raw.push((band_id.clone(), meters)),
        }
    }

    let totals = raw
        .into_iter()
        .filter_map(|(id, meters)| {
            let band = catalog.find_edgeband(&id)?;
            let total_meters = meters * (1.0 + band.waste_pct / 100.0);
            Some(EdgeBandTotal {
                id: band.id.clone(),
                name: band.name.clone(),
                width: band.width,
                meters: total_meters,
                cost_per_m: band.cost_per_m,
                cost: total_meters * band.cost_per_m,
                waste_pct: band.waste_pct,
            })
        })
        .collect();

    (totals, diagnostics)
}

/// Evaluate accessory rules and manual entries into quantities and costs.
///
/// Template rules are evaluated against the merged parameters and
/// multiplied by the item's instance quantity (clamped at zero); manual
/// entries are taken verbatim. The summary aggregates by accessory id
/// in first-seen order; details retain every contributing line.
pub fn accessory_totals(
    project: &Project,
    data: &ProjectData,
) -> (AccessoryTotals, Vec<Diagnostic>) {
    let mut out = AccessoryTotals::default();
    let mut diagnostics = Vec::new();

    for item in &project.items {
        let ProjectItem::Template {
            id,
            template_id,
            params,
            qty,
        } = item
        else {
            continue;
        };
        let Some(template) = data.find_template(template_id) else {
            // Resolution already reports the missing template.
            continue;
        };
        let merged = template.merged_params(params);

        for rule in &template.accessory_rules {
            let subject = format!("{}-{}", id, rule.id);
            let Some(accessory) = data.catalog.find_accessory(&rule.accessory_id) else {
                diagnostics.push(Diagnostic::missing_reference(
                    subject,
                    format!("accessory '{}' not found in catalog", rule.accessory_id),
                ));
                continue;
            };
            let base_qty = match expr::eval_expr(&rule.expr_qty, &merged) {
                Ok(value) => value,
                Err(err) => {
                    diagnostics.push(Diagnostic::expression(
                        subject.clone(),
                        format!("'{}': {}", rule.expr_qty, err),
                    ));
                    0.0
                }
            };
            let total_qty = (base_qty * *qty as f64).max(0.0);
            add_to_summary(&mut out.summary, accessory, total_qty);
            out.details.push(AccessoryDetail {
                accessory_id: accessory.id.clone(),
                name: accessory.name.clone(),
                qty: total_qty,
                unit: accessory.unit.clone(),
                cost: total_qty * accessory.cost,
                calc: format!("{} x {}", rule.expr_qty, qty),
                source: template.name.clone(),
            });
        }
    }

    for entry in &project.manual_accessories {
        let Some(accessory) = data.catalog.find_accessory(&entry.accessory_id) else {
            diagnostics.push(Diagnostic::missing_reference(
                entry.accessory_id.clone(),
                format!("accessory '{}' not found in catalog", entry.accessory_id),
            ));
            continue;
        };
        add_to_summary(&mut out.summary, accessory, entry.qty);
        out.details.push(AccessoryDetail {
            accessory_id: accessory.id.clone(),
            name: accessory.name.clone(),
            qty: entry.qty,
            unit: accessory.unit.clone(),
            cost: entry.qty * accessory.cost,
            calc: "Manual".to_string(),
            source: "Manual".to_string(),
        });
    }

    (out, diagnostics)
}

fn add_to_summary(summary: &mut Vec<AccessoryTotal>, accessory: &crate::model::Accessory, qty: f64) {
    match summary.iter_mut().find(|t| t.id == accessory.id) {
        Some(total) => {
            total.qty += qty;
            total.cost = total.qty * total.cost_unit;
        }
        None => summary.push(AccessoryTotal {
            id: accessory.id.clone(),
            name: accessory.name.clone(),
            unit: accessory.unit.clone(),
            qty,
            cost_unit: accessory.cost,
            cost: qty * accessory.cost,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Accessory, AccessoryRule, EdgeBand, EdgeFlags, ManualAccessory, Template,
    };
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn piece_with_band(qty: f64, edges: EdgeFlags, band: Option<&str>) -> ResolvedPiece {
        ResolvedPiece {
            id: "p1".into(),
            name: "Door".into(),
            material_id: "board-1".into(),
            thickness: 18.0,
            length: 600.0,
            width: 400.0,
            qty,
            edge_band_id: band.map(String::from),
            edges,
            notes: String::new(),
            source: "Manual".into(),
        }
    }

    fn band_catalog(waste_pct: f64) -> Catalog {
        Catalog {
            edgebands: vec![EdgeBand {
                id: "edge-1".into(),
                name: "PVC white 22".into(),
                width: 22.0,
                cost_per_m: 0.5,
                waste_pct,
            }],
            ..Default::default()
        }
    }

    // ==================== edge banding ====================

    #[test]
    fn test_edgeband_meters_no_waste() {
        let edges = EdgeFlags {
            l1: true,
            w1: true,
            ..Default::default()
        };
        let pieces = vec![piece_with_band(2.0, edges, Some("edge-1"))];
        let (totals, diagnostics) = edgeband_totals(&pieces, &band_catalog(0.0));

        assert!(diagnostics.is_empty());
        assert_eq!(totals.len(), 1);
        // ((600 + 400) * 2) / 1000
        assert_eq!(totals[0].meters, 2.0);
        assert_eq!(totals[0].cost, 1.0);
    }

    #[test]
    fn test_edgeband_waste_inflation() {
        let pieces = vec![piece_with_band(1.0, EdgeFlags::all(), Some("edge-1"))];
        let (totals, _) = edgeband_totals(&pieces, &band_catalog(5.0));
        // (600*2 + 400*2) / 1000 * 1.05
        assert!((totals[0].meters - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_edgeband_skips_unbanded_pieces() {
        let pieces = vec![piece_with_band(2.0, EdgeFlags::all(), None)];
        let (totals, diagnostics) = edgeband_totals(&pieces, &band_catalog(0.0));
        assert!(totals.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_edgeband_missing_reference_reported_once() {
        let edges = EdgeFlags::all();
        let pieces = vec![
            piece_with_band(1.0, edges, Some("edge-x")),
            piece_with_band(1.0, edges, Some("edge-x")),
        ];
        let (totals, diagnostics) = edgeband_totals(&pieces, &band_catalog(0.0));
        assert!(totals.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    // ==================== accessories ====================

    fn accessory_data() -> ProjectData {
        ProjectData {
            catalog: Catalog {
                accessories: vec![
                    Accessory {
                        id: "acc-1".into(),
                        name: "Hinge".into(),
                        unit: "u".into(),
                        cost: 1.5,
                    },
                    Accessory {
                        id: "acc-2".into(),
                        name: "Screw".into(),
                        unit: "u".into(),
                        cost: 0.02,
                    },
                ],
                ..Default::default()
            },
            templates: vec![Template {
                id: "tpl-1".into(),
                name: "Base unit".into(),
                params: BTreeMap::from([("ALTO".to_string(), 950.0)]),
                pieces: vec![],
                accessory_rules: vec![AccessoryRule {
                    id: "a1".into(),
                    accessory_id: "acc-1".into(),
                    expr_qty: "(ALTO > 900 ? 3 : 2) * 2".into(),
                    notes: String::new(),
                }],
            }],
            settings: Default::default(),
        }
    }

    fn project_with_template(qty: u32) -> Project {
        Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![ProjectItem::Template {
                id: "item-1".into(),
                template_id: "tpl-1".into(),
                params: BTreeMap::new(),
                qty,
            }],
            manual_accessories: vec![],
        }
    }

    #[test]
    fn test_accessory_rule_times_instance_qty() {
        let (totals, diagnostics) = accessory_totals(&project_with_template(2), &accessory_data());
        assert!(diagnostics.is_empty());
        assert_eq!(totals.summary.len(), 1);
        // (ALTO > 900 -> 3) * 2 = 6 per module, times 2 instances
        assert_eq!(totals.summary[0].qty, 12.0);
        assert_eq!(totals.summary[0].cost, 18.0);
        assert_eq!(totals.details[0].calc, "(ALTO > 900 ? 3 : 2) * 2 x 2");
        assert_eq!(totals.details[0].source, "Base unit");
    }

    #[test]
    fn test_accessory_manual_entries() {
        let mut project = project_with_template(1);
        project.manual_accessories.push(ManualAccessory {
            accessory_id: "acc-2".into(),
            qty: 20.0,
            notes: String::new(),
        });
        let (totals, _) = accessory_totals(&project, &accessory_data());

        assert_eq!(totals.summary.len(), 2);
        let screws = totals.summary.iter().find(|t| t.id == "acc-2").unwrap();
        assert_eq!(screws.qty, 20.0);
        assert!((screws.cost - 0.4).abs() < 1e-9);
        let manual_detail = totals.details.last().unwrap();
        assert_eq!(manual_detail.calc, "Manual");
        assert_eq!(manual_detail.source, "Manual");
    }

    #[test]
    fn test_accessory_aggregates_same_id() {
        let mut project = project_with_template(1);
        project.manual_accessories.push(ManualAccessory {
            accessory_id: "acc-1".into(),
            qty: 4.0,
            notes: String::new(),
        });
        let (totals, _) = accessory_totals(&project, &accessory_data());
        assert_eq!(totals.summary.len(), 1);
        assert_eq!(totals.summary[0].qty, 10.0); // 6 from rule + 4 manual
        assert_eq!(totals.details.len(), 2);
    }

    #[test]
    fn test_accessory_negative_quantity_clamped_to_zero() {
        let mut data = accessory_data();
        data.templates[0].accessory_rules[0].expr_qty = "2 - 5".into();
        let (totals, diagnostics) = accessory_totals(&project_with_template(2), &data);

        // Unlike piece quantities, accessory counts never go negative.
        assert!(diagnostics.is_empty());
        assert_eq!(totals.summary[0].qty, 0.0);
        assert_eq!(totals.summary[0].cost, 0.0);
        assert_eq!(totals.details[0].qty, 0.0);
        assert_eq!(totals.details[0].cost, 0.0);
        assert_eq!(totals.details[0].calc, "2 - 5 x 2");
    }

    #[test]
    fn test_accessory_missing_reference() {
        let mut data = accessory_data();
        data.catalog.accessories.clear();
        let (totals, diagnostics) = accessory_totals(&project_with_template(1), &data);
        assert!(totals.summary.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_accessory_broken_expression_yields_zero_line() {
        let mut data = accessory_data();
        data.templates[0].accessory_rules[0].expr_qty = "PUERTAS * 2".into();
        let (totals, diagnostics) = accessory_totals(&project_with_template(1), &data);
        // Line stays with qty 0 plus an expression diagnostic.
        assert_eq!(totals.summary[0].qty, 0.0);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unknown variable 'PUERTAS'"));
    }
}
