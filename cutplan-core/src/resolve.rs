//! Piece resolution: expanding project items into concrete rectangles.

use std::collections::BTreeMap;

use crate::error::Diagnostic;
use crate::expr;
use crate::model::{Project, ProjectData, ProjectItem, ResolvedPiece, Template, TemplatePiece};

/// Output of piece resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Concrete pieces, in project-item then declaration order.
    pub pieces: Vec<ResolvedPiece>,
    /// Sum of template instance quantities.
    pub module_count: u32,
    /// Soft problems found along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Expand a project's items into a flat resolved piece list.
///
/// Template items are evaluated against the template defaults merged
/// with the item's overrides; manual pieces pass through unchanged with
/// source "Manual". Nothing is dropped on failure: a piece with a broken
/// expression stays in the list with a 0 dimension and an accompanying
/// diagnostic, so validation can enumerate exactly which pieces fail.
pub fn resolve_pieces(project: &Project, data: &ProjectData) -> Resolution {
    let mut out = Resolution::default();

    for item in &project.items {
        match item {
            ProjectItem::Template {
                id,
                template_id,
                params,
                qty,
            } => {
                let Some(template) = data.find_template(template_id) else {
                    out.diagnostics.push(Diagnostic::missing_reference(
                        id.clone(),
                        format!("template '{}' not found", template_id),
                    ));
                    continue;
                };
                out.module_count += qty;
                let merged = template.merged_params(params);
                for piece in &template.pieces {
                    let resolved = resolve_template_piece(
                        id,
                        *qty,
                        template,
                        piece,
                        &merged,
                        data,
                        &mut out.diagnostics,
                    );
                    out.pieces.push(resolved);
                }
            }
            ProjectItem::Piece { piece, .. } => {
                out.pieces.push(ResolvedPiece {
                    id: piece.id.clone(),
                    name: piece.name.clone(),
                    material_id: piece.material_id.clone(),
                    thickness: piece.thickness,
                    length: piece.length,
                    width: piece.width,
                    qty: piece.qty,
                    edge_band_id: piece.edge_band_id.clone(),
                    edges: piece.edges,
                    notes: piece.notes.clone(),
                    source: "Manual".to_string(),
                });
            }
        }
    }

    out
}

fn resolve_template_piece(
    item_id: &str,
    instance_qty: u32,
    template: &Template,
    piece: &TemplatePiece,
    params: &BTreeMap<String, f64>,
    data: &ProjectData,
    diagnostics: &mut Vec<Diagnostic>,
) -> ResolvedPiece {
    let subject = format!("{}-{}", item_id, piece.id);

    let length = eval_or_diag(&piece.expr_length, params, &subject, diagnostics);
    let width = eval_or_diag(&piece.expr_width, params, &subject, diagnostics);
    let per_module_qty = eval_or_diag(&piece.expr_qty, params, &subject, diagnostics);
    // Not clamped at zero: validation flags non-positive quantities.
    let qty = per_module_qty * instance_qty as f64;

    let thickness = match data.catalog.find_board(&piece.material_id) {
        Some(board) => board.thickness,
        None => {
            diagnostics.push(Diagnostic::missing_reference(
                subject.clone(),
                format!("material '{}' not found in catalog", piece.material_id),
            ));
            params.get("ESPESOR").copied().unwrap_or(0.0)
        }
    };

    ResolvedPiece {
        id: subject,
        name: piece.name.clone(),
        material_id: piece.material_id.clone(),
        thickness,
        length,
        width,
        qty,
        edge_band_id: piece.edge_band_id.clone(),
        edges: piece.edges,
        notes: piece.notes.clone(),
        source: template.name.clone(),
    }
}

fn eval_or_diag(
    formula: &str,
    params: &BTreeMap<String, f64>,
    subject: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> f64 {
    match expr::eval_expr(formula, params) {
        Ok(value) => value,
        Err(err) => {
            diagnostics.push(Diagnostic::expression(
                subject,
                format!("'{}': {}", formula, err),
            ));
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Board, Catalog, EdgeFlags, ManualPiece, SheetSize,
    };
    use pretty_assertions::assert_eq;

    fn test_board() -> Board {
        Board {
            id: "board-1".into(),
            name: "Melamine 18".into(),
            sizes: vec![SheetSize::new(2750.0, 1830.0)],
            thickness: 18.0,
            cost: 45.0,
            waste_pct: 8.0,
        }
    }

    fn test_template() -> Template {
        Template {
            id: "tpl-1".into(),
            name: "Base unit".into(),
            params: BTreeMap::from([
                ("ANCHO".to_string(), 600.0),
                ("ALTO".to_string(), 720.0),
                ("PROF".to_string(), 560.0),
                ("ESPESOR".to_string(), 18.0),
            ]),
            pieces: vec![
                TemplatePiece {
                    id: "p1".into(),
                    name: "Lateral".into(),
                    material_id: "board-1".into(),
                    expr_length: "ALTO".into(),
                    expr_width: "PROF".into(),
                    expr_qty: "2".into(),
                    edge_band_id: None,
                    edges: EdgeFlags::none(),
                    notes: String::new(),
                },
                TemplatePiece {
                    id: "p2".into(),
                    name: "Base".into(),
                    material_id: "board-1".into(),
                    expr_length: "ANCHO - 2*ESPESOR".into(),
                    expr_width: "PROF".into(),
                    expr_qty: "1".into(),
                    edge_band_id: None,
                    edges: EdgeFlags::none(),
                    notes: String::new(),
                },
            ],
            accessory_rules: vec![],
        }
    }

    fn test_data() -> ProjectData {
        ProjectData {
            catalog: Catalog {
                boards: vec![test_board()],
                ..Default::default()
            },
            templates: vec![test_template()],
            settings: Default::default(),
        }
    }

    fn template_item(qty: u32, params: BTreeMap<String, f64>) -> ProjectItem {
        ProjectItem::Template {
            id: "item-1".into(),
            template_id: "tpl-1".into(),
            params,
            qty,
        }
    }

    // ==================== template items ====================

    #[test]
    fn test_resolve_multiplies_instance_qty() {
        let project = Project {
            id: "proj".into(),
            name: "Kitchen".into(),
            items: vec![template_item(3, BTreeMap::new())],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &test_data());

        assert_eq!(resolution.module_count, 3);
        assert_eq!(resolution.pieces.len(), 2);
        // qtyExpr "2" times instance qty 3
        assert_eq!(resolution.pieces[0].qty, 6.0);
        assert_eq!(resolution.pieces[1].qty, 3.0);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_resolve_evaluates_dimensions() {
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![template_item(1, BTreeMap::new())],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &test_data());

        let lateral = &resolution.pieces[0];
        assert_eq!(lateral.length, 720.0);
        assert_eq!(lateral.width, 560.0);
        let base = &resolution.pieces[1];
        assert_eq!(base.length, 564.0); // 600 - 2*18
        assert_eq!(base.source, "Base unit");
        assert_eq!(base.id, "item-1-p2");
        assert_eq!(base.thickness, 18.0);
    }

    #[test]
    fn test_resolve_override_wins() {
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![template_item(
                1,
                BTreeMap::from([("ANCHO".to_string(), 800.0)]),
            )],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &test_data());
        assert_eq!(resolution.pieces[1].length, 764.0); // 800 - 2*18
    }

    #[test]
    fn test_resolve_keeps_negative_quantities() {
        let mut data = test_data();
        data.templates[0].pieces[1].expr_qty = "1 - 2".into();
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![template_item(2, BTreeMap::new())],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &data);

        // No clamp: -1 per module times 2 instances, left for validation.
        assert_eq!(resolution.pieces.len(), 2);
        assert_eq!(resolution.pieces[1].qty, -2.0);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_resolve_missing_template_is_soft() {
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![ProjectItem::Template {
                id: "item-x".into(),
                template_id: "tpl-missing".into(),
                params: BTreeMap::new(),
                qty: 2,
            }],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &test_data());
        assert!(resolution.pieces.is_empty());
        assert_eq!(resolution.module_count, 0);
        assert_eq!(resolution.diagnostics.len(), 1);
        assert!(resolution.diagnostics[0]
            .message
            .contains("template 'tpl-missing' not found"));
    }

    #[test]
    fn test_resolve_broken_expression_keeps_piece() {
        let mut data = test_data();
        data.templates[0].pieces[0].expr_length = "ALTO +".into();
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![template_item(1, BTreeMap::new())],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &data);

        // Piece is kept with a zero length and a diagnostic.
        assert_eq!(resolution.pieces.len(), 2);
        assert_eq!(resolution.pieces[0].length, 0.0);
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].subject, "item-1-p1");
    }

    #[test]
    fn test_resolve_thickness_fallback_when_material_missing() {
        let mut data = test_data();
        data.catalog.boards.clear();
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![template_item(1, BTreeMap::new())],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &data);

        // Falls back to the ESPESOR parameter.
        assert_eq!(resolution.pieces[0].thickness, 18.0);
        assert!(resolution
            .diagnostics
            .iter()
            .any(|d| d.message.contains("material 'board-1' not found")));
    }

    // ==================== manual items ====================

    #[test]
    fn test_resolve_manual_piece_passthrough() {
        let piece = ManualPiece {
            id: "p-custom".into(),
            name: "Back".into(),
            material_id: "board-1".into(),
            thickness: 3.0,
            length: 764.0,
            width: 564.0,
            qty: 1.0,
            edge_band_id: None,
            edges: EdgeFlags::none(),
            notes: "fondo".into(),
        };
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![ProjectItem::Piece {
                id: "item-2".into(),
                piece: piece.clone(),
            }],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &test_data());

        assert_eq!(resolution.module_count, 0);
        let resolved = &resolution.pieces[0];
        assert_eq!(resolved.source, "Manual");
        assert_eq!(resolved.id, "p-custom");
        assert_eq!(resolved.thickness, 3.0);
        assert_eq!(resolved.notes, "fondo");
    }

    #[test]
    fn test_resolve_preserves_item_order() {
        let manual = ProjectItem::Piece {
            id: "item-0".into(),
            piece: ManualPiece {
                id: "m1".into(),
                name: "First".into(),
                material_id: "board-1".into(),
                thickness: 18.0,
                length: 100.0,
                width: 100.0,
                qty: 1.0,
                edge_band_id: None,
                edges: EdgeFlags::none(),
                notes: String::new(),
            },
        };
        let project = Project {
            id: "proj".into(),
            name: String::new(),
            items: vec![manual, template_item(1, BTreeMap::new())],
            manual_accessories: vec![],
        };
        let resolution = resolve_pieces(&project, &test_data());
        let names: Vec<&str> = resolution.pieces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Lateral", "Base"]);
    }
}
