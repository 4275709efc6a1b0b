//! Validation over templates and resolved output.
//!
//! Geometry problems are errors (the plan is not physically realizable);
//! unresolved catalog references are warnings (their contribution is
//! simply omitted from prices).

use std::collections::BTreeMap;

use crate::expr;
use crate::model::{Catalog, Project, ProjectData, ResolvedPiece, Template};
use crate::resolve::resolve_pieces;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate resolved pieces: geometry and catalog references.
pub fn validate_pieces(pieces: &[ResolvedPiece], catalog: &Catalog) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for piece in pieces {
        if piece.length <= 0.0 || piece.width <= 0.0 {
            result.add_error(format!(
                "Piece '{}' ({}): invalid dimensions ({}x{})",
                piece.id, piece.name, piece.length, piece.width
            ));
        }
        if piece.qty <= 0.0 {
            result.add_error(format!(
                "Piece '{}' ({}): quantity {} is not positive",
                piece.id, piece.name, piece.qty
            ));
        }
        if !piece.material_id.is_empty() && catalog.find_board(&piece.material_id).is_none() {
            result.add_warning(format!(
                "Piece '{}': material '{}' not found in catalog",
                piece.id, piece.material_id
            ));
        }
        if let Some(band_id) = &piece.edge_band_id {
            if catalog.find_edgeband(band_id).is_none() {
                result.add_warning(format!(
                    "Piece '{}': edge band '{}' not found in catalog",
                    piece.id, band_id
                ));
            }
        }
    }

    result
}

/// Validate a template against its own default parameters.
///
/// Strict-mode evaluation of every piece and rule expression; this is
/// the save-time check that distinguishes a broken formula from a
/// legitimate zero.
pub fn validate_template(template: &Template, catalog: &Catalog) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let params = template.merged_params(&BTreeMap::new());

    for piece in &template.pieces {
        let exprs = [
            ("length", &piece.expr_length),
            ("width", &piece.expr_width),
            ("quantity", &piece.expr_qty),
        ];
        for (label, formula) in exprs {
            if let Err(err) = expr::eval_expr(formula, &params) {
                result.add_error(format!(
                    "Template '{}', piece '{}': {} expression '{}': {}",
                    template.id, piece.id, label, formula, err
                ));
            }
        }
        if catalog.find_board(&piece.material_id).is_none() {
            result.add_warning(format!(
                "Template '{}', piece '{}': material '{}' not found in catalog",
                template.id, piece.id, piece.material_id
            ));
        }
        if let Some(band_id) = &piece.edge_band_id {
            if catalog.find_edgeband(band_id).is_none() {
                result.add_warning(format!(
                    "Template '{}', piece '{}': edge band '{}' not found in catalog",
                    template.id, piece.id, band_id
                ));
            }
        }
    }

    for rule in &template.accessory_rules {
        if let Err(err) = expr::eval_expr(&rule.expr_qty, &params) {
            result.add_error(format!(
                "Template '{}', rule '{}': quantity expression '{}': {}",
                template.id, rule.id, rule.expr_qty, err
            ));
        }
        if catalog.find_accessory(&rule.accessory_id).is_none() {
            result.add_warning(format!(
                "Template '{}', rule '{}': accessory '{}' not found in catalog",
                template.id, rule.id, rule.accessory_id
            ));
        }
    }

    result
}

/// Validate a whole project: referenced templates, then resolved pieces.
pub fn validate_project(project: &Project, data: &ProjectData) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for template in &data.templates {
        result.merge(validate_template(template, &data.catalog));
    }

    let resolution = resolve_pieces(project, data);
    for diagnostic in &resolution.diagnostics {
        result.add_warning(diagnostic.to_string());
    }
    result.merge(validate_pieces(&resolution.pieces, &data.catalog));

    result
}
