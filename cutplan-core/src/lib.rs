//! cutplan-core - Core library for parametric cut-list computation.
//!
//! This library turns a parametric description of furniture modules (and
//! manually entered pieces) into a priced, physically realizable cutting
//! plan: a flat piece list, a per-sheet shelf nesting, and aggregated
//! material and labor costs.
//!
//! The core is single-threaded, synchronous and side-effect-free: a
//! summary build is a pure function of (project, catalog, settings,
//! options) and is safe to recompute on every interaction. Per-piece
//! problems accumulate as diagnostics instead of aborting the build.
//!
//! # Example
//!
//! ```no_run
//! use cutplan_core::{build_summary, Project, ProjectData, SummaryOptions};
//!
//! let data: ProjectData = serde_json::from_str("{}").unwrap();
//! let project = Project::default();
//! let summary = build_summary(&project, &data, &SummaryOptions::default()).unwrap();
//! println!("total: {}", summary.costs.total);
//! ```

pub mod aggregate;
pub mod config;
pub mod costs;
pub mod error;
pub mod expr;
pub mod model;
pub mod nesting;
pub mod resolve;
pub mod summary;
pub mod validation;

// Re-exports for convenience
pub use aggregate::{AccessoryDetail, AccessoryTotal, AccessoryTotals, EdgeBandTotal};
pub use config::{LaborMode, Settings};
pub use costs::{CostBreakdown, LaborCost};
pub use error::{Diagnostic, DiagnosticKind, Result, SummaryError};
pub use expr::{eval_expr, eval_expr_or_zero, EvalError};
pub use model::{
    Accessory, AccessoryRule, Board, Catalog, EdgeBand, EdgeFlags, ManualAccessory, ManualPiece,
    Project, ProjectData, ProjectItem, ResolvedPiece, SheetSize, Template, TemplatePiece,
};
pub use nesting::{nest_pieces, NestResult, Placement, SheetLayout, UnplacedGroup};
pub use resolve::{resolve_pieces, Resolution};
pub use summary::{build_summary, MaterialNesting, Summary, SummaryOptions};
pub use validation::{validate_pieces, validate_project, validate_template, ValidationResult};
