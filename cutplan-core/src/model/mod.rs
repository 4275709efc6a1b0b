//! Data model: catalog entries, templates, projects and resolved pieces.

mod catalog;
mod piece;
mod project;
mod template;

pub use catalog::{Accessory, Board, Catalog, EdgeBand, SheetSize};
pub use piece::ResolvedPiece;
pub use project::{ManualAccessory, ManualPiece, Project, ProjectItem};
pub use template::{AccessoryRule, EdgeFlags, Template, TemplatePiece};

use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Immutable data snapshot for a summary build.
///
/// The core is a pure function of this snapshot plus the project and
/// per-call options; there is no module-level state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectData {
    /// Material catalog.
    #[serde(default)]
    pub catalog: Catalog,
    /// Template definitions available to project items.
    #[serde(default)]
    pub templates: Vec<Template>,
    /// Cutting and pricing settings.
    #[serde(default)]
    pub settings: Settings,
}

impl ProjectData {
    /// Look up a template by id.
    pub fn find_template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }
}
