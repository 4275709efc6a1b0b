//! Error types and soft diagnostics for summary builds.
//!
//! Per-piece and per-rule problems never abort a build. They are
//! accumulated as [`Diagnostic`] values so the caller can surface zero,
//! one or many warnings; only structurally impossible calls produce a
//! hard [`SummaryError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard failures: conditions under which a summary cannot be built at all.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("catalog has no boards; cannot build a summary for a non-empty project")]
    EmptyCatalog,
}

/// Result type alias for summary operations.
pub type Result<T> = std::result::Result<T, SummaryError>;

/// Category of a soft diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A dimension or quantity expression failed to evaluate.
    Expression,
    /// A resolved piece has non-positive length, width or quantity.
    InvalidGeometry,
    /// A material, edge band, accessory or template id is absent from
    /// the catalog.
    MissingReference,
}

/// A non-fatal problem found while building a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Problem category.
    pub kind: DiagnosticKind,
    /// Identity of the offending piece, rule or reference.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for a failed expression.
    pub fn expression(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Expression,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Diagnostic for a non-positive dimension or quantity.
    pub fn invalid_geometry(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::InvalidGeometry,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Diagnostic for an unresolved catalog reference.
    pub fn missing_reference(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MissingReference,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}
