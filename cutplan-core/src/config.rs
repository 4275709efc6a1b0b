//! Configuration constants and pricing settings shared across the pipeline.

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Millimeters per meter (edge banding is summed in mm, priced per meter).
pub const MM_PER_M: f64 = 1000.0;

/// Square millimeters per square meter (labor area mode).
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// Default stock sheet width in mm (standard melamine board).
pub const DEFAULT_SHEET_WIDTH: f64 = 2750.0;

/// Default stock sheet height in mm.
pub const DEFAULT_SHEET_HEIGHT: f64 = 1830.0;

/// Default saw blade kerf in mm.
pub const DEFAULT_KERF: f64 = 3.0;

use serde::{Deserialize, Serialize};

/// How labor is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaborMode {
    /// Per worked square meter of resolved pieces.
    Area,
    /// Per estimated minutes (per piece and per module), charged hourly.
    #[default]
    Time,
}

impl LaborMode {
    /// Parse a labor mode from a settings value.
    ///
    /// Accepts the legacy `"m2"`/`"hour"` spellings alongside
    /// `"area"`/`"time"`.
    pub fn from_mode_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "area" | "m2" => Some(LaborMode::Area),
            "time" | "hour" => Some(LaborMode::Time),
            _ => None,
        }
    }

    /// Unit label for rendering the labor line.
    pub fn unit_label(&self) -> &'static str {
        match self {
            LaborMode::Area => "m2",
            LaborMode::Time => "h",
        }
    }
}

impl std::fmt::Display for LaborMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaborMode::Area => write!(f, "area"),
            LaborMode::Time => write!(f, "time"),
        }
    }
}

/// Global cutting and pricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Saw blade kerf in mm, applied as a gap between adjacent placements.
    pub kerf: f64,
    /// Margin percentage (0-100) applied on the subtotal.
    pub margin_pct: f64,
    /// Labor charging mode.
    pub labor_mode: LaborMode,
    /// Hourly labor rate (time mode).
    pub labor_rate_per_hour: f64,
    /// Labor rate per square meter (area mode).
    pub labor_rate_per_m2: f64,
    /// Estimated minutes of work per piece (time mode).
    pub labor_time_per_piece_min: f64,
    /// Estimated minutes of work per module (time mode).
    pub labor_time_per_module_min: f64,
    /// Whether the packer may rotate pieces 90 degrees.
    pub allow_rotate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kerf: DEFAULT_KERF,
            margin_pct: 20.0,
            labor_mode: LaborMode::Time,
            labor_rate_per_hour: 12.0,
            labor_rate_per_m2: 4.0,
            labor_time_per_piece_min: 6.0,
            labor_time_per_module_min: 20.0,
            allow_rotate: true,
        }
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}
