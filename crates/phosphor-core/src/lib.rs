//! Core types shared by the phosphor crates.

mod color;
mod geometry;

use serde::{Deserialize, Serialize};

pub use color::{Phosphor, Rgb, RgbParseError};
pub use geometry::{CellMetrics, GLYPH_ADVANCE_RATIO, Vec2, Viewport};

/// Scheme used to advance particle positions from their velocities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Integrator {
    /// Move by the average of the old and new velocity.
    #[default]
    VelocityVerlet,
    /// Move by the new velocity only.
    Euler,
}

impl Integrator {
    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Integrator::VelocityVerlet => "velocity-verlet",
            Integrator::Euler => "euler",
        }
    }
}
