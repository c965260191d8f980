//! A single animated glyph.

use phosphor_core::Vec2;

/// One character of the animated text.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position in virtual pixels.
    pub position: Vec2,
    /// Current velocity in virtual pixels per unit time.
    pub velocity: Vec2,
    /// Drawing opacity in `[0, 1]`.
    pub opacity: f32,
    glyph: char,
    origin: Vec2,
}

impl Particle {
    /// A particle resting at `origin` with zero velocity.
    pub fn at_rest(glyph: char, origin: Vec2) -> Self {
        Self {
            position: origin,
            velocity: Vec2::ZERO,
            opacity: 1.0,
            glyph,
            origin,
        }
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    /// Rest position the spring pulls toward. Fixed for the particle's lifetime.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Distance from the rest position.
    pub fn displacement(&self) -> f32 {
        (self.position - self.origin).length()
    }
}
