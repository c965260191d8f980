//! Pointer-reactive particle text for the phosphor display.
//!
//! Each character of a string becomes a particle sitting at a rest origin.
//! Every frame the particles are pulled toward the pointer by a softened
//! inverse-square attraction, pulled home by a spring and slowed by drag,
//! then drawn into a persistent cell [`Canvas`] that fades toward the
//! background to leave trails. Optional scanline and noise passes run over a
//! copy of the canvas and never touch simulation state.

mod animator;
mod canvas;
mod effects;
pub mod layout;
mod particle;
pub mod physics;

pub use animator::{FieldAnimator, Lifecycle};
pub use canvas::{Canvas, Cell};
pub use effects::PostEffects;
pub use particle::Particle;
