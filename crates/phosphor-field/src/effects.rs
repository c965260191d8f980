//! CRT post-processing passes over a rendered canvas.

use phosphor_config::EffectsConfig;
use phosphor_core::Rgb;

use crate::canvas::Canvas;

/// Independently toggleable scanline and noise passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostEffects {
    pub scanlines: bool,
    pub noise: bool,
    scanline_spacing: u16,
    scanline_alpha: f32,
    noise_amplitude: u8,
}

impl PostEffects {
    pub fn new(config: &EffectsConfig) -> Self {
        Self {
            scanlines: config.scanlines,
            noise: config.noise,
            scanline_spacing: config.scanline_spacing.max(1),
            scanline_alpha: config.scanline_alpha,
            noise_amplitude: config.noise_amplitude,
        }
    }

    pub fn is_active(&self) -> bool {
        self.scanlines || self.noise
    }

    /// Run the enabled passes over `canvas`. Noise is seeded by `frame`, so
    /// the same frame always gets the same grain.
    pub fn apply(&self, canvas: &mut Canvas, frame: u64) {
        if self.scanlines {
            scanlines(canvas, self.scanline_spacing, self.scanline_alpha);
        }
        if self.noise {
            noise(canvas, self.noise_amplitude, frame);
        }
    }
}

/// Darken every `spacing`-th row toward black by `alpha`.
fn scanlines(canvas: &mut Canvas, spacing: u16, alpha: f32) {
    for (_, y, cell) in canvas.cells_mut() {
        if (y + 1) % spacing == 0 {
            cell.fg = cell.fg.lerp(Rgb::BLACK, alpha);
            cell.bg = cell.bg.lerp(Rgb::BLACK, alpha);
        }
    }
}

/// Jitter the brightness of every cell by up to `amplitude` channel steps.
fn noise(canvas: &mut Canvas, amplitude: u8, seed: u64) {
    if amplitude == 0 {
        return;
    }
    let mut rng = fastrand::Rng::with_seed(seed);
    let amplitude = amplitude as i16;
    for (_, _, cell) in canvas.cells_mut() {
        let grain = rng.i16(-amplitude..=amplitude);
        cell.bg = cell.bg.offset(grain);
        if !cell.is_blank() {
            cell.fg = cell.fg.offset(grain);
        }
    }
}
