//! Particle field state and lifecycle.

use phosphor_config::{Config, EffectsConfig, PhysicsConfig};
use phosphor_core::{Rgb, Vec2, Viewport};
use ratatui::{Frame, widgets::Paragraph};

use crate::{canvas::Canvas, effects::PostEffects, layout, particle::Particle, physics};

/// Where the animator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Laid out, loop not started yet.
    Mounted,
    /// Frames advance the simulation.
    Running,
    /// Frames are ignored; the last image stays on screen.
    Stopped,
}

/// Owns the particles, the pointer target and the drawing canvas.
#[derive(Debug)]
pub struct FieldAnimator {
    text: String,
    particles: Vec<Particle>,
    /// Last known pointer position in virtual pixels.
    pointer: Vec2,
    viewport: Viewport,
    canvas: Canvas,
    physics: PhysicsConfig,
    effects: PostEffects,
    accent: Rgb,
    glow: bool,
    glow_alpha: f32,
    trail_fade: f32,
    lifecycle: Lifecycle,
    /// Frames drawn since mount; seeds the noise pass.
    frame_count: u64,
}

impl FieldAnimator {
    /// Lay `text` out in `viewport`.
    ///
    /// Returns `None` when there is nothing to draw on (a zero sized
    /// viewport); the caller should then skip the animation entirely.
    pub fn mount(text: impl Into<String>, config: &Config, viewport: Viewport) -> Option<Self> {
        if viewport.is_empty() {
            tracing::warn!(
                columns = viewport.columns,
                rows = viewport.rows,
                "no drawable area, not mounting"
            );
            return None;
        }

        let text = text.into();
        let particles = layout::seed(&text, &viewport);
        tracing::debug!(
            particles = particles.len(),
            columns = viewport.columns,
            rows = viewport.rows,
            integrator = config.physics.integrator.name(),
            "mounted particle field"
        );

        let EffectsConfig {
            glow,
            glow_alpha,
            trail_fade,
            ..
        } = config.effects;

        Some(Self {
            text,
            particles,
            pointer: Vec2::ZERO,
            viewport,
            canvas: Canvas::new(
                viewport.columns,
                viewport.rows,
                config.style.background_color,
            ),
            physics: config.physics,
            effects: PostEffects::new(&config.effects),
            accent: config.style.accent_color,
            glow,
            glow_alpha,
            trail_fade,
            lifecycle: Lifecycle::Mounted,
            frame_count: 0,
        })
    }

    /// Begin (or resume) advancing on every frame.
    pub fn start(&mut self) {
        self.lifecycle = Lifecycle::Running;
    }

    /// Stop advancing. The particles keep their state.
    pub fn stop(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn effects(&self) -> &PostEffects {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut PostEffects {
        &mut self.effects
    }

    pub fn accent(&self) -> Rgb {
        self.accent
    }

    pub fn set_accent(&mut self, accent: Rgb) {
        self.accent = accent;
    }

    pub fn toggle_glow(&mut self) {
        self.glow = !self.glow;
    }

    /// Viewport changed: lay out again from scratch and drop the old image.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.viewport = Viewport::new(columns, rows, self.viewport.metrics);
        self.canvas = Canvas::new(columns, rows, self.canvas.background());
        self.reseed();
        tracing::debug!(columns, rows, "resized particle field");
    }

    /// Put every particle back at rest on its origin.
    ///
    /// While not running, the new layout is drawn at once.
    pub fn reseed(&mut self) {
        self.particles = layout::seed(&self.text, &self.viewport);
        if !self.is_running() {
            self.canvas.clear();
            self.draw();
        }
    }

    /// Move the attraction target. Takes effect on the next step.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Move the attraction target to the center of a terminal cell.
    pub fn pointer_moved_to_cell(&mut self, column: u16, row: u16) {
        self.pointer_moved(self.viewport.metrics.cell_center(column, row));
    }

    /// Advance every particle by `dt`, regardless of lifecycle.
    pub fn step(&mut self, dt: f32) {
        let pointer = self.pointer;
        for particle in &mut self.particles {
            physics::step(particle, pointer, dt, &self.physics);
        }
    }

    /// One frame tick: step by the configured timestep and draw.
    ///
    /// Does nothing unless running. Returns whether the frame advanced.
    pub fn frame(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.step(self.physics.timestep);
        self.draw();
        self.frame_count = self.frame_count.wrapping_add(1);
        true
    }

    /// Fade the previous image and draw the particles at their current state.
    pub fn draw(&mut self) {
        self.canvas.fade(self.trail_fade);
        let background = self.canvas.background();
        let metrics = self.viewport.metrics;

        for particle in &self.particles {
            if particle.glyph().is_whitespace() {
                continue;
            }
            let Some((x, y)) = metrics.cell_at(particle.position) else {
                continue;
            };
            let fg = background.lerp(self.accent, particle.opacity);
            let bg = if self.glow {
                background.lerp(self.accent, self.glow_alpha * particle.opacity)
            } else {
                background
            };
            self.canvas.plot(x, y, particle.glyph(), fg, bg);
        }
    }

    /// The canvas with post-effects applied. The canvas itself is unchanged.
    pub fn composite(&self) -> Canvas {
        let mut image = self.canvas.clone();
        self.effects.apply(&mut image, self.frame_count);
        image
    }

    /// Render the current image to the frame.
    pub fn render(&self, frame: &mut Frame) {
        let lines = if self.effects.is_active() {
            self.composite().to_lines()
        } else {
            self.canvas.to_lines()
        };
        frame.render_widget(Paragraph::new(lines), frame.area());
    }
}
