//! Configuration for the phosphor display.
//!
//! Settings are read from `config.toml` in the platform configuration
//! directory (for example `~/.config/phosphor/config.toml` on Linux). Every
//! field is optional; a missing file yields the defaults.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use phosphor_core::{CellMetrics, Integrator, Rgb};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Text shown when none is given on the command line or in the config file.
pub const DEFAULT_TEXT: &str = "$ UNIX System V Release 4.0";

const CONFIG_FILE: &str = "config.toml";

/// Top level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Text to animate.
    pub text: String,
    pub style: StyleConfig,
    pub physics: PhysicsConfig,
    pub effects: EffectsConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            style: StyleConfig::default(),
            physics: PhysicsConfig::default(),
            effects: EffectsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Colors and font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub accent_color: Rgb,
    pub background_color: Rgb,
    /// Preferred font family. A terminal draws with its own font, so this is
    /// informational there.
    pub font_family: String,
    /// Font size in virtual pixels; sets the cell size of the simulation space.
    pub font_size_px: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            accent_color: Rgb::TERMINAL_GREEN,
            background_color: Rgb::BLACK,
            font_family: "IBM Plex Mono".to_string(),
            font_size_px: 24.0,
        }
    }
}

impl StyleConfig {
    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics::from_font_size(self.font_size_px)
    }
}

/// Force law and integration constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Pointer attraction is zero at or beyond this distance.
    pub attraction_radius: f32,
    /// Numerator of the inverse-square attraction.
    pub attraction_strength: f32,
    /// Added to the squared distance so the attraction stays finite at zero.
    pub softening: f32,
    /// Hooke constant pulling particles back to their origin.
    pub spring_constant: f32,
    /// Velocity multiplier applied every step.
    pub damping: f32,
    /// Particles closer than this to the pointer fade out.
    pub fade_radius: f32,
    /// Opacity of a particle sitting on the pointer.
    pub min_opacity: f32,
    /// Simulated time per frame.
    pub timestep: f32,
    pub integrator: Integrator,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            attraction_radius: 200.0,
            attraction_strength: 100.0,
            softening: 1.0,
            spring_constant: 0.05,
            damping: 0.97,
            fade_radius: 100.0,
            min_opacity: 0.3,
            timestep: 0.16,
            integrator: Integrator::VelocityVerlet,
        }
    }
}

/// Post-processing and drawing effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    pub scanlines: bool,
    /// Every n-th row is a scanline.
    pub scanline_spacing: u16,
    /// How far a scanline row is darkened toward black.
    pub scanline_alpha: f32,
    pub noise: bool,
    /// Maximum brightness jitter per cell, in channel steps.
    pub noise_amplitude: u8,
    /// Fraction of the way each frame fades toward the background.
    pub trail_fade: f32,
    pub glow: bool,
    pub glow_alpha: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            scanlines: false,
            scanline_spacing: 2,
            scanline_alpha: 0.25,
            noise: false,
            noise_amplitude: 12,
            trail_fade: 0.1,
            glow: true,
            glow_alpha: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Frame ticks per second.
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "phosphor").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => {
                    tracing::debug!("no config directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|err| err.at(&path))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(ConfigError::parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let style = &self.style;
        let physics = &self.physics;
        let effects = &self.effects;

        positive("style.font_size_px", style.font_size_px)?;
        positive("physics.attraction_radius", physics.attraction_radius)?;
        positive("physics.softening", physics.softening)?;
        positive("physics.fade_radius", physics.fade_radius)?;
        positive("physics.timestep", physics.timestep)?;
        non_negative("physics.attraction_strength", physics.attraction_strength)?;
        non_negative("physics.spring_constant", physics.spring_constant)?;
        unit_interval("physics.min_opacity", physics.min_opacity)?;
        unit_interval("effects.scanline_alpha", effects.scanline_alpha)?;
        unit_interval("effects.trail_fade", effects.trail_fade)?;
        unit_interval("effects.glow_alpha", effects.glow_alpha)?;

        if !(physics.damping > 0.0 && physics.damping < 1.0) {
            return Err(ConfigError::invalid(
                "physics.damping",
                format!("must be strictly between 0 and 1, got {}", physics.damping),
            ));
        }
        if effects.scanline_spacing == 0 {
            return Err(ConfigError::invalid(
                "effects.scanline_spacing",
                "must be at least 1",
            ));
        }
        if self.display.fps == 0 {
            return Err(ConfigError::invalid("display.fps", "must be at least 1"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must not be negative, got {value}")))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be within [0, 1], got {value}")))
    }
}
