//! Colors and phosphor presets.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Error returned when a `#rrggbb` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct RgbParseError(pub String);

/// A 24-bit color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const TERMINAL_GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1).
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Shift every channel by `delta`, saturating at 0 and 255.
    pub fn offset(self, delta: i16) -> Rgb {
        let shift = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
        Rgb::new(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Largest per-channel difference between two colors.
    pub fn distance(self, other: Rgb) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RgbParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = RgbParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Color::Rgb(value.r, value.g, value.b)
    }
}

/// Classic monochrome monitor phosphors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phosphor {
    #[default]
    Green,
    Amber,
    Cyan,
    White,
}

impl Phosphor {
    pub const ALL: [Phosphor; 4] = [
        Phosphor::Green,
        Phosphor::Amber,
        Phosphor::Cyan,
        Phosphor::White,
    ];

    /// The preset whose accent is exactly `rgb`, if any.
    pub fn matching(rgb: Rgb) -> Option<Self> {
        Self::ALL.into_iter().find(|phosphor| phosphor.rgb() == rgb)
    }

    /// Cycle to the next phosphor.
    pub fn next(self) -> Self {
        match self {
            Phosphor::Green => Phosphor::Amber,
            Phosphor::Amber => Phosphor::Cyan,
            Phosphor::Cyan => Phosphor::White,
            Phosphor::White => Phosphor::Green,
        }
    }

    /// Accent color emitted by this phosphor.
    pub fn rgb(self) -> Rgb {
        match self {
            Phosphor::Green => Rgb::TERMINAL_GREEN,
            Phosphor::Amber => Rgb::new(255, 176, 0),
            Phosphor::Cyan => Rgb::new(0, 255, 255),
            Phosphor::White => Rgb::new(230, 230, 230),
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Phosphor::Green => "green",
            Phosphor::Amber => "amber",
            Phosphor::Cyan => "cyan",
            Phosphor::White => "white",
        }
    }
}
