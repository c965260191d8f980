//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use phosphor_config::{Config, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "phosphor", version, about = "Text that scatters toward your mouse on a green CRT")]
pub struct Cli {
    /// Text to animate. Overrides the config file.
    pub text: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start with the scanline overlay on.
    #[arg(long)]
    pub scanlines: bool,

    /// Start with the noise overlay on.
    #[arg(long)]
    pub noise: bool,

    /// Frame ticks per second.
    #[arg(long, value_name = "N")]
    pub fps: Option<u32>,

    /// Write logs here. Logging is also enabled by setting PHOSPHOR_LOG.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Load the config file and apply command line overrides on top.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(text) = &self.text {
            config.text = text.clone();
        }
        if self.scanlines {
            config.effects.scanlines = true;
        }
        if self.noise {
            config.effects.noise = true;
        }
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
    }
}
