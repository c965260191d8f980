//! File logging. The terminal belongs to the UI, so logs never go to stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `PHOSPHOR_LOG=debug`.
pub const LOG_ENV: &str = "PHOSPHOR_LOG";

const LOG_FILE: &str = "phosphor.log";

/// Install the global subscriber.
///
/// Logging stays off unless `PHOSPHOR_LOG` is set or a log file was given.
pub fn init(log_file: Option<&Path>) -> color_eyre::Result<()> {
    let filter = match (EnvFilter::try_from_env(LOG_ENV), log_file) {
        (Ok(filter), _) => filter,
        (Err(_), Some(_)) => EnvFilter::new("info"),
        (Err(_), None) => return Ok(()),
    };

    let path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(path = %path.display(), "phosphor v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn default_log_path() -> PathBuf {
    ProjectDirs::from("", "", "phosphor")
        .map(|dirs| dirs.data_local_dir().join(LOG_FILE))
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE))
}
