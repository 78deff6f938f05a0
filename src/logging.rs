use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

/// Environment variable that overrides the log filter, e.g. `DISK_BOUNCE_LOG=debug`
pub const LOG_ENV_VAR: &str = "DISK_BOUNCE_LOG";

/// Send tracing output to a file. The terminal belongs to the UI so nothing is printed.
pub fn setup_logging(path: &Path, level: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let filters = if std::env::var(LOG_ENV_VAR).is_ok() {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .with_env_var(LOG_ENV_VAR)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("off,disk_bounce={}", level.to_lowercase()))?
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).try_init()?;
    Ok(())
}
