//! Tracing setup. Events go to a log file so the terminal UI stays intact.

use crate::config::TuiConfig;
use crate::error::TuiError;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "pragrisk_tui=info,warn";

/// `RUST_LOG` wins over the configured filter.
pub fn env_filter(config: &TuiConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = config.log_filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

pub fn init(config: &TuiConfig) -> Result<(), TuiError> {
    if let Some(parent) = config.error_log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.error_log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        log_path = %config.error_log_path.display(),
        "Logging initialized"
    );
    Ok(())
}
