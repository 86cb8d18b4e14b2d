//! Logging setup for applications embedding the search core

use crate::config::GeneralSettings;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise debug mode logs at `debug` and
/// everything else uses `log_level`. Fails if a subscriber is already set.
pub fn init(settings: &GeneralSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(settings));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn default_filter(settings: &GeneralSettings) -> EnvFilter {
    let level = if settings.debug {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}
