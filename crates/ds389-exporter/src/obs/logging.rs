use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogSection;

/// Install the global subscriber. `RUST_LOG` wins over the config toggle.
pub fn init(cfg: &LogSection) {
    let default_level = if cfg.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if cfg.json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
