use color_eyre::Report;
use tracing::Level;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level; `RUST_LOG` directives still apply on top
    pub level: Level,
    /// Whether to print module paths with each event
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Level::INFO, with_target: false }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = var("CELLCON_LOG_LEVEL")
            && let Ok(parsed_level) = level.parse::<Level>()
        {
            config.level = parsed_level;
        }

        if var("CELLCON_LOG_TARGETS").is_some() {
            config.with_target = true;
        }

        config
    }
}

/// Initialize console logging with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<(), Report> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_target(config.with_target)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()?;

    Ok(())
}
