//! Process glue for the `sigcli-demo` binary: config loading, logging setup
//! and output rendering around a decorated sample package tree.

pub mod config;
pub mod demo;

pub use config::{Config, ConfigError, OutputFormat};
pub use sigcli_sdk::Error;

use sigcli_sdk::{Cli, Result, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))
    });

    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Decorate the demo package with the builder defaults overridden by `config`.
pub fn build_cli(config: &Config) -> Result<Cli> {
    let registry = demo::registry()?;
    debug!(modules = registry.len(), output = ?config.output, "loaded demo registry");
    config
        .apply(demo::builder())
        .decorate(registry, demo::PROGRAM, demo::ENTRYPOINT)
}

/// Render an entrypoint result for stdout. `None` results print nothing.
pub fn render_output(value: &Value, format: OutputFormat) -> serde_json::Result<Option<String>> {
    if value.is_none() {
        return Ok(None);
    }
    match format {
        OutputFormat::Plain => Ok(Some(value.to_string())),
        OutputFormat::Json => serde_json::to_string_pretty(value).map(Some),
    }
}
