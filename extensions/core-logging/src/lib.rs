use stagehand_core::kernel::error::BoxError;
use stagehand_core::{Container, Extend};

use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a `tracing` subscriber writing to stderr and routes `log`
/// records into it, so the kernel's `log` output shows up.
///
/// Register it at `PRIORITY_HIGH` so everything extended after it can log.
/// Installing a second global subscriber in one process fails the run, like
/// any other extension failure.
#[derive(Debug, Default)]
pub struct LoggingExtension;

impl LoggingExtension {
    pub const NAME: &'static str = "core-logging";
}

impl Extend for LoggingExtension {
    fn extend(&self, _container: &Container) -> Result<(), BoxError> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| -> BoxError { format!("Failed to install tracing subscriber: {}", e).into() })?;
        LogTracer::init().map_err(|e| -> BoxError { format!("Failed to bridge log records: {}", e).into() })?;

        log::info!("Initialized {} v{}", Self::NAME, env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
