use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{self, LoggingStyle};

#[derive(Debug, Error)]
#[error("Could not initialize logging")]
pub struct InitError;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured filter directives when set.
pub fn init(cfg: &config::Logging) -> Result<(), InitError> {
  let filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(..) => EnvFilter::try_new(&cfg.filter)
      .change_context(InitError)
      .attach_printable_lazy(|| format!("invalid filter directives {:?}", cfg.filter))?,
  };

  let fmt = tracing_subscriber::fmt::layer().with_target(true);
  let fmt = match cfg.style {
    LoggingStyle::Compact => fmt.compact().boxed(),
    LoggingStyle::Pretty => fmt.pretty().boxed(),
    LoggingStyle::Json => fmt.json().boxed(),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt)
    .with(tracing_error::ErrorLayer::default())
    .try_init()
    .change_context(InitError)
}

/// Logging setup for tests. Safe to call more than once.
pub fn init_for_tests() {
  tracing_subscriber::registry()
    .with(EnvFilter::new("warn,chatbook=debug"))
    .with(tracing_subscriber::fmt::layer().with_test_writer())
    .with(tracing_error::ErrorLayer::default())
    .try_init()
    .ok();
}
