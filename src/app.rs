use error_stack::{Report, Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
  config,
  store::{MemoryStore, PgStore, Store},
};

/// State shared by every worker of the HTTP server.
#[derive(Debug, Clone)]
pub struct App {
  pub config: Arc<config::Server>,
  pub store: Arc<dyn Store>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
  /// Connects to the configured database, applying pending
  /// migrations first when `migrate` is set.
  #[tracing::instrument(skip(cfg))]
  pub async fn new(cfg: config::Server, migrate: bool) -> Result<Self, AppError> {
    let Some(db) = cfg.db.as_ref() else {
      return Err(Report::new(AppError).attach_printable("database is not configured"));
    };

    let store = PgStore::connect(db).await.change_context(AppError)?;
    if migrate {
      store.migrate().await.change_context(AppError)?;
      tracing::info!("database migrations applied");
    }
    Ok(Self::with_store(cfg, Arc::new(store)))
  }

  /// Keeps everything in memory. Nothing survives a restart.
  #[must_use]
  pub fn in_memory(cfg: config::Server) -> Self {
    Self::with_store(cfg, Arc::new(MemoryStore::new()))
  }

  #[must_use]
  pub fn with_store(cfg: config::Server, store: Arc<dyn Store>) -> Self {
    Self {
      config: Arc::new(cfg),
      store,
    }
  }
}
