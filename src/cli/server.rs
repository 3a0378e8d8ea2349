use actix_web::{web, HttpServer};
use chatbook::{config::Server as Config, http::controllers, App};
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

#[derive(Debug, Error)]
#[error("Could not start the server")]
pub struct StartServerError;

/// Expose the ChatBook API HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
  #[clap(long)]
  pub address: Option<IpAddr>,
  #[clap(long)]
  pub port: Option<u16>,
  #[clap(long)]
  pub workers: Option<NonZeroUsize>,
  /// Keep every record in memory instead of connecting to a database.
  #[clap(long)]
  pub in_memory: bool,
  /// Do not apply pending database migrations on startup.
  #[clap(long)]
  pub skip_migrations: bool,
}

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
  let mut config = Config::load().change_context(StartServerError)?;
  args.override_config(&mut config);

  chatbook::logging::init(&config.logging).change_context(StartServerError)?;
  tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .worker_threads(config.workers)
    .build()
    .change_context(StartServerError)
    .attach_printable("could not build tokio runtime")?
    .block_on(serve(config, args))
}

async fn serve(config: Config, args: ServerCommand) -> Result<(), StartServerError> {
  let app = if args.in_memory {
    tracing::warn!("using the in-memory store, nothing will be persisted");
    App::in_memory(config)
  } else {
    App::new(config, !args.skip_migrations)
      .await
      .change_context(StartServerError)?
  };

  let addr = (app.config.ip, app.config.port);
  let workers = app.config.workers;
  let data = web::Data::new(app);

  tracing::info!("listening on {}:{}", addr.0, addr.1);
  HttpServer::new(move || {
    actix_web::App::new()
      .wrap(TracingLogger::default())
      .app_data(data.clone())
      .configure(controllers::configure)
  })
  .workers(workers)
  .bind(addr)
  .change_context(StartServerError)
  .attach_printable_lazy(|| format!("could not bind to {}:{}", addr.0, addr.1))?
  .run()
  .await
  .change_context(StartServerError)
}

impl ServerCommand {
  fn override_config(&self, config: &mut Config) {
    // override server configurations if set by the cli
    if let Some(address) = self.address {
      config.ip = address;
    }

    if let Some(port) = self.port {
      config.port = port;
    }

    if let Some(workers) = self.workers {
      config.workers = workers.get();
    }
  }
}
