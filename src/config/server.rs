use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::{Validate, ValidateError};

use super::ParseError;
use crate::util::{
  figment::FigmentErrorAttachable, validator::IntoValidatorReport, Sensitive,
};

#[derive(Debug, Deserialize)]
pub struct Server {
  /// **Environment variables**:
  /// - `CHATBOOK_IP`
  #[serde(default = "Server::default_ip")]
  pub ip: IpAddr,
  /// **Environment variables**:
  /// - `CHATBOOK_PORT` or `PORT`
  #[serde(default = "Server::default_port")]
  pub port: u16,
  /// Amount of worker threads serving HTTP requests.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_WORKERS`
  #[serde(default = "Server::default_workers")]
  pub workers: usize,
  /// Secret used to sign and verify bearer tokens.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_JWT_SECRET` or `JWT_SECRET`
  pub jwt_secret: Sensitive<String>,
  /// Lifetime of an issued token.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_JWT_EXPIRY_SECS`
  #[serde(default = "Server::default_jwt_expiry_secs")]
  pub jwt_expiry_secs: u64,
  /// Database settings. Only optional when the server runs with
  /// the in-memory store.
  pub db: Option<super::Database>,
  #[serde(default)]
  pub logging: super::Logging,
}

impl Server {
  pub fn load() -> Result<Self, ParseError> {
    dotenvy::dotenv().ok();

    let config = Self::figment()
      .extract::<Self>()
      .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

    config
      .validate()
      .into_validator_report()
      .change_context(ParseError)?;

    Ok(config)
  }
}

impl Server {
  /// Default settings with the given secret and no database.
  #[must_use]
  pub fn new(jwt_secret: impl Into<String>) -> Self {
    Self {
      ip: Self::default_ip(),
      port: Self::default_port(),
      workers: Self::default_workers(),
      jwt_secret: Sensitive::new(jwt_secret.into()),
      jwt_expiry_secs: Self::default_jwt_expiry_secs(),
      db: None,
      logging: super::Logging::default(),
    }
  }
}

impl Validate for Server {
  fn validate(&self) -> std::result::Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !validator::extras::validate_length(&self.jwt_secret, Some(12), Some(1024), None) {
      fields.insert_msg("jwt_secret", "Invalid JWT secret key");
    }
    if self.workers == 0 {
      fields.insert_msg("workers", "There must be at least one worker");
    }
    if let Err(error) = self.db.validate() {
      fields.insert("db", error);
    }
    fields.build().into_result()
  }
}

impl Server {
  const DEFAULT_CONFIG_FILE: &'static str = "chatbook.toml";
  const DEFAULT_PORT: u16 = 5000;
  const DEFAULT_JWT_EXPIRY_SECS: u64 = 360_000;

  fn default_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
  }

  fn default_port() -> u16 {
    Self::DEFAULT_PORT
  }

  fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
  }

  fn default_jwt_expiry_secs() -> u64 {
    Self::DEFAULT_JWT_EXPIRY_SECS
  }

  /// Creates a default [`Figment`] object to load server
  /// configuration. Exposed to the crate for testing.
  ///
  /// [`Figment`]: figment::Figment
  pub(crate) fn figment() -> figment::Figment {
    use figment::{
      providers::{Env, Format, Toml},
      Figment,
    };

    Figment::new()
      .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
      // The env provider splits on `.` only, so fields with an
      // underscore in their name need explicit mappings.
      .merge(Env::prefixed("CHATBOOK_").map(|v| {
        match v.as_str().to_ascii_uppercase().as_str() {
          "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
          "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

          "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
          "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

          "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
          "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),

          "JWT_SECRET" => "jwt_secret".into(),
          "JWT_EXPIRY_SECS" => "jwt_expiry_secs".into(),

          _ => v.as_str().replace('_', ".").into(),
        }
      }))
      // Environment variable aliases
      .merge(
        Env::raw()
          .only(&["DATABASE_URL", "PORT", "JWT_SECRET"])
          .map(|v| match v.as_str().to_ascii_uppercase().as_str() {
            "DATABASE_URL" => "db.primary.url".into(),
            "JWT_SECRET" => "jwt_secret".into(),
            _ => v.into(),
          }),
      )
  }
}
