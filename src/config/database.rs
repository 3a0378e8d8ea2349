use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::{Validate, ValidateError};

use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Database {
  /// Writable primary database.
  pub primary: DbPoolConfig,
  /// A read-only replica database used for reading profiles
  /// without touching the primary database.
  pub replica: Option<DbPoolConfig>,
  /// Forces all database connections are encrypted with TLS
  /// (if possible).
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_DB_ENFORCE_TLS`
  #[serde(default = "Database::default_enforce_tls")]
  pub enforce_tls: bool,
  /// How long the server waits for a database connection to be
  /// acquired before giving up.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_DB_TIMEOUT_SECS`
  #[serde(default = "Database::default_timeout_secs")]
  pub timeout_secs: NonZeroU64,
}

/// Configuration for connecting to any Postgres database
#[derive(Debug, Deserialize)]
pub struct DbPoolConfig {
  /// Minimum idle database connections.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_DB_PRIMARY_MIN_IDLE`
  /// - `CHATBOOK_DB_REPLICA_MIN_IDLE`
  pub min_idle: Option<NonZeroU32>,
  /// Maximum amount of connections the pool may open.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_DB_PRIMARY_POOL_SIZE`
  /// - `CHATBOOK_DB_REPLICA_POOL_SIZE`
  #[serde(default = "DbPoolConfig::default_pool_size")]
  pub pool_size: NonZeroU32,
  /// Connection URL connecting to the Postgres database.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_DB_PRIMARY_URL` or `DATABASE_URL`
  /// - `CHATBOOK_DB_REPLICA_URL`
  pub url: Sensitive<String>,
}

impl Database {
  const DEFAULT_TIMEOUT_SECS: u64 = 5;

  const fn default_timeout_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
    }
  }

  const fn default_enforce_tls() -> bool {
    true
  }
}

impl DbPoolConfig {
  const DEFAULT_POOL_SIZE: u32 = 5;

  const fn default_pool_size() -> NonZeroU32 {
    match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
      Some(n) => n,
      None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
    }
  }
}

impl Validate for Database {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if let Err(error) = self.primary.validate() {
      fields.insert("primary", error);
    }
    if let Err(error) = self.replica.validate() {
      fields.insert("replica", error);
    }
    fields.build().into_result()
  }
}

impl Validate for DbPoolConfig {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !validator::extras::validate_url(self.url.as_str()) {
      fields.insert_msg("url", "Invalid Postgres connection URL");
    }
    if let Some(min_idle) = self.min_idle {
      if min_idle > self.pool_size {
        fields.insert_msg("min_idle", "Minimum idle connections exceeds the pool size");
      }
    }
    fields.build().into_result()
  }
}
