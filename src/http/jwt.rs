use chrono::Utc;
use error_stack::{Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  config,
  types::id::{marker::UserMarker, Id},
};

/// Claims of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Jwt {
  pub user: JwtUser,
  /// Issued at, in seconds since the Unix epoch.
  pub iat: i64,
  /// Expiry, in seconds since the Unix epoch.
  pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwtUser {
  pub id: Id<UserMarker>,
}

#[derive(Debug, Error)]
#[error("Could not create token")]
pub struct EncodeError;

#[derive(Debug, Error)]
#[error("Invalid token")]
pub struct DecodeError;

impl Jwt {
  #[must_use]
  pub fn new(user: Id<UserMarker>, cfg: &config::Server) -> Self {
    let iat = Utc::now().timestamp();
    let lifetime = i64::try_from(cfg.jwt_expiry_secs).unwrap_or(i64::MAX);
    Self {
      user: JwtUser { id: user },
      iat,
      exp: iat.saturating_add(lifetime),
    }
  }

  #[tracing::instrument(skip_all, name = "http.jwt.encode")]
  pub fn encode(&self, cfg: &config::Server) -> Result<String, EncodeError> {
    let header = Header::new(Algorithm::HS512);
    let key = EncodingKey::from_secret(cfg.jwt_secret.as_str().as_bytes());
    jsonwebtoken::encode(&header, self, &key).change_context(EncodeError)
  }

  /// Verifies the signature and expiry of `token`.
  #[tracing::instrument(skip_all, name = "http.jwt.decode")]
  pub fn decode(token: &str, cfg: &config::Server) -> Result<Self, DecodeError> {
    let key = DecodingKey::from_secret(cfg.jwt_secret.as_str().as_bytes());
    let mut validation = Validation::new(Algorithm::HS512);
    validation.set_required_spec_claims(&["exp"]);

    jsonwebtoken::decode::<Self>(token, &key, &validation)
      .map(|data| data.claims)
      .change_context(DecodeError)
  }
}
