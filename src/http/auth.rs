use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use thiserror::Error;

use super::{Error, Jwt};
use crate::{
  types::{
    self,
    id::{marker::UserMarker, Id},
  },
  App,
};

/// Header the client sends its token in.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// The user a request is made on behalf of. Extracting it rejects
/// the request with `401` when the token is missing or invalid, so
/// handlers taking it only run for authenticated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
  pub id: Id<UserMarker>,
}

#[derive(Debug, Error)]
#[error("Could not authenticate request")]
struct AuthError;

/// Reads the token from `x-auth-token`, falling back to an
/// `Authorization: Bearer` header.
fn find_token(req: &HttpRequest) -> Option<&str> {
  let headers = req.headers();
  if let Some(token) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
    return Some(token.trim()).filter(|v| !v.is_empty());
  }

  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|v| !v.is_empty())
}

impl AuthUser {
  fn authenticate(req: &HttpRequest) -> Result<Self, Error> {
    let Some(token) = find_token(req) else {
      return Err(Error::from_context(
        types::Error::unauthorized(types::Error::NO_TOKEN),
        AuthError,
      ));
    };

    let Some(app) = req.app_data::<web::Data<App>>() else {
      #[derive(Debug, Error)]
      #[error("The web app has no available configuration")]
      struct NoConfig;
      return Err(Error::from_context(types::Error::Internal, NoConfig));
    };

    match Jwt::decode(token, &app.config) {
      Ok(claims) => Ok(Self {
        id: claims.user.id,
      }),
      Err(report) => Err(Error::from_report(
        types::Error::unauthorized(types::Error::INVALID_TOKEN),
        report,
      )),
    }
  }
}

impl FromRequest for AuthUser {
  type Error = Error;
  type Future = Ready<Result<Self, Self::Error>>;

  #[tracing::instrument(skip_all, name = "extractors.auth_user")]
  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(Self::authenticate(req))
  }
}
