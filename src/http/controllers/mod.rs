use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use std::str::FromStr;
use thiserror::Error;
use validator::ValidateError;

use super::Error;
use crate::types::{
  self,
  id::{marker::Marker, Id},
};

pub mod auth;
pub mod profile;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error))
    .service(web::scope("/api/auth").service(web::resource(["", "/"]).get(auth::current_user)))
    .service(
      web::scope("/api/profile")
        .service(
          web::resource(["", "/"])
            .get(profile::list)
            .post(profile::upsert)
            .delete(profile::delete),
        )
        .route("/me", web::get().to(profile::me))
        .route("/experience", web::put().to(profile::add_experience))
        .route(
          "/experience/{exp_id}",
          web::delete().to(profile::remove_experience),
        )
        .route("/education", web::put().to(profile::add_education))
        .route(
          "/education/{edu_id}",
          web::delete().to(profile::remove_education),
        )
        .route("/{user_id}", web::get().to(profile::by_user)),
    )
    .default_service(web::to(not_found));
}

async fn not_found() -> HttpResponse {
  HttpResponse::NotFound().json(types::Error::not_found("Route not found"))
}

/// Answers bodies that are not valid JSON for the route like any
/// other invalid form.
fn json_error(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  #[derive(Debug, Error)]
  #[error("Could not parse request body")]
  struct BadBody;

  let mut fields = ValidateError::field_builder();
  fields.insert_msg("body", error.to_string());

  let error_type = types::Error::InvalidFormBody(fields.build());
  Error::from_context(error_type, BadBody).into()
}

/// Parses an id taken from the path. Malformed ids are rejected as
/// an invalid form before anything is looked up.
pub(crate) fn parse_id<M: Marker>(param: &'static str, value: &str) -> Result<Id<M>, Error> {
  Id::from_str(value).map_err(|error| {
    let mut fields = ValidateError::field_builder();
    fields.insert_msg(param, error.to_string());
    fields.build().into()
  })
}
