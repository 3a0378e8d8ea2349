use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;

use super::Error;
use crate::{database, types::Error as ErrorType};

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      // clients of this API expect 400 for missing documents
      ErrorType::NotFound(..) | ErrorType::InvalidFormBody(..) => StatusCode::BAD_REQUEST,
      ErrorType::Unauthorized(..) => StatusCode::UNAUTHORIZED,
    }
  }

  fn error_response(&self) -> HttpResponse<BoxBody> {
    if matches!(self.error_type, ErrorType::Internal) {
      tracing::error!(error = %self, "internal error occurred");
    }
    HttpResponse::build(self.status_code()).json(&self.error_type)
  }
}

impl From<Report<database::Error>> for Error {
  fn from(value: Report<database::Error>) -> Self {
    Error::from_report(ErrorType::Internal, value)
  }
}

impl From<validator::ValidateError> for Error {
  fn from(value: validator::ValidateError) -> Self {
    #[derive(Debug, thiserror::Error)]
    #[error("Validation error occurred")]
    struct ValidateError;
    Error::from_context(ErrorType::InvalidFormBody(value), ValidateError)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{body::MessageBody, ResponseError};
  use serde_json::{json, Value};

  fn body(error: &Error) -> Value {
    let bytes = error.error_response().into_body().try_into_bytes().unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[test]
  fn test_internal_error_hides_report() {
    let error = Error::from(Report::new(database::Error::UnhealthyPool));
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(&error), json!({ "type": "internal", "msg": "Server error" }));
  }

  #[test]
  fn test_not_found_is_bad_request() {
    let error = Error::not_found(ErrorType::NO_PROFILE);
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body(&error),
      json!({ "type": "not_found", "msg": "There is no profile for this user!" })
    );
  }

  #[test]
  fn test_validation_error() {
    let mut fields = validator::ValidateError::field_builder();
    fields.insert_msg("title", "Title is required");

    let error = Error::from(fields.build());
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body(&error),
      json!({
        "type": "invalid_form_body",
        "errors": [{ "param": "title", "msg": "Title is required" }],
      })
    );
  }
}
