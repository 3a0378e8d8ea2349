use serde::{ser::SerializeMap, Serialize};
use std::{borrow::Cow, fmt::Display};

/// Error kinds a client can observe from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
  Internal,
  InvalidFormBody(validator::ValidateError),
  NotFound(Cow<'static, str>),
  Unauthorized(Cow<'static, str>),
}

impl Error {
  pub const NO_PROFILE: &'static str = "There is no profile for this user!";
  pub const PROFILE_NOT_FOUND: &'static str = "Profile not found!";
  pub const NO_TOKEN: &'static str = "No token, authorization denied";
  pub const INVALID_TOKEN: &'static str = "Token is not valid";

  #[must_use]
  pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
    Self::NotFound(message.into())
  }

  #[must_use]
  pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
    Self::Unauthorized(message.into())
  }

  #[must_use]
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Internal => "internal",
      Self::InvalidFormBody(..) => "invalid_form_body",
      Self::NotFound(..) => "not_found",
      Self::Unauthorized(..) => "unauthorized",
    }
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::Internal => f.write_str("Server error"),
      Error::InvalidFormBody(..) => f.write_str("User performed request with invalid body"),
      Error::NotFound(msg) | Error::Unauthorized(msg) => f.write_str(msg),
    }
  }
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("type", self.kind())?;
    match self {
      Error::InvalidFormBody(error) => map.serialize_entry("errors", &error.field_errors())?,
      _ => map.serialize_entry("msg", &self.to_string())?,
    }
    map.end()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use validator::ValidateError;

  #[test]
  fn test_serialize_messages() {
    assert_eq!(
      serde_json::to_value(Error::Internal).unwrap(),
      json!({ "type": "internal", "msg": "Server error" })
    );
    assert_eq!(
      serde_json::to_value(Error::not_found(Error::NO_PROFILE)).unwrap(),
      json!({ "type": "not_found", "msg": "There is no profile for this user!" })
    );
    assert_eq!(
      serde_json::to_value(Error::unauthorized(Error::NO_TOKEN)).unwrap(),
      json!({ "type": "unauthorized", "msg": "No token, authorization denied" })
    );
  }

  #[test]
  fn test_serialize_form_errors() {
    let mut fields = ValidateError::field_builder();
    fields.insert_msg("status", "Status is required");
    fields.insert_msg("skills", "Skills are required");

    assert_eq!(
      serde_json::to_value(Error::InvalidFormBody(fields.build())).unwrap(),
      json!({
        "type": "invalid_form_body",
        "errors": [
          { "param": "status", "msg": "Status is required" },
          { "param": "skills", "msg": "Skills are required" },
        ]
      })
    );
  }
}
