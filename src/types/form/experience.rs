use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{extras::is_present_opt, Validate, ValidateError};

use super::{empty_as_none, is_valid_date_range, null_as_false};
use crate::schema::Experience;
use crate::store::EntryId;

/// Body of `PUT /api/profile/experience`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Request {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub company: Option<String>,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub from: Option<NaiveDate>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub to: Option<NaiveDate>,
  #[serde(default, deserialize_with = "null_as_false")]
  pub current: bool,
  #[serde(default)]
  pub description: Option<String>,
}

impl Validate for Request {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !is_present_opt(self.title.as_deref()) {
      fields.insert_msg("title", "Title is required");
    }
    if !is_present_opt(self.company.as_deref()) {
      fields.insert_msg("company", "Company is required");
    }

    // `current` is not checked against `to`
    match self.from {
      Some(from) if is_valid_date_range(from, self.to) => {},
      _ => fields.insert_msg("from", "From date is required"),
    }

    fields.build().into_result()
  }
}

impl Request {
  /// Builds the entry to store. Only meaningful after validation.
  #[must_use]
  pub fn into_entry(self, id: EntryId) -> Option<Experience> {
    Some(Experience {
      id: id.cast(),
      title: self.title?,
      company: self.company?,
      location: self.location,
      from: self.from?,
      to: self.to,
      current: self.current,
      description: self.description,
    })
  }
}
