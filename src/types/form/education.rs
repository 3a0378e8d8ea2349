use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{extras::is_present_opt, Validate, ValidateError};

use super::{empty_as_none, is_valid_date_range, null_as_false};
use crate::schema::Education;
use crate::store::EntryId;

/// Body of `PUT /api/profile/education`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Request {
  #[serde(default)]
  pub school: Option<String>,
  #[serde(default)]
  pub degree: Option<String>,
  #[serde(default)]
  pub fieldofstudy: Option<String>,
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
    if !is_present_opt(self.school.as_deref()) {
      fields.insert_msg("school", "School is required");
    }
    if !is_present_opt(self.degree.as_deref()) {
      fields.insert_msg("degree", "Degree is required");
    }
    if !is_present_opt(self.fieldofstudy.as_deref()) {
      fields.insert_msg("fieldofstudy", "Field of study is required");
    }

    match self.from {
      Some(from) if is_valid_date_range(from, self.to) => {},
      _ => fields.insert_msg("from", "From date is required and needs to be from the past"),
    }

    fields.build().into_result()
  }
}

impl Request {
  #[must_use]
  pub fn into_entry(self, id: EntryId) -> Option<Education> {
    Some(Education {
      id: id.cast(),
      school: self.school?,
      degree: self.degree?,
      fieldofstudy: self.fieldofstudy?,
      from: self.from?,
      to: self.to,
      current: self.current,
      description: self.description,
    })
  }
}
