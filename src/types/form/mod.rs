//! Request bodies accepted by the profile routes.
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};
use std::{fmt::Display, str::FromStr};

pub mod education;
pub mod experience;
pub mod profile;

/// Whether `from` comes strictly before `to`. An open range always
/// passes.
pub(crate) fn is_valid_date_range(from: NaiveDate, to: Option<NaiveDate>) -> bool {
  to.map_or(true, |to| from < to)
}

/// Reads a value sent as a string. `null`, `""` and blank strings are
/// treated as absent.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr,
  T::Err: Display,
{
  let value = Option::<String>::deserialize(deserializer)?;
  match value.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(value) => value.parse().map(Some).map_err(de::Error::custom),
  }
}

/// `null` is read as `false`.
pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
