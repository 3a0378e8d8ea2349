use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{extras::is_present_opt, Validate, ValidateError};

use crate::schema::{ProfileFields, Social};
use crate::types::id::{marker::UserMarker, Id};

/// Skills may be sent as a list or as one comma separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Skills {
  List(Vec<String>),
  Text(String),
}

impl Skills {
  /// Every skill trimmed, in the order given. Blank entries are
  /// dropped.
  #[must_use]
  pub fn normalize(&self) -> Vec<String> {
    let entries: Box<dyn Iterator<Item = &str>> = match self {
      Self::List(list) => Box::new(list.iter().map(String::as_str)),
      Self::Text(text) => Box::new(text.split(',')),
    };
    entries
      .map(str::trim)
      .filter(|skill| !skill.is_empty())
      .map(str::to_string)
      .collect()
  }
}

impl From<Vec<String>> for Skills {
  fn from(value: Vec<String>) -> Self {
    Self::List(value)
  }
}

impl From<&str> for Skills {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

#[allow(clippy::expect_used)]
static URL_SCHEME: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("invalid scheme regex"));

/// Gives a website a scheme if it has none. Empty stays empty.
#[must_use]
pub fn normalize_website(website: &str) -> String {
  let website = website.trim();
  if website.is_empty() || URL_SCHEME.is_match(website) {
    website.to_string()
  } else {
    format!("http://{website}")
  }
}

/// Body of `POST /api/profile`. Social links are sent at the top
/// level next to the other fields.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Request {
  #[serde(default)]
  pub company: Option<String>,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub website: Option<String>,
  #[serde(default)]
  pub bio: Option<String>,
  #[serde(default)]
  pub skills: Option<Skills>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub githubusername: Option<String>,
  #[serde(default)]
  pub youtube: Option<String>,
  #[serde(default)]
  pub twitter: Option<String>,
  #[serde(default)]
  pub instagram: Option<String>,
  #[serde(default)]
  pub linkedin: Option<String>,
  #[serde(default)]
  pub facebook: Option<String>,
}

impl Validate for Request {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !is_present_opt(self.status.as_deref()) {
      fields.insert_msg("status", "Status is required");
    }

    let has_skills = self
      .skills
      .as_ref()
      .map_or(false, |skills| !skills.normalize().is_empty());

    if !has_skills {
      fields.insert_msg("skills", "Skills are required");
    }

    fields.build().into_result()
  }
}

/// Blank links are dropped, the rest are kept trimmed.
fn link(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

impl Request {
  /// Turns a validated request into what gets stored for `user`.
  #[must_use]
  pub fn into_fields(self, user: Id<UserMarker>) -> ProfileFields {
    let social = Social {
      youtube: link(self.youtube),
      twitter: link(self.twitter),
      instagram: link(self.instagram),
      linkedin: link(self.linkedin),
      facebook: link(self.facebook),
    };

    ProfileFields {
      user,
      company: self.company,
      location: self.location,
      website: self.website.as_deref().map(normalize_website),
      bio: self.bio,
      skills: self.skills.map(|s| s.normalize()).unwrap_or_default(),
      status: self.status.map(|s| s.trim().to_string()).unwrap_or_default(),
      githubusername: self.githubusername,
      social,
    }
  }
}
