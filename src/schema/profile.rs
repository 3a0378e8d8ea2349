use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::UserSummary;
use crate::types::id::{
  marker::{EducationMarker, ExperienceMarker, ProfileMarker, UserMarker},
  Id,
};

/// Profile of a user, keyed by its owner.
///
/// `U` is what the owner looks like in the document: the bare id as
/// stored, or the owner's summary once it is joined with `users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile<U = Id<UserMarker>> {
  pub id: Id<ProfileMarker>,
  pub user: U,
  pub company: Option<String>,
  pub location: Option<String>,
  pub website: Option<String>,
  pub bio: Option<String>,
  pub skills: Vec<String>,
  pub status: String,
  pub githubusername: Option<String>,
  pub social: Social,
  pub experience: Vec<Experience>,
  pub education: Vec<Education>,
  pub created_at: NaiveDateTime,
  pub updated_at: Option<NaiveDateTime>,
}

/// A profile joined with its owner's name and avatar. The owner is
/// `None` if the user record no longer exists.
pub type ProfileView = Profile<Option<UserSummary>>;

impl Profile {
  #[must_use]
  pub fn populate(self, user: Option<UserSummary>) -> ProfileView {
    Profile {
      id: self.id,
      user,
      company: self.company,
      location: self.location,
      website: self.website,
      bio: self.bio,
      skills: self.skills,
      status: self.status,
      githubusername: self.githubusername,
      social: self.social,
      experience: self.experience,
      education: self.education,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

/// Links to the owner's accounts elsewhere. Only filled in links are
/// kept.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Social {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub youtube: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub facebook: Option<String>,
}

impl Social {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.youtube.is_none()
      && self.twitter.is_none()
      && self.instagram.is_none()
      && self.linkedin.is_none()
      && self.facebook.is_none()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Experience {
  pub id: Id<ExperienceMarker>,
  pub title: String,
  pub company: String,
  pub location: Option<String>,
  pub from: NaiveDate,
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Education {
  pub id: Id<EducationMarker>,
  pub school: String,
  pub degree: String,
  pub fieldofstudy: String,
  pub from: NaiveDate,
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  pub description: Option<String>,
}

/// Everything an upsert writes. Experience and education are left
/// untouched by an upsert of an existing profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
  pub user: Id<UserMarker>,
  pub company: Option<String>,
  pub location: Option<String>,
  pub website: Option<String>,
  pub bio: Option<String>,
  pub skills: Vec<String>,
  pub status: String,
  pub githubusername: Option<String>,
  pub social: Social,
}
