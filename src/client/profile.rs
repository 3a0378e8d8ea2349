use serde::{Deserialize, Serialize};

use super::Reducer;
use crate::{
  schema::{Profile, UserSummary},
  types::id::{marker::UserMarker, Id},
};

/// Owner of a profile as the API sends it: joined with the user for
/// lookups, a bare id in responses to writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ProfileOwner {
  User(UserSummary),
  Id(Id<UserMarker>),
}

impl ProfileOwner {
  #[must_use]
  pub fn id(&self) -> Id<UserMarker> {
    match self {
      Self::User(user) => user.id,
      Self::Id(id) => *id,
    }
  }

  #[must_use]
  pub fn name(&self) -> Option<&str> {
    match self {
      Self::User(user) => Some(&user.name),
      Self::Id(..) => None,
    }
  }
}

/// A profile as received by the client.
pub type ClientProfile = Profile<Option<ProfileOwner>>;

/// Why the last profile request failed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileFailure {
  pub msg: String,
  pub status: Option<u16>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileState {
  pub profile: Option<ClientProfile>,
  pub profiles: Vec<ClientProfile>,
  pub loading: bool,
  pub error: Option<ProfileFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
  GetProfile(ClientProfile),
  GetProfiles(Vec<ClientProfile>),
  ProfileError(ProfileFailure),
  ClearProfile,
  UpdateProfile(ClientProfile),
}

impl Reducer for ProfileState {
  type Action = ProfileAction;

  fn reduce(self, action: &Self::Action) -> Self {
    match action {
      ProfileAction::GetProfile(profile) | ProfileAction::UpdateProfile(profile) => Self {
        profile: Some(profile.clone()),
        loading: false,
        ..self
      },
      ProfileAction::GetProfiles(profiles) => Self {
        profiles: profiles.clone(),
        loading: false,
        ..self
      },
      ProfileAction::ProfileError(failure) => Self {
        profile: None,
        loading: false,
        error: Some(failure.clone()),
        ..self
      },
      ProfileAction::ClearProfile => Self {
        profile: None,
        loading: false,
        ..self
      },
    }
  }
}
