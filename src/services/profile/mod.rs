mod education;
mod experience;

pub use self::education::{AddEducation, RemoveEducation};
pub use self::experience::{AddExperience, RemoveExperience};

use thiserror::Error;
use validator::Validate;

use crate::{
  http::{AuthUser, Error},
  schema::{Profile, ProfileView},
  types::{
    self,
    form::profile,
    id::{marker::UserMarker, Id},
  },
  App,
};

/// Profile of the authenticated user, joined with its owner.
#[derive(Debug)]
pub struct GetOwnProfile;

impl GetOwnProfile {
  #[tracing::instrument(skip_all, name = "services.profile.get_own")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<ProfileView, Error> {
    match app.store.find_by_owner(user.id).await? {
      Some(profile) => Ok(profile),
      None => Err(Error::not_found(types::Error::NO_PROFILE)),
    }
  }
}

/// Creates the profile of the authenticated user or overwrites its
/// fields. Experience and education are kept.
#[derive(Debug)]
pub struct UpsertProfile {
  pub form: profile::Request,
}

impl UpsertProfile {
  #[tracing::instrument(skip_all, name = "services.profile.upsert")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<Profile, Error> {
    self.form.validate()?;

    let fields = self.form.into_fields(user.id);
    let profile = app.store.upsert(fields).await?;
    Ok(profile)
  }
}

#[derive(Debug)]
pub struct ListProfiles;

impl ListProfiles {
  #[tracing::instrument(skip_all, name = "services.profile.list")]
  pub async fn perform(self, app: &App) -> Result<Vec<ProfileView>, Error> {
    Ok(app.store.find_all().await?)
  }
}

/// Public lookup of a profile by its owner.
#[derive(Debug)]
pub struct GetProfileByUser {
  pub user: Id<UserMarker>,
}

impl GetProfileByUser {
  #[tracing::instrument(skip_all, name = "services.profile.get_by_user")]
  pub async fn perform(self, app: &App) -> Result<ProfileView, Error> {
    match app.store.find_by_owner(self.user).await? {
      Some(profile) => Ok(profile),
      None => Err(Error::not_found(types::Error::PROFILE_NOT_FOUND)),
    }
  }
}

/// Removes the posts of the authenticated user, then their profile.
///
/// The two steps are not atomic. If the second one fails the posts
/// are gone while the profile stays.
#[derive(Debug)]
pub struct DeleteProfile;

impl DeleteProfile {
  pub const DELETED: &'static str = "User deleted!";

  #[tracing::instrument(skip_all, name = "services.profile.delete")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<(), Error> {
    let posts = app.store.delete_by_author(user.id).await?;
    let removed = app.store.delete_by_owner(user.id).await?;
    tracing::debug!(posts, profile = removed, "deleted profile");
    Ok(())
  }
}

#[derive(Debug, Error)]
#[error("Submitted form is incomplete")]
struct IncompleteForm;

/// Loads the stored profile of `user` for a read-modify-write cycle.
async fn load_document(app: &App, user: &AuthUser) -> Result<Profile, Error> {
  match app.store.find_document(user.id).await? {
    Some(profile) => Ok(profile),
    None => Err(Error::not_found(types::Error::NO_PROFILE)),
  }
}

/// Writes back a profile loaded with [`load_document`].
async fn save_document(app: &App, profile: &Profile) -> Result<Profile, Error> {
  match app.store.save(profile).await? {
    Some(profile) => Ok(profile),
    None => Err(Error::not_found(types::Error::NO_PROFILE)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    test_utils::{test_app, test_user},
    types::form::profile::Skills,
  };

  fn form(status: &str, skills: &str) -> profile::Request {
    profile::Request {
      status: Some(status.into()),
      skills: Some(Skills::from(skills)),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn test_upsert_is_keyed_by_user() {
    let (app, store) = test_app();
    let (_, auth) = test_user(&store, "Dishebh").await;

    let first = UpsertProfile { form: form("Student", "js, node, css") }
      .perform(&app, &auth)
      .await
      .unwrap();
    assert_eq!(first.skills, vec!["js", "node", "css"]);

    let second = UpsertProfile { form: form("Developer", "rust") }
      .perform(&app, &auth)
      .await
      .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.status, "Developer");
    assert_eq!(second.skills, vec!["rust"]);
    assert_eq!(store.profile_count().await, 1);
  }

  #[tokio::test]
  async fn test_upsert_validates_before_writing() {
    let (app, store) = test_app();
    let (_, auth) = test_user(&store, "Dishebh").await;

    let error = UpsertProfile { form: profile::Request::default() }
      .perform(&app, &auth)
      .await
      .unwrap_err();

    assert!(matches!(error.as_type(), types::Error::InvalidFormBody(..)));
    assert_eq!(store.profile_count().await, 0);
  }

  #[tokio::test]
  async fn test_get_own_profile() {
    let (app, store) = test_app();
    let (user, auth) = test_user(&store, "Dishebh").await;

    let error = GetOwnProfile.perform(&app, &auth).await.unwrap_err();
    assert_eq!(error.as_type(), &types::Error::not_found(types::Error::NO_PROFILE));

    UpsertProfile { form: form("Student", "js") }
      .perform(&app, &auth)
      .await
      .unwrap();

    let profile = GetOwnProfile.perform(&app, &auth).await.unwrap();
    assert_eq!(profile.user, Some(user.summary()));
  }

  #[tokio::test]
  async fn test_list_and_lookup() {
    let (app, store) = test_app();
    let (alice, alice_auth) = test_user(&store, "Alice").await;
    let (bob, bob_auth) = test_user(&store, "Bob").await;

    UpsertProfile { form: form("Student", "js") }
      .perform(&app, &alice_auth)
      .await
      .unwrap();
    UpsertProfile { form: form("Developer", "go") }
      .perform(&app, &bob_auth)
      .await
      .unwrap();

    let all = ListProfiles.perform(&app).await.unwrap();
    let owners = all
      .iter()
      .filter_map(|p| p.user.as_ref().map(|u| u.name.as_str()))
      .collect::<Vec<_>>();
    assert_eq!(owners, vec!["Alice", "Bob"]);

    let profile = GetProfileByUser { user: bob.id }.perform(&app).await.unwrap();
    assert_eq!(profile.status, "Developer");

    let error = GetProfileByUser { user: Id::new(alice.id.get() + 100) }
      .perform(&app)
      .await
      .unwrap_err();
    assert_eq!(
      error.as_type(),
      &types::Error::not_found(types::Error::PROFILE_NOT_FOUND)
    );
  }

  #[tokio::test]
  async fn test_delete_profile_removes_posts() {
    let (app, store) = test_app();
    let (user, auth) = test_user(&store, "Dishebh").await;
    let (other, _) = test_user(&store, "Other").await;

    UpsertProfile { form: form("Student", "js") }
      .perform(&app, &auth)
      .await
      .unwrap();
    store.insert_post(user.id, "first post").await;
    store.insert_post(other.id, "not mine").await;

    DeleteProfile.perform(&app, &auth).await.unwrap();

    assert!(store.posts_by(user.id).await.is_empty());
    assert_eq!(store.posts_by(other.id).await.len(), 1);
    assert_eq!(store.profile_count().await, 0);

    // nothing left to delete is still fine
    DeleteProfile.perform(&app, &auth).await.unwrap();
  }
}
