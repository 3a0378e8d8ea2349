use validator::Validate;

use super::{load_document, save_document, IncompleteForm};
use crate::{
  http::{AuthUser, Error},
  schema::Profile,
  types::{
    self,
    form::experience,
    id::{marker::ExperienceMarker, Id},
  },
  App,
};

/// Appends an experience entry to the profile of the authenticated
/// user.
#[derive(Debug)]
pub struct AddExperience {
  pub form: experience::Request,
}

impl AddExperience {
  #[tracing::instrument(skip_all, name = "services.profile.add_experience")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<Profile, Error> {
    self.form.validate()?;

    let mut profile = load_document(app, user).await?;
    let id = app.store.next_entry_id().await?;
    let Some(entry) = self.form.into_entry(id) else {
      return Err(Error::from_context(types::Error::Internal, IncompleteForm));
    };

    profile.experience.push(entry);
    save_document(app, &profile).await
  }
}

/// Removes the experience entry with the given id. Unknown ids leave
/// the profile as it is.
#[derive(Debug)]
pub struct RemoveExperience {
  pub id: Id<ExperienceMarker>,
}

impl RemoveExperience {
  #[tracing::instrument(skip_all, name = "services.profile.remove_experience")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<Profile, Error> {
    let mut profile = load_document(app, user).await?;
    profile.experience.retain(|entry| entry.id != self.id);
    save_document(app, &profile).await
  }
}
