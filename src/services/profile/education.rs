use validator::Validate;

use super::{load_document, save_document, IncompleteForm};
use crate::{
  http::{AuthUser, Error},
  schema::Profile,
  types::{
    self,
    form::education,
    id::{marker::EducationMarker, Id},
  },
  App,
};

/// Puts an education entry in front of the others, most recent
/// first.
#[derive(Debug)]
pub struct AddEducation {
  pub form: education::Request,
}

impl AddEducation {
  #[tracing::instrument(skip_all, name = "services.profile.add_education")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<Profile, Error> {
    self.form.validate()?;

    let mut profile = load_document(app, user).await?;
    let id = app.store.next_entry_id().await?;
    let Some(entry) = self.form.into_entry(id) else {
      return Err(Error::from_context(types::Error::Internal, IncompleteForm));
    };

    profile.education.insert(0, entry);
    save_document(app, &profile).await
  }
}

#[derive(Debug)]
pub struct RemoveEducation {
  pub id: Id<EducationMarker>,
}

impl RemoveEducation {
  #[tracing::instrument(skip_all, name = "services.profile.remove_education")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<Profile, Error> {
    let mut profile = load_document(app, user).await?;
    profile.education.retain(|entry| entry.id != self.id);
    save_document(app, &profile).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    services::profile::UpsertProfile,
    test_utils::{test_app, test_user},
    types::form::profile::{self, Skills},
  };
  use serde_json::json;

  fn form(school: &str) -> education::Request {
    serde_json::from_value(json!({
      "school": school,
      "degree": "BS",
      "fieldofstudy": "Computer Science",
      "from": "2016-06-01",
    }))
    .unwrap()
  }

  #[tokio::test]
  async fn test_newest_entry_comes_first() {
    let (app, store) = test_app();
    let (_, auth) = test_user(&store, "Dishebh").await;
    let upsert = profile::Request {
      status: Some("Student".into()),
      skills: Some(Skills::from("rust")),
      ..Default::default()
    };
    UpsertProfile { form: upsert }.perform(&app, &auth).await.unwrap();

    AddEducation { form: form("High School") }
      .perform(&app, &auth)
      .await
      .unwrap();
    let profile = AddEducation { form: form("University") }
      .perform(&app, &auth)
      .await
      .unwrap();

    let schools = profile
      .education
      .iter()
      .map(|e| e.school.as_str())
      .collect::<Vec<_>>();
    assert_eq!(schools, vec!["University", "High School"]);

    let unchanged = RemoveEducation { id: Id::new(777) }
      .perform(&app, &auth)
      .await
      .unwrap();
    assert_eq!(unchanged.education, profile.education);

    let profile = RemoveEducation { id: profile.education[0].id }
      .perform(&app, &auth)
      .await
      .unwrap();
    assert_eq!(profile.education.len(), 1);
    assert_eq!(profile.education[0].school, "High School");
  }

  #[tokio::test]
  async fn test_requires_profile() {
    let (app, store) = test_app();
    let (_, auth) = test_user(&store, "Nobody").await;

    let error = AddEducation { form: form("University") }
      .perform(&app, &auth)
      .await
      .unwrap_err();
    assert_eq!(error.as_type(), &types::Error::not_found(types::Error::NO_PROFILE));
  }
}
