use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use serde_json::json;

use super::parse_id;
use crate::{
  http::{AuthUser, Error},
  services::profile as services,
  types::form::{education, experience, profile},
  App,
};

#[tracing::instrument(skip(app))]
pub async fn me(app: web::Data<App>, user: AuthUser) -> Result<HttpResponse, Error> {
  let profile = services::GetOwnProfile.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app, form))]
pub async fn upsert(
  app: web::Data<App>,
  user: AuthUser,
  form: Json<profile::Request>,
) -> Result<HttpResponse, Error> {
  let request = services::UpsertProfile {
    form: form.into_inner(),
  };
  let profile = request.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn list(app: web::Data<App>) -> Result<HttpResponse, Error> {
  let profiles = services::ListProfiles.perform(&app).await?;
  Ok(HttpResponse::Ok().json(profiles))
}

#[tracing::instrument(skip(app))]
pub async fn by_user(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
  let request = services::GetProfileByUser {
    user: parse_id("user_id", &path)?,
  };
  let profile = request.perform(&app).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn delete(app: web::Data<App>, user: AuthUser) -> Result<HttpResponse, Error> {
  services::DeleteProfile.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(json!({
    "msg": services::DeleteProfile::DELETED,
  })))
}

#[tracing::instrument(skip(app, form))]
pub async fn add_experience(
  app: web::Data<App>,
  user: AuthUser,
  form: Json<experience::Request>,
) -> Result<HttpResponse, Error> {
  let request = services::AddExperience {
    form: form.into_inner(),
  };
  let profile = request.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn remove_experience(
  app: web::Data<App>,
  user: AuthUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let request = services::RemoveExperience {
    id: parse_id("exp_id", &path)?,
  };
  let profile = request.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app, form))]
pub async fn add_education(
  app: web::Data<App>,
  user: AuthUser,
  form: Json<education::Request>,
) -> Result<HttpResponse, Error> {
  let request = services::AddEducation {
    form: form.into_inner(),
  };
  let profile = request.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn remove_education(
  app: web::Data<App>,
  user: AuthUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let request = services::RemoveEducation {
    id: parse_id("edu_id", &path)?,
  };
  let profile = request.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(profile))
}
