use actix_web::{web, HttpResponse};

use crate::{
  http::{AuthUser, Error},
  services::users::GetCurrentUser,
  App,
};

#[tracing::instrument(skip(app))]
pub async fn current_user(app: web::Data<App>, user: AuthUser) -> Result<HttpResponse, Error> {
  let user = GetCurrentUser.perform(&app, &user).await?;
  Ok(HttpResponse::Ok().json(user))
}
