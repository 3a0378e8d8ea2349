use crate::{
  http::{AuthUser, Error},
  schema::User,
  App,
};

/// Loads the account the request is authenticated as.
#[derive(Debug)]
pub struct GetCurrentUser;

impl GetCurrentUser {
  pub const USER_NOT_FOUND: &'static str = "User not found";

  #[tracing::instrument(skip_all, name = "services.users.current")]
  pub async fn perform(self, app: &App, user: &AuthUser) -> Result<User, Error> {
    match app.store.find(user.id).await? {
      Some(entry) => Ok(entry),
      None => Err(Error::not_found(Self::USER_NOT_FOUND)),
    }
  }
}
