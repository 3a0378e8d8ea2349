use serde::{Deserialize, Serialize};

use super::{
  storage::{TokenStorage, TOKEN_KEY},
  Reducer,
};
use crate::schema::User;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthState {
  pub is_authenticated: bool,
  pub loading: bool,
  pub user: Option<User>,
  pub token: Option<String>,
}

impl AuthState {
  /// Starts out loading, with whatever token was persisted.
  #[must_use]
  pub fn new(storage: &dyn TokenStorage) -> Self {
    Self {
      is_authenticated: false,
      loading: true,
      user: None,
      token: storage.get(TOKEN_KEY),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
  RegisterSuccess { token: String },
  RegisterFail,
  UserLoaded(User),
  AuthError,
  LoginSuccess { token: String },
  LoginFail,
  Logout,
}

impl Reducer for AuthState {
  type Action = AuthAction;

  fn reduce(self, action: &Self::Action) -> Self {
    match action {
      AuthAction::UserLoaded(user) => Self {
        is_authenticated: true,
        loading: false,
        user: Some(user.clone()),
        ..self
      },
      AuthAction::AuthError | AuthAction::LoginFail => Self {
        is_authenticated: false,
        loading: false,
        token: None,
        ..self
      },
      // TODO: settle how registration, login and logout change the
      // state with the owners of the login flow. Left untouched.
      AuthAction::RegisterSuccess { .. }
      | AuthAction::RegisterFail
      | AuthAction::LoginSuccess { .. }
      | AuthAction::Logout => self,
    }
  }
}
