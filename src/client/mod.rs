//! The browser side of ChatBook: state containers, token storage,
//! an API client and the pages rendered from state.
//!
//! State changes flow one way. API helpers in [`api`] dispatch
//! actions into a [`Store`], reducers compute the next state and
//! subscribers (usually the view layer) are notified.
use serde::{Deserialize, Serialize};

pub mod api;
pub mod auth;
pub mod profile;
pub mod storage;
pub mod store;
pub mod views;

pub use api::ApiClient;
pub use store::{Reducer, Store, SubscriptionId};

/// Everything the client keeps in its store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppState {
  pub auth: auth::AuthState,
  pub profile: profile::ProfileState,
}

impl AppState {
  /// Initial state with the token persisted by an earlier session.
  #[must_use]
  pub fn new(storage: &dyn storage::TokenStorage) -> Self {
    Self {
      auth: auth::AuthState::new(storage),
      profile: profile::ProfileState::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
  Auth(auth::AuthAction),
  Profile(profile::ProfileAction),
}

impl From<auth::AuthAction> for AppAction {
  fn from(value: auth::AuthAction) -> Self {
    Self::Auth(value)
  }
}

impl From<profile::ProfileAction> for AppAction {
  fn from(value: profile::ProfileAction) -> Self {
    Self::Profile(value)
  }
}

impl Reducer for AppState {
  type Action = AppAction;

  fn reduce(self, action: &Self::Action) -> Self {
    match action {
      AppAction::Auth(action) => Self {
        auth: self.auth.reduce(action),
        ..self
      },
      AppAction::Profile(action) => Self {
        profile: self.profile.reduce(action),
        ..self
      },
    }
  }
}
