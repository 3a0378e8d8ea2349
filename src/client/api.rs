use error_stack::{Report, Result, ResultExt};
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use url::Url;

use super::{
  profile::{ClientProfile, ProfileAction, ProfileFailure},
  auth::AuthAction,
  storage::{TokenStorage, TOKEN_KEY},
  AppState, Store,
};
use crate::{
  http::auth::TOKEN_HEADER,
  schema::User,
  types::{
    form::{education, experience, profile},
    id::{
      marker::{EducationMarker, ExperienceMarker, UserMarker},
      Id,
    },
  },
};

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("invalid API url")]
  InvalidUrl,
  #[error("could not reach the API")]
  Request,
  #[error("{msg}")]
  Api {
    status: u16,
    msg: String,
    errors: Vec<ApiFieldError>,
  },
  #[error("could not persist the token")]
  Storage,
}

/// A field error reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiFieldError {
  pub param: String,
  pub msg: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  msg: Option<String>,
  #[serde(default)]
  errors: Vec<ApiFieldError>,
}

#[derive(Debug, Deserialize)]
struct Message {
  msg: String,
}

impl ClientError {
  fn from_response(status: u16, body: &[u8]) -> Self {
    let body = serde_json::from_slice::<ErrorBody>(body).ok();
    let (msg, errors) = match body {
      Some(ErrorBody { msg: Some(msg), errors }) => (msg, errors),
      Some(ErrorBody { msg: None, errors }) if !errors.is_empty() => {
        let msg = errors
          .iter()
          .map(|e| e.msg.as_str())
          .collect::<Vec<_>>()
          .join(", ");
        (msg, errors)
      },
      _ => (format!("request failed with status {status}"), Vec::new()),
    };
    Self::Api { status, msg, errors }
  }
}

fn failure(report: &Report<ClientError>) -> ProfileFailure {
  match report.current_context() {
    ClientError::Api { status, msg, .. } => ProfileFailure {
      msg: msg.clone(),
      status: Some(*status),
    },
    other => ProfileFailure {
      msg: other.to_string(),
      status: None,
    },
  }
}

/// Talks to the ChatBook API. Once a token is set it is attached to
/// every request.
#[derive(Debug)]
pub struct ApiClient {
  base: Url,
  http: reqwest::Client,
  token: RwLock<Option<String>>,
  storage: Arc<dyn TokenStorage>,
}

impl ApiClient {
  /// Picks up the token persisted in `storage`, if any.
  pub fn new(base: &str, storage: Arc<dyn TokenStorage>) -> Result<Self, ClientError> {
    let mut base = Url::parse(base)
      .change_context(ClientError::InvalidUrl)
      .attach_printable_lazy(|| format!("given url: {base:?}"))?;

    // endpoints are joined below the base path
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }

    let token = storage.get(TOKEN_KEY);
    Ok(Self {
      base,
      http: reqwest::Client::new(),
      token: RwLock::new(token),
      storage,
    })
  }

  #[must_use]
  pub fn token(&self) -> Option<String> {
    self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  /// Sets or clears the token sent with requests and persists the
  /// change.
  pub fn set_auth_token(&self, token: Option<&str>) -> Result<(), ClientError> {
    *self.token.write().unwrap_or_else(PoisonError::into_inner) = token.map(str::to_string);
    let result = match token {
      Some(token) => self.storage.set(TOKEN_KEY, token),
      None => self.storage.remove(TOKEN_KEY),
    };
    result.change_context(ClientError::Storage)
  }

  fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
    self
      .base
      .join(path.trim_start_matches('/'))
      .change_context(ClientError::InvalidUrl)
      .attach_printable_lazy(|| format!("given path: {path:?}"))
  }

  fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
    let mut builder = self.http.request(method, self.endpoint(path)?);
    if let Some(token) = self.token() {
      builder = builder.header(TOKEN_HEADER, token);
    }
    Ok(builder)
  }

  async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
    let response = builder.send().await.change_context(ClientError::Request)?;
    let status = response.status();
    let body = response.bytes().await.change_context(ClientError::Request)?;

    if !status.is_success() {
      return Err(Report::new(ClientError::from_response(status.as_u16(), &body)));
    }

    serde_json::from_slice(&body)
      .change_context(ClientError::Request)
      .attach_printable("unexpected response body")
  }

  #[tracing::instrument(skip(self), name = "client.api.current_user")]
  pub async fn current_user(&self) -> Result<User, ClientError> {
    self.send(self.request(Method::GET, "/api/auth")?).await
  }

  #[tracing::instrument(skip(self), name = "client.api.get_own_profile")]
  pub async fn get_own_profile(&self) -> Result<ClientProfile, ClientError> {
    self.send(self.request(Method::GET, "/api/profile/me")?).await
  }

  #[tracing::instrument(skip_all, name = "client.api.upsert_profile")]
  pub async fn upsert_profile(&self, form: &profile::Request) -> Result<ClientProfile, ClientError> {
    let request = self.request(Method::POST, "/api/profile")?.json(form);
    self.send(request).await
  }

  #[tracing::instrument(skip(self), name = "client.api.list_profiles")]
  pub async fn list_profiles(&self) -> Result<Vec<ClientProfile>, ClientError> {
    self.send(self.request(Method::GET, "/api/profile")?).await
  }

  #[tracing::instrument(skip(self), name = "client.api.get_profile_by_user")]
  pub async fn get_profile_by_user(&self, user: Id<UserMarker>) -> Result<ClientProfile, ClientError> {
    let path = format!("/api/profile/{user}");
    self.send(self.request(Method::GET, &path)?).await
  }

  /// Returns the confirmation message.
  #[tracing::instrument(skip(self), name = "client.api.delete_profile")]
  pub async fn delete_profile(&self) -> Result<String, ClientError> {
    let message: Message = self.send(self.request(Method::DELETE, "/api/profile")?).await?;
    Ok(message.msg)
  }

  #[tracing::instrument(skip_all, name = "client.api.add_experience")]
  pub async fn add_experience(
    &self,
    form: &experience::Request,
  ) -> Result<ClientProfile, ClientError> {
    let request = self.request(Method::PUT, "/api/profile/experience")?.json(form);
    self.send(request).await
  }

  #[tracing::instrument(skip(self), name = "client.api.delete_experience")]
  pub async fn delete_experience(
    &self,
    id: Id<ExperienceMarker>,
  ) -> Result<ClientProfile, ClientError> {
    let path = format!("/api/profile/experience/{id}");
    self.send(self.request(Method::DELETE, &path)?).await
  }

  #[tracing::instrument(skip_all, name = "client.api.add_education")]
  pub async fn add_education(&self, form: &education::Request) -> Result<ClientProfile, ClientError> {
    let request = self.request(Method::PUT, "/api/profile/education")?.json(form);
    self.send(request).await
  }

  #[tracing::instrument(skip(self), name = "client.api.delete_education")]
  pub async fn delete_education(
    &self,
    id: Id<EducationMarker>,
  ) -> Result<ClientProfile, ClientError> {
    let path = format!("/api/profile/education/{id}");
    self.send(self.request(Method::DELETE, &path)?).await
  }
}

/// Helpers that call the API and dispatch the outcome into a store.
/// Failures are dispatched as well before being returned.
impl ApiClient {
  pub async fn load_user(&self, store: &Store<AppState>) -> Result<(), ClientError> {
    match self.current_user().await {
      Ok(user) => {
        store.dispatch(AuthAction::UserLoaded(user));
        Ok(())
      },
      Err(error) => {
        store.dispatch(AuthAction::AuthError);
        Err(error)
      },
    }
  }

  pub async fn load_profile(&self, store: &Store<AppState>) -> Result<(), ClientError> {
    let result = self.get_own_profile().await;
    self.settle(store, result, ProfileAction::GetProfile)
  }

  pub async fn load_profiles(&self, store: &Store<AppState>) -> Result<(), ClientError> {
    store.dispatch(ProfileAction::ClearProfile);
    let result = self.list_profiles().await;
    self.settle(store, result, ProfileAction::GetProfiles)
  }

  pub async fn save_profile(
    &self,
    store: &Store<AppState>,
    form: &profile::Request,
  ) -> Result<(), ClientError> {
    let result = self.upsert_profile(form).await;
    self.settle(store, result, ProfileAction::GetProfile)
  }

  pub async fn save_experience(
    &self,
    store: &Store<AppState>,
    form: &experience::Request,
  ) -> Result<(), ClientError> {
    let result = self.add_experience(form).await;
    self.settle(store, result, ProfileAction::UpdateProfile)
  }

  pub async fn save_education(
    &self,
    store: &Store<AppState>,
    form: &education::Request,
  ) -> Result<(), ClientError> {
    let result = self.add_education(form).await;
    self.settle(store, result, ProfileAction::UpdateProfile)
  }

  pub async fn remove_experience(
    &self,
    store: &Store<AppState>,
    id: Id<ExperienceMarker>,
  ) -> Result<(), ClientError> {
    let result = self.delete_experience(id).await;
    self.settle(store, result, ProfileAction::UpdateProfile)
  }

  pub async fn remove_education(
    &self,
    store: &Store<AppState>,
    id: Id<EducationMarker>,
  ) -> Result<(), ClientError> {
    let result = self.delete_education(id).await;
    self.settle(store, result, ProfileAction::UpdateProfile)
  }

  pub async fn delete_account(&self, store: &Store<AppState>) -> Result<(), ClientError> {
    let result = self.delete_profile().await;
    self.settle(store, result, |_| ProfileAction::ClearProfile)
  }

  fn settle<T>(
    &self,
    store: &Store<AppState>,
    result: Result<T, ClientError>,
    action: impl FnOnce(T) -> ProfileAction,
  ) -> Result<(), ClientError> {
    match result {
      Ok(value) => {
        store.dispatch(action(value));
        Ok(())
      },
      Err(error) => {
        store.dispatch(ProfileAction::ProfileError(failure(&error)));
        Err(error)
      },
    }
  }
}
