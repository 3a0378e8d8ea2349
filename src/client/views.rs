//! Pages of the client, rendered from the store's state.
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use super::{profile::ClientProfile, AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Landing,
  Dashboard,
  NotFound,
}

impl Route {
  pub const LANDING: &'static str = "/";
  pub const DASHBOARD: &'static str = "/dashboard";

  /// Query strings, fragments and a trailing slash are ignored.
  #[must_use]
  pub fn resolve(path: &str) -> Self {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
      "" => Self::LANDING,
      path => path,
    };

    match path {
      Self::LANDING => Self::Landing,
      Self::DASHBOARD => Self::Dashboard,
      _ => Self::NotFound,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
  Html(String),
  Redirect(&'static str),
}

#[must_use]
pub fn render(path: &str, state: &AppState) -> Page {
  match Route::resolve(path) {
    Route::Landing => landing(state),
    Route::Dashboard => dashboard(state),
    Route::NotFound => Page::Html(not_found()),
  }
}

/// Signed in users are sent straight to their dashboard.
#[must_use]
pub fn landing(state: &AppState) -> Page {
  if state.auth.is_authenticated {
    return Page::Redirect(Route::DASHBOARD);
  }

  Page::Html(
    r#"<section class="landing">
  <div class="dark-overlay">
    <div class="landing-inner">
      <h1 class="x-large">ChatBook</h1>
      <p class="lead">Create a profile/portfolio, share posts and get to know other user.</p>
      <div class="buttons">
        <a href="/register" class="btn btn-primary">Sign Up</a>
        <a href="/login" class="btn btn-light">Login</a>
      </div>
    </div>
  </div>
</section>"#
      .to_string(),
  )
}

#[must_use]
pub fn dashboard(state: &AppState) -> Page {
  if state.auth.loading {
    return Page::Html(r#"<div class="spinner">Loading...</div>"#.to_string());
  }
  if !state.auth.is_authenticated {
    return Page::Redirect(Route::LANDING);
  }

  let name = state.auth.user.as_ref().map_or("", |user| user.name.as_str());
  let mut html = String::new();
  html.push_str("<h1 class=\"large text-primary\">Dashboard</h1>\n");
  html.push_str("<p class=\"lead\"><i class=\"fas fa-user\"></i> Welcome ");
  html.push_str(&encode_text(name));
  html.push_str("</p>\n");

  match state.profile.profile.as_ref() {
    Some(profile) => html.push_str(&profile_summary(profile)),
    None => html.push_str(
      "<p>You have not yet setup a profile, please add some info</p>\n\
       <a href=\"/create-profile\" class=\"btn btn-primary my-1\">Create Profile</a>\n",
    ),
  }
  Page::Html(html)
}

fn profile_summary(profile: &ClientProfile) -> String {
  let mut html = String::from("<div class=\"profile\">\n");
  writeln!(html, "<p class=\"status\">{}</p>", encode_text(&profile.status)).ok();

  if let Some(company) = profile.company.as_deref() {
    writeln!(html, "<p class=\"company\">{}</p>", encode_text(company)).ok();
  }
  if let Some(website) = profile.website.as_deref().filter(|w| !w.is_empty()) {
    writeln!(
      html,
      "<a class=\"website\" href=\"{}\">{}</a>",
      encode_double_quoted_attribute(website),
      encode_text(website)
    )
    .ok();
  }

  html.push_str("<ul class=\"skills\">\n");
  for skill in &profile.skills {
    writeln!(html, "<li>{}</li>", encode_text(skill)).ok();
  }
  html.push_str("</ul>\n");

  writeln!(
    html,
    "<p class=\"entries\">{} experience, {} education</p>",
    profile.experience.len(),
    profile.education.len()
  )
  .ok();
  html.push_str("</div>\n");
  html
}

fn not_found() -> String {
  r#"<h1 class="x-large text-primary">Page Not Found</h1>
<p class="large">Sorry, this page does not exist</p>"#
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::{
    auth::AuthAction, profile::ProfileAction, storage::MemoryStorage, Reducer,
  };
  use crate::schema::User;
  use crate::types::id::Id;
  use serde_json::json;

  fn user(name: &str) -> User {
    serde_json::from_value(json!({
      "id": "1",
      "created_at": "2024-01-01T00:00:00",
      "name": name,
      "email": "d@example.com",
      "avatar": null,
    }))
    .unwrap()
  }

  fn signed_in(name: &str) -> AppState {
    AppState::new(&MemoryStorage::new()).reduce(&AuthAction::UserLoaded(user(name)).into())
  }

  #[test]
  fn test_resolve() {
    assert_eq!(Route::resolve("/"), Route::Landing);
    assert_eq!(Route::resolve(""), Route::Landing);
    assert_eq!(Route::resolve("/dashboard/"), Route::Dashboard);
    assert_eq!(Route::resolve("/dashboard?tab=1"), Route::Dashboard);
    assert_eq!(Route::resolve("/profiles"), Route::NotFound);
  }

  #[test]
  fn test_landing_redirects_when_authenticated() {
    let guest = AppState::new(&MemoryStorage::new());
    let Page::Html(html) = render("/", &guest) else {
      panic!("expected the landing page");
    };
    assert!(html.contains("ChatBook"));

    assert_eq!(render("/", &signed_in("Dishebh")), Page::Redirect("/dashboard"));
  }

  #[test]
  fn test_dashboard_guards() {
    let loading = AppState::new(&MemoryStorage::new());
    let Page::Html(html) = dashboard(&loading) else {
      panic!("expected a spinner");
    };
    assert!(html.contains("Loading"));

    let rejected = loading.reduce(&AuthAction::AuthError.into());
    assert_eq!(dashboard(&rejected), Page::Redirect("/"));
  }

  #[test]
  fn test_dashboard_escapes_user_content() {
    let state = signed_in("<script>alert(1)</script>");
    let Page::Html(html) = dashboard(&state) else {
      panic!("expected the dashboard");
    };
    assert!(html.contains("Welcome &lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("Create Profile"));
  }

  #[test]
  fn test_dashboard_shows_profile() {
    let profile = serde_json::from_value(json!({
      "id": "1",
      "user": { "id": "1", "name": "Dishebh", "avatar": null },
      "company": "ChatBook & Co",
      "location": null,
      "website": "http://chatbook.dev",
      "bio": null,
      "skills": ["rust", "go"],
      "status": "Developer",
      "githubusername": null,
      "social": {},
      "experience": [],
      "education": [],
      "created_at": "2024-01-01T00:00:00",
      "updated_at": null,
    }))
    .unwrap();

    let state = signed_in("Dishebh").reduce(&ProfileAction::GetProfile(profile).into());
    let Page::Html(html) = render("/dashboard", &state) else {
      panic!("expected the dashboard");
    };
    assert!(html.contains("ChatBook &amp; Co"));
    assert!(html.contains("<li>rust</li>"));
    assert!(html.contains("href=\"http://chatbook.dev\""));
    assert!(!html.contains("Create Profile"));
    assert_eq!(state.auth.user.map(|u| u.id), Some(Id::new(1)));
  }
}
