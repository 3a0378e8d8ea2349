use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::id::{marker::UserMarker, Id};

/// A registered account. The password hash never leaves the server.
#[derive(Clone, FromRow, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
  pub id: Id<UserMarker>,
  pub created_at: NaiveDateTime,
  pub name: String,
  pub email: String,
  #[serde(default, skip_serializing)]
  pub password_hash: String,
  pub avatar: Option<String>,
}

impl User {
  #[must_use]
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id: self.id,
      name: self.name.clone(),
      avatar: self.avatar.clone(),
    }
  }
}

impl std::fmt::Debug for User {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("User")
      .field("id", &self.id)
      .field("created_at", &self.created_at)
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

/// The part of a [`User`] shown next to their profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct UserSummary {
  pub id: Id<UserMarker>,
  pub name: String,
  pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_serialize_hides_password_hash() {
    let user = User {
      id: Id::new(1),
      created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap(),
      name: "Dishebh".into(),
      email: "d@example.com".into(),
      password_hash: "$argon2id$secret".into(),
      avatar: None,
    };

    let value = serde_json::to_value(&user).unwrap();
    assert!(value.get("password_hash").is_none());
    assert_eq!(value["id"], "1");
    assert!(!format!("{user:?}").contains("d@example.com"));
  }
}
