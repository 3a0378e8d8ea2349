use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::id::{
  marker::{PostMarker, UserMarker},
  Id,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Post {
  pub id: Id<PostMarker>,
  #[sqlx(rename = "user_id")]
  pub user: Id<UserMarker>,
  pub created_at: NaiveDateTime,
  pub text: String,
}
