use std::sync::Arc;

use crate::{config, http::AuthUser, schema::User, store::MemoryStore, App};

pub const JWT_SECRET: &str = "my-test-secret-key";

/// An app backed by a fresh in-memory store.
pub fn test_app() -> (App, Arc<MemoryStore>) {
  crate::logging::init_for_tests();

  let store = Arc::new(MemoryStore::new());
  let app = App::with_store(config::Server::new(JWT_SECRET), store.clone());
  (app, store)
}

pub async fn test_user(store: &MemoryStore, name: &str) -> (User, AuthUser) {
  let email = format!("{}@example.com", name.to_lowercase());
  let user = store.insert_user(name, &email, Some("//gravatar.com/avatar/0")).await;
  let auth = AuthUser { id: user.id };
  (user, auth)
}
