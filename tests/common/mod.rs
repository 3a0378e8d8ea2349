#![allow(dead_code)]
use actix_web::web;
use chatbook::{config, http::Jwt, schema::User, store::MemoryStore, App};
use std::sync::Arc;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct Harness {
  pub app: web::Data<App>,
  pub store: Arc<MemoryStore>,
}

impl Harness {
  pub fn new() -> Self {
    chatbook::logging::init_for_tests();

    let store = Arc::new(MemoryStore::new());
    let app = App::with_store(config::Server::new(JWT_SECRET), store.clone());
    Self {
      app: web::Data::new(app),
      store,
    }
  }

  pub async fn user(&self, name: &str) -> (User, String) {
    let email = format!("{}@example.com", name.to_lowercase());
    let user = self.store.insert_user(name, &email, None).await;
    let token = Jwt::new(user.id, &self.app.config)
      .encode(&self.app.config)
      .unwrap();
    (user, token)
  }
}
