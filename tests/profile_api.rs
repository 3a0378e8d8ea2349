#![allow(clippy::unwrap_used)]

use actix_web::{http::StatusCode, test, web, App as ActixApp};
use chatbook::http::{auth::TOKEN_HEADER, controllers};
use serde_json::{json, Value};

mod common;
use common::Harness;

macro_rules! service {
  ($harness:expr) => {
    test::init_service(
      ActixApp::new()
        .app_data($harness.app.clone())
        .configure(controllers::configure),
    )
    .await
  };
}

fn profile_body() -> Value {
  json!({
    "status": "Developer",
    "skills": "js, node, css",
    "company": "ChatBook",
    "website": "chatbook.dev",
    "githubusername": "dishebh",
    "twitter": "https://twitter.com/dishebh",
  })
}

#[actix_web::test]
async fn protected_routes_require_token() {
  let harness = Harness::new();
  let service = service!(harness);

  let req = test::TestRequest::get().uri("/api/profile/me").to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(
    body,
    json!({ "type": "unauthorized", "msg": "No token, authorization denied" })
  );

  let req = test::TestRequest::delete()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, "not-a-token"))
    .to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body["msg"], "Token is not valid");
}

#[actix_web::test]
async fn profile_lifecycle() {
  let harness = Harness::new();
  let (user, token) = harness.user("Dishebh").await;
  let service = service!(harness);

  // no profile yet
  let req = test::TestRequest::get()
    .uri("/api/profile/me")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body["msg"], "There is no profile for this user!");

  // create, then update the same document
  let req = test::TestRequest::post()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(profile_body())
    .to_request();
  let created: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(created["skills"], json!(["js", "node", "css"]));
  assert_eq!(created["website"], "http://chatbook.dev");
  assert_eq!(created["social"], json!({ "twitter": "https://twitter.com/dishebh" }));
  assert_eq!(created["user"], json!(user.id.to_string()));

  let mut update = profile_body();
  update["status"] = json!("Senior Developer");
  let req = test::TestRequest::post()
    .uri("/api/profile/")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(update)
    .to_request();
  let updated: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(updated["id"], created["id"]);
  assert_eq!(updated["status"], "Senior Developer");
  assert_eq!(harness.store.profile_count().await, 1);

  // the joined view
  let req = test::TestRequest::get()
    .uri("/api/profile/me")
    .insert_header(("Authorization", format!("Bearer {token}")))
    .to_request();
  let me: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(me["user"]["name"], "Dishebh");

  let req = test::TestRequest::get()
    .uri(&format!("/api/profile/{}", user.id))
    .to_request();
  let public: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(public, me);

  let req = test::TestRequest::get().uri("/api/profile").to_request();
  let all: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(all.as_array().map(Vec::len), Some(1));

  // delete removes posts too
  harness.store.insert_post(user.id, "hello").await;
  let req = test::TestRequest::delete()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let deleted: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(deleted, json!({ "msg": "User deleted!" }));
  assert!(harness.store.posts_by(user.id).await.is_empty());
  assert_eq!(harness.store.profile_count().await, 0);
}

#[actix_web::test]
async fn upsert_reports_field_errors() {
  let harness = Harness::new();
  let (_, token) = harness.user("Dishebh").await;
  let service = service!(harness);

  let req = test::TestRequest::post()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(json!({ "company": "ChatBook" }))
    .to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(
    body,
    json!({
      "type": "invalid_form_body",
      "errors": [
        { "param": "status", "msg": "Status is required" },
        { "param": "skills", "msg": "Skills are required" },
      ],
    })
  );

  let req = test::TestRequest::post()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .insert_header(("content-type", "application/json"))
    .set_payload("{ not json")
    .to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body["type"], "invalid_form_body");
  assert_eq!(body["errors"][0]["param"], "body");
}

#[actix_web::test]
async fn malformed_ids_are_rejected() {
  let harness = Harness::new();
  let (_, token) = harness.user("Dishebh").await;
  let service = service!(harness);

  let req = test::TestRequest::get().uri("/api/profile/not-an-id").to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body["errors"][0]["param"], "user_id");

  let req = test::TestRequest::get().uri("/api/profile/12345").to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body, json!({ "type": "not_found", "msg": "Profile not found!" }));

  let req = test::TestRequest::delete()
    .uri("/api/profile/experience/0")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let res = test::call_service(&service, req).await;
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body["errors"][0]["param"], "exp_id");
}

#[actix_web::test]
async fn experience_and_education_entries() {
  let harness = Harness::new();
  let (_, token) = harness.user("Dishebh").await;
  let service = service!(harness);

  let req = test::TestRequest::post()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(profile_body())
    .to_request();
  let res = test::call_service(&service, req).await;
  assert!(res.status().is_success());

  let req = test::TestRequest::put()
    .uri("/api/profile/experience")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(json!({
      "title": "Intern",
      "company": "ChatBook",
      "from": "2021-01-01",
      "to": "2020-01-01",
    }))
    .to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::put()
    .uri("/api/profile/experience")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(json!({ "title": "Intern", "company": "ChatBook", "from": "2020-01-01" }))
    .to_request();
  let profile: Value = test::call_and_read_body_json(&service, req).await;
  let exp_id = profile["experience"][0]["id"].as_str().unwrap().to_string();

  for school in ["High School", "University"] {
    let req = test::TestRequest::put()
      .uri("/api/profile/education")
      .insert_header((TOKEN_HEADER, token.as_str()))
      .set_json(json!({
        "school": school,
        "degree": "Diploma",
        "fieldofstudy": "Science",
        "from": "2010-06-01",
        "to": "2014-03-01",
      }))
      .to_request();
    let res = test::call_service(&service, req).await;
    assert!(res.status().is_success());
  }

  // unknown ids change nothing
  let req = test::TestRequest::delete()
    .uri("/api/profile/education/987654")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let profile: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(profile["education"][0]["school"], "University");
  assert_eq!(profile["education"][1]["school"], "High School");

  let edu_id = profile["education"][0]["id"].as_str().unwrap().to_string();
  let req = test::TestRequest::delete()
    .uri(&format!("/api/profile/education/{edu_id}"))
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let profile: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(profile["education"].as_array().map(Vec::len), Some(1));

  let req = test::TestRequest::delete()
    .uri(&format!("/api/profile/experience/{exp_id}"))
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let profile: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(profile["experience"], json!([]));
}

#[actix_web::test]
async fn current_user_and_unknown_routes() {
  let harness = Harness::new();
  let (user, token) = harness.user("Dishebh").await;
  let service = service!(harness);

  let req = test::TestRequest::get()
    .uri("/api/auth")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(body["id"], json!(user.id.to_string()));
  assert_eq!(body["name"], "Dishebh");
  assert!(body.get("password_hash").is_none());

  let req = test::TestRequest::get().uri("/api/nothing-here").to_request();
  let res = test::call_service(&service, req).await;
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(res).await;
  assert_eq!(body, json!({ "type": "not_found", "msg": "Route not found" }));
}

#[actix_web::test]
async fn blank_dates_are_treated_as_missing() {
  let harness = Harness::new();
  let (_, token) = harness.user("Dishebh").await;
  let service = service!(harness);

  let req = test::TestRequest::post()
    .uri("/api/profile")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .set_json(profile_body())
    .to_request();
  let res = test::call_service(&service, req).await;
  assert!(res.status().is_success());

  let entries = [
    (
      "/api/profile/experience",
      json!({ "title": "Intern", "company": "ChatBook" }),
    ),
    (
      "/api/profile/education",
      json!({ "school": "University", "degree": "BSc", "fieldofstudy": "Science" }),
    ),
  ];

  for (uri, base) in entries {
    let mut body = base.clone();
    body["from"] = json!("2020-01-01");
    body["to"] = json!("");
    body["current"] = json!(null);
    let req = test::TestRequest::put()
      .uri(uri)
      .insert_header((TOKEN_HEADER, token.as_str()))
      .set_json(body)
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK, "{uri}");

    let mut body = base.clone();
    body["from"] = json!("");
    let req = test::TestRequest::put()
      .uri(uri)
      .insert_header((TOKEN_HEADER, token.as_str()))
      .set_json(body)
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["type"], "invalid_form_body");
    assert_eq!(body["errors"][0]["param"], "from", "{uri}");
  }

  let req = test::TestRequest::get()
    .uri("/api/profile/me")
    .insert_header((TOKEN_HEADER, token.as_str()))
    .to_request();
  let profile: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(profile["experience"][0]["to"], json!(null));
  assert_eq!(profile["experience"][0]["current"], json!(false));
  assert_eq!(profile["education"][0]["to"], json!(null));
}
