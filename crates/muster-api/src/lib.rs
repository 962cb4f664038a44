//! JSON REST API for Muster.
//!
//! Exposes an axum [`Router`] backed by any [`muster_core::store::MusterStore`].
//! Transport concerns (TLS, CORS, request tracing) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", muster_api::api_router(store.clone()))
//! ```

pub mod attendance;
pub mod employees;
pub mod error;
pub mod extract;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};
use muster_core::store::MusterStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MusterStore + Send + Sync + 'static,
{
  Router::new()
    // Employee directory
    .route("/employees", get(employees::list::<S>).post(employees::create::<S>))
    .route(
      "/employees/{employee_code}",
      get(employees::get_one::<S>).delete(employees::delete_one::<S>),
    )
    // Attendance ledger
    .route("/attendance", get(attendance::query::<S>).post(attendance::mark::<S>))
    .route("/attendance/{id}", delete(attendance::delete_one::<S>))
    .route(
      "/attendance/employee/{employee_code}",
      get(attendance::for_employee::<S>),
    )
    // Statistics
    .route(
      "/attendance/stats/employee/{employee_code}",
      get(stats::employee::<S>),
    )
    .route("/attendance/stats/dashboard", get(stats::dashboard::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use muster_core::stats::today_utc;
  use muster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn employee(code: &str) -> Value {
    json!({
      "employee_id": code,
      "full_name":   format!("Employee {code}"),
      "email":       format!("{}@example.com", code.to_lowercase()),
      "department":  "Operations",
    })
  }

  async fn create(app: &Router, code: &str) {
    let resp = send(app, "POST", "/employees", Some(employee(code))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  async fn mark(app: &Router, code: &str, date: &str, status: &str) -> Response {
    send(
      app,
      "POST",
      "/attendance",
      Some(json!({ "employee_id": code, "date": date, "status": status })),
    )
    .await
  }

  // ── Employees ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_and_get_returns_same_record() {
    let app = app().await;

    let resp = send(&app, "POST", "/employees", Some(employee("E1"))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["employee_id"], "E1");
    assert!(created["id"].as_i64().unwrap() > 0);
    assert!(created["created_at"].is_string());

    let resp = send(&app, "GET", "/employees/E1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, created);
  }

  #[tokio::test]
  async fn employee_code_is_accepted_and_answered_as_employee_id() {
    let app = app().await;
    let body = json!({
      "employee_code": "L1",
      "full_name":     "Legacy",
      "email":         "legacy@example.com",
      "department":    "Ops",
    });
    let resp = send(&app, "POST", "/employees", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["employee_id"], "L1");
    assert!(created.get("employee_code").is_none());

    let resp = send(
      &app,
      "POST",
      "/attendance",
      Some(json!({ "employee_code": "L1", "date": "2024-02-01", "status": "Absent" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["employee_id"], "L1");
  }

  #[tokio::test]
  async fn duplicate_employee_returns_409() {
    let app = app().await;
    create(&app, "E1").await;

    let resp = send(&app, "POST", "/employees", Some(employee("E1"))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("E1"), "{body}");
  }

  #[tokio::test]
  async fn invalid_employee_returns_422() {
    let app = app().await;
    let mut body = employee("E1");
    body["email"] = json!("nope");
    let resp = send(&app, "POST", "/employees", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn list_honours_skip_and_limit() {
    let app = app().await;
    for code in ["A", "B", "C"] {
      create(&app, code).await;
    }

    let resp = send(&app, "GET", "/employees?skip=1&limit=1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["employee_id"], "B");
  }

  #[tokio::test]
  async fn unknown_employee_returns_404() {
    let app = app().await;
    let resp = send(&app, "GET", "/employees/ghost", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Employee with ID 'ghost' not found");

    let resp = send(&app, "DELETE", "/employees/ghost", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_employee_returns_204_and_drops_attendance() {
    let app = app().await;
    create(&app, "E1").await;
    mark(&app, "E1", "2024-02-01", "Present").await;

    let resp = send(&app, "DELETE", "/employees/E1", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "GET", "/attendance?employee_code=E1", None).await;
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn undecodable_requests_use_the_error_body() {
    let app = app().await;
    create(&app, "E1").await;

    for (method, uri) in [
      ("GET", "/employees?limit=-1"),
      ("GET", "/employees?skip=many"),
      ("GET", "/attendance?start_date=yesterday"),
      ("GET", "/attendance/employee/E1?end_date=2024-13-40"),
      ("DELETE", "/attendance/abc"),
    ] {
      let resp = send(&app, method, uri, None).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
      let body = json_body(resp).await;
      assert!(body["error"].is_string(), "{method} {uri}: {body}");
    }
  }

  #[tokio::test]
  async fn malformed_json_body_uses_the_error_body() {
    let app = app().await;

    let req = Request::builder()
      .method("POST")
      .uri("/employees")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let resp = send(&app, "POST", "/attendance", Some(json!({ "employee_id": "E1" }))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(resp).await["error"].is_string());
  }

  // ── Attendance ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mark_returns_201_then_duplicate_returns_409() {
    let app = app().await;
    create(&app, "E1").await;

    let resp = mark(&app, "E1", "2024-02-01", "Present").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "Present");
    assert_eq!(body["date"], "2024-02-01");

    let resp = mark(&app, "E1", "2024-02-01", "Absent").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(
      body["error"],
      "Attendance already marked for employee 'E1' on 2024-02-01"
    );
  }

  #[tokio::test]
  async fn mark_for_unknown_employee_returns_404() {
    let app = app().await;
    let resp = mark(&app, "ghost", "2024-02-01", "Present").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn mark_with_unknown_status_returns_422() {
    let app = app().await;
    create(&app, "E1").await;
    let resp = mark(&app, "E1", "2024-02-01", "Late").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn query_filters_and_enriches() {
    let app = app().await;
    create(&app, "E1").await;
    create(&app, "E2").await;
    for date in ["2024-02-01", "2024-02-02", "2024-02-03"] {
      mark(&app, "E1", date, "Present").await;
    }
    mark(&app, "E2", "2024-02-02", "Absent").await;

    let resp = send(
      &app,
      "GET",
      "/attendance?employee_id=E1&start_date=2024-02-02&end_date=2024-02-03",
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2024-02-03");
    assert_eq!(rows[1]["date"], "2024-02-02");
    assert_eq!(rows[0]["employee_id"], "E1");
    assert_eq!(rows[0]["employee"]["employee_id"], "E1");

    let resp = send(&app, "GET", "/attendance?employee_id=", None).await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 4);
  }

  #[tokio::test]
  async fn employee_attendance_endpoint() {
    let app = app().await;
    create(&app, "E1").await;
    mark(&app, "E1", "2024-02-01", "Present").await;
    mark(&app, "E1", "2024-02-05", "Absent").await;

    let resp = send(&app, "GET", "/attendance/employee/E1?end_date=2024-02-04", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["date"], "2024-02-01");
    assert!(body[0].get("employee").is_none());

    let resp = send(&app, "GET", "/attendance/employee/ghost", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_attendance_endpoint() {
    let app = app().await;
    create(&app, "E1").await;
    let resp = mark(&app, "E1", "2024-02-01", "Present").await;
    let id = json_body(resp).await["id"].as_i64().unwrap();

    let resp = send(&app, "DELETE", &format!("/attendance/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, "DELETE", &format!("/attendance/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Stats ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn employee_stats_endpoint() {
    let app = app().await;
    create(&app, "E1").await;
    for (date, status) in [
      ("2024-02-01", "Present"),
      ("2024-02-02", "Present"),
      ("2024-02-03", "Present"),
      ("2024-02-04", "Absent"),
      ("2024-02-05", "Absent"),
    ] {
      mark(&app, "E1", date, status).await;
    }

    let resp = send(&app, "GET", "/attendance/stats/employee/E1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["employee_id"], "E1");
    assert_eq!(body["department"], "Operations");
    assert_eq!(body["total_present"], 3);
    assert_eq!(body["total_absent"], 2);
    assert_eq!(body["total_days"], 5);

    let resp = send(&app, "GET", "/attendance/stats/employee/ghost", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn dashboard_uses_todays_date() {
    let app = app().await;
    create(&app, "E1").await;
    create(&app, "E2").await;
    let today = today_utc().to_string();
    mark(&app, "E1", &today, "Present").await;
    mark(&app, "E2", &today, "Absent").await;

    let resp = send(&app, "GET", "/attendance/stats/dashboard", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      json_body(resp).await,
      json!({
        "total_employees":          2,
        "total_attendance_records": 2,
        "present_today":            1,
        "absent_today":             1,
      })
    );
  }
}
