//! Handlers for `/employees` endpoints (the employee directory).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/employees` | Optional `?offset` (alias `skip`) and `?limit` |
//! | `POST`   | `/employees` | Body: [`NewEmployee`]; returns 201 + stored employee |
//! | `GET`    | `/employees/{employee_code}` | 404 if not found |
//! | `DELETE` | `/employees/{employee_code}` | Also deletes the employee's attendance; 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use muster_core::{
  employee::{Employee, NewEmployee},
  store::{MusterStore, Page},
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, Path, Query},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(alias = "skip")]
  pub offset: Option<usize>,
  pub limit:  Option<usize>,
}

impl ListParams {
  pub fn page(&self) -> Page {
    let default = Page::default();
    Page::new(
      self.offset.unwrap_or(default.offset),
      self.limit.unwrap_or(default.limit),
    )
  }
}

/// `GET /employees[?offset=<n>][&limit=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: MusterStore,
{
  let employees = store
    .list_employees(params.page())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(employees))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /employees`: returns 201 + the stored [`Employee`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewEmployee>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MusterStore,
{
  let employee = store
    .create_employee(body)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(
    employee_code = %employee.employee_code,
    id = employee.id,
    "employee created"
  );
  Ok((StatusCode::CREATED, Json(employee)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /employees/{employee_code}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(employee_code): Path<String>,
) -> Result<Json<Employee>, ApiError>
where
  S: MusterStore,
{
  let employee = store
    .get_employee(&employee_code)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(employee))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /employees/{employee_code}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(employee_code): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: MusterStore,
{
  store
    .delete_employee(&employee_code)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(%employee_code, "employee deleted");
  Ok(StatusCode::NO_CONTENT)
}
