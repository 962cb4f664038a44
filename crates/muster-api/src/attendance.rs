//! Handlers for `/attendance` endpoints (the attendance ledger).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/attendance` | Optional `employee_id` (alias `employee_code`), `start_date`, `end_date`, `offset`, `limit` |
//! | `POST`   | `/attendance` | Body: [`MarkBody`]; returns 201 + stored record |
//! | `GET`    | `/attendance/employee/{employee_code}` | Optional `start_date`, `end_date`; unpaged |
//! | `DELETE` | `/attendance/{id}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use muster_core::{
  attendance::{Attendance, AttendanceWithEmployee, NewAttendance},
  store::{AttendanceQuery, DateRange, MusterStore, Page},
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, Path, Query},
};

// ─── Mark ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /attendance`.
///
/// `status` is kept as text so an unknown value is reported as a validation
/// error by the core rather than as a body decoding failure.
#[derive(Debug, Deserialize)]
pub struct MarkBody {
  #[serde(rename = "employee_id", alias = "employee_code")]
  pub employee_code: String,
  pub date:          NaiveDate,
  pub status:        String,
}

/// `POST /attendance`: returns 201 + the stored [`Attendance`].
pub async fn mark<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<MarkBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MusterStore,
{
  let input = NewAttendance::parse(body.employee_code, body.date, &body.status)?;
  let record = store
    .mark_attendance(input)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(
    employee_code = %record.employee_code,
    date = %record.date,
    status = %record.status,
    "attendance marked"
  );
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Query ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QueryParams {
  #[serde(rename = "employee_id", alias = "employee_code")]
  pub employee_code: Option<String>,
  pub start_date:    Option<NaiveDate>,
  pub end_date:      Option<NaiveDate>,
  #[serde(alias = "skip")]
  pub offset:        Option<usize>,
  pub limit:         Option<usize>,
}

impl From<QueryParams> for AttendanceQuery {
  fn from(p: QueryParams) -> Self {
    let default = Page::default();
    AttendanceQuery {
      // An empty `employee_id=` means "no filter".
      employee_code: p.employee_code.filter(|c| !c.is_empty()),
      range:         DateRange { start: p.start_date, end: p.end_date },
      page:          Page::new(
        p.offset.unwrap_or(default.offset),
        p.limit.unwrap_or(default.limit),
      ),
    }
  }
}

/// `GET /attendance[?employee_id=..][&start_date=..][&end_date=..][&offset=..][&limit=..]`
pub async fn query<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<QueryParams>,
) -> Result<Json<Vec<AttendanceWithEmployee>>, ApiError>
where
  S: MusterStore,
{
  let query = AttendanceQuery::from(params);
  let rows = store
    .query_attendance(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rows))
}

// ─── Per employee ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RangeParams {
  pub start_date: Option<NaiveDate>,
  pub end_date:   Option<NaiveDate>,
}

/// `GET /attendance/employee/{employee_code}[?start_date=..][&end_date=..]`
pub async fn for_employee<S>(
  State(store): State<Arc<S>>,
  Path(employee_code): Path<String>,
  Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Attendance>>, ApiError>
where
  S: MusterStore,
{
  let range = DateRange { start: params.start_date, end: params.end_date };
  let rows = store
    .employee_attendance(&employee_code, range)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rows))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /attendance/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: MusterStore,
{
  store
    .delete_attendance(id)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(id, "attendance deleted");
  Ok(StatusCode::NO_CONTENT)
}
