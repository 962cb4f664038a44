//! Handlers for `/attendance/stats/*` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
};
use muster_core::{
  stats::{DashboardStats, EmployeeStats, today_utc},
  store::MusterStore,
};

use crate::{error::ApiError, extract::Path};

/// `GET /attendance/stats/employee/{employee_code}`
pub async fn employee<S>(
  State(store): State<Arc<S>>,
  Path(employee_code): Path<String>,
) -> Result<Json<EmployeeStats>, ApiError>
where
  S: MusterStore,
{
  let stats = store
    .employee_stats(&employee_code)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

/// `GET /attendance/stats/dashboard`. "Today" is the current UTC date.
pub async fn dashboard<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  S: MusterStore,
{
  let stats = store
    .dashboard_stats(today_utc())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
