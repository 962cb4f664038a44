//! The `MusterStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `muster-store-sqlite`).
//! Higher layers (`muster-api`, `muster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  Classify,
  attendance::{Attendance, AttendanceWithEmployee, NewAttendance},
  employee::{Employee, NewEmployee},
  stats::{DashboardStats, EmployeeStats},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// An offset/limit window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub offset: usize,
  pub limit:  usize,
}

impl Page {
  pub const DEFAULT_LIMIT: usize = 100;

  pub fn new(offset: usize, limit: usize) -> Self { Self { offset, limit } }
}

impl Default for Page {
  fn default() -> Self { Self { offset: 0, limit: Self::DEFAULT_LIMIT } }
}

/// Inclusive calendar bounds. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
  pub start: Option<NaiveDate>,
  pub end:   Option<NaiveDate>,
}

impl DateRange {
  pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
    Self { start: Some(start), end: Some(end) }
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
  }
}

/// Parameters for [`MusterStore::query_attendance`]. All filters combine
/// with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceQuery {
  pub employee_code: Option<String>,
  pub range:         DateRange,
  pub page:          Page,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Muster storage backend.
///
/// Every method is one unit of work: it either commits completely or leaves
/// storage untouched. Business failures come back as
/// [`crate::Error`] variants wrapped in `Self::Error`, classified through
/// [`Classify`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MusterStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Employee directory ────────────────────────────────────────────────

  /// Validate and persist a new employee.
  ///
  /// Fails with a conflict if the code or email is already taken.
  fn create_employee(
    &self,
    input: NewEmployee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Look up an employee by code.
  fn get_employee<'a>(
    &'a self,
    employee_code: &'a str,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + 'a;

  /// List employees in insertion order.
  fn list_employees(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  /// Remove an employee together with all of its attendance records.
  fn delete_employee<'a>(
    &'a self,
    employee_code: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Attendance ledger ─────────────────────────────────────────────────

  /// Record one day's status for an existing employee.
  ///
  /// Fails with not-found if the employee is unknown and with a conflict if
  /// the day is already marked.
  fn mark_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<Attendance, Self::Error>> + Send + '_;

  /// Filtered attendance across all employees, newest date first.
  fn query_attendance<'a>(
    &'a self,
    query: &'a AttendanceQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceWithEmployee>, Self::Error>>
  + Send
  + 'a;

  /// Every attendance record of one employee within `range`, newest first.
  fn employee_attendance<'a>(
    &'a self,
    employee_code: &'a str,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<Attendance>, Self::Error>> + Send + 'a;

  /// Remove a single attendance record by id.
  fn delete_attendance(
    &self,
    attendance_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Present/absent totals for one employee.
  fn employee_stats<'a>(
    &'a self,
    employee_code: &'a str,
  ) -> impl Future<Output = Result<EmployeeStats, Self::Error>> + Send + 'a;

  /// Fleet-wide totals, with the "today" counts taken for `today`.
  /// Callers normally pass [`crate::stats::today_utc`].
  fn dashboard_stats(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
