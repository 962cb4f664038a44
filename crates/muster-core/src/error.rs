//! Error types for `muster-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(String),

  #[error("Employee with ID '{0}' not found")]
  EmployeeNotFound(String),

  #[error("Attendance record with ID {0} not found")]
  AttendanceNotFound(i64),

  #[error("Employee ID '{0}' already exists")]
  DuplicateEmployeeCode(String),

  #[error("Email address '{0}' already exists")]
  DuplicateEmail(String),

  /// Raised when the backend reports a uniqueness violation without naming
  /// the offending column.
  #[error("Employee with this ID or email already exists")]
  DuplicateEmployee,

  #[error("Attendance already marked for employee '{employee_code}' on {date}")]
  DuplicateAttendance {
    employee_code: String,
    date:          NaiveDate,
  },

  #[error("failed to mark attendance")]
  MarkFailed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// The caller-facing category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Input broke a field-level rule; the caller must correct it.
  Validation,
  /// A referenced employee or attendance record does not exist.
  NotFound,
  /// A uniqueness or duplicate-prevention rule would be violated.
  Conflict,
  /// Anything else: connectivity loss, corrupt rows, unexpected constraints.
  Internal,
}

/// Implemented by every error a [`crate::store::MusterStore`] can return so
/// transport layers can pick a response without knowing the backend.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Validation(_) => ErrorKind::Validation,
      Error::EmployeeNotFound(_) | Error::AttendanceNotFound(_) => {
        ErrorKind::NotFound
      }
      Error::DuplicateEmployeeCode(_)
      | Error::DuplicateEmail(_)
      | Error::DuplicateEmployee
      | Error::DuplicateAttendance { .. }
      | Error::MarkFailed => ErrorKind::Conflict,
    }
  }
}

impl Classify for std::convert::Infallible {
  fn kind(&self) -> ErrorKind { match *self {} }
}
