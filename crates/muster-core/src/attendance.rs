//! Attendance facts, owned by the ledger.
//!
//! At most one record exists per `(employee_code, date)`. A record may only
//! be created for an employee that exists at the time of marking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use crate::{Error, Result, employee::Employee, validate};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether the employee was at work on a given day. There is no third state.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
pub enum AttendanceStatus {
  Present,
  Absent,
}

impl AttendanceStatus {
  pub const ALL: [AttendanceStatus; 2] =
    [AttendanceStatus::Present, AttendanceStatus::Absent];

  /// Parse the exact textual form (`"Present"` or `"Absent"`).
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| {
      Error::Validation(format!(
        "status must be one of Present, Absent (got {s:?})"
      ))
    })
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted attendance mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
  pub id:            i64,
  #[serde(rename = "employee_id", alias = "employee_code")]
  pub employee_code: String,
  /// Calendar day, no time component.
  pub date:          NaiveDate,
  pub status:        AttendanceStatus,
  pub created_at:    DateTime<Utc>,
}

/// An attendance record together with the employee that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceWithEmployee {
  #[serde(flatten)]
  pub attendance: Attendance,
  pub employee:   Employee,
}

/// Input to [`crate::store::MusterStore::mark_attendance`].
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewAttendance {
  #[validate(
    custom(function = "validate::not_blank"),
    length(max = 50, message = "must be at most 50 characters")
  )]
  pub employee_code: String,
  pub date:          NaiveDate,
  pub status:        AttendanceStatus,
}

impl NewAttendance {
  pub fn new(
    employee_code: impl Into<String>,
    date: NaiveDate,
    status: AttendanceStatus,
  ) -> Self {
    Self { employee_code: employee_code.into(), date, status }
  }

  /// Build from untyped input, rejecting an unknown status text.
  pub fn parse(
    employee_code: impl Into<String>,
    date: NaiveDate,
    status: &str,
  ) -> Result<Self> {
    let input = Self::new(employee_code, date, AttendanceStatus::parse(status)?);
    input.validate()?;
    Ok(input)
  }

  pub fn validate(&self) -> Result<()> {
    Validate::validate(self)?;
    Ok(())
  }
}
