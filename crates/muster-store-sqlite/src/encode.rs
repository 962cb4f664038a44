//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO
//! `YYYY-MM-DD` (so lexical order is date order), and statuses by name.

use chrono::{DateTime, NaiveDate, Utc};
use muster_core::{
  attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee},
  employee::Employee,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── AttendanceStatus ─────────────────────────────────────────────────────────

pub fn encode_status(s: AttendanceStatus) -> &'static str {
  match s {
    AttendanceStatus::Present => "Present",
    AttendanceStatus::Absent => "Absent",
  }
}

pub fn decode_status(s: &str) -> Result<AttendanceStatus> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown attendance status: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const EMPLOYEE_COLUMNS: &str =
  "id, employee_code, full_name, email, department, created_at";

pub const ATTENDANCE_COLUMNS: &str = "id, employee_code, date, status, created_at";

/// Raw values read directly from an `employees` row.
#[derive(Debug)]
pub struct RawEmployee {
  pub id:            i64,
  pub employee_code: String,
  pub full_name:     String,
  pub email:         String,
  pub department:    String,
  pub created_at:    String,
}

impl RawEmployee {
  /// Read the six [`EMPLOYEE_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(at)?,
      employee_code: row.get(at + 1)?,
      full_name:     row.get(at + 2)?,
      email:         row.get(at + 3)?,
      department:    row.get(at + 4)?,
      created_at:    row.get(at + 5)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      id:            self.id,
      employee_code: self.employee_code,
      full_name:     self.full_name,
      email:         self.email,
      department:    self.department,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `attendance` row.
#[derive(Debug)]
pub struct RawAttendance {
  pub id:            i64,
  pub employee_code: String,
  pub date:          String,
  pub status:        String,
  pub created_at:    String,
}

impl RawAttendance {
  /// Read the five [`ATTENDANCE_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(at)?,
      employee_code: row.get(at + 1)?,
      date:          row.get(at + 2)?,
      status:        row.get(at + 3)?,
      created_at:    row.get(at + 4)?,
    })
  }

  pub fn into_attendance(self) -> Result<Attendance> {
    Ok(Attendance {
      id:            self.id,
      employee_code: self.employee_code,
      date:          decode_date(&self.date)?,
      status:        decode_status(&self.status)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// An attendance row joined with its owning employee.
#[derive(Debug)]
pub struct RawAttendanceWithEmployee {
  pub attendance: RawAttendance,
  pub employee:   RawEmployee,
}

impl RawAttendanceWithEmployee {
  pub fn into_enriched(self) -> Result<AttendanceWithEmployee> {
    Ok(AttendanceWithEmployee {
      attendance: self.attendance.into_attendance()?,
      employee:   self.employee.into_employee()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_sort_lexically() {
    let a = encode_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    let b = encode_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(a, "2023-12-31");
    assert!(a < b);
  }

  #[test]
  fn status_names_match_the_check_constraint() {
    for s in AttendanceStatus::ALL {
      assert_eq!(decode_status(encode_status(s)).unwrap(), s);
    }
    assert!(matches!(decode_status("Late"), Err(Error::Decode(_))));
  }

  #[test]
  fn bad_timestamp_is_a_decode_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::Decode(_))));
  }
}
