//! Read-only attendance summaries.
//!
//! Nothing here is stored; every value is recomputed from the ledger on
//! request.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::employee::Employee;

/// Per-employee attendance totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStats {
  #[serde(rename = "employee_id", alias = "employee_code")]
  pub employee_code: String,
  pub full_name:     String,
  pub department:    String,
  pub total_present: u64,
  pub total_absent:  u64,
  /// Always `total_present + total_absent`.
  pub total_days:    u64,
}

impl EmployeeStats {
  pub fn from_counts(employee: Employee, present: u64, absent: u64) -> Self {
    Self {
      employee_code: employee.employee_code,
      full_name:     employee.full_name,
      department:    employee.department,
      total_present: present,
      total_absent:  absent,
      total_days:    present + absent,
    }
  }
}

/// Fleet-wide counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total_employees:          u64,
  pub total_attendance_records: u64,
  pub present_today:            u64,
  pub absent_today:             u64,
}

/// The calendar day that "today" means for [`DashboardStats`].
///
/// UTC is used everywhere so results do not depend on the host's zone.
pub fn today_utc() -> NaiveDate { Utc::now().date_naive() }
