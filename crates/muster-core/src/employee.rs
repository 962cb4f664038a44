//! Employee identity records, owned by the directory.
//!
//! Employees are created and deleted but never updated. Deleting an employee
//! destroys every attendance record that references its code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{Result, validate};

/// A persisted employee.
///
/// The code travels as `employee_id` on the wire, the name existing clients
/// read; `employee_code` is accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  /// Store-assigned surrogate key; never reused.
  pub id:            i64,
  /// Caller-supplied identifier, globally unique and immutable.
  #[serde(rename = "employee_id", alias = "employee_code")]
  pub employee_code: String,
  pub full_name:     String,
  /// Globally unique.
  pub email:         String,
  pub department:    String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::MusterStore::create_employee`].
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewEmployee {
  #[serde(rename = "employee_id", alias = "employee_code")]
  #[validate(
    custom(function = "validate::not_blank"),
    length(max = 50, message = "must be at most 50 characters")
  )]
  pub employee_code: String,

  #[validate(
    custom(function = "validate::not_blank"),
    length(max = 255, message = "must be at most 255 characters")
  )]
  pub full_name: String,

  #[validate(
    email(message = "is not a valid email address"),
    custom(function = "validate::dot_atom_email"),
    length(max = 255, message = "must be at most 255 characters")
  )]
  pub email: String,

  #[validate(
    custom(function = "validate::not_blank"),
    length(max = 100, message = "must be at most 100 characters")
  )]
  pub department: String,
}

impl NewEmployee {
  pub fn new(
    employee_code: impl Into<String>,
    full_name: impl Into<String>,
    email: impl Into<String>,
    department: impl Into<String>,
  ) -> Self {
    Self {
      employee_code: employee_code.into(),
      full_name:     full_name.into(),
      email:         email.into(),
      department:    department.into(),
    }
  }

  /// Check every field's syntax. Uniqueness is the store's job.
  pub fn validate(&self) -> Result<()> {
    Validate::validate(self)?;
    Ok(())
  }

  /// The form that gets stored and compared: the email domain lowercased.
  pub fn normalized(mut self) -> Self {
    self.email = validate::normalize_email(&self.email);
    self
  }
}
