//! Field-level syntactic checks run before any business rule.
//!
//! Input types derive [`validator::Validate`]; the functions here are the
//! custom rules plugged into those derives, plus the conversion of a
//! [`ValidationErrors`] report into [`Error::Validation`].

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::Error;

fn rule(code: &'static str, message: &'static str) -> ValidationError {
  ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Reject empty and whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(rule("blank", "cannot be empty"));
  }
  Ok(())
}

/// Dot-atom rules the `email` validator leaves open: the local part may not
/// start or end with a dot or hold two in a row, and the domain needs at
/// least one dot.
pub fn dot_atom_email(value: &str) -> Result<(), ValidationError> {
  let invalid = || rule("email", "is not a valid email address");

  let (local, domain) = value.rsplit_once('@').ok_or_else(invalid)?;
  if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
    return Err(invalid());
  }
  if !domain.contains('.') {
    return Err(invalid());
  }
  Ok(())
}

/// Lowercase the domain of an address; the local part is kept verbatim.
pub fn normalize_email(value: &str) -> String {
  match value.rsplit_once('@') {
    Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
    None => value.to_owned(),
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self {
    let mut problems: Vec<String> = errors
      .field_errors()
      .into_iter()
      .flat_map(|(field, errs)| {
        errs.iter().map(move |e| match &e.message {
          Some(m) => format!("{field} {m}"),
          None => format!("{field} is invalid ({})", e.code),
        })
      })
      .collect();
    problems.sort();
    problems.dedup();
    Error::Validation(problems.join("; "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use validator::ValidateEmail as _;

  fn valid_email(s: &str) -> bool { s.validate_email() && dot_atom_email(s).is_ok() }

  #[test]
  fn blank_text_is_rejected() {
    assert!(not_blank("").is_err());
    assert!(not_blank("   \t").is_err());
    assert!(not_blank("Ada").is_ok());
  }

  #[test]
  fn accepts_ordinary_addresses() {
    for ok in ["ada@example.com", "first.last+tag@mail.example.co.uk"] {
      assert!(valid_email(ok), "{ok}");
    }
  }

  #[test]
  fn rejects_malformed_addresses() {
    for bad in [
      "",
      "plain",
      "@example.com",
      "ada@",
      "ada@localhost",
      "ada@@example.com",
      "ada@exa mple.com",
      "ada@example..com",
      "ada@.example.com",
      ".ada@example.com",
      "ada.@example.com",
      "a..b@example.com",
      "ada@exa_mple.com",
      "ada@-example-.com",
      "a<b>@example.com",
      "ada@example.c0m\0",
    ] {
      assert!(!valid_email(bad), "{bad:?} should be rejected");
    }
  }

  #[test]
  fn only_the_domain_is_lowercased() {
    assert_eq!(normalize_email("Ada.L@EXAMPLE.Com"), "Ada.L@example.com");
    assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
  }

  #[test]
  fn report_names_each_failing_field() {
    let mut errors = ValidationErrors::new();
    errors.add("department", rule("blank", "cannot be empty"));
    errors.add("email", rule("email", "is not a valid email address"));

    let Error::Validation(msg) = Error::from(errors) else {
      panic!("expected a validation error");
    };
    assert_eq!(
      msg,
      "department cannot be empty; email is not a valid email address"
    );
  }
}
