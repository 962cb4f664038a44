//! [`SqliteStore`], the SQLite implementation of [`MusterStore`].

use std::{path::Path, time::Duration};

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use muster_core::{
  Error as CoreError,
  attendance::{Attendance, AttendanceStatus, AttendanceWithEmployee, NewAttendance},
  employee::{Employee, NewEmployee},
  stats::{DashboardStats, EmployeeStats},
  store::{AttendanceQuery, DateRange, MusterStore, Page},
};

use crate::{
  Error, Result,
  encode::{
    ATTENDANCE_COLUMNS, EMPLOYEE_COLUMNS, RawAttendance, RawAttendanceWithEmployee,
    RawEmployee, encode_date, encode_dt, encode_status,
  },
  schema::SCHEMA,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Muster store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Transaction-local helpers ───────────────────────────────────────────────
//
// These run on the connection thread, inside whichever transaction the caller
// opened. A `Transaction` derefs to `Connection`, so they take the latter.

fn find_employee(
  conn: &rusqlite::Connection,
  employee_code: &str,
) -> rusqlite::Result<Option<RawEmployee>> {
  conn
    .query_row(
      &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_code = ?1"),
      rusqlite::params![employee_code],
      |row| RawEmployee::from_row(row, 0),
    )
    .optional()
}

fn exists(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<bool> {
  Ok(conn.query_row(sql, params, |_| Ok(())).optional()?.is_some())
}

fn count(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<u64> {
  let n: i64 = conn.query_row(sql, params, |row| row.get(0))?;
  Ok(n.max(0) as u64)
}

fn sql_limit(page: Page) -> (i64, i64) {
  (
    i64::try_from(page.limit).unwrap_or(i64::MAX),
    i64::try_from(page.offset).unwrap_or(i64::MAX),
  )
}

/// `true` for UNIQUE, CHECK, NOT NULL and FOREIGN KEY failures.
pub(crate) fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

/// Name the colliding key from SQLite's constraint message when possible,
/// e.g. `UNIQUE constraint failed: employees.email`.
pub(crate) fn employee_conflict(
  e: &rusqlite::Error,
  employee_code: String,
  email: String,
) -> CoreError {
  let message = match e {
    rusqlite::Error::SqliteFailure(_, Some(m)) => m.as_str(),
    _ => "",
  };
  if message.contains("employees.employee_code") {
    CoreError::DuplicateEmployeeCode(employee_code)
  } else if message.contains("employees.email") {
    CoreError::DuplicateEmail(email)
  } else {
    CoreError::DuplicateEmployee
  }
}

// ─── MusterStore impl ────────────────────────────────────────────────────────

impl MusterStore for SqliteStore {
  type Error = Error;

  // ── Employee directory ────────────────────────────────────────────────────

  async fn create_employee(&self, input: NewEmployee) -> Result<Employee> {
    input.validate()?;
    let input = input.normalized();

    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let row        = input.clone();

    let outcome = self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<i64>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if exists(
          &tx,
          "SELECT 1 FROM employees WHERE employee_code = ?1",
          rusqlite::params![row.employee_code],
        )? {
          return Ok(Err(CoreError::DuplicateEmployeeCode(row.employee_code).into()));
        }
        if exists(
          &tx,
          "SELECT 1 FROM employees WHERE email = ?1",
          rusqlite::params![row.email],
        )? {
          return Ok(Err(CoreError::DuplicateEmail(row.email).into()));
        }

        let inserted = tx.execute(
          "INSERT INTO employees (employee_code, full_name, email, department, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            row.employee_code,
            row.full_name,
            row.email,
            row.department,
            at_str,
          ],
        );
        match inserted {
          Ok(_) => {}
          Err(e) if is_constraint_violation(&e) => {
            tx.rollback()?;
            return Ok(Err(employee_conflict(&e, row.employee_code, row.email).into()));
          }
          Err(e) => return Err(e.into()),
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await?;

    Ok(Employee {
      id:            outcome?,
      employee_code: input.employee_code,
      full_name:     input.full_name,
      email:         input.email,
      department:    input.department,
      created_at,
    })
  }

  async fn get_employee(&self, employee_code: &str) -> Result<Employee> {
    let code = employee_code.to_owned();

    let raw = self
      .conn
      .call(move |conn| Ok(find_employee(conn, &code)?))
      .await?;

    raw
      .ok_or_else(|| CoreError::EmployeeNotFound(employee_code.to_owned()))?
      .into_employee()
  }

  async fn list_employees(&self, page: Page) -> Result<Vec<Employee>> {
    let (limit, offset) = sql_limit(page);

    let raws: Vec<RawEmployee> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], |row| {
            RawEmployee::from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  async fn delete_employee(&self, employee_code: &str) -> Result<()> {
    let code = employee_code.to_owned();

    self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<()>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !exists(
          &tx,
          "SELECT 1 FROM employees WHERE employee_code = ?1",
          rusqlite::params![code],
        )? {
          return Ok(Err(CoreError::EmployeeNotFound(code).into()));
        }

        // Children first: the foreign key forbids orphaned attendance rows.
        tx.execute(
          "DELETE FROM attendance WHERE employee_code = ?1",
          rusqlite::params![code],
        )?;
        tx.execute(
          "DELETE FROM employees WHERE employee_code = ?1",
          rusqlite::params![code],
        )?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await?
  }

  // ── Attendance ledger ─────────────────────────────────────────────────────

  async fn mark_attendance(&self, input: NewAttendance) -> Result<Attendance> {
    input.validate()?;

    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let date_str   = encode_date(input.date);
    let status_str = encode_status(input.status);
    let code       = input.employee_code.clone();
    let date       = input.date;

    let outcome = self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<i64>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !exists(
          &tx,
          "SELECT 1 FROM employees WHERE employee_code = ?1",
          rusqlite::params![code],
        )? {
          return Ok(Err(CoreError::EmployeeNotFound(code).into()));
        }

        if exists(
          &tx,
          "SELECT 1 FROM attendance WHERE employee_code = ?1 AND date = ?2",
          rusqlite::params![code, date_str],
        )? {
          return Ok(Err(
            CoreError::DuplicateAttendance { employee_code: code, date }.into(),
          ));
        }

        let inserted = tx.execute(
          "INSERT INTO attendance (employee_code, date, status, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![code, date_str, status_str, at_str],
        );
        match inserted {
          Ok(_) => {}
          Err(e) if is_constraint_violation(&e) => {
            tx.rollback()?;
            return Ok(Err(CoreError::MarkFailed.into()));
          }
          Err(e) => return Err(e.into()),
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await?;

    Ok(Attendance {
      id:            outcome?,
      employee_code: input.employee_code,
      date:          input.date,
      status:        input.status,
      created_at,
    })
  }

  async fn query_attendance(
    &self,
    query: &AttendanceQuery,
  ) -> Result<Vec<AttendanceWithEmployee>> {
    let code_filter    = query.employee_code.clone();
    let start_str      = query.range.start.map(encode_date);
    let end_str        = query.range.end.map(encode_date);
    let (limit, offset) = sql_limit(query.page);

    let raws: Vec<RawAttendanceWithEmployee> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {a_cols}, {e_cols}
           FROM attendance a
           JOIN employees e ON e.employee_code = a.employee_code
           WHERE (?1 IS NULL OR a.employee_code = ?1)
             AND (?2 IS NULL OR a.date >= ?2)
             AND (?3 IS NULL OR a.date <= ?3)
           ORDER BY a.date DESC, a.id DESC
           LIMIT ?4 OFFSET ?5",
          a_cols = prefixed("a", ATTENDANCE_COLUMNS),
          e_cols = prefixed("e", EMPLOYEE_COLUMNS),
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![code_filter, start_str, end_str, limit, offset],
            |row| {
              Ok(RawAttendanceWithEmployee {
                attendance: RawAttendance::from_row(row, 0)?,
                employee:   RawEmployee::from_row(row, 5)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAttendanceWithEmployee::into_enriched)
      .collect()
  }

  async fn employee_attendance(
    &self,
    employee_code: &str,
    range: DateRange,
  ) -> Result<Vec<Attendance>> {
    let code      = employee_code.to_owned();
    let start_str = range.start.map(encode_date);
    let end_str   = range.end.map(encode_date);

    let outcome = self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<Vec<RawAttendance>>> {
        let tx = conn.transaction()?;

        if find_employee(&tx, &code)?.is_none() {
          return Ok(Err(CoreError::EmployeeNotFound(code).into()));
        }

        let rows = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {ATTENDANCE_COLUMNS}
             FROM attendance
             WHERE employee_code = ?1
               AND (?2 IS NULL OR date >= ?2)
               AND (?3 IS NULL OR date <= ?3)
             ORDER BY date DESC, id DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![code, start_str, end_str], |row| {
              RawAttendance::from_row(row, 0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        Ok(Ok(rows))
      })
      .await?;

    outcome?.into_iter().map(RawAttendance::into_attendance).collect()
  }

  async fn delete_attendance(&self, attendance_id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM attendance WHERE id = ?1",
          rusqlite::params![attendance_id],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(CoreError::AttendanceNotFound(attendance_id).into());
    }
    Ok(())
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn employee_stats(&self, employee_code: &str) -> Result<EmployeeStats> {
    let code = employee_code.to_owned();

    let outcome = self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<(RawEmployee, u64, u64)>> {
        let tx = conn.transaction()?;

        let Some(employee) = find_employee(&tx, &code)? else {
          return Ok(Err(CoreError::EmployeeNotFound(code).into()));
        };

        let by_status = |status: AttendanceStatus| {
          count(
            &tx,
            "SELECT COUNT(*) FROM attendance WHERE employee_code = ?1 AND status = ?2",
            rusqlite::params![code, encode_status(status)],
          )
        };
        let present = by_status(AttendanceStatus::Present)?;
        let absent  = by_status(AttendanceStatus::Absent)?;

        tx.commit()?;
        Ok(Ok((employee, present, absent)))
      })
      .await?;

    let (raw, present, absent) = outcome?;
    Ok(EmployeeStats::from_counts(raw.into_employee()?, present, absent))
  }

  async fn dashboard_stats(&self, today: NaiveDate) -> Result<DashboardStats> {
    let today_str = encode_date(today);

    let stats = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let on_day = |status: AttendanceStatus| {
          count(
            &tx,
            "SELECT COUNT(*) FROM attendance WHERE date = ?1 AND status = ?2",
            rusqlite::params![today_str, encode_status(status)],
          )
        };

        let stats = DashboardStats {
          total_employees:          count(&tx, "SELECT COUNT(*) FROM employees", [])?,
          total_attendance_records: count(&tx, "SELECT COUNT(*) FROM attendance", [])?,
          present_today:            on_day(AttendanceStatus::Present)?,
          absent_today:             on_day(AttendanceStatus::Absent)?,
        };

        tx.commit()?;
        Ok(stats)
      })
      .await?;

    Ok(stats)
  }
}

/// `"id, date"` with prefix `a` becomes `"a.id, a.date"`.
fn prefixed(alias: &str, columns: &str) -> String {
  columns
    .split(',')
    .map(|c| format!("{alias}.{}", c.trim()))
    .collect::<Vec<_>>()
    .join(", ")
}
