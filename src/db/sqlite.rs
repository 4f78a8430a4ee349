use rusqlite::types::{FromSql, Value};
use rusqlite::{Connection, Row, ToSql};
use std::path::Path;

use super::{finish, report_error, start};
use crate::error::Result;
use crate::models::{Command, ExecuteKind, ParamValue};
use crate::profiler::DbProfiler;

/// A SQLite connection whose statements are reported to a profiler
pub struct ProfiledConnection<P: DbProfiler> {
    conn: Connection,
    profiler: P,
}

impl<P: DbProfiler> ProfiledConnection<P> {
    pub fn new(conn: Connection, profiler: P) -> Self {
        Self { conn, profiler }
    }

    /// Open (or create) a database file, creating parent directories as needed
    pub fn open(path: &Path, profiler: P) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self::new(conn, profiler))
    }

    pub fn open_in_memory(profiler: P) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::new(conn, profiler))
    }

    pub fn profiler(&self) -> &P {
        &self.profiler
    }

    /// Run a statement that returns no rows, returning the number of rows changed
    pub fn execute(&mut self, command: &Command) -> Result<usize> {
        let kind = ExecuteKind::NonQuery;
        let active = start(&mut self.profiler, command, kind);

        let values = named_values(command);
        let result = self.conn.prepare(&command.text).and_then(|mut stmt| {
            let params = param_refs(&values);
            stmt.execute(params.as_slice())
        });

        finish(&mut self.profiler, active, command, kind, result)
    }

    /// Run several semicolon-separated statements without parameters
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        let command = Command::new(sql);
        let kind = ExecuteKind::NonQuery;
        let active = start(&mut self.profiler, &command, kind);

        let result = self.conn.execute_batch(sql);

        finish(&mut self.profiler, active, &command, kind, result)
    }

    /// Run a statement and return the first column of its first row
    pub fn query_scalar<T: FromSql>(&mut self, command: &Command) -> Result<T> {
        let kind = ExecuteKind::Scalar;
        let active = start(&mut self.profiler, command, kind);

        let values = named_values(command);
        let result = self.conn.prepare(&command.text).and_then(|mut stmt| {
            let params = param_refs(&values);
            stmt.query_row(params.as_slice(), |row| row.get(0))
        });

        finish(&mut self.profiler, active, command, kind, result)
    }

    /// Run a query and map every row.
    ///
    /// The profiler sees the execution finish once the statement is bound and
    /// stepping has begun, and the reader finish after the last row is mapped.
    pub fn query_map<T, F>(&mut self, command: &Command, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let kind = ExecuteKind::Reader;
        let active = start(&mut self.profiler, command, kind);

        let values = named_values(command);
        let params = param_refs(&values);

        let mut stmt = match self.conn.prepare(&command.text) {
            Ok(stmt) => stmt,
            Err(e) => return Err(report_error(&mut self.profiler, active, command, kind, e)),
        };
        let mut rows = match stmt.query(params.as_slice()) {
            Ok(rows) => rows,
            Err(e) => return Err(report_error(&mut self.profiler, active, command, kind, e)),
        };

        if active {
            self.profiler.execute_finish(command, kind);
        }

        let mut items = Vec::new();
        loop {
            let row = match rows.next() {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => return Err(report_error(&mut self.profiler, active, command, kind, e)),
            };
            match f(row) {
                Ok(item) => items.push(item),
                Err(e) => return Err(report_error(&mut self.profiler, active, command, kind, e)),
            }
        }

        if active {
            self.profiler.reader_finish();
        }
        Ok(items)
    }
}

/// SQLite placeholder for a parameter name. Bare names bind to `:name`.
fn placeholder(name: &str) -> String {
    if name.starts_with([':', '@', '$', '?']) {
        name.to_string()
    } else {
        format!(":{}", name)
    }
}

fn to_sql_value(value: &ParamValue) -> Value {
    match value {
        ParamValue::Null => Value::Null,
        ParamValue::Bool(v) => Value::Integer(*v as i64),
        ParamValue::Int(v) => Value::Integer(*v),
        ParamValue::Float(v) => Value::Real(*v),
        ParamValue::Text(v) => Value::Text(v.clone()),
        ParamValue::Bytes(v) => Value::Blob(v.clone()),
        ParamValue::Timestamp(v) => Value::Text(v.to_rfc3339()),
        ParamValue::Uuid(v) => Value::Text(v.hyphenated().to_string()),
    }
}

fn named_values(command: &Command) -> Vec<(String, Value)> {
    command
        .parameters
        .iter()
        .map(|p| (placeholder(&p.name), to_sql_value(&p.value)))
        .collect()
}

fn param_refs(values: &[(String, Value)]) -> Vec<(&str, &dyn ToSql)> {
    values
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}
