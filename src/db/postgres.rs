//! Profiled statement execution against a PostgreSQL pool.
//!
//! PostgreSQL placeholders are positional (`$1`, `$2`, ...), so parameters are
//! bound in the order they were added to the [`Command`]. Their names only
//! appear in the profiler output.

use futures::TryStreamExt;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use super::{finish, report_error, start};
use crate::error::Result;
use crate::models::{Command, ExecuteKind, ParamValue};
use crate::profiler::DbProfiler;

fn bind_parameters(command: &Command) -> Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(&command.text);
    for param in &command.parameters {
        query = match &param.value {
            ParamValue::Null => query.bind(None::<String>),
            ParamValue::Bool(v) => query.bind(*v),
            ParamValue::Int(v) => query.bind(*v),
            ParamValue::Float(v) => query.bind(*v),
            ParamValue::Text(v) => query.bind(v.as_str()),
            ParamValue::Bytes(v) => query.bind(v.as_slice()),
            ParamValue::Timestamp(v) => query.bind(*v),
            ParamValue::Uuid(v) => query.bind(*v),
        };
    }
    query
}

/// Run a statement that returns no rows, returning the number of rows affected
pub async fn execute<P: DbProfiler>(
    pool: &PgPool,
    profiler: &mut P,
    command: &Command,
) -> Result<u64> {
    let kind = ExecuteKind::NonQuery;
    let active = start(profiler, command, kind);

    let result = bind_parameters(command)
        .execute(pool)
        .await
        .map(|done| done.rows_affected());

    finish(profiler, active, command, kind, result)
}

/// Run a statement and decode the first column of its first row
pub async fn fetch_scalar<P, T>(pool: &PgPool, profiler: &mut P, command: &Command) -> Result<T>
where
    P: DbProfiler,
    T: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    let kind = ExecuteKind::Scalar;
    let active = start(profiler, command, kind);

    let result = match bind_parameters(command).fetch_one(pool).await {
        Ok(row) => row.try_get::<T, _>(0),
        Err(e) => Err(e),
    };

    finish(profiler, active, command, kind, result)
}

/// Stream the rows of a query through `f`.
///
/// Rows are fetched lazily, so the execution is reported finished as soon as the
/// stream is open. Errors raised while streaming are reported after that.
pub async fn fetch_rows<P, T, F>(
    pool: &PgPool,
    profiler: &mut P,
    command: &Command,
    mut f: F,
) -> Result<Vec<T>>
where
    P: DbProfiler,
    F: FnMut(&PgRow) -> std::result::Result<T, sqlx::Error>,
{
    let kind = ExecuteKind::Reader;
    let active = start(profiler, command, kind);

    let mut rows = bind_parameters(command).fetch(pool);
    if active {
        profiler.execute_finish(command, kind);
    }

    let mut items = Vec::new();
    loop {
        let row = match rows.try_next().await {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(e) => return Err(report_error(profiler, active, command, kind, e)),
        };
        match f(&row) {
            Ok(item) => items.push(item),
            Err(e) => return Err(report_error(profiler, active, command, kind, e)),
        }
    }

    if active {
        profiler.reader_finish();
    }
    Ok(items)
}
