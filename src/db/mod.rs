pub mod postgres;
pub mod sqlite;

use crate::error::ProfilerError;
use crate::models::{Command, ExecuteKind};
use crate::profiler::DbProfiler;

pub use sqlite::ProfiledConnection;

/// Notify the profiler that a command is starting, if it wants notifications
fn start<P: DbProfiler>(profiler: &mut P, command: &Command, kind: ExecuteKind) -> bool {
    let active = profiler.is_active();
    if active {
        profiler.execute_start(command, kind);
    }
    active
}

/// Tell the profiler about a failed statement, then hand the error back unchanged
fn report_error<P, E>(
    profiler: &mut P,
    active: bool,
    command: &Command,
    kind: ExecuteKind,
    error: E,
) -> ProfilerError
where
    P: DbProfiler,
    E: std::error::Error + Into<ProfilerError> + 'static,
{
    if active {
        profiler.error(command, kind, &error);
    }
    error.into()
}

fn finish<P, T, E>(
    profiler: &mut P,
    active: bool,
    command: &Command,
    kind: ExecuteKind,
    result: Result<T, E>,
) -> crate::error::Result<T>
where
    P: DbProfiler,
    E: std::error::Error + Into<ProfilerError> + 'static,
{
    match result {
        Ok(value) => {
            if active {
                profiler.execute_finish(command, kind);
            }
            Ok(value)
        }
        Err(e) => Err(report_error(profiler, active, command, kind, e)),
    }
}
