//! Command profiling hooks.
//!
//! A database layer drives a [`DbProfiler`] through each command it runs:
//!
//! - `execute_start` then `execute_finish` for non-query and scalar statements
//! - `execute_start`, `execute_finish`, then `reader_finish` once a result set is consumed
//! - `error` in place of `execute_finish` when the statement fails
//!
//! Hooks observe only. They never fail and never change the outcome of the statement.

pub mod sink;
pub mod stopwatch;
pub mod trace;

pub use sink::{LogLine, LogSink, MemorySink, SqlLogSink};
pub use stopwatch::Stopwatch;
pub use trace::{ExecutionSnapshot, TraceDbProfiler};

use crate::models::{Command, ExecuteKind};

pub trait DbProfiler {
    /// Whether the database layer should call the hooks at all
    fn is_active(&self) -> bool;

    fn execute_start(&mut self, command: &Command, kind: ExecuteKind);

    /// The execution call returned. For readers the rows have not been consumed yet.
    fn execute_finish(&mut self, command: &Command, kind: ExecuteKind);

    /// The result set opened by the last reader execution has been consumed
    fn reader_finish(&mut self);

    fn error(
        &mut self,
        command: &Command,
        kind: ExecuteKind,
        error: &(dyn std::error::Error + 'static),
    );
}

/// Render an error followed by its chain of causes, one per line
pub fn error_detail(error: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str("\n  caused by: ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("statement failed")]
    struct Outer {
        #[source]
        inner: std::io::Error,
    }

    #[test]
    fn test_error_detail_includes_causes() {
        let err = Outer {
            inner: std::io::Error::new(std::io::ErrorKind::Other, "socket closed"),
        };
        assert_eq!(
            error_detail(&err),
            "statement failed\n  caused by: socket closed"
        );
    }

    #[test]
    fn test_error_detail_without_cause() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(error_detail(&err), "boom");
    }
}
