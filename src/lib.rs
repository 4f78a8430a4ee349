//! Profiling hooks for SQL command execution.
//!
//! A [`TraceDbProfiler`] receives start, finish, reader-finish and error
//! notifications from a database layer and writes the statement text and its
//! bound parameters to the `SqlLogger` log channel:
//!
//! ```text
//! SqlExecute:SELECT * FROM users WHERE id = :id
//! SqlParameters:{id:7}
//! ```
//!
//! [`ProfiledConnection`] drives those notifications for SQLite, and
//! [`db::postgres`] does the same for a PostgreSQL pool.

pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod profiler;
pub mod state;

pub use db::ProfiledConnection;
pub use error::{ProfilerError, Result};
pub use logging::init_logging;
pub use models::{Command, ExecuteKind, LogLevel, ParamValue, Parameter, ProfilerSettings};
pub use profiler::{DbProfiler, LogSink, MemorySink, SqlLogSink, TraceDbProfiler};
pub use state::{ProfilerRegistry, RegistryProfiler};
