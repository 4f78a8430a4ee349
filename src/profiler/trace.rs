use std::sync::Arc;
use std::time::Duration;

use super::{error_detail, DbProfiler, LogSink, SqlLogSink, Stopwatch};
use crate::models::{Command, ExecuteKind, ProfilerSettings};

/// Statement text and rendered parameters captured when an execution returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSnapshot {
    pub command_text: String,
    pub parameters: String,
}

impl ExecutionSnapshot {
    pub fn capture(command: &Command) -> Self {
        ExecutionSnapshot {
            command_text: command.text.clone(),
            parameters: command.parameters_display(),
        }
    }
}

/// Profiler that writes each completed statement and its parameters to a log channel.
///
/// Holds a single in-flight slot, so one instance serves one command at a time.
/// Use [`crate::state::ProfilerRegistry`] when executions overlap.
///
/// Elapsed time is measured for every cycle but is not part of the log output;
/// read it back with [`TraceDbProfiler::last_elapsed`].
pub struct TraceDbProfiler {
    sink: Arc<dyn SqlLogSink>,
    channel: String,
    level: log::Level,
    stopwatch: Option<Stopwatch>,
    /// Reader execution waiting for its rows to be consumed
    pending: Option<ExecutionSnapshot>,
    execute_kind: Option<ExecuteKind>,
}

impl Default for TraceDbProfiler {
    fn default() -> Self {
        Self::new(&ProfilerSettings::default())
    }
}

impl TraceDbProfiler {
    pub fn new(settings: &ProfilerSettings) -> Self {
        TraceDbProfiler {
            sink: Arc::new(LogSink),
            channel: settings.channel.clone(),
            level: settings.level.into(),
            stopwatch: None,
            pending: None,
            execute_kind: None,
        }
    }

    /// Send lines somewhere other than the `log` facade
    pub fn with_sink(mut self, sink: Arc<dyn SqlLogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Kind of the most recently finished execution
    pub fn execute_kind(&self) -> Option<ExecuteKind> {
        self.execute_kind
    }

    pub fn stopwatch(&self) -> Option<&Stopwatch> {
        self.stopwatch.as_ref()
    }

    /// Duration of the last completed cycle, if its stopwatch has been stopped
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.stopwatch
            .as_ref()
            .filter(|watch| !watch.is_running())
            .map(Stopwatch::elapsed)
    }

    pub fn pending(&self) -> Option<&ExecutionSnapshot> {
        self.pending.as_ref()
    }

    fn emit(&self, line: &str) {
        self.sink.write(self.level, &self.channel, line);
    }

    fn complete(&mut self, snapshot: &ExecutionSnapshot) {
        if let Some(watch) = self.stopwatch.as_mut() {
            watch.stop();
        }
        self.emit(&format!("SqlExecute:{}", snapshot.command_text));
        self.emit(&format!("SqlParameters:{}", snapshot.parameters));
    }
}

impl DbProfiler for TraceDbProfiler {
    fn is_active(&self) -> bool {
        true
    }

    fn execute_start(&mut self, _command: &Command, _kind: ExecuteKind) {
        self.stopwatch = Some(Stopwatch::start_new());
        self.pending = None;
    }

    fn execute_finish(&mut self, command: &Command, kind: ExecuteKind) {
        let snapshot = ExecutionSnapshot::capture(command);
        self.execute_kind = Some(kind);

        if kind.is_reader() {
            self.pending = Some(snapshot);
        } else {
            self.pending = None;
            self.complete(&snapshot);
        }
    }

    fn reader_finish(&mut self) {
        if let Some(snapshot) = self.pending.take() {
            self.complete(&snapshot);
        }
    }

    fn error(
        &mut self,
        command: &Command,
        _kind: ExecuteKind,
        error: &(dyn std::error::Error + 'static),
    ) {
        // The stopwatch is left running; the cycle ends without a duration
        self.emit(&format!("SqlError:{}", command.text));
        self.emit(&error_detail(error));
    }
}
