use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::{Command, ExecuteKind, ProfilerSettings};
use crate::profiler::{DbProfiler, LogSink, SqlLogSink, TraceDbProfiler};

/// Profiler state shared by concurrent executions.
///
/// Each execution gets its own [`TraceDbProfiler`] slot, keyed by an execution ID
/// handed out by [`ProfilerRegistry::begin`]. Slots are dropped when the command
/// cycle ends or is abandoned. Notifications for unknown IDs are ignored.
///
/// Lines are written to the sink while the registry lock is held, so the two
/// lines of one execution are never split by another thread. A slow sink
/// therefore delays every other execution's notifications.
///
/// Database layers use the registry through a [`RegistryProfiler`] handle.
pub struct ProfilerRegistry {
    settings: ProfilerSettings,
    sink: Arc<dyn SqlLogSink>,
    /// In-flight executions, keyed by execution ID
    executions: Mutex<HashMap<String, TraceDbProfiler>>,
}

impl ProfilerRegistry {
    pub fn new(settings: ProfilerSettings) -> Self {
        Self {
            settings,
            sink: Arc::new(LogSink),
            executions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn SqlLogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Start profiling a command and return its execution ID
    pub fn begin(&self, command: &Command, kind: ExecuteKind) -> String {
        let execution_id = uuid::Uuid::new_v4().to_string();
        let mut profiler = TraceDbProfiler::new(&self.settings).with_sink(self.sink.clone());
        profiler.execute_start(command, kind);

        if let Ok(mut executions) = self.executions.lock() {
            executions.insert(execution_id.clone(), profiler);
        }
        execution_id
    }

    /// The execution call returned. Reader executions stay registered until `reader_finish`.
    pub fn finish(&self, execution_id: &str, command: &Command, kind: ExecuteKind) {
        let Ok(mut executions) = self.executions.lock() else {
            return;
        };
        if let Some(profiler) = executions.get_mut(execution_id) {
            profiler.execute_finish(command, kind);
            if !kind.is_reader() {
                executions.remove(execution_id);
            }
        }
    }

    pub fn reader_finish(&self, execution_id: &str) {
        let Ok(mut executions) = self.executions.lock() else {
            return;
        };
        if let Some(mut profiler) = executions.remove(execution_id) {
            profiler.reader_finish();
        }
    }

    pub fn error(
        &self,
        execution_id: &str,
        command: &Command,
        kind: ExecuteKind,
        error: &(dyn std::error::Error + 'static),
    ) {
        let Ok(mut executions) = self.executions.lock() else {
            return;
        };
        if let Some(mut profiler) = executions.remove(execution_id) {
            profiler.error(command, kind, error);
        }
    }

    /// Drop an execution without logging it, e.g. a reader whose rows were never consumed.
    /// Returns whether the execution was still registered.
    pub fn abandon(&self, execution_id: &str) -> bool {
        self.executions
            .lock()
            .map(|mut e| e.remove(execution_id).is_some())
            .unwrap_or(false)
    }

    /// Number of executions that have started but not completed
    pub fn in_flight(&self) -> usize {
        self.executions.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_in_flight(&self, execution_id: &str) -> bool {
        self.executions
            .lock()
            .map(|e| e.contains_key(execution_id))
            .unwrap_or(false)
    }
}

impl Default for ProfilerRegistry {
    fn default() -> Self {
        Self::new(ProfilerSettings::default())
    }
}

/// A [`DbProfiler`] that records into a shared [`ProfilerRegistry`].
///
/// Give each connection its own handle. Every statement the handle sees gets a
/// fresh execution slot. Starting a new statement abandons one still pending,
/// and so does dropping the handle.
pub struct RegistryProfiler {
    registry: Arc<ProfilerRegistry>,
    execution_id: Option<String>,
}

impl RegistryProfiler {
    pub fn new(registry: Arc<ProfilerRegistry>) -> Self {
        Self {
            registry,
            execution_id: None,
        }
    }

    /// Execution the handle is currently tracking
    pub fn execution_id(&self) -> Option<&str> {
        self.execution_id.as_deref()
    }

    fn abandon_current(&mut self) {
        if let Some(execution_id) = self.execution_id.take() {
            if self.registry.abandon(&execution_id) {
                log::trace!("Abandoned unfinished execution {}", execution_id);
            }
        }
    }
}

impl DbProfiler for RegistryProfiler {
    fn is_active(&self) -> bool {
        true
    }

    fn execute_start(&mut self, command: &Command, kind: ExecuteKind) {
        self.abandon_current();
        self.execution_id = Some(self.registry.begin(command, kind));
    }

    fn execute_finish(&mut self, command: &Command, kind: ExecuteKind) {
        if let Some(execution_id) = &self.execution_id {
            self.registry.finish(execution_id, command, kind);
            if !kind.is_reader() {
                self.execution_id = None;
            }
        }
    }

    fn reader_finish(&mut self) {
        if let Some(execution_id) = self.execution_id.take() {
            self.registry.reader_finish(&execution_id);
        }
    }

    fn error(
        &mut self,
        command: &Command,
        kind: ExecuteKind,
        error: &(dyn std::error::Error + 'static),
    ) {
        if let Some(execution_id) = self.execution_id.take() {
            self.registry.error(&execution_id, command, kind, error);
        }
    }
}

impl Drop for RegistryProfiler {
    fn drop(&mut self) {
        self.abandon_current();
    }
}
