use std::sync::Mutex;

/// Write-only, leveled destination for profiler lines
pub trait SqlLogSink: Send + Sync {
    fn write(&self, level: log::Level, channel: &str, line: &str);
}

/// Forwards lines to the `log` facade using the channel as the log target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SqlLogSink for LogSink {
    fn write(&self, level: log::Level, channel: &str, line: &str) {
        log::log!(target: channel, level, "{}", line);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: log::Level,
    pub channel: String,
    pub message: String,
}

/// Keeps every line in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Just the message text of each line
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|l| l.message).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl SqlLogSink for MemorySink {
    fn write(&self, level: log::Level, channel: &str, line: &str) {
        // A poisoned buffer only drops the line; logging is best-effort
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(LogLine {
                level,
                channel: channel.to_string(),
                message: line.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.write(log::Level::Debug, "SqlLogger", "first");
        sink.write(log::Level::Info, "Other", "second");

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].channel, "SqlLogger");
        assert_eq!(lines[1].level, log::Level::Info);
        assert_eq!(sink.messages(), vec!["first", "second"]);

        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_log_sink_without_logger_is_noop() {
        LogSink.write(log::Level::Debug, "SqlLogger", "SqlExecute:SELECT 1");
    }
}
