use log::LevelFilter;

use crate::error::Result;
use crate::models::ProfilerSettings;

/// Install `env_logger` as the log backend.
///
/// Everything logs at `settings.filter`, except the profiler channel which is
/// enabled down to `settings.level`. `RUST_LOG` directives take precedence.
pub fn init_logging(settings: &ProfilerSettings) -> Result<()> {
    builder(settings).try_init()?;
    Ok(())
}

fn builder(settings: &ProfilerSettings) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_filter(settings.filter))
        .filter_module(&settings.channel, level_filter(settings.level))
        .parse_default_env();
    builder
}

fn level_filter(level: crate::models::LogLevel) -> LevelFilter {
    log::Level::from(level).to_level_filter()
}
