use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder};

/// Targets silenced below Trace. Connection-level chatter from the HTTP stack
/// would otherwise drown out one line per streamed request.
const FILTERED_MODULES: &[&str] = &["hyper", "tower", "axum", "tracing", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the level given by `config`.
    ///
    /// Fails only if another logger has already been installed for this process.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;

        simplelog::TermLogger::init(
            level,
            Self::build_log_config(Self::should_filter_dependencies(level)),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
