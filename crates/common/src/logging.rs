//! Logging and tracing initialization.

use crate::config::LoggingConfig;

impl LoggingConfig {
    /// Apply the CLI's `-v` and `--json-logs` flags on top of file settings.
    pub fn with_cli_flags(mut self, verbose: bool, json: bool) -> Self {
        if verbose {
            self.level = "debug".to_string();
        }
        self.json |= json;
        self
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Logs go to stderr so that renderer output on stdout stays clean.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
