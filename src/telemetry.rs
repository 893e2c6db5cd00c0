use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` and
/// `log_level` (from the config file) is used as the filter directive.
/// Logs go to stderr so command output on stdout stays pipeable.
pub fn init(log_level: &str, verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = if verbose { "debug" } else { log_level };
            EnvFilter::try_new(directive)
                .map_err(|e| anyhow!("invalid log level/filter '{}': {}", directive, e))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
