use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt};

/// Environment variable holding an `EnvFilter` directive, `info` by default
pub const LOG_FILTER_ENV_VAR: &str = "HC_LOG";

/// Builds a subscriber appending plain lines to `log_file`.
///
/// Nothing is installed globally; the caller decides where the returned
/// dispatch is the default.
pub fn build_dispatch(log_file: &Path) -> Result<Dispatch> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);
    Ok(Dispatch::new(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn events_are_appended_to_the_file() {
        let tmp = TempDir::new().unwrap();
        let log_file = tmp.path().join("hc.log");
        std::fs::write(&log_file, "earlier line\n").unwrap();

        let dispatch = build_dispatch(&log_file).unwrap();
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!(module = "api", "executing module");
        });

        let contents = std::fs::read_to_string(&log_file).unwrap();
        assert!(contents.starts_with("earlier line\n"));
        assert!(contents.contains("INFO"));
        assert!(contents.contains("executing module"));
        assert!(contents.contains("module=\"api\""));
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("no-such-dir").join("hc.log");
        assert!(build_dispatch(&missing).is_err());
    }
}
