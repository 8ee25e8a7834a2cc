use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MDCOMPARE_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Route logs to `path`, or to stderr when `fallback_stderr` is set.
/// Without either, logging stays off so the viewer's screen is untouched.
pub fn init(path: Option<&Path>, fallback_stderr: bool) -> Result<()> {
    if let Some(path) = path {
        let file = File::create(path)
            .with_context(|| format!("could not create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("info"))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if fallback_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("warn"))
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
