/// Logging setup for the binary and for embedding services.
///
/// With a log directory configured, output goes to a daily rolling file
/// (`commute-alert.log.YYYY-MM-DD`) through a non-blocking writer; otherwise
/// to stderr. `RUST_LOG` overrides the configured filter when set.
use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keep alive for the process lifetime; dropping it flushes the file writer.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

pub fn init(filter: &str, log_dir: Option<&Path>) -> Result<LogGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let worker = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "commute-alert.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false) // log files should not contain ANSI colour codes
                .try_init()
                .map_err(|e| anyhow::anyhow!("Logger init error: {}", e))?;
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Logger init error: {}", e))?;
            None
        }
    };

    install_panic_hook();
    Ok(LogGuard { _worker: worker })
}

/// Route panic messages through tracing so they land in the log file too.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        tracing::error!("PANIC at {}: {}", location, message);
    }));
}
