//! Log output for the `sitesmith` binary.
//!
//! The interesting events come from generation: which path produced the
//! sections, the fallback reason when the model path failed, and (at
//! `debug`) a preview of the raw model reply. Store writes log at `debug`.
//!
//! One-shot commands use [`init_cli`], which keeps stdout free for command
//! output and only surfaces warnings on stderr. `--log-to-file` switches to
//! [`init_production`], which also keeps a JSON trail under
//! `~/.sitesmith/logs/` for diagnosing bad model replies after the fact.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name prefix of the rotated JSON log.
pub const LOG_FILE_PREFIX: &str = "sitesmith.log";

/// Filter used with `--log-to-file` when `RUST_LOG` is unset. Keeps the
/// crate's own `debug` events (raw reply previews) and quiets dependencies.
pub const FILE_DEFAULT_FILTER: &str = "warn,sitesmith=debug";

/// Filter used for plain CLI runs when `RUST_LOG` is unset.
pub const CLI_DEFAULT_FILTER: &str = "warn";

/// Keeps the background log writer alive; drop it last in `main`.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// `RUST_LOG` if set and valid, otherwise `default`.
fn env_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log JSON to `{logs_dir}/sitesmith.log.YYYY-MM-DD` and mirror to stderr.
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create logs directory {}: {e}",
            logs_dir.display()
        )
    })?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(env_or(FILE_DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}

/// Warnings and errors to stderr only.
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_or(CLI_DEFAULT_FILTER))
        .with_writer(std::io::stderr)
        .try_init();
}
