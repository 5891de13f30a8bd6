//! Logging Infrastructure
//!
//! Structured logging setup for development and production.
//! Features:
//! - Daily rotating application logs (deleted after the retention window)
//! - Permanent audit logs for cash handling (never deleted)

use chrono::{Duration, Local, NaiveDate};
use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Retention window for application logs
pub const LOG_RETENTION_DAYS: i64 = 14;

const APP_LOG_PREFIX: &str = "app";
const AUDIT_LOG_PREFIX: &str = "audit";
const LOG_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Extract the date from a rolled file name (`app.2024-03-01.log`)
fn rolled_file_date(name: &str) -> Option<NaiveDate> {
    let date_part = name
        .strip_prefix(APP_LOG_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_SUFFIX)?
        .strip_suffix('.')?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Delete application log files older than `retention_days`.
///
/// Audit logs are never touched. Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join(APP_LOG_PREFIX);
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Local::now().date_naive() - Duration::days(retention_days);
    let mut deleted = 0;
    for entry in fs::read_dir(&app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = rolled_file_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            deleted += 1;
        }
    }
    Ok(deleted)
}

fn rolling_appender(dir: &Path, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix(LOG_SUFFIX)
        .build(dir)?)
}

fn file_layers(log_dir: &Path, json_format: bool) -> anyhow::Result<Vec<BoxedLayer>> {
    let app_log_dir = log_dir.join(APP_LOG_PREFIX);
    let audit_log_dir = log_dir.join(AUDIT_LOG_PREFIX);
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;

    let app_log = rolling_appender(&app_log_dir, APP_LOG_PREFIX)?;
    let audit_log = rolling_appender(&audit_log_dir, AUDIT_LOG_PREFIX)?;

    // Only log to app file if target is NOT "audit"
    let not_audit = tracing_subscriber::filter::filter_fn(|meta| meta.target() != "audit");
    let only_audit = tracing_subscriber::filter::filter_fn(|meta| meta.target() == "audit");

    let layers = if json_format {
        vec![
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(not_audit)
                .boxed(),
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(only_audit)
                .boxed(),
        ]
    } else {
        vec![
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(not_audit)
                .boxed(),
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(only_audit)
                .boxed(),
        ]
    };
    Ok(layers)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level used when `RUST_LOG` is not set (e.g. "info", "debug")
/// * `json_format` - JSON output (production) or pretty output (development)
/// * `log_dir` - Optional directory for rolling file logs
///
/// # Examples
/// ```no_run
/// use pos_engine::utils::logger::init_logger_with_file;
///
/// // Development setup (console only)
/// init_logger_with_file("debug", false, None)?;
///
/// // Production setup (console + file)
/// init_logger_with_file("info", true, Some("./logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console: BoxedLayer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_filter(env_filter())
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_filter(env_filter())
            .boxed()
    };

    let mut layers = vec![console];
    if let Some(dir) = log_dir {
        layers.extend(file_layers(Path::new(dir), json_format)?);
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records cash handling (cash in/out, cuts, payments)
///
/// Audit logs are stored in `audit/audit.YYYY-MM-DD.log` and are never deleted.
///
/// # Examples
/// ```no_run
/// pos_engine::audit_log!("cash_out", "register", "Supplier payment");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            action = %$action,
            resource = %$resource,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            action = %$action,
            resource = %$resource,
            details = %$details,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolled_file_date() {
        assert_eq!(
            rolled_file_date("app.2024-03-01.log"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(rolled_file_date("audit.2024-03-01.log"), None);
        assert_eq!(rolled_file_date("app.notadate.log"), None);
        assert_eq!(rolled_file_date("app.2024-03-01"), None);
    }

    #[test]
    fn test_cleanup_deletes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("app");
        fs::create_dir_all(&app_dir).unwrap();

        let today = Local::now().date_naive();
        let fresh = format!("app.{}.log", today.format("%Y-%m-%d"));
        fs::write(app_dir.join("app.2001-01-01.log"), "old").unwrap();
        fs::write(app_dir.join(&fresh), "new").unwrap();
        fs::write(app_dir.join("notes.txt"), "keep").unwrap();

        let deleted = cleanup_old_logs(dir.path(), LOG_RETENTION_DAYS).unwrap();
        assert_eq!(deleted, 1);
        assert!(!app_dir.join("app.2001-01-01.log").exists());
        assert!(app_dir.join(&fresh).exists());
        assert!(app_dir.join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_without_app_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path(), LOG_RETENTION_DAYS).unwrap(), 0);
    }
}
