use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Local, SecondsFormat};

use crate::{runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES};

static LOG_WRITE_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => env::temp_dir().join("ryh-admin").join(file_name),
    }
}

fn format_log_line(scope: &str, message: &str, timestamp: DateTime<Local>) -> String {
    format!(
        "[{}] [{}] {}",
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
        scope,
        message
    )
}

fn rotated_log_path(path: &Path) -> PathBuf {
    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    PathBuf::from(rotated)
}

/// Moves `path` to `<path>.1` once it has grown past `max_bytes`.
///
/// Returns whether a rotation happened. A missing file is not an error.
pub(crate) fn rotate_if_oversized(path: &Path, max_bytes: u64) -> Result<bool, String> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(error) => {
            return Err(format!(
                "Failed to read log metadata {}: {}",
                path.display(),
                error
            ));
        }
    };
    if size <= max_bytes {
        return Ok(false);
    }

    let rotated = rotated_log_path(path);
    fs::rename(path, &rotated).map_err(|error| {
        format!(
            "Failed to rotate log {} to {}: {}",
            path.display(),
            rotated.display(),
            error
        )
    })?;
    Ok(true)
}

pub(crate) fn append_log_line(path: &Path, line: &str, max_bytes: u64) -> Result<(), String> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }

    let _guard = LOG_WRITE_LOCK
        .lock()
        .map_err(|_| "Desktop log lock poisoned.".to_string())?;
    rotate_if_oversized(path, max_bytes)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open log {}: {}", path.display(), error))?;
    writeln!(file, "{line}")
        .map_err(|error| format!("Failed to write log {}: {}", path.display(), error))
}

fn append_scoped_log(scope: &str, message: &str) {
    let line = format_log_line(scope, message, Local::now());
    eprintln!("{line}");

    let log_path = resolve_desktop_log_path(
        runtime_paths::default_packaged_root_dir(),
        DESKTOP_LOG_FILE,
    );
    if let Err(error) = append_log_line(&log_path, &line, DESKTOP_LOG_MAX_BYTES) {
        eprintln!("{error}");
    }
}

pub(crate) fn append_desktop_log(message: &str) {
    append_scoped_log("desktop", message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_scoped_log("startup", message);
}

pub(crate) fn append_update_log(message: &str) {
    append_scoped_log("update", message);
}
