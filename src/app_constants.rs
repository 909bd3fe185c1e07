pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "ryh-admin";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1000.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 700.0;
pub(crate) const MAIN_WINDOW_ICON: &str = "icons/icon.png";

pub(crate) const PACKAGED_ENTRY_FILE: &str = "index.html";
pub(crate) const PRELOAD_SCRIPT_STEM: &str = "desktop-preload";
pub(crate) const DEFAULT_PRELOAD_EXTENSION: &str = ".js";
pub(crate) const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:9000/";

pub(crate) const UPDATE_AVAILABLE_EVENT: &str = "update-available";

pub(crate) const DEV_MODE_ENV: &str = "RYH_DESKTOP_DEV";
pub(crate) const DEBUGGING_ENV: &str = "RYH_DESKTOP_DEBUGGING";
pub(crate) const DEV_SERVER_URL_ENV: &str = "RYH_DESKTOP_APP_URL";
pub(crate) const PRELOAD_FOLDER_ENV: &str = "RYH_DESKTOP_PRELOAD_FOLDER";
pub(crate) const PRELOAD_EXTENSION_ENV: &str = "RYH_DESKTOP_PRELOAD_EXTENSION";
pub(crate) const DESKTOP_ROOT_ENV: &str = "RYH_DESKTOP_ROOT";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const DEVTOOLS_WATCH_INTERVAL_MS: u64 = 500;
