use std::{fmt, path::PathBuf};

use crate::{
    MAIN_WINDOW_HEIGHT, MAIN_WINDOW_ICON, MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSpec {
    pub(crate) title: String,
    pub(crate) icon_path: PathBuf,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) resizable: bool,
    pub(crate) menu_bar_visible: bool,
    /// Keeps preload script bindings out of the page's global scope.
    pub(crate) content_isolation: bool,
    pub(crate) preload_script: Option<PathBuf>,
    /// Whether the webview may open devtools at all.
    pub(crate) devtools: bool,
}

impl WindowSpec {
    pub(crate) fn main_window(preload_script: Option<PathBuf>, devtools: bool) -> Self {
        Self {
            title: MAIN_WINDOW_TITLE.to_string(),
            icon_path: PathBuf::from(MAIN_WINDOW_ICON),
            width: MAIN_WINDOW_WIDTH,
            height: MAIN_WINDOW_HEIGHT,
            resizable: false,
            menu_bar_visible: false,
            content_isolation: true,
            preload_script,
            devtools,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostPlatform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl HostPlatform {
    pub(crate) fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// macOS apps stay alive in the dock after their last window closes.
    pub(crate) fn keeps_running_without_windows(self) -> bool {
        matches!(self, Self::MacOs)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitDecision {
    Terminate,
    KeepRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowStatus {
    Idle,
    Creating,
    Open,
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Creating => "creating",
            Self::Open => "open",
        };
        f.write_str(name)
    }
}
